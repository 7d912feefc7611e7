//! Directory types.
//!
//! User documents, friend references, and the request/response bodies of the
//! HTTP surface. Request bodies reject unknown fields so that extra
//! properties fail loudly instead of being silently dropped.

use serde::{Deserialize, Serialize};

/// A reference from one user to another, scoped to that friendship.
///
/// `recommendations` holds game identifiers the *owning* user received
/// from/about this friend. The list is logically a set: inserts suppress
/// duplicates and entries are removed by value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FriendRef {
    /// Identifier of the referenced user. This is a back-reference, not
    /// ownership; the referenced account may since have been deleted.
    pub id: String,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

impl FriendRef {
    /// Create a reference to `id` with no recommendations yet.
    pub fn new(id: String) -> Self {
        Self {
            id,
            recommendations: Vec::new(),
        }
    }

    /// Add a recommendation unless it is already present.
    /// Returns whether the list changed.
    pub fn add_recommendation(&mut self, recommendation: &str) -> bool {
        if self.recommendations.iter().any(|r| r == recommendation) {
            return false;
        }
        self.recommendations.push(recommendation.to_string());
        true
    }

    /// Remove a recommendation by value. Returns whether the list changed.
    pub fn remove_recommendation(&mut self, recommendation: &str) -> bool {
        let initial_len = self.recommendations.len();
        self.recommendations.retain(|r| r != recommendation);
        self.recommendations.len() < initial_len
    }
}

/// A stored user document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Store-assigned identifier (24 hex characters).
    pub id: String,
    pub name: String,
    /// Unique across users, enforced by an existence check at registration
    /// rather than a store constraint.
    pub username: String,
    pub email: String,
    /// Opaque string; no calendar validation is performed.
    pub birthday: String,
    pub password: String,
    #[serde(default)]
    pub friends: Vec<FriendRef>,
}

impl User {
    /// The friend reference pointing at `friend_id`, if any.
    pub fn friend_ref(&self, friend_id: &str) -> Option<&FriendRef> {
        self.friends.iter().find(|f| f.id == friend_id)
    }

    /// Whether this user's friend list references `friend_id`.
    pub fn has_friend(&self, friend_id: &str) -> bool {
        self.friend_ref(friend_id).is_some()
    }
}

/// Public view of a user: the full document minus the password.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub username: String,
    pub email: String,
    pub birthday: String,
    pub friends: Vec<FriendRef>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            birthday: user.birthday.clone(),
            friends: user.friends.clone(),
        }
    }
}

// ── Request Bodies ────────────────────────────────────────────────────────────

/// Body for account creation and for full-profile update.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserPayload {
    pub name: String,
    pub username: String,
    pub email: String,
    pub birthday: String,
    pub password: String,
    /// Optional on both operations: creation defaults to an empty list,
    /// update keeps the stored list when absent.
    #[serde(default)]
    pub friends: Option<Vec<FriendRef>>,
}

/// Body for the username availability check.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CheckUsernameRequest {
    pub username: String,
}

/// Body for adding or removing a friend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FriendNameRequest {
    pub friend_name: String,
}

/// Body for adding or removing a recommendation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RecommendationRequest {
    pub friend_name: String,
    /// Identifier of the recommended game (store-native id format).
    pub recommendation: String,
}

// ── Response Bodies ───────────────────────────────────────────────────────────

/// Confirmation message for mutations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Response for account creation: confirmation plus a bearer credential
/// bound to the new identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub message: String,
    pub token: String,
}

/// Response for the username availability check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsernameCheckResponse {
    pub exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

// ── Tests ─────────────────────────────────────────────────────────────────────
