//! User directory operations.
//!
//! Account lifecycle, friendship mutation, and recommendation mutation.
//! Every operation is a direct read-modify-write against the user store: the
//! service fetches documents, constructs their replacement state, and issues
//! explicit update commands. A friendship change touches two documents with
//! two independent writes and no rollback, so a failure between the writes
//! leaves the relationship asymmetric and surfaces as an internal error.

use crate::auth::TokenIssuer;
use crate::error::{ApiError, ApiResult};

use super::store::UserStore;
use super::types::{
    CreatedResponse, FriendRef, MessageResponse, User, UserPayload, UserProfile,
    UsernameCheckResponse,
};

/// The user directory service.
///
/// Cheap to clone; both collaborators are handles. The store arbitrates
/// per-document write ordering; the service holds no state of its own.
#[derive(Clone)]
pub struct UserDirectory {
    store: UserStore,
    tokens: TokenIssuer,
}

impl UserDirectory {
    /// Create a directory over a document store and a credential issuer.
    pub fn new(store: UserStore, tokens: TokenIssuer) -> Self {
        Self { store, tokens }
    }

    // ── Account Lifecycle ─────────────────────────────────────────────────────

    /// Register a new account and issue a credential bound to it.
    ///
    /// The username existence check and the insert are separate store calls,
    /// so two simultaneous registrations for the same username can both pass
    /// the check; the store itself enforces no uniqueness constraint.
    pub fn create(&self, payload: UserPayload) -> ApiResult<CreatedResponse> {
        if self.store.find_by_username(&payload.username).is_some() {
            return Err(ApiError::Conflict("already existing user".into()));
        }

        let user = User {
            id: String::new(), // assigned by the store
            name: payload.name,
            username: payload.username,
            email: payload.email,
            birthday: payload.birthday,
            password: payload.password,
            friends: payload.friends.unwrap_or_default(),
        };

        let created = self
            .store
            .insert(user)
            .ok_or_else(|| ApiError::Internal("could not create user account".into()))?;

        tracing::info!(
            user_id = created.id.as_str(),
            username = created.username.as_str(),
            "user created"
        );

        Ok(CreatedResponse {
            message: "user created successfully".into(),
            token: self.tokens.issue(&created.id),
        })
    }

    /// Report whether a username is already taken.
    pub fn check_username(&self, username: &str) -> UsernameCheckResponse {
        if self.store.find_by_username(username).is_some() {
            UsernameCheckResponse {
                exists: true,
                message: None,
            }
        } else {
            UsernameCheckResponse {
                exists: false,
                message: Some("username available to be used".into()),
            }
        }
    }

    /// Fetch the full user document, password included.
    ///
    /// For trusted post-auth use; [`Self::user_profile`] is the public view.
    pub fn logged_user(&self, id: &str) -> ApiResult<User> {
        self.store
            .find_by_id(id)
            .ok_or_else(|| ApiError::NotFound("could not find user with given id".into()))
    }

    /// Replace every profile field of an existing account.
    ///
    /// A replacement identical to the stored document reports as "could not
    /// update": the store cannot tell a no-op apart from a missed write.
    pub fn update(&self, id: &str, payload: UserPayload) -> ApiResult<MessageResponse> {
        let current = self
            .store
            .find_by_id(id)
            .ok_or_else(|| ApiError::NotFound("could not find user with given id".into()))?;

        let updated = User {
            id: current.id,
            name: payload.name,
            username: payload.username,
            email: payload.email,
            birthday: payload.birthday,
            password: payload.password,
            friends: payload.friends.unwrap_or(current.friends),
        };

        if !self.store.update(id, updated) {
            return Err(ApiError::Internal("could not update user".into()));
        }

        Ok(MessageResponse {
            message: "user updated successfully".into(),
        })
    }

    /// Fetch the public profile: the document with the password stripped.
    pub fn user_profile(&self, id: &str) -> ApiResult<UserProfile> {
        let user = self
            .store
            .find_by_id(id)
            .ok_or_else(|| ApiError::NotFound("could not find user with given id".into()))?;
        Ok(UserProfile::from(&user))
    }

    /// Every stored document, unfiltered and password included.
    /// Trusted/admin use only; the public per-user getter strips credentials.
    pub fn all_users(&self) -> Vec<User> {
        self.store.all()
    }

    /// Delete an account.
    ///
    /// Does not cascade: friend references held by other users keep pointing
    /// at the deleted identifier.
    pub fn delete(&self, id: &str) -> ApiResult<MessageResponse> {
        if !self.store.delete_by_id(id) {
            return Err(ApiError::NotFound("could not find user with given id".into()));
        }

        tracing::info!(user_id = id, "user deleted");

        Ok(MessageResponse {
            message: "user account deleted successfully".into(),
        })
    }

    /// Number of registered accounts.
    pub fn user_count(&self) -> usize {
        self.store.user_count()
    }

    // ── Friends Graph ─────────────────────────────────────────────────────────

    /// The friend references of one user.
    pub fn friend_list(&self, id: &str) -> ApiResult<Vec<FriendRef>> {
        let user = self
            .store
            .find_by_id(id)
            .ok_or_else(|| ApiError::NotFound("could not find user with given id".into()))?;
        Ok(user.friends)
    }

    /// Create a symmetric friendship between a user and the account named by
    /// `friend_username`.
    pub fn add_friend(&self, user_id: &str, friend_username: &str) -> ApiResult<MessageResponse> {
        let user = self
            .store
            .find_by_id(user_id)
            .ok_or_else(|| ApiError::NotFound("could not find user".into()))?;
        let friend = self
            .store
            .find_by_username(friend_username)
            .ok_or_else(|| ApiError::NotFound("could not find friend with given username".into()))?;

        if user.id == friend.id {
            return Err(ApiError::Forbidden("user cannot add itself as friend".into()));
        }
        if user.has_friend(&friend.id) || friend.has_friend(&user.id) {
            return Err(ApiError::Forbidden("users are already friends".into()));
        }

        let mut updated_user = user.clone();
        updated_user.friends.push(FriendRef::new(friend.id.clone()));
        let mut updated_friend = friend.clone();
        updated_friend.friends.push(FriendRef::new(user.id.clone()));

        // Two independent writes; a failure on either side is reported but
        // never rolled back, so the relationship can be left asymmetric.
        let user_written = self.store.update(&user.id, updated_user);
        let friend_written = self.store.update(&friend.id, updated_friend);
        if !user_written || !friend_written {
            return Err(ApiError::Internal("could not add friend".into()));
        }

        tracing::info!(
            user_id = user.id.as_str(),
            friend_id = friend.id.as_str(),
            "friendship added"
        );

        Ok(MessageResponse {
            message: "friend added successfully".into(),
        })
    }

    /// Dissolve a friendship, removing the reference on both sides.
    ///
    /// A reference present on only one side (the leftover of a failed add)
    /// is still removed from wherever it exists.
    pub fn remove_friend(&self, user_id: &str, friend_username: &str) -> ApiResult<MessageResponse> {
        let user = self
            .store
            .find_by_id(user_id)
            .ok_or_else(|| ApiError::NotFound("could not find user".into()))?;
        let friend = self
            .store
            .find_by_username(friend_username)
            .ok_or_else(|| ApiError::NotFound("could not find friend with given username".into()))?;

        if user.id == friend.id {
            return Err(ApiError::Forbidden(
                "user cannot remove itself as friend".into(),
            ));
        }
        if !user.has_friend(&friend.id) && !friend.has_friend(&user.id) {
            return Err(ApiError::BadRequest("users are not friends".into()));
        }

        let mut updated_user = user.clone();
        updated_user.friends.retain(|f| f.id != friend.id);
        let mut updated_friend = friend.clone();
        updated_friend.friends.retain(|f| f.id != user.id);

        // Only sides that actually hold the reference are written; each write
        // must land, and neither is rolled back if the other fails.
        if user.has_friend(&friend.id) && !self.store.update(&user.id, updated_user) {
            return Err(ApiError::Internal("could not remove friend".into()));
        }
        if friend.has_friend(&user.id) && !self.store.update(&friend.id, updated_friend) {
            return Err(ApiError::Internal("could not remove friend".into()));
        }

        tracing::info!(
            user_id = user.id.as_str(),
            friend_id = friend.id.as_str(),
            "friendship removed"
        );

        Ok(MessageResponse {
            message: "friend removed successfully".into(),
        })
    }

    // ── Recommendations ───────────────────────────────────────────────────────

    /// Record a recommendation against the friendship, stored on the
    /// *friend's* side: inside their friend reference that points back at
    /// the acting user. Duplicate texts are suppressed (set semantics).
    pub fn add_recommendation(
        &self,
        user_id: &str,
        friend_username: &str,
        recommendation: &str,
    ) -> ApiResult<MessageResponse> {
        let friend = self
            .store
            .find_by_username(friend_username)
            .ok_or_else(|| ApiError::NotFound("could not find friend".into()))?;

        let mut updated = friend.clone();
        let changed = match updated.friends.iter_mut().find(|f| f.id == user_id) {
            Some(link) => link.add_recommendation(recommendation),
            None => false,
        };

        // "No effect" covers both a missing back-reference and an already
        // present recommendation.
        if !changed || !self.store.update(&friend.id, updated) {
            return Err(ApiError::Internal("could not add recommendation".into()));
        }

        Ok(MessageResponse {
            message: "recommendation added successfully".into(),
        })
    }

    /// Remove a recommendation from the friend's back-reference to the
    /// acting user.
    pub fn remove_recommendation(
        &self,
        user_id: &str,
        friend_username: &str,
        recommendation: &str,
    ) -> ApiResult<MessageResponse> {
        let user = self
            .store
            .find_by_id(user_id)
            .ok_or_else(|| ApiError::NotFound("could not find user".into()))?;
        let friend = self
            .store
            .find_by_username(friend_username)
            .ok_or_else(|| ApiError::NotFound("could not find friend".into()))?;

        if user.id == friend.id {
            return Err(ApiError::Forbidden(
                "user cannot remove recommendation to itself".into(),
            ));
        }

        let mut updated = friend.clone();
        let changed = match updated.friends.iter_mut().find(|f| f.id == user.id) {
            Some(link) => link.remove_recommendation(recommendation),
            None => false,
        };

        if !changed || !self.store.update(&friend.id, updated) {
            return Err(ApiError::Internal("could not remove recommendation".into()));
        }

        Ok(MessageResponse {
            message: "recommendation removed successfully".into(),
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
