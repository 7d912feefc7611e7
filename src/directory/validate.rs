//! Request validation.
//!
//! Field-level checks run in the API layer before any request body or path
//! identifier reaches the service. Each function inspects every field and
//! reports the full violation list in one pass, so a client fixing a bad
//! request sees all of its problems at once.

use serde::Serialize;

use super::types::{CheckUsernameRequest, FriendNameRequest, RecommendationRequest, UserPayload};

/// Length of a store-native identifier (24 hex characters).
pub const OBJECT_ID_LEN: usize = 24;

/// A single violated field.
#[derive(Debug, Clone, Serialize)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: String,
}

impl FieldViolation {
    fn non_empty(field: &'static str) -> Self {
        Self {
            field,
            message: format!("{field} must be a non-empty string"),
        }
    }

    fn object_id(field: &'static str) -> Self {
        Self {
            field,
            message: format!("{field} must be a 24-character hex identifier"),
        }
    }
}

/// Whether `value` looks like a store-assigned identifier.
pub fn is_object_id(value: &str) -> bool {
    value.len() == OBJECT_ID_LEN && value.chars().all(|c| c.is_ascii_hexdigit())
}

/// Whether `value` has a plausible mailbox shape (`local@domain.tld`).
fn is_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

fn require_non_empty(violations: &mut Vec<FieldViolation>, field: &'static str, value: &str) {
    if value.trim().is_empty() {
        violations.push(FieldViolation::non_empty(field));
    }
}

fn finish(violations: Vec<FieldViolation>) -> Result<(), Vec<FieldViolation>> {
    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

/// Validate a create/update body.
pub fn validate_user_payload(payload: &UserPayload) -> Result<(), Vec<FieldViolation>> {
    let mut violations = Vec::new();

    require_non_empty(&mut violations, "name", &payload.name);
    require_non_empty(&mut violations, "username", &payload.username);
    require_non_empty(&mut violations, "birthday", &payload.birthday);
    require_non_empty(&mut violations, "password", &payload.password);

    if payload.email.trim().is_empty() {
        violations.push(FieldViolation::non_empty("email"));
    } else if !is_email(&payload.email) {
        violations.push(FieldViolation {
            field: "email",
            message: "email must be a valid address".to_string(),
        });
    }

    finish(violations)
}

/// Validate a path identifier.
pub fn validate_object_id(
    field: &'static str,
    value: &str,
) -> Result<(), Vec<FieldViolation>> {
    if is_object_id(value) {
        Ok(())
    } else {
        Err(vec![FieldViolation::object_id(field)])
    }
}

/// Validate the username availability body.
pub fn validate_check_username(request: &CheckUsernameRequest) -> Result<(), Vec<FieldViolation>> {
    let mut violations = Vec::new();
    require_non_empty(&mut violations, "username", &request.username);
    finish(violations)
}

/// Validate a friend add/remove body.
pub fn validate_friend_name(request: &FriendNameRequest) -> Result<(), Vec<FieldViolation>> {
    let mut violations = Vec::new();
    require_non_empty(&mut violations, "friendName", &request.friend_name);
    finish(violations)
}

/// Validate a recommendation add/remove body. The recommendation itself must
/// be a game identifier in store-native format.
pub fn validate_recommendation(
    request: &RecommendationRequest,
) -> Result<(), Vec<FieldViolation>> {
    let mut violations = Vec::new();

    require_non_empty(&mut violations, "friendName", &request.friend_name);
    if !is_object_id(&request.recommendation) {
        violations.push(FieldViolation::object_id("recommendation"));
    }

    finish(violations)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> UserPayload {
        UserPayload {
            name: "Alice".to_string(),
            username: "alice".to_string(),
            email: "alice@x.com".to_string(),
            birthday: "1990-04-01".to_string(),
            password: "hunter2".to_string(),
            friends: None,
        }
    }

    #[test]
    fn test_valid_payload_passes() {
        assert!(validate_user_payload(&payload()).is_ok());
    }

    #[test]
    fn test_every_violation_is_reported() {
        let bad = UserPayload {
            name: "".to_string(),
            username: "  ".to_string(),
            email: "not-an-address".to_string(),
            birthday: "".to_string(),
            password: "".to_string(),
            friends: None,
        };

        let violations = validate_user_payload(&bad).unwrap_err();
        let fields: Vec<&str> = violations.iter().map(|v| v.field).collect();
        assert_eq!(
            fields,
            vec!["name", "username", "birthday", "password", "email"]
        );
    }

    #[test]
    fn test_email_shapes() {
        assert!(is_email("alice@x.com"));
        assert!(is_email("a.b+c@sub.domain.org"));
        assert!(!is_email("alice"));
        assert!(!is_email("@x.com"));
        assert!(!is_email("alice@nodot"));
        assert!(!is_email("alice@.com"));
        assert!(!is_email("alice@x."));
    }

    #[test]
    fn test_object_id_format() {
        assert!(is_object_id("65a1b2c3d4e5f6a7b8c9d0e1"));
        assert!(is_object_id("65A1B2C3D4E5F6A7B8C9D0E1")); // case-insensitive hex
        assert!(!is_object_id("65a1b2c3d4e5f6a7b8c9d0e")); // 23 chars
        assert!(!is_object_id("65a1b2c3d4e5f6a7b8c9d0e1f")); // 25 chars
        assert!(!is_object_id("65a1b2c3d4e5f6a7b8c9d0eg")); // non-hex
        assert!(!is_object_id(""));
    }

    #[test]
    fn test_recommendation_must_be_an_identifier() {
        let bad = RecommendationRequest {
            friend_name: "bob".to_string(),
            recommendation: "definitely not an id".to_string(),
        };
        let violations = validate_recommendation(&bad).unwrap_err();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "recommendation");
    }

    #[test]
    fn test_friend_name_required() {
        let bad = FriendNameRequest {
            friend_name: "".to_string(),
        };
        assert!(validate_friend_name(&bad).is_err());
        assert!(validate_check_username(&CheckUsernameRequest {
            username: "alice".to_string()
        })
        .is_ok());
    }
}
