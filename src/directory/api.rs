//! HTTP endpoints for the user directory.
//!
//! Thin handlers: validate the body and path identifiers, call the service,
//! let [`ApiError`](crate::error::ApiError) map failures onto statuses.

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;

use crate::error::{ApiError, ApiResult};

use super::service::UserDirectory;
use super::types::{
    CheckUsernameRequest, CreatedResponse, FriendNameRequest, FriendRef, MessageResponse,
    RecommendationRequest, User, UserPayload, UserProfile, UsernameCheckResponse,
};
use super::validate;

/// Build the API router over a directory service.
pub fn router(directory: UserDirectory) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/stats", get(stats))
        .route("/users", post(create_user).get(get_users))
        .route("/users/check", post(check_username))
        .route(
            "/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/users/:id/account", get(get_logged_user))
        .route(
            "/users/:id/friends",
            get(get_friend_list).post(add_friend).delete(remove_friend),
        )
        .route(
            "/users/:id/recommendations",
            post(add_recommendation).delete(remove_recommendation),
        )
        .with_state(directory)
}

// ── Service Metadata ──────────────────────────────────────────────────────────

/// Health check endpoint.
async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "gamepals-server",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Statistics endpoint.
async fn stats(State(directory): State<UserDirectory>) -> Json<serde_json::Value> {
    Json(json!({
        "users": directory.user_count(),
    }))
}

// ── Account Endpoints ─────────────────────────────────────────────────────────

/// Register an account.
///
/// POST /users
/// Body: { "name", "username", "email", "birthday", "password" }
async fn create_user(
    State(directory): State<UserDirectory>,
    Json(payload): Json<UserPayload>,
) -> ApiResult<Json<CreatedResponse>> {
    validate::validate_user_payload(&payload).map_err(ApiError::Validation)?;
    directory.create(payload).map(Json)
}

/// Check whether a username is taken.
///
/// POST /users/check
/// Body: { "username": "alice" }
async fn check_username(
    State(directory): State<UserDirectory>,
    Json(request): Json<CheckUsernameRequest>,
) -> ApiResult<Json<UsernameCheckResponse>> {
    validate::validate_check_username(&request).map_err(ApiError::Validation)?;
    Ok(Json(directory.check_username(&request.username)))
}

/// List every account, full documents.
///
/// GET /users
async fn get_users(State(directory): State<UserDirectory>) -> Json<Vec<User>> {
    Json(directory.all_users())
}

/// Public profile of one account (no password).
///
/// GET /users/:id
async fn get_user(
    State(directory): State<UserDirectory>,
    Path(id): Path<String>,
) -> ApiResult<Json<UserProfile>> {
    validate::validate_object_id("id", &id).map_err(ApiError::Validation)?;
    directory.user_profile(&id).map(Json)
}

/// Full document of one account, for trusted post-auth use.
///
/// GET /users/:id/account
async fn get_logged_user(
    State(directory): State<UserDirectory>,
    Path(id): Path<String>,
) -> ApiResult<Json<User>> {
    validate::validate_object_id("id", &id).map_err(ApiError::Validation)?;
    directory.logged_user(&id).map(Json)
}

/// Replace the profile fields of an account.
///
/// PUT /users/:id
async fn update_user(
    State(directory): State<UserDirectory>,
    Path(id): Path<String>,
    Json(payload): Json<UserPayload>,
) -> ApiResult<Json<MessageResponse>> {
    validate::validate_object_id("id", &id).map_err(ApiError::Validation)?;
    validate::validate_user_payload(&payload).map_err(ApiError::Validation)?;
    directory.update(&id, payload).map(Json)
}

/// Delete an account.
///
/// DELETE /users/:id
async fn delete_user(
    State(directory): State<UserDirectory>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    validate::validate_object_id("id", &id).map_err(ApiError::Validation)?;
    directory.delete(&id).map(Json)
}

// ── Friend Endpoints ──────────────────────────────────────────────────────────

/// Friend references of one account.
///
/// GET /users/:id/friends
async fn get_friend_list(
    State(directory): State<UserDirectory>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<FriendRef>>> {
    validate::validate_object_id("id", &id).map_err(ApiError::Validation)?;
    directory.friend_list(&id).map(Json)
}

/// Add a friend by username.
///
/// POST /users/:id/friends
/// Body: { "friendName": "bob" }
async fn add_friend(
    State(directory): State<UserDirectory>,
    Path(id): Path<String>,
    Json(request): Json<FriendNameRequest>,
) -> ApiResult<Json<MessageResponse>> {
    validate::validate_object_id("id", &id).map_err(ApiError::Validation)?;
    validate::validate_friend_name(&request).map_err(ApiError::Validation)?;
    directory.add_friend(&id, &request.friend_name).map(Json)
}

/// Remove a friend by username.
///
/// DELETE /users/:id/friends
/// Body: { "friendName": "bob" }
async fn remove_friend(
    State(directory): State<UserDirectory>,
    Path(id): Path<String>,
    Json(request): Json<FriendNameRequest>,
) -> ApiResult<Json<MessageResponse>> {
    validate::validate_object_id("id", &id).map_err(ApiError::Validation)?;
    validate::validate_friend_name(&request).map_err(ApiError::Validation)?;
    directory.remove_friend(&id, &request.friend_name).map(Json)
}

// ── Recommendation Endpoints ──────────────────────────────────────────────────

/// Recommend a game across a friendship.
///
/// POST /users/:id/recommendations
/// Body: { "friendName": "bob", "recommendation": "65ff..." }
async fn add_recommendation(
    State(directory): State<UserDirectory>,
    Path(id): Path<String>,
    Json(request): Json<RecommendationRequest>,
) -> ApiResult<Json<MessageResponse>> {
    validate::validate_object_id("id", &id).map_err(ApiError::Validation)?;
    validate::validate_recommendation(&request).map_err(ApiError::Validation)?;
    directory
        .add_recommendation(&id, &request.friend_name, &request.recommendation)
        .map(Json)
}

/// Withdraw a game recommendation.
///
/// DELETE /users/:id/recommendations
/// Body: { "friendName": "bob", "recommendation": "65ff..." }
async fn remove_recommendation(
    State(directory): State<UserDirectory>,
    Path(id): Path<String>,
    Json(request): Json<RecommendationRequest>,
) -> ApiResult<Json<MessageResponse>> {
    validate::validate_object_id("id", &id).map_err(ApiError::Validation)?;
    validate::validate_recommendation(&request).map_err(ApiError::Validation)?;
    directory
        .remove_recommendation(&id, &request.friend_name, &request.recommendation)
        .map(Json)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenIssuer;
    use crate::directory::config::DirectoryConfig;
    use crate::directory::store::UserStore;

    #[test]
    fn test_router_builds() {
        let directory = UserDirectory::new(
            UserStore::new(&DirectoryConfig::default()),
            TokenIssuer::generate(),
        );
        let _ = router(directory);
    }

    #[test]
    fn test_user_payload_deserialization() {
        let json = r#"{
            "name": "Alice",
            "username": "alice",
            "email": "alice@x.com",
            "birthday": "1990-04-01",
            "password": "hunter2"
        }"#;

        let payload: UserPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.username, "alice");
        assert!(payload.friends.is_none());
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        // Extra properties fail the request instead of being dropped.
        let json = r#"{
            "name": "Alice",
            "username": "alice",
            "email": "alice@x.com",
            "birthday": "1990-04-01",
            "password": "hunter2",
            "isAdmin": true
        }"#;

        assert!(serde_json::from_str::<UserPayload>(json).is_err());
    }

    #[test]
    fn test_friend_request_uses_camel_case() {
        let request: FriendNameRequest =
            serde_json::from_str(r#"{ "friendName": "bob" }"#).unwrap();
        assert_eq!(request.friend_name, "bob");

        assert!(serde_json::from_str::<FriendNameRequest>(r#"{ "friend_name": "bob" }"#).is_err());
    }

    #[test]
    fn test_recommendation_request_deserialization() {
        let request: RecommendationRequest = serde_json::from_str(
            r#"{ "friendName": "bob", "recommendation": "65ffffffffffffffffffff01" }"#,
        )
        .unwrap();
        assert_eq!(request.friend_name, "bob");
        assert_eq!(request.recommendation, "65ffffffffffffffffffff01");
    }

    #[test]
    fn test_check_username_response_shape() {
        let taken = UsernameCheckResponse {
            exists: true,
            message: None,
        };
        assert_eq!(serde_json::to_string(&taken).unwrap(), r#"{"exists":true}"#);

        let free = UsernameCheckResponse {
            exists: false,
            message: Some("username available to be used".to_string()),
        };
        let json = serde_json::to_string(&free).unwrap();
        assert!(json.contains("\"exists\":false"));
        assert!(json.contains("username available"));
    }
}
