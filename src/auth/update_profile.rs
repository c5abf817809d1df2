//! The endpoint for updating the authenticated user's name and email.

use std::str::FromStr;

use axum::{Json, extract::State, response::IntoResponse};
use email_address::EmailAddress;
use serde::Deserialize;

use crate::{
    AppState, Error,
    auth::{Claims, me::ProfileResponse},
    user::update_user_profile,
};

/// The expected fields for a profile update request.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    /// The new display name.
    pub name: String,
    /// The new email address.
    pub email: String,
}

/// A route handler for replacing the authenticated user's name and email.
///
/// Both fields are replaced atomically in a single UPDATE.
///
/// # Panics
/// Panics if the lock for the database connection is already held by the same thread.
///
/// # Errors
/// Returns [Error::Validation] if either field is empty or the email is
/// malformed, [Error::DuplicateAccount] if the email belongs to a different
/// user, and [Error::NotFound] if the session's user no longer exists.
pub async fn update_profile_endpoint(
    State(state): State<AppState>,
    claims: Claims,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, Error> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(Error::Validation("name must not be empty".to_owned()));
    }

    let email = EmailAddress::from_str(request.email.trim())
        .map_err(|_| Error::Validation("email must be a valid email address".to_owned()))?;

    {
        let connection = state.db_connection.lock().unwrap();
        update_user_profile(claims.user_id()?, name, &email, &connection)?;
    }

    Ok(Json(ProfileResponse {
        name: name.to_owned(),
        email: email.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::{
        auth::me::ProfileResponse,
        endpoints,
        test_utils::{new_test_app, register_test_user},
    };

    #[tokio::test]
    async fn update_profile_replaces_both_fields() {
        let (server, _, _) = new_test_app();
        let token = register_test_user(&server, "jane@example.com", "hunter2hunter2").await;

        let response = server
            .put(endpoints::UPDATE_PROFILE)
            .authorization_bearer(&token)
            .json(&json!({
                "name": "Jane Doe",
                "email": "jane.doe@example.com",
            }))
            .await;

        response.assert_status_ok();

        let profile = server
            .get(endpoints::ME)
            .authorization_bearer(&token)
            .await
            .json::<ProfileResponse>();
        assert_eq!(profile.name, "Jane Doe");
        assert_eq!(profile.email, "jane.doe@example.com");
    }

    #[tokio::test]
    async fn update_profile_rejects_empty_fields() {
        let (server, _, _) = new_test_app();
        let token = register_test_user(&server, "jane@example.com", "hunter2hunter2").await;

        server
            .put(endpoints::UPDATE_PROFILE)
            .authorization_bearer(&token)
            .json(&json!({ "name": "", "email": "jane@example.com" }))
            .await
            .assert_status_bad_request();

        server
            .put(endpoints::UPDATE_PROFILE)
            .authorization_bearer(&token)
            .json(&json!({ "name": "Jane", "email": " " }))
            .await
            .assert_status_bad_request();
    }

    #[tokio::test]
    async fn update_profile_rejects_another_users_email() {
        let (server, _, _) = new_test_app();
        register_test_user(&server, "jane@example.com", "hunter2hunter2").await;
        let token = register_test_user(&server, "john@example.com", "hunter2hunter2").await;

        server
            .put(endpoints::UPDATE_PROFILE)
            .authorization_bearer(&token)
            .json(&json!({
                "name": "John",
                "email": "jane@example.com",
            }))
            .await
            .assert_status_bad_request();
    }

    #[tokio::test]
    async fn update_profile_requires_authentication() {
        let (server, _, _) = new_test_app();

        server
            .put(endpoints::UPDATE_PROFILE)
            .json(&json!({ "name": "Jane", "email": "jane@example.com" }))
            .await
            .assert_status_unauthorized();
    }
}
