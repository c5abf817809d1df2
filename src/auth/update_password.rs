//! The endpoint for changing the authenticated user's password.

use axum::{Json, extract::State, response::IntoResponse};
use serde::Deserialize;
use serde_json::json;

use crate::{
    AppState, Error,
    auth::{Claims, PasswordHash},
    user::{get_user_by_id, update_user_password},
};

/// The expected fields for a password change request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    /// The password the user currently signs in with.
    pub current_password: String,
    /// The replacement password.
    pub new_password: String,
}

/// A route handler for changing the authenticated user's password.
///
/// Outstanding session tokens are not invalidated; they lapse at their
/// regular one hour expiry.
///
/// # Panics
/// Panics if the lock for the database connection is already held by the same thread.
///
/// # Errors
/// Returns [Error::Validation] if the new password is too short,
/// [Error::InvalidCredentials] if the current password does not verify, and
/// [Error::NotFound] if the session's user no longer exists.
pub async fn update_password_endpoint(
    State(state): State<AppState>,
    claims: Claims,
    Json(request): Json<UpdatePasswordRequest>,
) -> Result<impl IntoResponse, Error> {
    let user_id = claims.user_id()?;

    let user = {
        let connection = state.db_connection.lock().unwrap();
        get_user_by_id(user_id, &connection)?
    };

    let password_is_correct = user
        .password_hash
        .verify(&request.current_password)
        .map_err(|error| {
            tracing::error!("Error verifying password for user {user_id}: {error}");
            Error::InvalidCredentials
        })?;

    if !password_is_correct {
        return Err(Error::InvalidCredentials);
    }

    let new_hash = PasswordHash::from_raw_password(&request.new_password, state.bcrypt_cost)?;

    {
        let connection = state.db_connection.lock().unwrap();
        update_user_password(user_id, &new_hash, &connection)?;
    }

    Ok(Json(json!({ "message": "Password updated successfully" })))
}
