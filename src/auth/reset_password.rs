//! The endpoint for completing a password reset with a token.

use axum::{Json, extract::State, response::IntoResponse};
use serde::Deserialize;
use serde_json::json;
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    auth::PasswordHash,
    user::{consume_reset_token, get_user_by_reset_token},
};

/// The expected fields for completing a password reset.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    /// The reset token from the emailed link.
    pub token: String,
    /// The replacement password.
    pub new_password: String,
}

/// A route handler for completing a password reset.
///
/// The token must match a user exactly and its expiry must be strictly in
/// the future. On success the new password is stored and the token erased in
/// the same UPDATE, so a token can never be consumed twice.
///
/// # Panics
/// Panics if the lock for the database connection is already held by the same thread.
///
/// # Errors
/// Returns [Error::Validation] if the new password is too short, and
/// [Error::InvalidOrExpiredToken] for an unknown or expired token.
pub async fn reset_password_endpoint(
    State(state): State<AppState>,
    Json(request): Json<ResetPasswordRequest>,
) -> Result<impl IntoResponse, Error> {
    let new_hash = PasswordHash::from_raw_password(&request.new_password, state.bcrypt_cost)?;

    let connection = state.db_connection.lock().unwrap();

    let user = get_user_by_reset_token(&request.token, &connection).map_err(|error| {
        match error {
            Error::NotFound => Error::InvalidOrExpiredToken,
            other => other,
        }
    })?;

    match user.reset_token_expires_at {
        Some(expires_at) if expires_at > OffsetDateTime::now_utc() => {}
        _ => return Err(Error::InvalidOrExpiredToken),
    }

    consume_reset_token(user.id, &new_hash, &connection)?;

    tracing::info!("Password reset completed for user {}", user.id);

    Ok(Json(json!({ "message": "Password has been reset successfully" })))
}
