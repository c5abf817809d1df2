//! The endpoint for signing in with an email and password.

use axum::{Json, extract::State, response::IntoResponse};
use serde::Deserialize;

use crate::{
    AppState, Error,
    auth::{TokenResponse, encode_session_token},
    user::get_user_by_email,
};

/// The expected fields for a login request.
#[derive(Debug, Deserialize)]
pub struct LogInRequest {
    /// Email entered during sign-in.
    pub email: String,
    /// Password entered during sign-in.
    pub password: String,
}

/// A route handler for signing in a user.
///
/// An unknown email, a malformed stored hash, and a wrong password all
/// produce the same [Error::InvalidCredentials] so the response cannot be
/// used to tell registered emails apart from unregistered ones.
///
/// # Panics
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn log_in_endpoint(
    State(state): State<AppState>,
    Json(request): Json<LogInRequest>,
) -> Result<impl IntoResponse, Error> {
    let user = {
        let connection = state.db_connection.lock().unwrap();
        get_user_by_email(request.email.trim(), &connection).map_err(|error| match error {
            Error::NotFound => Error::InvalidCredentials,
            other => other,
        })?
    };

    let password_is_correct = user.password_hash.verify(&request.password).map_err(|error| {
        tracing::error!("Error verifying password for user {}: {error}", user.id);
        Error::InvalidCredentials
    })?;

    if !password_is_correct {
        return Err(Error::InvalidCredentials);
    }

    let token = encode_session_token(user.id, &state.jwt_keys.encoding)?;

    Ok(Json(TokenResponse { token }))
}
