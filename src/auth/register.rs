//! The endpoint for creating a new account.

use std::str::FromStr;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use email_address::EmailAddress;
use serde::Deserialize;

use crate::{
    AppState, Error,
    auth::{PasswordHash, TokenResponse, encode_session_token},
    user::insert_user,
};

/// The expected fields for a registration request.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// The display name of the new user.
    pub name: String,
    /// The email the new user will sign in with.
    pub email: String,
    /// The plaintext password, hashed before it is persisted.
    pub password: String,
}

/// A route handler for registering a new user.
///
/// Responds with 201 and a session token bound to the new user. The welcome
/// email is best-effort: its failure is logged and does not fail
/// registration.
///
/// # Panics
/// Panics if the lock for the database connection is already held by the same thread.
///
/// # Errors
/// Returns [Error::Validation] for an empty name, invalid email, or short
/// password, and [Error::DuplicateAccount] if the email is already
/// registered.
pub async fn register_endpoint(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<impl IntoResponse, Error> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(Error::Validation("name must not be empty".to_owned()));
    }

    let email = EmailAddress::from_str(request.email.trim())
        .map_err(|_| Error::Validation("email must be a valid email address".to_owned()))?;

    let password_hash = PasswordHash::from_raw_password(&request.password, state.bcrypt_cost)?;

    let user = {
        let connection = state.db_connection.lock().unwrap();
        insert_user(name, &email, &password_hash, &connection)?
    };

    tracing::info!("Registered user {}", user.id);

    // The user row is already committed: a failed welcome email must not
    // fail registration.
    if let Err(error) = state.mailer.send_welcome(&user.email, &user.name) {
        tracing::warn!("Could not send welcome email: {error}");
    }

    let token = encode_session_token(user.id, &state.jwt_keys.encoding)?;

    Ok((StatusCode::CREATED, Json(TokenResponse { token })))
}
