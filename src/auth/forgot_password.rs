//! The endpoint for requesting a password reset link.

use axum::{Json, extract::State, response::IntoResponse};
use serde::Deserialize;
use serde_json::json;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::{AppState, Error, user::{get_user_by_email, set_reset_token}};

/// How long a password reset token stays valid after it is issued.
pub const RESET_TOKEN_DURATION: Duration = Duration::hours(1);

/// The generic response sent whether or not the email is registered, so the
/// endpoint cannot be used to probe for accounts.
const GENERIC_MESSAGE: &str =
    "If an account with that email exists, a password reset link has been sent";

/// The expected fields for a password reset request.
#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    /// The email the reset link should be sent to.
    pub email: String,
}

/// A route handler for requesting a password reset.
///
/// Always responds 200 with the same generic message. When the email is
/// registered, a fresh random token is stored (superseding any earlier one)
/// and the reset link is handed to the mailer; a delivery failure is logged
/// but does not change the response.
///
/// # Panics
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn forgot_password_endpoint(
    State(state): State<AppState>,
    Json(request): Json<ForgotPasswordRequest>,
) -> Result<impl IntoResponse, Error> {
    let user = {
        let connection = state.db_connection.lock().unwrap();
        get_user_by_email(request.email.trim(), &connection)
    };

    match user {
        Ok(user) => {
            let token = Uuid::new_v4().simple().to_string();
            let expires_at = OffsetDateTime::now_utc() + RESET_TOKEN_DURATION;

            {
                let connection = state.db_connection.lock().unwrap();
                set_reset_token(user.id, &token, expires_at, &connection)?;
            }

            let reset_url = format!(
                "{}/reset-password?token={token}",
                state.client_url.trim_end_matches('/')
            );
            if let Err(error) = state.mailer.send_password_reset(&user.email, &reset_url) {
                tracing::warn!("Could not send password reset email: {error}");
            }
        }
        Err(Error::NotFound) => {
            tracing::debug!("Password reset requested for an unregistered email.");
        }
        Err(error) => return Err(error),
    }

    Ok(Json(json!({ "message": GENERIC_MESSAGE })))
}
