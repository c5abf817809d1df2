//! The endpoint for fetching the authenticated user's profile.

use axum::{Json, extract::State, response::IntoResponse};
use serde::{Deserialize, Serialize};

use crate::{AppState, Error, auth::Claims, user::get_user_by_id};

/// The subset of profile fields that is safe to show to the client.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct ProfileResponse {
    /// The user's display name.
    pub name: String,
    /// The user's email address.
    pub email: String,
}

/// A route handler for fetching the authenticated user's name and email.
///
/// The password hash is never part of the response.
///
/// # Panics
/// Panics if the lock for the database connection is already held by the same thread.
///
/// # Errors
/// Returns [Error::NotFound] if the session's user no longer exists.
pub async fn me_endpoint(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<impl IntoResponse, Error> {
    let user = {
        let connection = state.db_connection.lock().unwrap();
        get_user_by_id(claims.user_id()?, &connection)?
    };

    Ok(Json(ProfileResponse {
        name: user.name,
        email: user.email.to_string(),
    }))
}
