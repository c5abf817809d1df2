//! The endpoint for listing all reviews.

use axum::{Json, extract::State, response::IntoResponse};

use crate::{AppState, Error};

use super::get_all_reviews;

/// A route handler for listing all reviews, newest first. No authentication
/// is required.
///
/// # Panics
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn list_reviews_endpoint(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, Error> {
    let reviews = {
        let connection = state.db_connection.lock().unwrap();
        get_all_reviews(&connection)?
    };

    Ok(Json(reviews))
}
