//! The endpoint for listing the authenticated user's transactions.

use axum::{Json, extract::State, response::IntoResponse};

use crate::{AppState, Error, auth::Claims};

use super::get_transactions_by_user;

/// A route handler for listing the authenticated user's transactions, most
/// recent first.
///
/// # Panics
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn list_transactions_endpoint(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<impl IntoResponse, Error> {
    let transactions = {
        let connection = state.db_connection.lock().unwrap();
        get_transactions_by_user(claims.user_id()?, &connection)?
    };

    Ok(Json(transactions))
}
