//! The endpoint for replacing an existing transaction.

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use rusqlite::{Connection, params};

use crate::{AppState, Error, auth::Claims, user::UserID};

use super::{Transaction, TransactionData, TransactionId};

fn update_transaction(
    transaction_id: TransactionId,
    user_id: UserID,
    data: &TransactionData,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let date = data.date_or_now();

    let rows_affected = connection.execute(
        "UPDATE \"transaction\" \
         SET title = ?1, amount = ?2, category = ?3, type = ?4, payment_mode = ?5, date = ?6 \
         WHERE id = ?7 AND user_id = ?8",
        params![
            data.title,
            data.amount,
            data.category,
            data.transaction_type.as_str(),
            data.payment_mode.as_str(),
            date,
            transaction_id,
            user_id.as_i64(),
        ],
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(Transaction {
        id: transaction_id,
        user_id,
        title: data.title.clone(),
        amount: data.amount,
        category: data.category.clone(),
        transaction_type: data.transaction_type,
        payment_mode: data.payment_mode,
        date,
    })
}

/// A route handler for replacing all fields of a transaction.
///
/// The transaction must belong to the authenticated user. A transaction owned
/// by someone else is indistinguishable from one that does not exist.
///
/// # Panics
/// Panics if the lock for the database connection is already held by the same thread.
///
/// # Errors
/// Returns [Error::Validation] for invalid fields and [Error::NotFound] when
/// no matching transaction is owned by the user.
pub async fn edit_transaction_endpoint(
    State(state): State<AppState>,
    claims: Claims,
    Path(transaction_id): Path<TransactionId>,
    Json(data): Json<TransactionData>,
) -> Result<impl IntoResponse, Error> {
    data.validate()?;

    let transaction = {
        let connection = state.db_connection.lock().unwrap();
        update_transaction(transaction_id, claims.user_id()?, &data, &connection)?
    };

    Ok(Json(transaction))
}
