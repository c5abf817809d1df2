//! The endpoint for deleting a transaction.

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use rusqlite::{Connection, params};
use serde_json::json;

use crate::{AppState, Error, auth::Claims, user::UserID};

use super::TransactionId;

fn delete_transaction(
    transaction_id: TransactionId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM \"transaction\" WHERE id = ?1 AND user_id = ?2",
        params![transaction_id, user_id.as_i64()],
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// A route handler for deleting one of the authenticated user's transactions.
///
/// # Panics
/// Panics if the lock for the database connection is already held by the same thread.
///
/// # Errors
/// Returns [Error::NotFound] when no matching transaction is owned by the
/// user.
pub async fn delete_transaction_endpoint(
    State(state): State<AppState>,
    claims: Claims,
    Path(transaction_id): Path<TransactionId>,
) -> Result<impl IntoResponse, Error> {
    {
        let connection = state.db_connection.lock().unwrap();
        delete_transaction(transaction_id, claims.user_id()?, &connection)?;
    }

    Ok(Json(json!({ "message": "Transaction deleted" })))
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use crate::{
        endpoints,
        test_utils::{new_test_app, register_test_user},
    };

    async fn create_transaction(server: &axum_test::TestServer, token: &str) -> i64 {
        server
            .post(endpoints::TRANSACTIONS)
            .authorization_bearer(token)
            .json(&json!({
                "title": "Groceries",
                "amount": 42.5,
                "category": "Food",
                "type": "Expense",
                "paymentMode": "Card",
            }))
            .await
            .json::<Value>()["id"]
            .as_i64()
            .unwrap()
    }

    fn transaction_path(transaction_id: i64) -> String {
        format!("{}/{transaction_id}", endpoints::TRANSACTIONS)
    }

    #[tokio::test]
    async fn delete_transaction_removes_it_from_the_listing() {
        let (server, _, _) = new_test_app();
        let token = register_test_user(&server, "jane@example.com", "hunter2hunter2").await;
        let transaction_id = create_transaction(&server, &token).await;

        server
            .delete(&transaction_path(transaction_id))
            .authorization_bearer(&token)
            .await
            .assert_status_ok();

        let listed = server
            .get(endpoints::TRANSACTIONS)
            .authorization_bearer(&token)
            .await
            .json::<Value>();
        assert_eq!(listed.as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn delete_transaction_rejects_another_users_transaction() {
        let (server, _, _) = new_test_app();
        let jane = register_test_user(&server, "jane@example.com", "hunter2hunter2").await;
        let john = register_test_user(&server, "john@example.com", "hunter2hunter2").await;
        let transaction_id = create_transaction(&server, &jane).await;

        server
            .delete(&transaction_path(transaction_id))
            .authorization_bearer(&john)
            .await
            .assert_status_not_found();

        // Jane still has her transaction.
        let listed = server
            .get(endpoints::TRANSACTIONS)
            .authorization_bearer(&jane)
            .await
            .json::<Value>();
        assert_eq!(listed.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn delete_transaction_rejects_an_unknown_id() {
        let (server, _, _) = new_test_app();
        let token = register_test_user(&server, "jane@example.com", "hunter2hunter2").await;

        server
            .delete(&transaction_path(999))
            .authorization_bearer(&token)
            .await
            .assert_status_not_found();
    }
}
