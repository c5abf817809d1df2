//! The endpoint for recording a new transaction.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use crate::{AppState, Error, auth::Claims};

use super::{TransactionData, insert_transaction};

/// A route handler for recording a new income or expense.
///
/// The transaction is owned by the authenticated user. When no date is given
/// the current time is used.
///
/// # Panics
/// Panics if the lock for the database connection is already held by the same thread.
///
/// # Errors
/// Returns [Error::Validation] if the amount is not positive or the title or
/// category is empty.
pub async fn create_transaction_endpoint(
    State(state): State<AppState>,
    claims: Claims,
    Json(data): Json<TransactionData>,
) -> Result<impl IntoResponse, Error> {
    data.validate()?;

    let transaction = {
        let connection = state.db_connection.lock().unwrap();
        insert_transaction(claims.user_id()?, &data, &connection)?
    };

    Ok((StatusCode::CREATED, Json(transaction)))
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use crate::{
        endpoints,
        test_utils::{new_test_app, register_test_user},
    };

    #[tokio::test]
    async fn create_transaction_returns_the_stored_transaction() {
        let (server, _, _) = new_test_app();
        let token = register_test_user(&server, "jane@example.com", "hunter2hunter2").await;

        let response = server
            .post(endpoints::TRANSACTIONS)
            .authorization_bearer(&token)
            .json(&json!({
                "title": "Groceries",
                "amount": 42.5,
                "category": "Food",
                "type": "Expense",
                "paymentMode": "Card",
                "date": "2026-03-01T12:00:00Z",
            }))
            .await;

        response.assert_status(axum::http::StatusCode::CREATED);

        let body = response.json::<Value>();
        assert_eq!(body["title"], "Groceries");
        assert_eq!(body["amount"], 42.5);
        assert_eq!(body["category"], "Food");
        assert_eq!(body["type"], "Expense");
        assert_eq!(body["paymentMode"], "Card");
        assert!(body["id"].is_i64());
    }

    #[tokio::test]
    async fn create_transaction_defaults_the_date_to_now() {
        let (server, _, _) = new_test_app();
        let token = register_test_user(&server, "jane@example.com", "hunter2hunter2").await;

        let response = server
            .post(endpoints::TRANSACTIONS)
            .authorization_bearer(&token)
            .json(&json!({
                "title": "Salary",
                "amount": 1000.0,
                "category": "Work",
                "type": "Income",
                "paymentMode": "UPI",
            }))
            .await;

        response.assert_status(axum::http::StatusCode::CREATED);

        let body = response.json::<Value>();
        assert!(body["date"].as_str().is_some_and(|date| !date.is_empty()));
    }

    #[tokio::test]
    async fn create_transaction_rejects_invalid_fields() {
        let (server, _, _) = new_test_app();
        let token = register_test_user(&server, "jane@example.com", "hunter2hunter2").await;

        for body in [
            json!({
                "title": "",
                "amount": 10.0,
                "category": "Food",
                "type": "Expense",
                "paymentMode": "Cash",
            }),
            json!({
                "title": "Groceries",
                "amount": 0.0,
                "category": "Food",
                "type": "Expense",
                "paymentMode": "Cash",
            }),
            json!({
                "title": "Groceries",
                "amount": -3.0,
                "category": "Food",
                "type": "Expense",
                "paymentMode": "Cash",
            }),
            json!({
                "title": "Groceries",
                "amount": 10.0,
                "category": "   ",
                "type": "Expense",
                "paymentMode": "Cash",
            }),
        ] {
            server
                .post(endpoints::TRANSACTIONS)
                .authorization_bearer(&token)
                .json(&body)
                .await
                .assert_status_bad_request();
        }
    }

    #[tokio::test]
    async fn create_transaction_requires_authentication() {
        let (server, _, _) = new_test_app();

        server
            .post(endpoints::TRANSACTIONS)
            .json(&json!({
                "title": "Groceries",
                "amount": 10.0,
                "category": "Food",
                "type": "Expense",
                "paymentMode": "Cash",
            }))
            .await
            .assert_status_unauthorized();
    }
}
