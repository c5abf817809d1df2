//! The endpoint for submitting a review.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use rusqlite::{Connection, params};
use serde::Serialize;
use time::OffsetDateTime;

use crate::{AppState, Error};

use super::{Review, ReviewData};

/// The review as echoed back after submission. The reviewer's email is
/// deliberately left out.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmittedReview {
    id: i64,
    name: String,
    rating: u8,
    message: String,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
}

#[derive(Debug, Serialize)]
struct SubmitReviewResponse {
    message: &'static str,
    review: SubmittedReview,
}

fn insert_review(data: &ReviewData, connection: &Connection) -> Result<Review, Error> {
    let name = data.name.trim().to_owned();
    let email = data.email.trim().to_owned();
    let message = data.message.trim().to_owned();
    let created_at = OffsetDateTime::now_utc();

    connection.execute(
        "INSERT INTO review (name, email, rating, message, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![name, email, data.rating, message, created_at],
    )?;

    Ok(Review {
        id: connection.last_insert_rowid(),
        name,
        email,
        rating: data.rating as u8,
        message,
        created_at,
    })
}

/// A route handler for submitting a review. No authentication is required.
///
/// The response echoes the stored review without the reviewer's email.
///
/// # Panics
/// Panics if the lock for the database connection is already held by the same thread.
///
/// # Errors
/// Returns [Error::Validation] naming the first invalid field.
pub async fn submit_review_endpoint(
    State(state): State<AppState>,
    Json(data): Json<ReviewData>,
) -> Result<impl IntoResponse, Error> {
    data.validate()?;

    let review = {
        let connection = state.db_connection.lock().unwrap();
        insert_review(&data, &connection)?
    };

    tracing::info!("New {} star review from {}", review.rating, review.name);

    Ok((
        StatusCode::CREATED,
        Json(SubmitReviewResponse {
            message: "Review submitted successfully",
            review: SubmittedReview {
                id: review.id,
                name: review.name,
                rating: review.rating,
                message: review.message,
                created_at: review.created_at,
            },
        }),
    ))
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use crate::{endpoints, test_utils::new_test_app};

    #[tokio::test]
    async fn submit_review_echoes_the_review_without_the_email() {
        let (server, _, _) = new_test_app();

        let response = server
            .post(endpoints::REVIEWS)
            .json(&json!({
                "name": "Jane Doe",
                "email": "jane@example.com",
                "rating": 5,
                "message": "Finally replaced my spreadsheet.",
            }))
            .await;

        response.assert_status(axum::http::StatusCode::CREATED);

        let body = response.json::<Value>();
        assert_eq!(body["message"], "Review submitted successfully");
        assert_eq!(body["review"]["name"], "Jane Doe");
        assert_eq!(body["review"]["rating"], 5);
        assert!(body["review"].get("email").is_none());
    }

    #[tokio::test]
    async fn submit_review_requires_no_authentication() {
        let (server, _, _) = new_test_app();

        server
            .post(endpoints::REVIEWS)
            .json(&json!({
                "name": "Jane Doe",
                "email": "jane@example.com",
                "rating": 3,
                "message": "Decent.",
            }))
            .await
            .assert_status(axum::http::StatusCode::CREATED);
    }

    #[tokio::test]
    async fn submit_review_rejects_invalid_fields() {
        let (server, _, _) = new_test_app();

        for body in [
            json!({
                "name": "",
                "email": "jane@example.com",
                "rating": 5,
                "message": "Great.",
            }),
            json!({
                "name": "Jane",
                "email": "not-an-email",
                "rating": 5,
                "message": "Great.",
            }),
            json!({
                "name": "Jane",
                "email": "jane@example.com",
                "rating": 0,
                "message": "Great.",
            }),
            json!({
                "name": "Jane",
                "email": "jane@example.com",
                "rating": 6,
                "message": "Great.",
            }),
            json!({
                "name": "Jane",
                "email": "jane@example.com",
                "rating": 5,
                "message": "",
            }),
        ] {
            server
                .post(endpoints::REVIEWS)
                .json(&body)
                .await
                .assert_status_bad_request();
        }
    }
}
