//! The endpoint for aggregate review statistics.

use axum::{Json, extract::State, response::IntoResponse};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{AppState, Error};

/// How many reviews gave a particular star rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingCount {
    /// The star rating, 1 to 5.
    pub rating: u8,
    /// How many reviews gave this rating.
    pub count: i64,
}

/// Aggregate statistics over all reviews.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStats {
    /// The number of reviews submitted so far.
    pub total_reviews: i64,
    /// The mean star rating rounded to one decimal place. Zero when there
    /// are no reviews.
    pub average_rating: f64,
    /// Per-rating counts in ascending rating order. Ratings nobody has
    /// given are omitted.
    pub rating_distribution: Vec<RatingCount>,
}

fn get_review_stats(connection: &Connection) -> Result<ReviewStats, Error> {
    let (total_reviews, average_rating) = connection.query_row(
        "SELECT COUNT(*), AVG(rating) FROM review",
        [],
        |row| {
            let total: i64 = row.get(0)?;
            let average: Option<f64> = row.get(1)?;
            Ok((total, average))
        },
    )?;

    let rating_distribution = connection
        .prepare("SELECT rating, COUNT(*) FROM review GROUP BY rating ORDER BY rating ASC")?
        .query_map([], |row| {
            Ok(RatingCount {
                rating: row.get(0)?,
                count: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ReviewStats {
        total_reviews,
        average_rating: average_rating
            .map(|average| (average * 10.0).round() / 10.0)
            .unwrap_or(0.0),
        rating_distribution,
    })
}

/// A route handler for aggregate review statistics. No authentication is
/// required.
///
/// # Panics
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn review_stats_endpoint(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, Error> {
    let stats = {
        let connection = state.db_connection.lock().unwrap();
        get_review_stats(&connection)?
    };

    Ok(Json(stats))
}
