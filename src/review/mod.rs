//! Public product reviews: submission, listing, and aggregate statistics.
//!
//! Reviews are intentionally not tied to user accounts, so none of these
//! endpoints require authentication.

use std::str::FromStr;

use email_address::EmailAddress;
use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, db::CreateTable};

mod list_endpoint;
mod stats_endpoint;
mod submit_endpoint;

pub use list_endpoint::list_reviews_endpoint;
pub use stats_endpoint::review_stats_endpoint;
pub use submit_endpoint::submit_review_endpoint;

/// The longest allowed reviewer name.
pub const MAX_NAME_LENGTH: usize = 100;

/// The longest allowed review message.
pub const MAX_MESSAGE_LENGTH: usize = 1000;

/// A star-rated review left by a visitor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    /// The review's row ID.
    pub id: i64,
    /// The reviewer's name.
    pub name: String,
    /// The reviewer's email address.
    pub email: String,
    /// A star rating from 1 to 5.
    pub rating: u8,
    /// The review text.
    pub message: String,
    /// When the review was submitted.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl CreateTable for Review {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS review (
                    id INTEGER PRIMARY KEY,
                    name TEXT NOT NULL,
                    email TEXT NOT NULL,
                    rating INTEGER NOT NULL,
                    message TEXT NOT NULL,
                    created_at TEXT NOT NULL
                    )",
            (),
        )?;

        Ok(())
    }
}

fn map_review_row(row: &Row) -> Result<Review, rusqlite::Error> {
    Ok(Review {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        rating: row.get(3)?,
        message: row.get(4)?,
        created_at: row.get(5)?,
    })
}

const REVIEW_COLUMNS: &str = "id, name, email, rating, message, created_at";

/// The expected fields for submitting a review.
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewData {
    /// The reviewer's name.
    pub name: String,
    /// The reviewer's email address.
    pub email: String,
    /// A star rating from 1 to 5.
    pub rating: i64,
    /// The review text.
    pub message: String,
}

impl ReviewData {
    /// Check the field-level invariants: non-empty name within 100
    /// characters, a well-formed email, a rating from 1 to 5, and a
    /// non-empty message within 1000 characters.
    ///
    /// # Errors
    /// Returns [Error::Validation] naming the violated field.
    pub fn validate(&self) -> Result<(), Error> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(Error::Validation("name must not be empty".to_owned()));
        }
        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(Error::Validation(format!(
                "name must be at most {MAX_NAME_LENGTH} characters"
            )));
        }

        EmailAddress::from_str(self.email.trim())
            .map_err(|_| Error::Validation("email must be a valid email address".to_owned()))?;

        if !(1..=5).contains(&self.rating) {
            return Err(Error::Validation(
                "rating must be between 1 and 5".to_owned(),
            ));
        }

        let message = self.message.trim();
        if message.is_empty() {
            return Err(Error::Validation("message must not be empty".to_owned()));
        }
        if message.chars().count() > MAX_MESSAGE_LENGTH {
            return Err(Error::Validation(format!(
                "message must be at most {MAX_MESSAGE_LENGTH} characters"
            )));
        }

        Ok(())
    }
}

/// Retrieve all reviews, newest first.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error.
pub fn get_all_reviews(connection: &Connection) -> Result<Vec<Review>, Error> {
    connection
        .prepare(&format!(
            "SELECT {REVIEW_COLUMNS} FROM review ORDER BY created_at DESC"
        ))?
        .query_map([], map_review_row)?
        .map(|maybe_review| maybe_review.map_err(Error::from))
        .collect()
}

#[cfg(test)]
mod validation_tests {
    use super::ReviewData;

    fn valid_review() -> ReviewData {
        ReviewData {
            name: "Jane Doe".to_owned(),
            email: "jane@example.com".to_owned(),
            rating: 5,
            message: "Finally replaced my spreadsheet.".to_owned(),
        }
    }

    #[test]
    fn a_well_formed_review_passes() {
        assert!(valid_review().validate().is_ok());
    }

    #[test]
    fn out_of_range_ratings_are_rejected() {
        for rating in [0, 6, -1, 100] {
            let review = ReviewData {
                rating,
                ..valid_review()
            };
            assert!(review.validate().is_err(), "rating {rating} should fail");
        }
    }

    #[test]
    fn boundary_ratings_pass() {
        for rating in [1, 5] {
            let review = ReviewData {
                rating,
                ..valid_review()
            };
            assert!(review.validate().is_ok(), "rating {rating} should pass");
        }
    }

    #[test]
    fn an_overlong_name_is_rejected() {
        let review = ReviewData {
            name: "x".repeat(101),
            ..valid_review()
        };
        assert!(review.validate().is_err());

        let review = ReviewData {
            name: "x".repeat(100),
            ..valid_review()
        };
        assert!(review.validate().is_ok());
    }

    #[test]
    fn an_overlong_message_is_rejected() {
        let review = ReviewData {
            message: "x".repeat(1001),
            ..valid_review()
        };
        assert!(review.validate().is_err());
    }

    #[test]
    fn a_malformed_email_is_rejected() {
        let review = ReviewData {
            email: "not-an-email".to_owned(),
            ..valid_review()
        };
        assert!(review.validate().is_err());
    }

    #[test]
    fn blank_fields_are_rejected() {
        let review = ReviewData {
            name: "   ".to_owned(),
            ..valid_review()
        };
        assert!(review.validate().is_err());

        let review = ReviewData {
            message: "".to_owned(),
            ..valid_review()
        };
        assert!(review.validate().is_err());
    }
}
