//! KashMate is a personal finance tracker.
//!
//! This library provides the REST API backend: account management with JWT
//! sessions and password recovery, per-user income/expense transactions,
//! dashboard summaries, and public user reviews.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod auth;
mod db;
mod email;
mod endpoints;
mod review;
mod routing;
mod state;
#[cfg(test)]
mod test_utils;
mod transaction;
mod user;

pub use db::initialize as initialize_db;
pub use email::{LogMailer, Mailer};
pub use routing::build_router;
pub use state::AppState;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The caller supplied malformed or missing input. The message names the
    /// violated field(s).
    #[error("{0}")]
    Validation(String),

    /// The email used to create or update an account is already in use.
    #[error("an account with this email already exists")]
    DuplicateAccount,

    /// The email/password combination did not match a registered account.
    ///
    /// Deliberately covers both "no such account" and "wrong password" so
    /// the response cannot be used to probe for registered emails.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The session token is missing, malformed, or failed its
    /// signature/expiry check.
    #[error("authentication required")]
    Unauthenticated,

    /// The password reset token does not match any user or its expiry has
    /// passed.
    #[error("the reset token is invalid or has expired")]
    InvalidOrExpiredToken,

    /// The requested resource was not found.
    ///
    /// Also returned when the resource exists but belongs to another user,
    /// so callers cannot probe for other users' data.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// A session token could not be signed.
    #[error("token creation failed")]
    TokenCreation,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.contains("user.email") =>
            {
                Error::DuplicateAccount
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Error::Validation(message) => (StatusCode::BAD_REQUEST, message.clone()),
            Error::DuplicateAccount
            | Error::InvalidCredentials
            | Error::InvalidOrExpiredToken => (StatusCode::BAD_REQUEST, self.to_string()),
            Error::Unauthenticated => (StatusCode::UNAUTHORIZED, self.to_string()),
            Error::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong, please try again later".to_owned(),
                )
            }
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}
