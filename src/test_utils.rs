//! Helpers shared by the endpoint tests: an in-memory app state, a mailer
//! that records what it would have sent, and a shortcut for registering a
//! test user.

use std::sync::{Arc, Mutex};

use axum_test::TestServer;
use email_address::EmailAddress;
use rusqlite::Connection;
use serde_json::json;

use crate::{AppState, Mailer, auth::TokenResponse, build_router};

/// The minimum bcrypt cost, used to keep tests fast.
pub const TEST_BCRYPT_COST: u32 = 4;

/// A piece of mail a [RecordingMailer] was asked to deliver.
#[derive(Debug, Clone, PartialEq)]
pub enum SentMail {
    Welcome { to: String, name: String },
    PasswordReset { to: String, reset_url: String },
}

/// A [Mailer] that records mail instead of delivering it.
#[derive(Debug, Clone, Default)]
pub struct RecordingMailer {
    pub sent: Arc<Mutex<Vec<SentMail>>>,
}

impl Mailer for RecordingMailer {
    fn send_welcome(&self, to: &EmailAddress, name: &str) -> Result<(), String> {
        self.sent.lock().unwrap().push(SentMail::Welcome {
            to: to.to_string(),
            name: name.to_string(),
        });
        Ok(())
    }

    fn send_password_reset(&self, to: &EmailAddress, reset_url: &str) -> Result<(), String> {
        self.sent.lock().unwrap().push(SentMail::PasswordReset {
            to: to.to_string(),
            reset_url: reset_url.to_string(),
        });
        Ok(())
    }
}

/// A [Mailer] whose deliveries always fail, for testing that email failure
/// never fails the calling operation.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingMailer;

impl Mailer for FailingMailer {
    fn send_welcome(&self, _: &EmailAddress, _: &str) -> Result<(), String> {
        Err("the mail server is on fire".to_string())
    }

    fn send_password_reset(&self, _: &EmailAddress, _: &str) -> Result<(), String> {
        Err("the mail server is on fire".to_string())
    }
}

/// Create an [AppState] backed by an in-memory database and `mailer`.
pub fn test_state_with_mailer(mailer: Arc<dyn Mailer>) -> AppState {
    let connection = Connection::open_in_memory().expect("Could not open database in memory.");

    AppState::new(connection, "wowwhatasecret", "https://kashmate.test", mailer)
        .expect("Could not initialize app state.")
        .with_bcrypt_cost(TEST_BCRYPT_COST)
}

/// Create a test server and its app state, with a [RecordingMailer] attached.
pub fn new_test_app() -> (TestServer, AppState, RecordingMailer) {
    let mailer = RecordingMailer::default();
    let state = test_state_with_mailer(Arc::new(mailer.clone()));
    let server = TestServer::new(build_router(state.clone()));

    (server, state, mailer)
}

/// Register a user through the API and return their session token.
pub async fn register_test_user(server: &TestServer, email: &str, password: &str) -> String {
    let response = server
        .post(crate::endpoints::REGISTER)
        .json(&json!({
            "name": "Test User",
            "email": email,
            "password": password,
        }))
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);

    response.json::<TokenResponse>().token
}
