//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use jsonwebtoken::{DecodingKey, EncodingKey};
use rusqlite::Connection;

use crate::{Error, db::initialize, email::Mailer};

/// The bcrypt work factor used for password hashing in production.
pub const DEFAULT_BCRYPT_COST: u32 = 10;

/// The keys for signing and verifying session tokens.
#[derive(Clone)]
pub struct JwtKeys {
    /// The key for signing new session tokens.
    pub encoding: EncodingKey,
    /// The key for verifying presented session tokens.
    pub decoding: DecodingKey,
}

impl JwtKeys {
    /// Derive a signing/verification key pair from a `secret` string.
    pub fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_ref()),
            decoding: DecodingKey::from_secret(secret.as_ref()),
        }
    }
}

/// The state of the REST server.
#[derive(Clone)]
pub struct AppState {
    /// The keys used to sign and verify session tokens.
    pub jwt_keys: JwtKeys,

    /// The bcrypt work factor for hashing passwords.
    pub bcrypt_cost: u32,

    /// The base URL of the web client, used to build password reset links.
    pub client_url: String,

    /// The collaborator that delivers account emails. Delivery is always
    /// best-effort: callers log failures and carry on.
    pub mailer: Arc<dyn Mailer>,

    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(
        db_connection: Connection,
        jwt_secret: &str,
        client_url: &str,
        mailer: Arc<dyn Mailer>,
    ) -> Result<Self, Error> {
        initialize(&db_connection)?;

        Ok(Self {
            jwt_keys: JwtKeys::from_secret(jwt_secret),
            bcrypt_cost: DEFAULT_BCRYPT_COST,
            client_url: client_url.to_owned(),
            mailer,
            db_connection: Arc::new(Mutex::new(db_connection)),
        })
    }

    /// Use `cost` as the bcrypt work factor instead of [DEFAULT_BCRYPT_COST].
    ///
    /// Intended for tests, where the minimum cost keeps hashing fast.
    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }
}
