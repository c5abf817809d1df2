//! The user model, its schema, and the queries shared by the auth endpoints.

use email_address::EmailAddress;
use rusqlite::{Connection, Row, params};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, auth::PasswordHash, db::CreateTable};

/// The integer ID of a user row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserID(i64);

impl UserID {
    /// Create a user ID from an integer.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// The underlying integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A registered user.
///
/// Deliberately not serializable: the password hash and reset token must
/// never reach the client. Handlers build their own response types from the
/// fields that are safe to display.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// The user's row ID.
    pub id: UserID,
    /// The user's display name.
    pub name: String,
    /// The user's unique email address.
    pub email: EmailAddress,
    /// The salted bcrypt hash of the user's password.
    pub password_hash: PasswordHash,
    /// The outstanding password reset token, if any.
    pub reset_token: Option<String>,
    /// When the outstanding reset token stops being valid.
    pub reset_token_expires_at: Option<OffsetDateTime>,
}

impl CreateTable for User {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS user (
                    id INTEGER PRIMARY KEY,
                    name TEXT NOT NULL,
                    email TEXT UNIQUE NOT NULL,
                    password TEXT NOT NULL,
                    reset_token TEXT,
                    reset_token_expires_at TEXT
                    )",
            (),
        )?;

        Ok(())
    }
}

fn map_user_row(row: &Row) -> Result<User, rusqlite::Error> {
    let raw_email: String = row.get(2)?;
    let raw_password_hash: String = row.get(3)?;

    Ok(User {
        id: UserID::new(row.get(0)?),
        name: row.get(1)?,
        email: EmailAddress::new_unchecked(raw_email),
        password_hash: PasswordHash::new_unchecked(&raw_password_hash),
        reset_token: row.get(4)?,
        reset_token_expires_at: row.get(5)?,
    })
}

const USER_COLUMNS: &str = "id, name, email, password, reset_token, reset_token_expires_at";

/// Create and insert a new user.
///
/// # Errors
/// Returns [Error::DuplicateAccount] if the email is already registered, or
/// [Error::SqlError] if an SQL related error occurred.
pub fn insert_user(
    name: &str,
    email: &EmailAddress,
    password_hash: &PasswordHash,
    connection: &Connection,
) -> Result<User, Error> {
    connection.execute(
        "INSERT INTO user (name, email, password) VALUES (?1, ?2, ?3)",
        params![name, email.to_string(), password_hash.to_string()],
    )?;

    Ok(User {
        id: UserID::new(connection.last_insert_rowid()),
        name: name.to_owned(),
        email: email.to_owned(),
        password_hash: password_hash.to_owned(),
        reset_token: None,
        reset_token_expires_at: None,
    })
}

/// Get the user with the specified `id`.
///
/// # Errors
/// Returns [Error::NotFound] if no such user exists, or [Error::SqlError] if
/// an SQL related error occurred.
pub fn get_user_by_id(id: UserID, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare(&format!("SELECT {USER_COLUMNS} FROM user WHERE id = :id"))?
        .query_row(&[(":id", &id.as_i64())], map_user_row)
        .map_err(|error| error.into())
}

/// Get the user with the specified `email` address.
///
/// # Errors
/// Returns [Error::NotFound] if no such user exists, or [Error::SqlError] if
/// an SQL related error occurred.
pub fn get_user_by_email(email: &str, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare(&format!("SELECT {USER_COLUMNS} FROM user WHERE email = :email"))?
        .query_row(&[(":email", &email)], map_user_row)
        .map_err(|error| error.into())
}

/// Get the user holding the specified password reset `token`.
///
/// The caller is responsible for checking the token expiry.
///
/// # Errors
/// Returns [Error::NotFound] if no user holds this token, or
/// [Error::SqlError] if an SQL related error occurred.
pub fn get_user_by_reset_token(token: &str, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare(&format!(
            "SELECT {USER_COLUMNS} FROM user WHERE reset_token = :token"
        ))?
        .query_row(&[(":token", &token)], map_user_row)
        .map_err(|error| error.into())
}

/// Replace the name and email of the user with the specified `id` in a single
/// UPDATE.
///
/// # Errors
/// Returns [Error::NotFound] if no such user exists,
/// [Error::DuplicateAccount] if `email` belongs to a different user, or
/// [Error::SqlError] if an SQL related error occurred.
pub fn update_user_profile(
    id: UserID,
    name: &str,
    email: &EmailAddress,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE user SET name = ?1, email = ?2 WHERE id = ?3",
        params![name, email.to_string(), id.as_i64()],
    )?;

    match rows_affected {
        0 => Err(Error::NotFound),
        _ => Ok(()),
    }
}

/// Replace the password hash of the user with the specified `id`.
///
/// # Errors
/// Returns [Error::NotFound] if no such user exists, or [Error::SqlError] if
/// an SQL related error occurred.
pub fn update_user_password(
    id: UserID,
    password_hash: &PasswordHash,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE user SET password = ?1 WHERE id = ?2",
        params![password_hash.to_string(), id.as_i64()],
    )?;

    match rows_affected {
        0 => Err(Error::NotFound),
        _ => Ok(()),
    }
}

/// Store a password reset token and its expiry on the user with the specified
/// `id`, superseding any earlier token.
///
/// # Errors
/// Returns [Error::NotFound] if no such user exists, or [Error::SqlError] if
/// an SQL related error occurred.
pub fn set_reset_token(
    id: UserID,
    token: &str,
    expires_at: OffsetDateTime,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE user SET reset_token = ?1, reset_token_expires_at = ?2 WHERE id = ?3",
        params![token, expires_at, id.as_i64()],
    )?;

    match rows_affected {
        0 => Err(Error::NotFound),
        _ => Ok(()),
    }
}

/// Store a new password hash and erase the reset token and its expiry in a
/// single UPDATE, making the token single-use by construction.
///
/// # Errors
/// Returns [Error::NotFound] if no such user exists, or [Error::SqlError] if
/// an SQL related error occurred.
pub fn consume_reset_token(
    id: UserID,
    password_hash: &PasswordHash,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE user SET password = ?1, reset_token = NULL, reset_token_expires_at = NULL \
         WHERE id = ?2",
        params![password_hash.to_string(), id.as_i64()],
    )?;

    match rows_affected {
        0 => Err(Error::NotFound),
        _ => Ok(()),
    }
}
