//! Database initialization and the trait for adding model schemas.

use rusqlite::{Connection, Error, Transaction as SqlTransaction};

use crate::{review::Review, transaction::Transaction, user::User};

/// A trait for adding an object schema to a database.
pub trait CreateTable {
    /// Create a table for the model.
    ///
    /// # Errors
    /// Returns an error if there is an SQL error.
    fn create_table(connection: &Connection) -> Result<(), Error>;
}

/// Create the tables for the application's domain models.
///
/// # Errors
/// Returns an error if the tables could not be created.
pub fn initialize(connection: &Connection) -> Result<(), crate::Error> {
    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    User::create_table(&transaction)?;
    Transaction::create_table(&transaction)?;
    Review::create_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
