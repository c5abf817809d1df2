//! The transaction model and its endpoints: create, list, edit, delete, and
//! the dashboard summaries.

use rusqlite::{Connection, Row, params};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, db::CreateTable, user::UserID};

mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod list_endpoint;
mod summary;

pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::edit_transaction_endpoint;
pub use list_endpoint::list_transactions_endpoint;
pub use summary::{payment_mode_summary_endpoint, summary_endpoint};

/// The integer ID of a transaction row.
pub type TransactionId = i64;

/// Whether a transaction records money earned or money spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    /// Money earned.
    Income,
    /// Money spent.
    Expense,
}

impl TransactionType {
    /// The enum value as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "Income",
            TransactionType::Expense => "Expense",
        }
    }

    fn from_sql_text(text: &str, column: usize) -> Result<Self, rusqlite::Error> {
        match text {
            "Income" => Ok(TransactionType::Income),
            "Expense" => Ok(TransactionType::Expense),
            other => Err(rusqlite::Error::FromSqlConversionFailure(
                column,
                rusqlite::types::Type::Text,
                format!("unrecognized transaction type {other:?}").into(),
            )),
        }
    }
}

/// How a transaction was paid.
///
/// A closed enum: values outside Cash/Card/UPI are rejected when the request
/// body is parsed, so they can never skew the payment-mode summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMode {
    /// Physical cash.
    Cash,
    /// Debit or credit card.
    Card,
    /// Unified Payments Interface transfer.
    #[serde(rename = "UPI")]
    Upi,
}

impl PaymentMode {
    /// The enum value as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMode::Cash => "Cash",
            PaymentMode::Card => "Card",
            PaymentMode::Upi => "UPI",
        }
    }

    fn from_sql_text(text: &str, column: usize) -> Result<Self, rusqlite::Error> {
        match text {
            "Cash" => Ok(PaymentMode::Cash),
            "Card" => Ok(PaymentMode::Card),
            "UPI" => Ok(PaymentMode::Upi),
            other => Err(rusqlite::Error::FromSqlConversionFailure(
                column,
                rusqlite::types::Type::Text,
                format!("unrecognized payment mode {other:?}").into(),
            )),
        }
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The transaction's row ID.
    pub id: TransactionId,
    /// The ID of the user that owns this transaction.
    pub user_id: UserID,
    /// A short description of what the transaction was for.
    pub title: String,
    /// The amount of money spent or earned. Always positive; the direction
    /// is carried by [Transaction::transaction_type].
    pub amount: f64,
    /// A free-text label grouping related transactions.
    pub category: String,
    /// Whether this is income or an expense.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// How the transaction was paid.
    pub payment_mode: PaymentMode,
    /// When the transaction happened.
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
}

impl CreateTable for Transaction {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS \"transaction\" (
                    id INTEGER PRIMARY KEY,
                    user_id INTEGER NOT NULL,
                    title TEXT NOT NULL,
                    amount REAL NOT NULL,
                    category TEXT NOT NULL,
                    type TEXT NOT NULL,
                    payment_mode TEXT NOT NULL,
                    date TEXT NOT NULL,
                    FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                    )",
            (),
        )?;

        Ok(())
    }
}

pub(crate) fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let raw_type: String = row.get(5)?;
    let raw_payment_mode: String = row.get(6)?;

    Ok(Transaction {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        title: row.get(2)?,
        amount: row.get(3)?,
        category: row.get(4)?,
        transaction_type: TransactionType::from_sql_text(&raw_type, 5)?,
        payment_mode: PaymentMode::from_sql_text(&raw_payment_mode, 6)?,
        date: row.get(7)?,
    })
}

const TRANSACTION_COLUMNS: &str = "id, user_id, title, amount, category, type, payment_mode, date";

/// The editable fields of a transaction, validated at the JSON boundary.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionData {
    /// A short description of what the transaction was for.
    pub title: String,
    /// The amount of money spent or earned.
    pub amount: f64,
    /// A free-text label grouping related transactions.
    pub category: String,
    /// Whether this is income or an expense.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// How the transaction was paid.
    pub payment_mode: PaymentMode,
    /// When the transaction happened. Defaults to the current time.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub date: Option<OffsetDateTime>,
}

impl TransactionData {
    /// Check the field-level invariants: positive amount, non-empty title
    /// and category.
    ///
    /// # Errors
    /// Returns [Error::Validation] naming the violated field.
    pub fn validate(&self) -> Result<(), Error> {
        if self.title.trim().is_empty() {
            return Err(Error::Validation("title must not be empty".to_owned()));
        }

        if !(self.amount > 0.0) {
            return Err(Error::Validation(
                "amount must be greater than zero".to_owned(),
            ));
        }

        if self.category.trim().is_empty() {
            return Err(Error::Validation("category must not be empty".to_owned()));
        }

        Ok(())
    }

    /// The transaction date, normalized to UTC, or "now" when omitted.
    pub fn date_or_now(&self) -> OffsetDateTime {
        self.date
            .map(|date| date.to_offset(time::UtcOffset::UTC))
            .unwrap_or_else(OffsetDateTime::now_utc)
    }
}

/// Retrieve the transactions owned by `user_id`, most recent first.
///
/// An empty vector is returned if the user has no transactions.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error.
pub fn get_transactions_by_user(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" \
             WHERE user_id = :user_id ORDER BY date DESC"
        ))?
        .query_map(&[(":user_id", &user_id.as_i64())], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect()
}

/// Retrieve the transactions owned by `user_id` in the order they were
/// recorded.
///
/// The dashboard summaries group categories by first appearance, so they
/// read in insertion order rather than the listing's date sort.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error.
pub fn get_transactions_by_user_in_entry_order(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" \
             WHERE user_id = :user_id ORDER BY id ASC"
        ))?
        .query_map(&[(":user_id", &user_id.as_i64())], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect()
}

/// Insert a new transaction owned by `user_id`.
///
/// The caller is expected to have called [TransactionData::validate].
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error.
pub fn insert_transaction(
    user_id: UserID,
    data: &TransactionData,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let date = data.date_or_now();

    connection.execute(
        "INSERT INTO \"transaction\" (user_id, title, amount, category, type, payment_mode, date) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            user_id.as_i64(),
            data.title,
            data.amount,
            data.category,
            data.transaction_type.as_str(),
            data.payment_mode.as_str(),
            date,
        ],
    )?;

    Ok(Transaction {
        id: connection.last_insert_rowid(),
        user_id,
        title: data.title.clone(),
        amount: data.amount,
        category: data.category.clone(),
        transaction_type: data.transaction_type,
        payment_mode: data.payment_mode,
        date,
    })
}
