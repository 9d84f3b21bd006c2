//! Defines the core data model and database queries for transactions.

use rusqlite::{
    Connection, Row, params,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, UtcOffset};

use crate::{Error, database_id::TransactionId};

// ============================================================================
// MODELS
// ============================================================================

/// Whether a transaction brings money in or takes money out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money coming in, e.g. a salary payment.
    Income,
    /// Money going out, e.g. rent or groceries.
    Expense,
}

impl TransactionKind {
    /// The lowercase string used for this kind in the database and the API.
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }

    /// Parse a kind from its lowercase string form.
    ///
    /// Returns `None` for anything other than `"income"` or `"expense"`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "income" => Some(TransactionKind::Income),
            "expense" => Some(TransactionKind::Expense),
            _ => None,
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ToSql for TransactionKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;
        TransactionKind::parse(text).ok_or(FromSqlError::InvalidType)
    }
}

/// An income or expense record, i.e. an event where money was either earned or
/// spent.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// Whether this transaction is income or an expense.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// The amount of money earned or spent. Always non-negative; the sign is
    /// carried by `kind`.
    pub amount: f64,
    /// A free-text label grouping related transactions, e.g. "Rent".
    pub category: String,
    /// When the transaction happened.
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    /// A text description of what the transaction was for.
    pub description: String,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(kind: TransactionKind, amount: f64, category: &str) -> TransactionBuilder {
        TransactionBuilder {
            kind,
            amount,
            category: category.to_owned(),
            date: None,
            description: String::new(),
        }
    }
}

/// A builder for creating [Transaction] instances.
///
/// The date defaults to the creation time and the description defaults to the
/// empty string. Pass the finished builder to [create_transaction] to insert
/// the row and obtain its ID.
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// Whether the transaction is income or an expense.
    pub kind: TransactionKind,
    /// The amount of money earned or spent. Must be non-negative.
    pub amount: f64,
    /// A free-text label grouping related transactions.
    pub category: String,
    /// When the transaction happened. `None` means "now".
    pub date: Option<OffsetDateTime>,
    /// A text description of what the transaction was for.
    pub description: String,
}

impl TransactionBuilder {
    /// Set the date for the transaction.
    pub fn date(mut self, date: OffsetDateTime) -> Self {
        self.date = Some(date);
        self
    }

    /// Set the description for the transaction.
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }
}

/// A partial update to an existing transaction.
///
/// Fields set to `None` keep their stored value.
#[derive(Debug, Default, PartialEq, Clone)]
pub struct TransactionChanges {
    /// Replace the transaction kind.
    pub kind: Option<TransactionKind>,
    /// Replace the amount. Must be non-negative.
    pub amount: Option<f64>,
    /// Replace the category.
    pub category: Option<String>,
    /// Replace the date.
    pub date: Option<OffsetDateTime>,
    /// Replace the description.
    pub description: Option<String>,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new transaction in the database from a builder.
///
/// Dates are normalized to UTC so that the stored text sorts chronologically.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub(crate) fn create_transaction(
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let date = builder
        .date
        .unwrap_or_else(OffsetDateTime::now_utc)
        .to_offset(UtcOffset::UTC);

    let transaction = connection
        .prepare(
            "INSERT INTO \"transaction\" (kind, amount, category, date, description)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id, kind, amount, category, date, description",
        )?
        .query_row(
            (
                builder.kind,
                builder.amount,
                builder.category,
                date,
                builder.description,
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] if there is some other SQL error.
pub(crate) fn get_transaction(
    id: TransactionId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "SELECT id, kind, amount, category, date, description FROM \"transaction\" \
             WHERE id = :id",
        )?
        .query_row(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Apply a partial update to the transaction with `id` and return the updated
/// record.
///
/// Fields left as `None` in `changes` keep their stored value.
///
/// # Errors
/// This function will return an:
/// - [Error::UpdateMissingTransaction] if `id` does not refer to a valid
///   transaction,
/// - or [Error::SqlError] if there is some other SQL error.
pub(crate) fn update_transaction(
    id: TransactionId,
    changes: TransactionChanges,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let current = get_transaction(id, connection).map_err(|error| match error {
        Error::NotFound => Error::UpdateMissingTransaction,
        error => error,
    })?;

    let updated = Transaction {
        id,
        kind: changes.kind.unwrap_or(current.kind),
        amount: changes.amount.unwrap_or(current.amount),
        category: changes.category.unwrap_or(current.category),
        date: changes
            .date
            .map(|date| date.to_offset(UtcOffset::UTC))
            .unwrap_or(current.date),
        description: changes.description.unwrap_or(current.description),
    };

    connection.execute(
        "UPDATE \"transaction\" \
         SET kind = ?1, amount = ?2, category = ?3, date = ?4, description = ?5 \
         WHERE id = ?6",
        params![
            updated.kind,
            updated.amount,
            updated.category,
            updated.date,
            updated.description,
            id,
        ],
    )?;

    Ok(updated)
}

/// Delete the transaction with `id` from the database.
///
/// # Errors
/// This function will return an:
/// - [Error::DeleteMissingTransaction] if `id` does not refer to a valid
///   transaction,
/// - or [Error::SqlError] if there is some other SQL error.
pub(crate) fn delete_transaction(
    id: TransactionId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM \"transaction\" WHERE id = :id",
        &[(":id", &id)],
    )?;

    match rows_affected {
        0 => Err(Error::DeleteMissingTransaction),
        _ => Ok(()),
    }
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is some SQL error.
pub(crate) fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM \"transaction\";", [], |row| {
            row.get(0)
        })
        .map_err(|error| error.into())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                kind TEXT NOT NULL CHECK (kind IN ('income', 'expense')),
                amount REAL NOT NULL CHECK (amount >= 0.0),
                category TEXT NOT NULL,
                date TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT ''
                )",
        (),
    )?;

    // Ensure the sequence starts at 1
    connection.execute(
        "INSERT OR IGNORE INTO sqlite_sequence (name, seq) VALUES ('transaction', 0)",
        (),
    )?;

    // Index used by the list and summary queries.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_date ON \"transaction\"(date);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub(crate) fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let kind = row.get(1)?;
    let amount = row.get(2)?;
    let category = row.get(3)?;
    let date = row.get(4)?;
    let description = row.get(5)?;

    Ok(Transaction {
        id,
        kind,
        amount,
        category,
        date,
        description,
    })
}

// ============================================================================
// TESTS
// ============================================================================
