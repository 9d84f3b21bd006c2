//! Database query helpers for filtered transaction lookups.

use rusqlite::{Connection, ToSql, params_from_iter};
use time::OffsetDateTime;

use crate::Error;

use super::core::{Transaction, TransactionKind, map_transaction_row};

/// How to match the category filter against stored categories.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum CategoryMatch {
    /// The stored category must equal the filter text (the API behavior).
    Exact(String),
    /// The stored category must contain the filter text (the dashboard behavior).
    Contains(String),
}

/// The filters to apply when listing transactions.
///
/// All fields are optional; absent fields do not constrain the result. Date
/// bounds are inclusive and applied independently of each other.
#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct TransactionFilter {
    /// Only return transactions of this kind.
    pub(crate) kind: Option<TransactionKind>,
    /// Only return transactions dated on or after this instant.
    pub(crate) from: Option<OffsetDateTime>,
    /// Only return transactions dated on or before this instant.
    pub(crate) to: Option<OffsetDateTime>,
    /// Only return transactions whose category matches.
    pub(crate) category: Option<CategoryMatch>,
}

/// Get the transactions matching `filter`.
///
/// Results are sorted by date, newest first, and then by ID to keep the order
/// stable after updates.
///
/// # Errors
/// Returns [Error::SqlError] if the query cannot be prepared or executed.
pub(crate) fn get_transactions(
    filter: &TransactionFilter,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let mut clauses: Vec<&str> = Vec::new();
    let mut bind_values: Vec<Box<dyn ToSql>> = Vec::new();

    if let Some(kind) = filter.kind {
        clauses.push("kind = ?");
        bind_values.push(Box::new(kind));
    }

    if let Some(from) = filter.from {
        clauses.push("date >= ?");
        bind_values.push(Box::new(from));
    }

    if let Some(to) = filter.to {
        clauses.push("date <= ?");
        bind_values.push(Box::new(to));
    }

    match &filter.category {
        Some(CategoryMatch::Exact(category)) => {
            clauses.push("category = ?");
            bind_values.push(Box::new(category.clone()));
        }
        Some(CategoryMatch::Contains(text)) => {
            clauses.push("category LIKE ? ESCAPE '\\'");
            bind_values.push(Box::new(format!("%{}%", escape_like_pattern(text))));
        }
        None => {}
    }

    let where_clause = if clauses.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", clauses.join(" AND "))
    };

    let query = format!(
        "SELECT id, kind, amount, category, date, description FROM \"transaction\"\
         {where_clause} ORDER BY date DESC, id ASC"
    );

    connection
        .prepare(&query)?
        .query_map(
            params_from_iter(bind_values.iter().map(|value| value.as_ref())),
            map_transaction_row,
        )?
        .map(|transaction_result| transaction_result.map_err(Error::SqlError))
        .collect()
}

/// Escape the LIKE wildcards in user-supplied filter text.
fn escape_like_pattern(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
