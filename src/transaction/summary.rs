//! Aggregate totals over the transaction table.

use rusqlite::{Connection, ToSql, params_from_iter};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::Error;

use super::core::TransactionKind;

/// The total income, total expenses, and their difference over an optional
/// date range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// The sum of all income amounts in the range.
    pub income: f64,
    /// The sum of all expense amounts in the range.
    pub expense: f64,
    /// `income - expense`.
    pub balance: f64,
}

/// Compute the transaction summary for the date range `[from, to]`.
///
/// Both bounds are optional, inclusive, and applied independently. Kinds with
/// no transactions in the range sum to zero.
///
/// # Errors
/// Returns [Error::SqlError] if the query cannot be prepared or executed.
pub(crate) fn get_summary(
    from: Option<OffsetDateTime>,
    to: Option<OffsetDateTime>,
    connection: &Connection,
) -> Result<Summary, Error> {
    let mut clauses: Vec<&str> = Vec::new();
    let mut bind_values: Vec<Box<dyn ToSql>> = Vec::new();

    if let Some(from) = from {
        clauses.push("date >= ?");
        bind_values.push(Box::new(from));
    }

    if let Some(to) = to {
        clauses.push("date <= ?");
        bind_values.push(Box::new(to));
    }

    let where_clause = if clauses.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", clauses.join(" AND "))
    };

    let query = format!(
        "SELECT kind, COALESCE(SUM(amount), 0.0) FROM \"transaction\"\
         {where_clause} GROUP BY kind"
    );

    let mut income = 0.0;
    let mut expense = 0.0;

    let totals: Vec<(TransactionKind, f64)> = connection
        .prepare(&query)?
        .query_map(
            params_from_iter(bind_values.iter().map(|value| value.as_ref())),
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?
        .collect::<Result<_, _>>()?;

    for (kind, total) in totals {
        match kind {
            TransactionKind::Income => income = total,
            TransactionKind::Expense => expense = total,
        }
    }

    Ok(Summary {
        income,
        expense,
        balance: income - expense,
    })
}
