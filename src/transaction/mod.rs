//! Transaction management for the finance tracker.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model, `TransactionBuilder`, and database functions for
//!   storing, querying, and aggregating transactions
//! - The field-level validation layer for API payloads
//! - The JSON API route handlers

mod core;
mod create_endpoint;
mod delete_endpoint;
mod get_endpoint;
mod list_endpoint;
mod query;
mod summary;
mod summary_endpoint;
mod update_endpoint;
mod validate;

pub use core::{
    Transaction, TransactionBuilder, TransactionChanges, TransactionKind,
    create_transaction_table,
};
pub use summary::Summary;
pub use validate::{FieldError, ValidationErrors};

pub(crate) use core::{
    count_transactions, create_transaction, delete_transaction, get_transaction,
    map_transaction_row, update_transaction,
};
pub(crate) use create_endpoint::create_transaction_endpoint;
pub(crate) use delete_endpoint::delete_transaction_endpoint;
pub(crate) use get_endpoint::get_transaction_endpoint;
pub(crate) use list_endpoint::list_transactions_endpoint;
pub(crate) use query::{CategoryMatch, TransactionFilter, get_transactions};
pub(crate) use summary::get_summary;
pub(crate) use summary_endpoint::transaction_summary_endpoint;
pub(crate) use update_endpoint::update_transaction_endpoint;
pub(crate) use validate::{
    DayBound, TransactionPayload, parse_date_param, validate_create, validate_range_params,
    validate_update,
};
