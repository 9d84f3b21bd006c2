//! The dashboard page and its form endpoints.
//!
//! The dashboard lists transactions with filters, shows totals for the
//! filtered set, and carries the forms for creating, editing, and deleting
//! records. The forms talk to their own urlencoded endpoints rather than the
//! JSON API.

mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod page;
mod view;

pub(crate) use create_endpoint::create_transaction_form_endpoint;
pub(crate) use delete_endpoint::delete_transaction_form_endpoint;
pub(crate) use edit_endpoint::edit_transaction_form_endpoint;
pub(crate) use page::get_dashboard_page;
