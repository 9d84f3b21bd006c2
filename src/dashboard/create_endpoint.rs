//! Defines the endpoint behind the dashboard's "new transaction" form.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of failing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;
use time::{Date, PrimitiveDateTime, Time};

use crate::{
    AppState, endpoints,
    html::alert,
    transaction::{Transaction, TransactionKind, create_transaction},
};

/// The state needed to create a transaction from the dashboard form.
#[derive(Debug, Clone)]
pub struct CreateTransactionFormState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionFormState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for creating or editing a transaction.
#[derive(Debug, Deserialize)]
pub struct TransactionForm {
    /// Whether the transaction is income or an expense.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// The value of the transaction in dollars.
    pub amount: f64,
    /// The category label for the transaction.
    pub category: String,
    /// The date when the transaction occurred. Defaults to today when left
    /// blank.
    #[serde(default)]
    pub date: Option<Date>,
    /// Text detailing the transaction.
    #[serde(default)]
    pub description: Option<String>,
}

impl TransactionForm {
    /// Check the form fields that the browser's `required` attributes cannot
    /// fully enforce.
    pub(crate) fn check(&self) -> Result<(), Response> {
        if self.amount < 0.0 {
            return Err((
                StatusCode::BAD_REQUEST,
                alert("Invalid amount", "The amount must be non-negative."),
            )
                .into_response());
        }

        if self.category.trim().is_empty() {
            return Err((
                StatusCode::BAD_REQUEST,
                alert("Invalid category", "The category must not be empty."),
            )
                .into_response());
        }

        Ok(())
    }

    /// The form's date widened to the start of the day, if one was picked.
    pub(crate) fn date_at_midnight(&self) -> Option<time::OffsetDateTime> {
        self.date
            .map(|date| PrimitiveDateTime::new(date, Time::MIDNIGHT).assume_utc())
    }
}

/// A route handler for creating a new transaction, redirects to the dashboard
/// on success.
pub(crate) async fn create_transaction_form_endpoint(
    State(state): State<CreateTransactionFormState>,
    Form(form): Form<TransactionForm>,
) -> Response {
    if let Err(response) = form.check() {
        return response;
    }

    let mut builder = Transaction::build(form.kind, form.amount, &form.category)
        .description(form.description.as_deref().unwrap_or(""));

    if let Some(date) = form.date_at_midnight() {
        builder = builder.date(date);
    }

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return render_error_alert();
        }
    };

    if let Err(error) = create_transaction(builder, &connection) {
        tracing::error!("Could not create transaction: {error}");
        return render_error_alert();
    }

    (
        HxRedirect(endpoints::ROOT.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

fn render_error_alert() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        alert(
            "Could not create transaction",
            "Try again or check the server logs.",
        ),
    )
        .into_response()
}
