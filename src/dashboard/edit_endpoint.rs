//! Defines the endpoint behind the dashboard's edit form.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error, database_id::TransactionId, endpoints, html::alert,
    transaction::{TransactionChanges, update_transaction},
};

use super::create_endpoint::TransactionForm;

/// The state needed to edit a transaction from the dashboard form.
#[derive(Debug, Clone)]
pub struct EditTransactionFormState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditTransactionFormState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for saving the dashboard's edit form, redirects to the
/// dashboard on success.
///
/// The form always submits every field, so the stored record is fully
/// replaced apart from a blank date, which keeps the stored one.
pub(crate) async fn edit_transaction_form_endpoint(
    State(state): State<EditTransactionFormState>,
    Path(transaction_id): Path<TransactionId>,
    Form(form): Form<TransactionForm>,
) -> Response {
    if let Err(response) = form.check() {
        return response;
    }

    let changes = TransactionChanges {
        kind: Some(form.kind),
        amount: Some(form.amount),
        category: Some(form.category.clone()),
        date: form.date_at_midnight(),
        description: Some(form.description.clone().unwrap_or_default()),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return render_error_alert();
        }
    };

    match update_transaction(transaction_id, changes, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::ROOT.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(Error::UpdateMissingTransaction) => (
            StatusCode::NOT_FOUND,
            alert(
                "Could not update transaction",
                "The transaction could not be found.",
            ),
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Could not update transaction {transaction_id}: {error}");
            render_error_alert()
        }
    }
}

fn render_error_alert() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        alert(
            "Could not update transaction",
            "Try again or check the server logs.",
        ),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::{HeaderValue, StatusCode},
    };
    use axum_extra::extract::Form;
    use axum_htmx::HX_REDIRECT;
    use rusqlite::Connection;
    use time::macros::{date, datetime};

    use crate::{
        db::initialize,
        transaction::{Transaction, TransactionKind, create_transaction, get_transaction},
    };

    use super::{EditTransactionFormState, TransactionForm, edit_transaction_form_endpoint};

    fn must_create_test_state_with_transaction() -> (EditTransactionFormState, Transaction) {
        let conn = Connection::open_in_memory().expect("could not create in-memory database");
        initialize(&conn).expect("could not initialize test DB");

        let transaction = create_transaction(
            Transaction::build(TransactionKind::Expense, 100.0, "Groceries")
                .date(datetime!(2025-03-06 0:00 UTC)),
            &conn,
        )
        .expect("could not create test transaction");

        let state = EditTransactionFormState {
            db_connection: Arc::new(Mutex::new(conn)),
        };

        (state, transaction)
    }

    #[tokio::test]
    async fn can_update_transaction() {
        let (state, created) = must_create_test_state_with_transaction();
        let form = TransactionForm {
            kind: TransactionKind::Income,
            amount: 300.0,
            category: "Gift".to_owned(),
            date: Some(date!(2025 - 03 - 04)),
            description: Some("Birthday gift from a friend".to_owned()),
        };

        let response =
            edit_transaction_form_endpoint(State(state.clone()), Path(created.id), Form(form))
                .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(HX_REDIRECT),
            Some(&HeaderValue::from_static("/"))
        );

        let connection = state.db_connection.lock().unwrap();
        let updated = get_transaction(created.id, &connection).unwrap();
        assert_eq!(updated.kind, TransactionKind::Income);
        assert_eq!(updated.amount, 300.0);
        assert_eq!(updated.category, "Gift");
        assert_eq!(updated.date.date(), date!(2025 - 03 - 04));
    }

    #[tokio::test]
    async fn blank_date_keeps_stored_date() {
        let (state, created) = must_create_test_state_with_transaction();
        let form = TransactionForm {
            kind: TransactionKind::Expense,
            amount: 100.0,
            category: "Groceries".to_owned(),
            date: None,
            description: None,
        };

        edit_transaction_form_endpoint(State(state.clone()), Path(created.id), Form(form)).await;

        let connection = state.db_connection.lock().unwrap();
        let updated = get_transaction(created.id, &connection).unwrap();
        assert_eq!(updated.date, created.date);
    }

    #[tokio::test]
    async fn returns_404_for_missing_transaction() {
        let (state, _) = must_create_test_state_with_transaction();
        let form = TransactionForm {
            kind: TransactionKind::Expense,
            amount: 1.0,
            category: "Test".to_owned(),
            date: None,
            description: None,
        };

        let response = edit_transaction_form_endpoint(State(state), Path(42), Form(form)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
