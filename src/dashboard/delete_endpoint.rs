//! Defines the endpoint behind the dashboard's delete buttons.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error, database_id::TransactionId, html::alert, transaction::delete_transaction,
};

/// The state needed to delete a transaction from the dashboard.
#[derive(Debug, Clone)]
pub struct DeleteTransactionFormState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteTransactionFormState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for the dashboard's delete buttons.
///
/// The status code has to be 200 OK or HTMX will not remove the table row.
pub(crate) async fn delete_transaction_form_endpoint(
    State(state): State<DeleteTransactionFormState>,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return render_error_alert();
        }
    };

    match delete_transaction(transaction_id, &connection) {
        Ok(()) => Html("").into_response(),
        Err(Error::DeleteMissingTransaction) => (
            StatusCode::NOT_FOUND,
            alert(
                "Could not delete transaction",
                "The transaction could not be found. \
                Try refreshing the page to see if the transaction has already been deleted.",
            ),
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Could not delete transaction {transaction_id}: {error}");
            render_error_alert()
        }
    }
}

fn render_error_alert() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        alert(
            "Could not delete transaction",
            "An unexpected error occurred. Try again later or check the logs on the server.",
        ),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
    };
    use rusqlite::Connection;

    use crate::{
        Error,
        db::initialize,
        transaction::{Transaction, TransactionKind, create_transaction, get_transaction},
    };

    use super::{DeleteTransactionFormState, delete_transaction_form_endpoint};

    fn get_test_state() -> DeleteTransactionFormState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        DeleteTransactionFormState {
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    #[tokio::test]
    async fn deletes_transaction_and_returns_ok() {
        let state = get_test_state();
        let created = {
            let connection = state.db_connection.lock().unwrap();
            create_transaction(
                Transaction::build(TransactionKind::Expense, 1.23, "Test"),
                &connection,
            )
            .unwrap()
        };

        let response =
            delete_transaction_form_endpoint(State(state.clone()), Path(created.id)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let connection = state.db_connection.lock().unwrap();
        assert_eq!(
            get_transaction(created.id, &connection),
            Err(Error::NotFound)
        );
    }

    #[tokio::test]
    async fn returns_404_for_missing_transaction() {
        let state = get_test_state();

        let response = delete_transaction_form_endpoint(State(state), Path(42)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
