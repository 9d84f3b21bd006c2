//! Defines the endpoint for creating a new transaction.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    transaction::{TransactionPayload, create_transaction, validate_create},
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that validates the request body, inserts the transaction,
/// and returns the created record with a 201 status.
///
/// Invalid fields are reported with a 400 response listing every problem.
pub(crate) async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Json(payload): Json<TransactionPayload>,
) -> Response {
    let builder = match validate_create(payload) {
        Ok(builder) => builder,
        Err(errors) => return errors.into_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match create_transaction(builder, &connection) {
        Ok(transaction) => (StatusCode::CREATED, Json(transaction)).into_response(),
        Err(error) => error.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Json, extract::State, http::StatusCode};
    use rusqlite::Connection;
    use serde_json::json;

    use crate::{
        db::initialize,
        transaction::{Transaction, TransactionKind, ValidationErrors, get_transaction},
    };

    use super::{CreateTransactionState, create_transaction_endpoint};

    fn get_test_state() -> CreateTransactionState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        CreateTransactionState {
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    #[tokio::test]
    async fn can_create_transaction() {
        let state = get_test_state();
        let payload = serde_json::from_value(json!({
            "type": "expense",
            "amount": 100,
            "category": "Groceries",
            "date": "2025-03-06",
            "description": "Weekly grocery shopping",
        }))
        .unwrap();

        let response = create_transaction_endpoint(State(state.clone()), Json(payload)).await;

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let created: Transaction = serde_json::from_slice(&body).unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(created.kind, TransactionKind::Expense);
        assert_eq!(created.amount, 100.0);

        // Verify the transaction was actually stored.
        let connection = state.db_connection.lock().unwrap();
        assert_eq!(get_transaction(created.id, &connection).unwrap(), created);
    }

    #[tokio::test]
    async fn rejects_invalid_payload_with_field_errors() {
        let state = get_test_state();
        let payload = serde_json::from_value(json!({
            "type": "transfer",
            "amount": -5,
        }))
        .unwrap();

        let response = create_transaction_endpoint(State(state.clone()), Json(payload)).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let errors: ValidationErrors = serde_json::from_slice(&body).unwrap();
        let fields: Vec<&str> = errors
            .errors
            .iter()
            .map(|error| error.field.as_str())
            .collect();
        assert_eq!(fields, ["amount", "type", "category"]);

        // Nothing should have been stored.
        let connection = state.db_connection.lock().unwrap();
        assert_eq!(
            crate::transaction::count_transactions(&connection).unwrap(),
            0
        );
    }
}
