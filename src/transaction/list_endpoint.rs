//! Defines the endpoint for listing transactions with optional filters.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    transaction::{
        CategoryMatch, FieldError, TransactionFilter, TransactionKind, ValidationErrors,
        get_transactions, validate_range_params,
    },
};

/// The state needed to list transactions.
#[derive(Debug, Clone)]
pub struct ListTransactionsState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ListTransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query parameters accepted by the list route.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListParams {
    /// Only return transactions of this kind ("income" or "expense").
    #[serde(rename = "type")]
    pub(crate) kind: Option<String>,
    /// Only return transactions dated on or after this date.
    pub(crate) from: Option<String>,
    /// Only return transactions dated on or before this date.
    pub(crate) to: Option<String>,
    /// Only return transactions with exactly this category.
    pub(crate) category: Option<String>,
}

/// A route handler that returns the transactions matching the query
/// parameters as a JSON array.
pub(crate) async fn list_transactions_endpoint(
    State(state): State<ListTransactionsState>,
    Query(params): Query<ListParams>,
) -> Response {
    let filter = match build_filter(&params) {
        Ok(filter) => filter,
        Err(errors) => return errors.into_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match get_transactions(&filter, &connection) {
        Ok(transactions) => Json(transactions).into_response(),
        Err(error) => error.into_response(),
    }
}

fn build_filter(params: &ListParams) -> Result<TransactionFilter, ValidationErrors> {
    let mut errors = Vec::new();

    let kind = params.kind.as_deref().and_then(|value| {
        let kind = TransactionKind::parse(value);
        if kind.is_none() {
            errors.push(FieldError::new(
                "type",
                "type must be either 'income' or 'expense'",
            ));
        }
        kind
    });

    let (from, to) = match validate_range_params(params.from.as_deref(), params.to.as_deref()) {
        Ok(bounds) => bounds,
        Err(mut range_errors) => {
            errors.append(&mut range_errors.errors);
            (None, None)
        }
    };

    let category = params.category.clone().map(CategoryMatch::Exact);

    if errors.is_empty() {
        Ok(TransactionFilter {
            kind,
            from,
            to,
            category,
        })
    } else {
        Err(ValidationErrors { errors })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Query, State},
        http::StatusCode,
    };
    use rusqlite::Connection;
    use time::macros::datetime;

    use crate::{
        db::initialize,
        transaction::{Transaction, TransactionKind, create_transaction},
    };

    use super::{ListParams, ListTransactionsState, list_transactions_endpoint};

    fn get_test_state() -> ListTransactionsState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        create_transaction(
            Transaction::build(TransactionKind::Income, 5000.0, "Salary")
                .date(datetime!(2025-03-07 0:00 UTC)),
            &conn,
        )
        .unwrap();
        create_transaction(
            Transaction::build(TransactionKind::Expense, 1500.0, "Rent")
                .date(datetime!(2025-03-01 0:00 UTC)),
            &conn,
        )
        .unwrap();

        ListTransactionsState {
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    async fn response_transactions(response: axum::response::Response) -> Vec<Transaction> {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).expect("response body should be a transaction array")
    }

    #[tokio::test]
    async fn lists_all_transactions() {
        let state = get_test_state();

        let response =
            list_transactions_endpoint(State(state), Query(ListParams::default())).await;

        assert_eq!(response.status(), StatusCode::OK);
        let transactions = response_transactions(response).await;
        assert_eq!(transactions.len(), 2);
    }

    #[tokio::test]
    async fn filters_by_type_param() {
        let state = get_test_state();

        let response = list_transactions_endpoint(
            State(state),
            Query(ListParams {
                kind: Some("income".to_owned()),
                ..Default::default()
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let transactions = response_transactions(response).await;
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].category, "Salary");
    }

    #[tokio::test]
    async fn rejects_unknown_type_param() {
        let state = get_test_state();

        let response = list_transactions_endpoint(
            State(state),
            Query(ListParams {
                kind: Some("transfer".to_owned()),
                ..Default::default()
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn rejects_malformed_date_params() {
        let state = get_test_state();

        let response = list_transactions_endpoint(
            State(state),
            Query(ListParams {
                from: Some("yesterday".to_owned()),
                ..Default::default()
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
