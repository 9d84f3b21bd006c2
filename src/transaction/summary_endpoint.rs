//! Defines the endpoint for the transaction summary.

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
    transaction::{get_summary, validate_range_params},
};

/// The state needed to compute the transaction summary.
#[derive(Debug, Clone)]
pub struct TransactionSummaryState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionSummaryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query parameters accepted by the summary route.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct SummaryParams {
    /// Only include transactions dated on or after this date.
    pub(crate) from: Option<String>,
    /// Only include transactions dated on or before this date.
    pub(crate) to: Option<String>,
}

/// A route handler that returns the total income, total expenses, and balance
/// over an optional date range.
pub(crate) async fn transaction_summary_endpoint(
    State(state): State<TransactionSummaryState>,
    Query(params): Query<SummaryParams>,
) -> Response {
    let (from, to) = match validate_range_params(params.from.as_deref(), params.to.as_deref()) {
        Ok(bounds) => bounds,
        Err(errors) => return errors.into_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match get_summary(from, to, &connection) {
        Ok(summary) => Json(summary).into_response(),
        Err(error) => error.into_response(),
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
        transaction::{Summary, Transaction, TransactionKind, create_transaction},
    };

    use super::{SummaryParams, TransactionSummaryState, transaction_summary_endpoint};

    fn get_test_state() -> TransactionSummaryState {
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

        TransactionSummaryState {
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    async fn response_summary(response: axum::response::Response) -> Summary {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).expect("response body should be a summary")
    }

    #[tokio::test]
    async fn summarizes_all_transactions() {
        let state = get_test_state();

        let response =
            transaction_summary_endpoint(State(state), Query(SummaryParams::default())).await;

        assert_eq!(response.status(), StatusCode::OK);
        let summary = response_summary(response).await;
        assert_eq!(
            summary,
            Summary {
                income: 5000.0,
                expense: 1500.0,
                balance: 3500.0,
            }
        );
    }

    #[tokio::test]
    async fn respects_date_range() {
        let state = get_test_state();

        let response = transaction_summary_endpoint(
            State(state),
            Query(SummaryParams {
                from: Some("2025-03-02".to_owned()),
                to: None,
            }),
        )
        .await;

        let summary = response_summary(response).await;
        assert_eq!(
            summary,
            Summary {
                income: 5000.0,
                expense: 0.0,
                balance: 5000.0,
            }
        );
    }

    #[tokio::test]
    async fn rejects_malformed_date_params() {
        let state = get_test_state();

        let response = transaction_summary_endpoint(
            State(state),
            Query(SummaryParams {
                from: Some("last week".to_owned()),
                to: None,
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
