//! Defines the route handler for the dashboard page.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    database_id::TransactionId,
    endpoints,
    transaction::{
        CategoryMatch, DayBound, Transaction, TransactionFilter, TransactionKind,
        count_transactions, get_transaction, get_transactions, parse_date_param,
    },
};

use super::view::dashboard_view;

/// The state needed to display the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query parameters accepted by the dashboard page.
///
/// Unlike the API, the dashboard quietly ignores filter values it cannot
/// parse so that a hand-edited URL never breaks the page.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub(crate) struct DashboardQuery {
    /// Only show transactions of this kind.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub(crate) kind: Option<String>,
    /// Only show transactions whose category contains this text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) category: Option<String>,
    /// Only show transactions dated on or after this date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) from: Option<String>,
    /// Only show transactions dated on or before this date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) to: Option<String>,
    /// The ID of the transaction being edited, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) edit: Option<TransactionId>,
}

impl DashboardQuery {
    /// The URL that reopens the dashboard with the same filters and the edit
    /// form for `transaction_id`.
    pub(crate) fn edit_url(&self, transaction_id: TransactionId) -> String {
        let query = DashboardQuery {
            edit: Some(transaction_id),
            ..self.clone()
        };

        match serde_urlencoded::to_string(&query) {
            Ok(query_string) => format!("{}?{}", endpoints::ROOT, query_string),
            Err(_) => format!("{}?edit={}", endpoints::ROOT, transaction_id),
        }
    }
}

/// The income and expense totals for the filtered transactions.
#[derive(Debug, Default, PartialEq)]
pub(crate) struct DashboardTotals {
    pub(crate) income: f64,
    pub(crate) expense: f64,
}

impl DashboardTotals {
    pub(crate) fn balance(&self) -> f64 {
        self.income - self.expense
    }
}

/// A transaction prepared for the dashboard table.
#[derive(Debug, PartialEq)]
pub(crate) struct TransactionRow {
    pub(crate) transaction: Transaction,
    /// The URL that opens the edit form for this transaction.
    pub(crate) edit_url: String,
    /// The API path to delete this transaction.
    pub(crate) delete_url: String,
}

/// Everything the dashboard view needs to render.
pub(crate) struct DashboardViewModel {
    pub(crate) rows: Vec<TransactionRow>,
    pub(crate) totals: DashboardTotals,
    pub(crate) filters: DashboardQuery,
    pub(crate) editing: Option<Transaction>,
    pub(crate) has_any_transactions: bool,
}

/// A route handler that renders the dashboard page: filters, totals, the
/// transaction table, and the create/edit form.
pub(crate) async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Query(params): Query<DashboardQuery>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    let filter = build_filter(&params);

    let transactions = match get_transactions(&filter, &connection) {
        Ok(transactions) => transactions,
        Err(error) => return error.into_response(),
    };

    let has_any_transactions = match count_transactions(&connection) {
        Ok(count) => count > 0,
        Err(error) => return error.into_response(),
    };

    // A stale edit ID (e.g. the row was deleted in another tab) falls back to
    // the create form.
    let editing = params
        .edit
        .and_then(|id| get_transaction(id, &connection).ok());

    drop(connection);

    let totals = compute_totals(&transactions);
    let rows = transactions
        .into_iter()
        .map(|transaction| {
            let edit_url = params.edit_url(transaction.id);
            let delete_url =
                endpoints::format_endpoint(endpoints::TRANSACTION_FORM, transaction.id);

            TransactionRow {
                transaction,
                edit_url,
                delete_url,
            }
        })
        .collect();

    let model = DashboardViewModel {
        rows,
        totals,
        filters: params,
        editing,
        has_any_transactions,
    };

    (StatusCode::OK, dashboard_view(&model)).into_response()
}

fn build_filter(params: &DashboardQuery) -> TransactionFilter {
    let kind = params
        .kind
        .as_deref()
        .and_then(TransactionKind::parse);

    let from = params
        .from
        .as_deref()
        .and_then(|value| parse_date_param("from", value, DayBound::Start).ok());
    let to = params
        .to
        .as_deref()
        .and_then(|value| parse_date_param("to", value, DayBound::End).ok());

    let category = params
        .category
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(|text| CategoryMatch::Contains(text.to_owned()));

    TransactionFilter {
        kind,
        from,
        to,
        category,
    }
}

fn compute_totals(transactions: &[Transaction]) -> DashboardTotals {
    let mut totals = DashboardTotals::default();

    for transaction in transactions {
        match transaction.kind {
            TransactionKind::Income => totals.income += transaction.amount,
            TransactionKind::Expense => totals.expense += transaction.amount,
        }
    }

    totals
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

    use super::{
        DashboardQuery, DashboardState, build_filter, compute_totals, get_dashboard_page,
    };

    fn get_test_state() -> DashboardState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        create_transaction(
            Transaction::build(TransactionKind::Income, 5000.0, "Salary")
                .date(datetime!(2025-03-07 0:00 UTC))
                .description("Monthly salary credited"),
            &conn,
        )
        .unwrap();
        create_transaction(
            Transaction::build(TransactionKind::Expense, 1500.0, "Rent")
                .date(datetime!(2025-03-01 0:00 UTC))
                .description("Monthly house rent payment"),
            &conn,
        )
        .unwrap();

        DashboardState {
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    async fn response_text(response: axum::response::Response) -> String {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(body.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn renders_transactions_and_totals() {
        let state = get_test_state();

        let response = get_dashboard_page(State(state), Query(DashboardQuery::default())).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = response_text(response).await;
        assert!(body.contains("Salary"), "table should list the salary row");
        assert!(body.contains("Rent"), "table should list the rent row");
        assert!(body.contains("$5,000.00"), "income total should render");
        assert!(body.contains("$3,500.00"), "balance should render");
    }

    #[tokio::test]
    async fn filters_rows_by_category_substring() {
        let state = get_test_state();

        let response = get_dashboard_page(
            State(state),
            Query(DashboardQuery {
                category: Some("sal".to_owned().to_uppercase()),
                ..Default::default()
            }),
        )
        .await;

        // SQLite LIKE is case-insensitive for ASCII.
        let body = response_text(response).await;
        assert!(body.contains("Salary"));
        assert!(!body.contains("Monthly house rent payment"));
    }

    #[tokio::test]
    async fn invalid_filter_values_are_ignored() {
        let state = get_test_state();

        let response = get_dashboard_page(
            State(state),
            Query(DashboardQuery {
                kind: Some("transfer".to_owned()),
                from: Some("not a date".to_owned()),
                ..Default::default()
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = response_text(response).await;
        assert!(body.contains("Salary"));
        assert!(body.contains("Rent"));
    }

    #[tokio::test]
    async fn stale_edit_id_falls_back_to_create_form() {
        let state = get_test_state();

        let response = get_dashboard_page(
            State(state),
            Query(DashboardQuery {
                edit: Some(999),
                ..Default::default()
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = response_text(response).await;
        assert!(body.contains("New transaction"));
    }

    #[test]
    fn totals_split_by_kind() {
        let transactions = vec![
            Transaction {
                id: 1,
                kind: TransactionKind::Income,
                amount: 100.0,
                category: "A".to_owned(),
                date: datetime!(2025-03-01 0:00 UTC),
                description: String::new(),
            },
            Transaction {
                id: 2,
                kind: TransactionKind::Expense,
                amount: 40.0,
                category: "B".to_owned(),
                date: datetime!(2025-03-02 0:00 UTC),
                description: String::new(),
            },
        ];

        let totals = compute_totals(&transactions);

        assert_eq!(totals.income, 100.0);
        assert_eq!(totals.expense, 40.0);
        assert_eq!(totals.balance(), 60.0);
    }

    #[test]
    fn blank_filter_values_do_not_constrain() {
        let filter = build_filter(&DashboardQuery {
            kind: Some(String::new()),
            category: Some("  ".to_owned()),
            ..Default::default()
        });

        assert_eq!(filter, crate::transaction::TransactionFilter::default());
    }

    #[test]
    fn edit_url_preserves_filters() {
        let params = DashboardQuery {
            kind: Some("income".to_owned()),
            ..Default::default()
        };

        let url = params.edit_url(7);

        assert!(url.starts_with("/?"));
        assert!(url.contains("type=income"));
        assert!(url.contains("edit=7"));
    }
}
