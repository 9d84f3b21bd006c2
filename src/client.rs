//! A typed HTTP client for the transaction API.
//!
//! [ApiClient] mirrors the six API routes one-to-one so that scripts and
//! other services can talk to a running server without hand-writing requests.
//! It shares the route constants and serde models with the server.

use std::time::Duration;

use reqwest::{StatusCode, blocking::Client, blocking::Response};
use serde::Serialize;
use time::OffsetDateTime;

use crate::{
    database_id::TransactionId,
    endpoints,
    transaction::{FieldError, Summary, Transaction, TransactionKind, ValidationErrors},
};

/// The errors that may occur when calling the API.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request never produced a response, e.g. the server is down.
    #[error("could not reach the server: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server rejected the request, reporting the listed field problems.
    #[error("the server rejected the request: {0:?}")]
    Validation(Vec<FieldError>),

    /// The requested transaction does not exist.
    #[error("the requested transaction could not be found")]
    NotFound,

    /// The server returned a status the client does not know how to handle.
    #[error("the server returned an unexpected status: {0}")]
    UnexpectedStatus(StatusCode),
}

/// The request body for [ApiClient::create].
#[derive(Debug, Clone, Serialize)]
pub struct NewTransaction {
    /// Whether the transaction is income or an expense.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// The amount of money earned or spent. Must be non-negative.
    pub amount: f64,
    /// A free-text label grouping related transactions.
    pub category: String,
    /// When the transaction happened. Defaults to the creation time.
    #[serde(with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none")]
    pub date: Option<OffsetDateTime>,
    /// A text description of what the transaction was for.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The request body for [ApiClient::update].
///
/// Fields left as `None` keep their stored value.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TransactionUpdate {
    /// Replace the transaction kind.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<TransactionKind>,
    /// Replace the amount. Must be non-negative.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    /// Replace the category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Replace the date.
    #[serde(with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none")]
    pub date: Option<OffsetDateTime>,
    /// Replace the description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The filters for [ApiClient::list].
///
/// Dates are passed through as ISO 8601 strings, exactly as the query
/// parameters accept them.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    /// Only return transactions of this kind.
    pub kind: Option<TransactionKind>,
    /// Only return transactions dated on or after this date.
    pub from: Option<String>,
    /// Only return transactions dated on or before this date.
    pub to: Option<String>,
    /// Only return transactions with exactly this category.
    pub category: Option<String>,
}

impl ListQuery {
    fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        if let Some(kind) = self.kind {
            pairs.push(("type", kind.as_str().to_owned()));
        }
        if let Some(from) = &self.from {
            pairs.push(("from", from.clone()));
        }
        if let Some(to) = &self.to {
            pairs.push(("to", to.clone()));
        }
        if let Some(category) = &self.category {
            pairs.push(("category", category.clone()));
        }

        pairs
    }
}

/// A blocking HTTP client for the transaction API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: Client,
}

impl ApiClient {
    /// Create a client that talks to the server at `base_url`,
    /// e.g. `http://localhost:3000`.
    ///
    /// # Errors
    /// Returns a [ClientError::Transport] if the underlying HTTP client
    /// cannot be constructed.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            http,
        })
    }

    /// List the transactions matching `query`.
    pub fn list(&self, query: &ListQuery) -> Result<Vec<Transaction>, ClientError> {
        let response = self
            .http
            .get(self.url(endpoints::TRANSACTIONS_API))
            .query(&query.to_pairs())
            .send()?;

        Ok(check_status(response)?.json()?)
    }

    /// Fetch a single transaction by its ID.
    pub fn get(&self, id: TransactionId) -> Result<Transaction, ClientError> {
        let response = self
            .http
            .get(self.url(&endpoints::format_endpoint(endpoints::TRANSACTION_API, id)))
            .send()?;

        Ok(check_status(response)?.json()?)
    }

    /// Fetch the income/expense/balance summary over an optional date range.
    ///
    /// `from` and `to` are ISO 8601 dates, e.g. `2025-03-01`.
    pub fn summary(
        &self,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<Summary, ClientError> {
        let mut pairs = Vec::new();
        if let Some(from) = from {
            pairs.push(("from", from));
        }
        if let Some(to) = to {
            pairs.push(("to", to));
        }

        let response = self
            .http
            .get(self.url(endpoints::TRANSACTION_SUMMARY_API))
            .query(&pairs)
            .send()?;

        Ok(check_status(response)?.json()?)
    }

    /// Create a new transaction and return the stored record.
    pub fn create(&self, new_transaction: &NewTransaction) -> Result<Transaction, ClientError> {
        let response = self
            .http
            .post(self.url(endpoints::TRANSACTIONS_API))
            .json(new_transaction)
            .send()?;

        Ok(check_status(response)?.json()?)
    }

    /// Apply a partial update to a transaction and return the updated record.
    pub fn update(
        &self,
        id: TransactionId,
        update: &TransactionUpdate,
    ) -> Result<Transaction, ClientError> {
        let response = self
            .http
            .put(self.url(&endpoints::format_endpoint(endpoints::TRANSACTION_API, id)))
            .json(update)
            .send()?;

        Ok(check_status(response)?.json()?)
    }

    /// Delete a transaction.
    pub fn delete(&self, id: TransactionId) -> Result<(), ClientError> {
        let response = self
            .http
            .delete(self.url(&endpoints::format_endpoint(endpoints::TRANSACTION_API, id)))
            .send()?;

        check_status(response)?;

        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Turn error statuses into [ClientError]s, decoding field errors from 400
/// responses.
fn check_status(response: Response) -> Result<Response, ClientError> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    match status {
        StatusCode::BAD_REQUEST => {
            let body: ValidationErrors = response.json()?;
            Err(ClientError::Validation(body.errors))
        }
        StatusCode::NOT_FOUND => Err(ClientError::NotFound),
        status => Err(ClientError::UnexpectedStatus(status)),
    }
}
