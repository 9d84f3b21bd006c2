//! Field-level validation for transaction API payloads.
//!
//! The API reports every invalid field in one response rather than rejecting
//! on the first problem, so the payload structs accept arbitrary JSON values
//! and the checks here turn them into typed data or a list of
//! [FieldError]s.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::{
    Date, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset,
    format_description::{BorrowedFormatItem, well_known::Rfc3339},
    macros::format_description,
};

use super::core::{TransactionBuilder, TransactionChanges, TransactionKind};

/// A validation problem with a single request field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    /// The name of the offending request field.
    pub field: String,
    /// A human-readable description of the problem.
    pub message: String,
}

impl FieldError {
    pub(crate) fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_owned(),
            message: message.into(),
        }
    }
}

/// The body of a 400 response listing every invalid request field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationErrors {
    /// One entry per invalid field.
    pub errors: Vec<FieldError>,
}

impl IntoResponse for ValidationErrors {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, Json(self)).into_response()
    }
}

/// The raw JSON body for creating or updating a transaction.
///
/// Every field is optional at this level; [validate_create] and
/// [validate_update] decide which fields are required.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct TransactionPayload {
    pub(crate) amount: Option<Value>,
    #[serde(rename = "type")]
    pub(crate) kind: Option<Value>,
    pub(crate) category: Option<Value>,
    pub(crate) date: Option<Value>,
    pub(crate) description: Option<Value>,
}

/// Validate a payload for transaction creation.
///
/// `amount`, `type`, and `category` are required; `date` and `description`
/// are optional. All problems are reported at once.
pub(crate) fn validate_create(
    payload: TransactionPayload,
) -> Result<TransactionBuilder, ValidationErrors> {
    let mut errors = Vec::new();

    let amount = match value_or_missing(&payload.amount) {
        Some(value) => check_amount(value, &mut errors),
        None => {
            errors.push(FieldError::new("amount", "amount is required"));
            None
        }
    };

    let kind = match value_or_missing(&payload.kind) {
        Some(value) => check_kind(value, &mut errors),
        None => {
            errors.push(FieldError::new("type", "type is required"));
            None
        }
    };

    let category = match value_or_missing(&payload.category) {
        Some(value) => check_category(value, &mut errors),
        None => {
            errors.push(FieldError::new("category", "category is required"));
            None
        }
    };

    let date = value_or_missing(&payload.date).and_then(|value| check_date(value, &mut errors));
    let description = value_or_missing(&payload.description)
        .and_then(|value| check_description(value, &mut errors));

    match (kind, amount, category) {
        (Some(kind), Some(amount), Some(category)) if errors.is_empty() => {
            Ok(TransactionBuilder {
                kind,
                amount,
                category,
                date,
                description: description.unwrap_or_default(),
            })
        }
        _ => Err(ValidationErrors { errors }),
    }
}

/// Validate a payload for a partial update.
///
/// Any subset of fields may be present; the fields that are present must pass
/// the same checks as on creation.
pub(crate) fn validate_update(
    payload: TransactionPayload,
) -> Result<TransactionChanges, ValidationErrors> {
    let mut errors = Vec::new();

    let changes = TransactionChanges {
        amount: value_or_missing(&payload.amount)
            .and_then(|value| check_amount(value, &mut errors)),
        kind: value_or_missing(&payload.kind).and_then(|value| check_kind(value, &mut errors)),
        category: value_or_missing(&payload.category)
            .and_then(|value| check_category(value, &mut errors)),
        date: value_or_missing(&payload.date).and_then(|value| check_date(value, &mut errors)),
        description: value_or_missing(&payload.description)
            .and_then(|value| check_description(value, &mut errors)),
    };

    if errors.is_empty() {
        Ok(changes)
    } else {
        Err(ValidationErrors { errors })
    }
}

/// Validate the optional `from`/`to` query parameters shared by the list and
/// summary routes.
pub(crate) fn validate_range_params(
    from: Option<&str>,
    to: Option<&str>,
) -> Result<(Option<OffsetDateTime>, Option<OffsetDateTime>), ValidationErrors> {
    let mut errors = Vec::new();

    let from = from.and_then(|value| {
        parse_date_param("from", value, DayBound::Start)
            .map_err(|error| errors.push(error))
            .ok()
    });
    let to = to.and_then(|value| {
        parse_date_param("to", value, DayBound::End)
            .map_err(|error| errors.push(error))
            .ok()
    });

    if errors.is_empty() {
        Ok((from, to))
    } else {
        Err(ValidationErrors { errors })
    }
}

/// Which end of the day a date-only bound should widen to.
pub(crate) enum DayBound {
    /// Widen `YYYY-MM-DD` to the start of that day.
    Start,
    /// Widen `YYYY-MM-DD` to the end of that day.
    End,
}

const DATE_ONLY_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

/// Parse a date parameter that may be either an RFC 3339 timestamp or a plain
/// `YYYY-MM-DD` date.
///
/// Date-only values widen to the start or end of the day depending on `bound`
/// so that `to=2025-03-06` includes the whole of March 6th. The result is
/// normalized to UTC.
pub(crate) fn parse_date_param(
    field: &str,
    value: &str,
    bound: DayBound,
) -> Result<OffsetDateTime, FieldError> {
    if let Ok(datetime) = OffsetDateTime::parse(value, &Rfc3339) {
        return Ok(datetime.to_offset(UtcOffset::UTC));
    }

    if let Ok(date) = Date::parse(value, DATE_ONLY_FORMAT) {
        let time = match bound {
            DayBound::Start => Time::MIDNIGHT,
            DayBound::End => Time::MAX,
        };
        return Ok(PrimitiveDateTime::new(date, time).assume_utc());
    }

    Err(FieldError::new(
        field,
        format!("{field} must be a valid ISO8601 date"),
    ))
}

/// Treat JSON `null` the same as an absent field.
fn value_or_missing(value: &Option<Value>) -> Option<&Value> {
    match value {
        Some(Value::Null) | None => None,
        Some(value) => Some(value),
    }
}

fn check_amount(value: &Value, errors: &mut Vec<FieldError>) -> Option<f64> {
    let Some(amount) = value.as_f64() else {
        errors.push(FieldError::new("amount", "amount must be a number"));
        return None;
    };

    if amount < 0.0 {
        errors.push(FieldError::new("amount", "amount must be non-negative"));
        return None;
    }

    Some(amount)
}

fn check_kind(value: &Value, errors: &mut Vec<FieldError>) -> Option<TransactionKind> {
    let kind = value.as_str().and_then(TransactionKind::parse);

    if kind.is_none() {
        errors.push(FieldError::new(
            "type",
            "type must be either 'income' or 'expense'",
        ));
    }

    kind
}

fn check_category(value: &Value, errors: &mut Vec<FieldError>) -> Option<String> {
    let Some(category) = value.as_str() else {
        errors.push(FieldError::new("category", "category must be a string"));
        return None;
    };

    if category.trim().is_empty() {
        errors.push(FieldError::new("category", "category must not be empty"));
        return None;
    }

    Some(category.to_owned())
}

fn check_date(value: &Value, errors: &mut Vec<FieldError>) -> Option<OffsetDateTime> {
    let Some(text) = value.as_str() else {
        errors.push(FieldError::new("date", "date must be a valid ISO8601 date"));
        return None;
    };

    parse_date_param("date", text, DayBound::Start)
        .map_err(|error| errors.push(error))
        .ok()
}

fn check_description(value: &Value, errors: &mut Vec<FieldError>) -> Option<String> {
    let Some(description) = value.as_str() else {
        errors.push(FieldError::new(
            "description",
            "description must be a string",
        ));
        return None;
    };

    Some(description.to_owned())
}
