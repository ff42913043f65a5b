//! Request Validator - Turns raw HTTP payloads into typed commands and queries.
//!
//! Stateless: construct one and clone it wherever requests are handled.
//! Every problem with a request is collected, so a client sees all of its
//! field errors at once.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::adapters::http::subscription::{
    CreateSubscriptionRequest, ListSubscriptionsParams, SummaryParams, UpdateSubscriptionRequest,
    DATE_FORMAT,
};
use crate::application::handlers::subscription::{
    CreateSubscriptionCommand, SummarizeSpendQuery, UpdateSubscriptionCommand,
};
use crate::domain::foundation::{SubscriptionId, UserId, ValidationError};
use crate::domain::subscription::Price;
use crate::ports::{DateWindow, PageRequest};

/// Page size when the client does not send `limit`.
pub const DEFAULT_LIST_LIMIT: i64 = 100;

/// Field name to message, ordered by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<String, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `err` under its field. The first error per field wins.
    pub fn push(&mut self, err: ValidationError) {
        self.fields
            .entry(err.field().to_string())
            .or_insert_with(|| err.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    pub fn into_fields(self) -> BTreeMap<String, String> {
        self.fields
    }
}

impl FromIterator<ValidationError> for ValidationErrors {
    fn from_iter<I: IntoIterator<Item = ValidationError>>(iter: I) -> Self {
        let mut errors = Self::new();
        for err in iter {
            errors.push(err);
        }
        errors
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(err: ValidationError) -> Self {
        let mut errors = Self::new();
        errors.push(err);
        errors
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<&str> = self.fields.values().map(String::as_str).collect();
        write!(f, "validation failed: {}", joined.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Validates subscription requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestValidator;

impl RequestValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validates a create body.
    ///
    /// `start_date`/`end_date` are only checked for presence here; their
    /// `MM-YYYY` shape is enforced by period resolution.
    pub fn validate_create(
        &self,
        req: CreateSubscriptionRequest,
    ) -> Result<CreateSubscriptionCommand, ValidationErrors> {
        let user_id = non_blank(req.user_id.as_deref(), "user_id")
            .and_then(|raw| parse_uuid(raw, "user_id"))
            .map(UserId::from_uuid);
        let service = non_blank(req.service.as_deref(), "service").map(str::to_string);
        let price = required_price(req.price);
        let start_date = non_blank(req.start_date.as_deref(), "start_date").map(str::to_string);
        let end_date = optional_non_blank(req.end_date, "end_date");

        match (user_id, service, price, start_date, end_date) {
            (Ok(user_id), Ok(service), Ok(price), Ok(start_date), Ok(end_date)) => {
                Ok(CreateSubscriptionCommand {
                    user_id,
                    service,
                    price,
                    start_date,
                    end_date,
                })
            }
            (user_id, service, price, start_date, end_date) => Err([
                user_id.err(),
                service.err(),
                price.err(),
                start_date.err(),
                end_date.err(),
            ]
            .into_iter()
            .flatten()
            .collect()),
        }
    }

    /// Validates a path id together with an update body.
    pub fn validate_update(
        &self,
        raw_id: &str,
        req: UpdateSubscriptionRequest,
    ) -> Result<UpdateSubscriptionCommand, ValidationErrors> {
        let id = parse_uuid(raw_id, "id").map(SubscriptionId::from_uuid);
        let service = non_blank(req.service.as_deref(), "service").map(str::to_string);
        let price = required_price(req.price);
        let start_date = non_blank(req.start_date.as_deref(), "start_date").map(str::to_string);
        let end_date = optional_non_blank(req.end_date, "end_date");

        match (id, service, price, start_date, end_date) {
            (Ok(id), Ok(service), Ok(price), Ok(start_date), Ok(end_date)) => {
                Ok(UpdateSubscriptionCommand {
                    id,
                    service,
                    price,
                    start_date,
                    end_date,
                })
            }
            (id, service, price, start_date, end_date) => Err([
                id.err(),
                service.err(),
                price.err(),
                start_date.err(),
                end_date.err(),
            ]
            .into_iter()
            .flatten()
            .collect()),
        }
    }

    /// Parses a subscription id from a path segment.
    pub fn validate_id(&self, raw_id: &str) -> Result<SubscriptionId, ValidationErrors> {
        parse_uuid(raw_id, "id")
            .map(SubscriptionId::from_uuid)
            .map_err(ValidationErrors::from)
    }

    /// Parses paging parameters.
    ///
    /// `limit` defaults to [`DEFAULT_LIST_LIMIT`] and must be positive;
    /// `offset` defaults to zero and must not be negative.
    pub fn validate_page(
        &self,
        params: &ListSubscriptionsParams,
    ) -> Result<PageRequest, ValidationErrors> {
        let limit = match params.limit.as_deref() {
            None => Ok(DEFAULT_LIST_LIMIT),
            Some(raw) => parse_integer(raw, "limit").and_then(|limit| {
                if limit > 0 {
                    Ok(limit)
                } else {
                    Err(ValidationError::out_of_range("limit", 1, i64::MAX, limit))
                }
            }),
        };
        let offset = match params.offset.as_deref() {
            None => Ok(0),
            Some(raw) => parse_integer(raw, "offset").and_then(|offset| {
                if offset >= 0 {
                    Ok(offset)
                } else {
                    Err(ValidationError::out_of_range("offset", 0, i64::MAX, offset))
                }
            }),
        };

        match (limit, offset) {
            (Ok(limit), Ok(offset)) => Ok(PageRequest::new(limit, offset)),
            (limit, offset) => Err([limit.err(), offset.err()].into_iter().flatten().collect()),
        }
    }

    /// Parses spend-summary parameters.
    ///
    /// The window must satisfy `end_date >= start_date`. An empty `service`
    /// or `user_id` counts as absent.
    pub fn validate_summary(
        &self,
        params: SummaryParams,
    ) -> Result<SummarizeSpendQuery, ValidationErrors> {
        let user_id = match params.user_id.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => parse_uuid(raw, "user_id").map(|uuid| Some(UserId::from_uuid(uuid))),
        };
        let start = non_blank(params.start_date.as_deref(), "start_date")
            .and_then(|raw| parse_date(raw, "start_date"));
        let end = non_blank(params.end_date.as_deref(), "end_date")
            .and_then(|raw| parse_date(raw, "end_date"));
        let service = params.service.filter(|s| !s.trim().is_empty());

        match (user_id, start, end) {
            (Ok(_), Ok(start), Ok(end)) if end < start => Err(ValidationError::invalid_format(
                "end_date",
                "must not be before start_date",
            )
            .into()),
            (Ok(user_id), Ok(start), Ok(end)) => Ok(SummarizeSpendQuery {
                window: DateWindow { start, end },
                user_id,
                service,
            }),
            (user_id, start, end) => {
                Err([user_id.err(), start.err(), end.err()].into_iter().flatten().collect())
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Field parsers
// ════════════════════════════════════════════════════════════════════════════

/// Presence check. The value is returned as sent, untrimmed.
fn non_blank<'a>(raw: Option<&'a str>, field: &str) -> Result<&'a str, ValidationError> {
    match raw {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ValidationError::empty_field(field)),
    }
}

fn optional_non_blank(raw: Option<String>, field: &str) -> Result<Option<String>, ValidationError> {
    match raw {
        None => Ok(None),
        Some(value) => non_blank(Some(&value), field).map(|v| Some(v.to_string())),
    }
}

fn required_price(raw: Option<i64>) -> Result<Price, ValidationError> {
    match raw {
        None => Err(ValidationError::empty_field("price")),
        Some(value) => Price::try_new(value),
    }
}

fn parse_uuid(raw: &str, field: &str) -> Result<Uuid, ValidationError> {
    Uuid::parse_str(raw.trim()).map_err(|_| ValidationError::invalid_format(field, "must be a UUID"))
}

fn parse_integer(raw: &str, field: &str) -> Result<i64, ValidationError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ValidationError::invalid_format(field, "must be an integer"))
}

fn parse_date(raw: &str, field: &str) -> Result<NaiveDate, ValidationError> {
    let invalid = || ValidationError::invalid_format(field, "must be a date in YYYY-MM-DD format");
    if !is_padded_date(raw) {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| invalid())
}

/// `%Y-%m-%d` alone also accepts unpadded months and days.
fn is_padded_date(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}
