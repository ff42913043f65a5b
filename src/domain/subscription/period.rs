//! Month-granularity billing periods.
//!
//! Clients describe periods as `MM-YYYY`. A month resolves to the closed
//! calendar interval from its first to its last day. Month lengths and
//! leap years come from calendar arithmetic: the last day is one day before
//! the first day of the following month.
//!
//! Dates are `NaiveDate` (calendar dates with no time-zone component), so a
//! month boundary never drifts with the server's local offset.

use chrono::{Datelike, Months, NaiveDate};
use thiserror::Error;

use super::SubscriptionError;

/// The only accepted period shape.
pub const MONTH_YEAR_FORMAT: &str = "MM-YYYY";

/// Input did not match `MM-YYYY`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{value}' is not a valid period, expected {MONTH_YEAR_FORMAT}")]
pub struct PeriodError {
    value: String,
}

impl PeriodError {
    fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// The rejected input.
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// First and last calendar day of one month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthPeriod {
    start: NaiveDate,
    end: NaiveDate,
}

impl MonthPeriod {
    /// The month containing `date`.
    ///
    /// Returns `None` only at the edge of chrono's representable range.
    pub fn containing(date: NaiveDate) -> Option<Self> {
        Self::for_month(date.year(), date.month())
    }

    fn for_month(year: i32, month: u32) -> Option<Self> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)?;
        let end = start.checked_add_months(Months::new(1))?.pred_opt()?;
        Some(Self { start, end })
    }

    /// First day of the month.
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the month.
    pub fn end(&self) -> NaiveDate {
        self.end
    }
}

/// Resolves `MM-YYYY` into its calendar month.
///
/// # Errors
///
/// `PeriodError` for anything that is not exactly two month digits
/// (01-12), a hyphen and four year digits.
pub fn resolve_period(month_year: &str) -> Result<MonthPeriod, PeriodError> {
    let (month, year) = parse_month_year(month_year).ok_or_else(|| PeriodError::new(month_year))?;
    MonthPeriod::for_month(year, month).ok_or_else(|| PeriodError::new(month_year))
}

/// Resolves the end of a billing period.
///
/// Without an explicit end the period closes on the last day of the month
/// that contains `month_start`. An explicit end is resolved on its own and
/// is not compared against the start.
pub fn resolve_optional_end(
    month_year: Option<&str>,
    month_start: NaiveDate,
) -> Result<NaiveDate, PeriodError> {
    match month_year {
        Some(raw) => resolve_period(raw).map(|period| period.end()),
        None => MonthPeriod::containing(month_start)
            .map(|period| period.end())
            .ok_or_else(|| PeriodError::new(month_start.format("%m-%Y").to_string())),
    }
}

fn parse_month_year(input: &str) -> Option<(u32, i32)> {
    let bytes = input.as_bytes();
    if bytes.len() != MONTH_YEAR_FORMAT.len() || bytes[2] != b'-' {
        return None;
    }
    if !bytes[..2].iter().chain(&bytes[3..]).all(u8::is_ascii_digit) {
        return None;
    }

    let month: u32 = input[..2].parse().ok()?;
    let year: i32 = input[3..].parse().ok()?;
    (1..=12).contains(&month).then_some((month, year))
}

/// The `[start_date, end_date]` span a subscription is billed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BillingPeriod {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl BillingPeriod {
    /// Resolves the raw `start_date`/`end_date` strings of a create or
    /// update request.
    ///
    /// # Errors
    ///
    /// `SubscriptionError::InvalidPeriodFormat` naming whichever field failed.
    pub fn resolve(start: &str, end: Option<&str>) -> Result<Self, SubscriptionError> {
        let start_period =
            resolve_period(start).map_err(|e| SubscriptionError::invalid_period("start_date", e))?;
        let end_date = resolve_optional_end(end, start_period.start())
            .map_err(|e| SubscriptionError::invalid_period("end_date", e))?;

        Ok(Self {
            start_date: start_period.start(),
            end_date,
        })
    }
}
