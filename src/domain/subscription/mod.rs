//! Subscription domain module.
//!
//! Tracks what users pay for which services, and over which months.
//!
//! # Module Structure
//!
//! - `aggregate` - Subscription aggregate entity
//! - `period` - `MM-YYYY` billing period resolution
//! - `price` - Positive monthly price
//! - `errors` - SubscriptionError taxonomy
//! - `storage_signal` - Driver-independent storage outcome translation

mod aggregate;
mod errors;
mod period;
mod price;
mod storage_signal;

pub use aggregate::Subscription;
pub use errors::SubscriptionError;
pub use period::{
    resolve_optional_end, resolve_period, BillingPeriod, MonthPeriod, PeriodError,
    MONTH_YEAR_FORMAT,
};
pub use price::Price;
pub use storage_signal::{ensure_rows_affected, StorageSignal};
