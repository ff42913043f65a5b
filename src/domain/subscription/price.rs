//! Monthly price value object, in whole currency units.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

/// A strictly positive monthly price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(i32);

impl Price {
    /// Creates a Price, returning error unless `1 <= value <= i32::MAX`.
    pub fn try_new(value: i64) -> Result<Self, ValidationError> {
        match i32::try_from(value) {
            Ok(amount) if amount >= 1 => Ok(Self(amount)),
            _ => Err(ValidationError::out_of_range(
                "price",
                1,
                i64::from(i32::MAX),
                value,
            )),
        }
    }

    /// Returns the value as i32.
    pub fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
