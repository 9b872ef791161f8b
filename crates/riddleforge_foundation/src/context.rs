//! Day-variant identification.
//!
//! A [`DayContext`] names one distinct source document: a calendar day, a
//! locale, and a difficulty mode. Identifier tokens are scoped to it.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The (day, locale, mode) tuple identifying one source document.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DayContext {
    /// Calendar day number (1-based).
    pub day: u32,
    /// Locale tag (e.g. `de`, `en`).
    pub locale: String,
    /// Difficulty mode (e.g. `default`, `kids`).
    pub mode: String,
}

impl DayContext {
    /// Creates a new day context.
    #[must_use]
    pub fn new(day: u32, locale: impl Into<String>, mode: impl Into<String>) -> Self {
        Self {
            day,
            locale: locale.into(),
            mode: mode.into(),
        }
    }

    /// Returns the scope key identifier tokens are derived under.
    ///
    /// Two contexts produce the same tokens exactly when their scope keys
    /// are equal.
    #[must_use]
    pub fn scope_key(&self) -> String {
        format!("{}:{}:{}", self.day, self.locale, self.mode)
    }
}

impl fmt::Display for DayContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "day-{:02}/{}/{}", self.day, self.locale, self.mode)
    }
}
