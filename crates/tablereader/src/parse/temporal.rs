//! Strict date, datetime and time parsing against a fixed format.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::ValueError;

// ============================================================================
// Formats
// ============================================================================

/// A strptime-style pattern plus the label reported in logs and errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TemporalFormat {
    pub pattern: &'static str,
    pub label: &'static str,
}

impl TemporalFormat {
    pub const fn new(pattern: &'static str, label: &'static str) -> Self {
        Self { pattern, label }
    }

    /// `%Y` must consume a full four-digit year.
    fn requires_long_year(&self) -> bool {
        self.pattern.contains("%Y")
    }
}

/// How a format spells the month, when it uses a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MonthName {
    Abbreviated,
    Full,
}

impl MonthName {
    fn of(format: &TemporalFormat) -> Option<Self> {
        if format.pattern.contains("%b") {
            Some(MonthName::Abbreviated)
        } else if format.pattern.contains("%B") {
            Some(MonthName::Full)
        } else {
            None
        }
    }

    /// chrono reads either spelling for both `%b` and `%B`.
    fn accepts(self, word: &str) -> bool {
        match self {
            MonthName::Abbreviated => word.len() == 3,
            MonthName::Full => word.len() > 3 || word.eq_ignore_ascii_case("may"),
        }
    }
}

impl fmt::Display for TemporalFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label, self.pattern)
    }
}

static LONG_YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?:^|\D)\d{4}(?:\D|$)").unwrap());
static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[[:alpha:]]+").unwrap());

/// Constraints the format implies that chrono does not enforce when parsing.
fn check_shape(value: &str, format: &TemporalFormat) -> Result<(), ValueError> {
    if format.requires_long_year() && !LONG_YEAR.is_match(value) {
        return Err(mismatch(value, format));
    }
    if let Some(month) = MonthName::of(format) {
        let spelled = WORD.find(value).is_some_and(|word| month.accepts(word.as_str()));
        if !spelled {
            return Err(mismatch(value, format));
        }
    }
    Ok(())
}

fn mismatch(value: &str, format: &TemporalFormat) -> ValueError {
    ValueError::FormatMismatch {
        value: value.to_string(),
        format: format.label.to_string(),
    }
}

// ============================================================================
// Parsers
// ============================================================================

/// Parse a cleaned value as a calendar date.
pub fn parse_date(value: &str, format: &TemporalFormat) -> Result<NaiveDate, ValueError> {
    check_shape(value, format)?;
    NaiveDate::parse_from_str(value, format.pattern).map_err(|_| mismatch(value, format))
}

/// Parse a cleaned value as a date with time of day.
pub fn parse_datetime(value: &str, format: &TemporalFormat) -> Result<NaiveDateTime, ValueError> {
    check_shape(value, format)?;
    NaiveDateTime::parse_from_str(value, format.pattern).map_err(|_| mismatch(value, format))
}

/// Parse a cleaned value as a time of day.
pub fn parse_time(value: &str, format: &TemporalFormat) -> Result<NaiveTime, ValueError> {
    NaiveTime::parse_from_str(value, format.pattern).map_err(|_| mismatch(value, format))
}
