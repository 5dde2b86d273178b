//! Value keywords for the trusted cookie/storage scriptlets

use chrono::{DateTime, Utc};

use crate::host::Clock;

pub const NOW_KEYWORD: &str = "$now$";
pub const CURRENT_DATE_KEYWORD: &str = "$currentDate$";

/// A value argument, resolved lazily at write time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeywordValue {
    /// `$now$` - epoch milliseconds
    Now,
    /// `$currentDate$` - the current instant as an HTTP date
    CurrentDate,
    Literal(String),
}

impl KeywordValue {
    pub fn parse(value: &str) -> Self {
        match value {
            NOW_KEYWORD => Self::Now,
            CURRENT_DATE_KEYWORD => Self::CurrentDate,
            _ => Self::Literal(value.to_string()),
        }
    }

    pub fn resolve(&self, clock: &dyn Clock) -> String {
        match self {
            Self::Now => clock.now_ms().to_string(),
            Self::CurrentDate => format_http_date(clock.now()),
            Self::Literal(value) => value.clone(),
        }
    }
}

/// Resolve `$now$` / `$currentDate$`; anything else passes through.
pub fn parse_keyword_value(value: &str, clock: &dyn Clock) -> String {
    KeywordValue::parse(value).resolve(clock)
}

/// RFC 1123 rendering, e.g. `Tue, 08 Nov 2022 10:53:19 GMT`.
pub fn format_http_date(time: DateTime<Utc>) -> String {
    time.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}
