//! Cookie argument parsing and cookie string assembly

use chrono::TimeDelta;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::error::ValidationError;
use crate::host::Clock;
use crate::keyword::{format_http_date, KeywordValue};
use crate::types::CookiePath;

pub const ONE_YEAR_KEYWORD: &str = "1year";
pub const ONE_DAY_KEYWORD: &str = "1day";

const MS_IN_SEC: i64 = 1000;
const SECONDS_IN_DAY: i64 = 24 * 60 * 60;
const SECONDS_IN_YEAR: i64 = 365 * SECONDS_IN_DAY;

const COOKIE_BREAKER: char = ';';

/// Characters `encodeURIComponent` leaves alone.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

// =============================================================================
// Argument Parsing
// =============================================================================

/// Convert an `offsetExpiresSec` argument to milliseconds.
///
/// `1year` is a fixed 365-day year. Digits are seconds. Anything else is
/// invalid and must abort the cookie write.
pub fn get_trusted_cookie_offset_ms(offset: &str) -> Option<i64> {
    let seconds = match offset {
        ONE_YEAR_KEYWORD => SECONDS_IN_YEAR,
        ONE_DAY_KEYWORD => SECONDS_IN_DAY,
        _ if !offset.is_empty() && offset.bytes().all(|b| b.is_ascii_digit()) => offset.parse().ok()?,
        _ => return None,
    };
    seconds.checked_mul(MS_IN_SEC)
}

pub fn is_valid_cookie_path(path: &str) -> bool {
    CookiePath::parse(path).is_some()
}

/// The `path` attribute for a raw path argument, without separators.
pub fn get_cookie_path(path: &str) -> &'static str {
    match CookiePath::parse(path) {
        Some(CookiePath::Root) => "path=/",
        _ => "",
    }
}

// =============================================================================
// Cookie Strings
// =============================================================================

/// Assemble `name=value;` plus the path attribute.
///
/// With `encode` the name and value are percent-encoded; without it a `;`
/// in either would split the cookie, so the cookie is rejected.
pub fn concat_cookie_name_value_path(name: &str, value: &str, path: CookiePath, encode: bool) -> Option<String> {
    let (name, value) = if encode {
        (
            utf8_percent_encode(name, URI_COMPONENT).to_string(),
            utf8_percent_encode(value, URI_COMPONENT).to_string(),
        )
    } else {
        if name.contains(COOKIE_BREAKER) || value.contains(COOKIE_BREAKER) {
            return None;
        }
        (name.to_string(), value.to_string())
    };

    let mut cookie = format!("{name}={value};");
    let path_attr = get_cookie_path(path.as_str());
    if !path_attr.is_empty() {
        cookie.push(' ');
        cookie.push_str(path_attr);
        cookie.push(COOKIE_BREAKER);
    }
    Some(cookie)
}

/// Whether a `document.cookie` string holds `name` with exactly `value`.
pub fn is_cookie_set_with_value(cookie_header: &str, name: &str, value: &str) -> bool {
    cookie_header.split(COOKIE_BREAKER).any(|pair| match pair.split_once('=') {
        Some((cookie_name, cookie_value)) => cookie_name.trim() == name && cookie_value.trim() == value,
        None => false,
    })
}

/// A validated cookie to be written by a trusted scriptlet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieSpec {
    pub name: String,
    pub value: KeywordValue,
    pub path: CookiePath,
    pub expires_offset_ms: Option<i64>,
}

impl CookieSpec {
    /// Validate raw scriptlet arguments. An empty offset means no `expires`.
    pub fn parse(name: &str, value: &str, offset_expires_sec: &str, path: &str) -> Result<Self, ValidationError> {
        let path = CookiePath::parse(path).ok_or_else(|| ValidationError::InvalidCookiePath(path.to_string()))?;

        let expires_offset_ms = if offset_expires_sec.is_empty() {
            None
        } else {
            match get_trusted_cookie_offset_ms(offset_expires_sec) {
                Some(ms) if ms > 0 => Some(ms),
                _ => return Err(ValidationError::InvalidOffset(offset_expires_sec.to_string())),
            }
        };

        Ok(Self {
            name: name.to_string(),
            value: KeywordValue::parse(value),
            path,
            expires_offset_ms,
        })
    }

    /// Render the string assigned to `document.cookie`.
    ///
    /// `None` when the expiry date falls outside the representable range.
    pub fn to_cookie_string(&self, clock: &dyn Clock) -> Option<String> {
        let expires = match self.expires_offset_ms {
            Some(offset_ms) => Some(
                TimeDelta::try_milliseconds(offset_ms).and_then(|offset| clock.now().checked_add_signed(offset))?,
            ),
            None => None,
        };

        let value = self.value.resolve(clock);
        let mut cookie = concat_cookie_name_value_path(&self.name, &value, self.path, true)?;
        if let Some(expires) = expires {
            cookie.push_str(&format!(" expires={};", format_http_date(expires)));
        }
        Some(cookie)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::FixedClock;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_offset_keywords() {
        assert_eq!(get_trusted_cookie_offset_ms("1year"), Some(365 * 24 * 60 * 60 * 1000));
        assert_eq!(get_trusted_cookie_offset_ms("1day"), Some(24 * 60 * 60 * 1000));
    }

    #[test]
    fn test_offset_seconds() {
        assert_eq!(get_trusted_cookie_offset_ms("259200"), Some(259_200_000));
        assert_eq!(get_trusted_cookie_offset_ms("0"), Some(0));
    }

    #[test]
    fn test_offset_invalid() {
        assert_eq!(get_trusted_cookie_offset_ms("abc"), None);
        assert_eq!(get_trusted_cookie_offset_ms(""), None);
        assert_eq!(get_trusted_cookie_offset_ms("-5"), None);
        assert_eq!(get_trusted_cookie_offset_ms("10s"), None);
        assert_eq!(get_trusted_cookie_offset_ms("2year"), None);
        assert_eq!(get_trusted_cookie_offset_ms("99999999999999999999"), None);
    }

    #[test]
    fn test_cookie_path_validation() {
        assert!(is_valid_cookie_path("/"));
        assert!(is_valid_cookie_path("none"));
        assert!(!is_valid_cookie_path("/foo"));
        assert_eq!(get_cookie_path("/"), "path=/");
        assert_eq!(get_cookie_path("none"), "");
    }

    #[test]
    fn test_concat_with_and_without_path() {
        let with_path = concat_cookie_name_value_path("consent", "yes", CookiePath::Root, true).unwrap();
        assert_eq!(with_path, "consent=yes; path=/;");

        let no_path = concat_cookie_name_value_path("consent", "yes", CookiePath::NoPath, true).unwrap();
        assert_eq!(no_path, "consent=yes;");
        assert!(!no_path.contains("path="));
    }

    #[test]
    fn test_concat_encoding() {
        let cookie = concat_cookie_name_value_path("prefs", "{\"a\":1; b}", CookiePath::NoPath, true).unwrap();
        assert_eq!(cookie, "prefs=%7B%22a%22%3A1%3B%20b%7D;");
        assert_eq!(concat_cookie_name_value_path("prefs", "a;b", CookiePath::Root, false), None);
    }

    #[test]
    fn test_is_cookie_set_with_value() {
        let header = "theme=dark; consent=accept";
        assert!(is_cookie_set_with_value(header, "consent", "accept"));
        assert!(!is_cookie_set_with_value(header, "consent", "decline"));
        assert!(!is_cookie_set_with_value("", "consent", "accept"));
    }

    #[test]
    fn test_cookie_spec_round_trip_path() {
        let clock = FixedClock(Utc.with_ymd_and_hms(2022, 11, 8, 10, 53, 19).unwrap());

        let spec = CookieSpec::parse("cmp", "accept", "", "none").unwrap();
        let cookie = spec.to_cookie_string(&clock).unwrap();
        assert!(!cookie.contains("path="));

        let spec = CookieSpec::parse("cmp", "accept", "", "/").unwrap();
        let cookie = spec.to_cookie_string(&clock).unwrap();
        assert!(cookie.contains("path=/;"));
    }

    #[test]
    fn test_cookie_spec_expires() {
        let clock = FixedClock(Utc.with_ymd_and_hms(2022, 11, 8, 10, 53, 19).unwrap());
        let spec = CookieSpec::parse("cmp", "$now$", "1day", "/").unwrap();
        assert_eq!(
            spec.to_cookie_string(&clock).unwrap(),
            "cmp=1667904799000; path=/; expires=Wed, 09 Nov 2022 10:53:19 GMT;"
        );
    }

    #[test]
    fn test_cookie_spec_expiry_out_of_range() {
        let clock = FixedClock(Utc.with_ymd_and_hms(2022, 11, 8, 10, 53, 19).unwrap());
        let spec = CookieSpec::parse("cmp", "accept", "9000000000000000", "/").unwrap();
        assert_eq!(spec.expires_offset_ms, Some(9_000_000_000_000_000_000));
        assert_eq!(spec.to_cookie_string(&clock), None);
    }

    #[test]
    fn test_cookie_spec_rejects_bad_args() {
        assert_eq!(
            CookieSpec::parse("cmp", "1", "", "/foo"),
            Err(ValidationError::InvalidCookiePath("/foo".to_string()))
        );
        assert_eq!(
            CookieSpec::parse("cmp", "1", "soon", "/"),
            Err(ValidationError::InvalidOffset("soon".to_string()))
        );
        assert_eq!(
            CookieSpec::parse("cmp", "1", "0", "/"),
            Err(ValidationError::InvalidOffset("0".to_string()))
        );
    }
}
