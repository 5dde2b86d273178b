//! Match-argument parsing
//!
//! Rule authors hand scriptlets their matchers as plain strings:
//!
//! - `""` or `"*"` matches anything
//! - `/pattern/flags` is a regular expression
//! - anything else is a literal, case-sensitive substring
//!
//! A leading `!` inverts the match. The delay arguments of the timer
//! scriptlets follow the same `!` convention around a base-10 integer.

use fancy_regex::Regex;

use crate::error::ValidationError;
use crate::types::RegexFlags;

const INVERT_MARKER: char = '!';
const REGEX_MARKER: char = '/';
const MATCH_ALL: &str = "*";

/// Matches any input, including the empty string.
const MATCH_ALL_PATTERN: &str = ".?";

// =============================================================================
// Match Pattern
// =============================================================================

/// The two-branch grammar of a match argument, before compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchPattern {
    Any,
    Literal(String),
    Regex { pattern: String, flags: RegexFlags },
}

impl MatchPattern {
    /// Classify a raw argument (without any `!` prefix).
    pub fn parse(raw: &str) -> Self {
        if raw.is_empty() || raw == MATCH_ALL {
            return Self::Any;
        }

        match split_regex_literal(raw) {
            Some((pattern, flags)) => Self::Regex {
                pattern: pattern.to_string(),
                flags,
            },
            None => Self::Literal(raw.to_string()),
        }
    }

    pub fn compile(&self) -> Result<Regex, ValidationError> {
        match self {
            Self::Any => build(MATCH_ALL_PATTERN, RegexFlags::empty()),
            Self::Literal(text) => build(&escape_reg_exp(text), RegexFlags::empty()),
            Self::Regex { pattern, flags } => build(pattern, *flags),
        }
    }
}

/// Split `/pattern/flags` into its parts.
///
/// The closing slash is the last one in the string; if what follows it is not
/// a valid flag set the whole argument is a literal (e.g. `/path/to`).
fn split_regex_literal(raw: &str) -> Option<(&str, RegexFlags)> {
    let body = raw.strip_prefix(REGEX_MARKER)?;
    let close = body.rfind(REGEX_MARKER)?;
    let pattern = &body[..close];
    if pattern.is_empty() {
        return None;
    }
    let flags = RegexFlags::parse(&body[close + 1..])?;
    Some((pattern, flags))
}

/// Compile with the `i`/`m`/`s` flags as an inline group. Lookaround and
/// backreferences are supported; everything else is delegated to `regex`.
fn build(pattern: &str, flags: RegexFlags) -> Result<Regex, ValidationError> {
    let mut inline = String::new();
    for (flag, letter) in [
        (RegexFlags::IGNORE_CASE, 'i'),
        (RegexFlags::MULTILINE, 'm'),
        (RegexFlags::DOT_ALL, 's'),
    ] {
        if flags.contains(flag) {
            inline.push(letter);
        }
    }

    let source = if inline.is_empty() {
        pattern.to_string()
    } else {
        format!("(?{inline}){pattern}")
    };

    Regex::new(&source).map_err(|e| ValidationError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}

/// Compile a match argument (no `!` handling) into a regex.
pub fn to_regexp(raw: &str) -> Result<Regex, ValidationError> {
    MatchPattern::parse(raw).compile()
}

/// Escape regex metacharacters so `text` matches literally.
pub fn escape_reg_exp(text: &str) -> String {
    fancy_regex::escape(text).into_owned()
}

/// Whether `raw` compiles as a match argument.
pub fn is_valid_str_pattern(raw: &str) -> bool {
    to_regexp(raw).is_ok()
}

/// Like [`is_valid_str_pattern`] but accepts a leading `!`.
pub fn is_valid_match_str(raw: &str) -> bool {
    is_valid_str_pattern(strip_invert(raw).1)
}

/// Whether `raw` is an integer, optionally prefixed with `!`.
pub fn is_valid_match_number(raw: &str) -> bool {
    parse_int_arg(strip_invert(raw).1).is_some()
}

fn strip_invert(raw: &str) -> (bool, &str) {
    match raw.strip_prefix(INVERT_MARKER) {
        Some(rest) => (true, rest),
        None => (false, raw),
    }
}

fn parse_int_arg(raw: &str) -> Option<i64> {
    raw.parse::<i64>().ok()
}

// =============================================================================
// Parsed Arguments
// =============================================================================

/// Compiled match argument.
#[derive(Debug, Clone)]
pub struct ParsedMatcher {
    pub inverted: bool,
    pub pattern: Regex,
}

impl ParsedMatcher {
    /// Test `text`, honoring inversion.
    ///
    /// A match that exceeds the backtracking limit counts as no match in
    /// either direction.
    pub fn matches(&self, text: &str) -> bool {
        match self.pattern.is_match(text) {
            Ok(found) => found != self.inverted,
            Err(e) => {
                log::debug!("Match on '{}' aborted: {}", self.pattern.as_str(), e);
                false
            }
        }
    }
}

/// Parse a match argument, stripping a leading `!`.
pub fn parse_match_arg(raw: &str) -> Result<ParsedMatcher, ValidationError> {
    let (inverted, rest) = strip_invert(raw);
    Ok(ParsedMatcher {
        inverted,
        pattern: to_regexp(rest)?,
    })
}

/// Parsed delay argument of the timer scriptlets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParsedDelay {
    pub inverted: bool,
    /// `None` means no delay constraint.
    pub delay_match: Option<i64>,
}

/// Parse a delay argument such as `"1000"` or `"!1000"`.
///
/// A missing or empty argument is "no constraint"; anything that is not an
/// integer after the optional `!` is rejected rather than coerced.
pub fn parse_delay_arg(raw: Option<&str>) -> Result<ParsedDelay, ValidationError> {
    let raw = match raw {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Ok(ParsedDelay::default()),
    };

    let (inverted, rest) = strip_invert(raw);
    let delay = parse_int_arg(rest).ok_or_else(|| ValidationError::InvalidDelay(raw.to_string()))?;

    Ok(ParsedDelay {
        inverted,
        delay_match: Some(delay),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_pattern_classify() {
        assert_eq!(MatchPattern::parse(""), MatchPattern::Any);
        assert_eq!(MatchPattern::parse("*"), MatchPattern::Any);
        assert_eq!(
            MatchPattern::parse("/ad[sv]/i"),
            MatchPattern::Regex {
                pattern: "ad[sv]".to_string(),
                flags: RegexFlags::IGNORE_CASE
            }
        );
        assert_eq!(MatchPattern::parse("/path/to"), MatchPattern::Literal("/path/to".to_string()));
        assert_eq!(MatchPattern::parse("//"), MatchPattern::Literal("//".to_string()));
        assert_eq!(MatchPattern::parse("ads.js"), MatchPattern::Literal("ads.js".to_string()));
    }

    #[test]
    fn test_literal_is_escaped_and_case_sensitive() {
        let re = to_regexp("a.b").unwrap();
        assert!(re.is_match("xa.by").unwrap());
        assert!(!re.is_match("axb").unwrap());
        assert!(!re.is_match("A.B").unwrap());
    }

    #[test]
    fn test_regex_flags_applied() {
        let re = to_regexp("/^ADS$/i").unwrap();
        assert!(re.is_match("ads").unwrap());
        let re = to_regexp("/a.b/s").unwrap();
        assert!(re.is_match("a\nb").unwrap());
    }

    #[test]
    fn test_escaped_slash_inside_regex() {
        let re = to_regexp(r"/\/api\/v[0-9]/").unwrap();
        assert!(re.is_match("https://example.org/api/v2/items").unwrap());
    }

    #[test]
    fn test_lookaround_and_backreference() {
        let parsed = parse_match_arg("/^(?!.*nonce)/").unwrap();
        assert!(parsed.matches("https://example.org/ads.js"));
        assert!(!parsed.matches("https://example.org/ads.js?nonce=1"));

        let parsed = parse_match_arg(r"/(ad)\1/").unwrap();
        assert!(parsed.matches("adad"));
        assert!(!parsed.matches("ad"));

        let parsed = parse_match_arg("!/(?<=window\\.)adsbygoogle/").unwrap();
        assert!(!parsed.matches("window.adsbygoogle.push({})"));
        assert!(parsed.matches("adsbygoogle.push({})"));
    }

    #[test]
    fn test_literal_with_metacharacters() {
        let parsed = parse_match_arg("a+b (c) [d] {e} #f -g ~h").unwrap();
        assert!(parsed.matches("x a+b (c) [d] {e} #f -g ~h y"));
        assert!(!parsed.matches("aab c d e f g h"));
    }

    #[test]
    fn test_match_all() {
        for raw in ["", "*"] {
            let parsed = parse_match_arg(raw).unwrap();
            assert!(!parsed.inverted);
            assert!(parsed.matches(""));
            assert!(parsed.matches("anything at all"));
        }
    }

    #[test]
    fn test_inverted_prefix_keeps_pattern() {
        for raw in ["", "foo", "/fo+/", "*"] {
            let plain = parse_match_arg(raw).unwrap();
            let inverted = parse_match_arg(&format!("!{raw}")).unwrap();
            assert!(!plain.inverted);
            assert!(inverted.inverted);
            assert_eq!(plain.pattern.as_str(), inverted.pattern.as_str());
        }
    }

    #[test]
    fn test_inverted_matches() {
        let parsed = parse_match_arg("!complete").unwrap();
        assert!(!parsed.matches("onComplete complete"));
        assert!(parsed.matches("pending"));
    }

    #[test]
    fn test_invalid_regex_rejected() {
        assert!(matches!(
            parse_match_arg("/(unclosed/"),
            Err(ValidationError::InvalidPattern { .. })
        ));
        assert!(!is_valid_str_pattern("/(unclosed/"));
        assert!(!is_valid_match_str("!/[a-/"));
        assert!(is_valid_match_str("!plain"));
    }

    #[test]
    fn test_parse_delay_arg() {
        assert_eq!(parse_delay_arg(None), Ok(ParsedDelay::default()));
        assert_eq!(parse_delay_arg(Some("")), Ok(ParsedDelay::default()));
        assert_eq!(
            parse_delay_arg(Some("1000")),
            Ok(ParsedDelay { inverted: false, delay_match: Some(1000) })
        );
        assert_eq!(
            parse_delay_arg(Some("!300")),
            Ok(ParsedDelay { inverted: true, delay_match: Some(300) })
        );
        assert!(matches!(parse_delay_arg(Some("abc")), Err(ValidationError::InvalidDelay(_))));
        assert!(matches!(parse_delay_arg(Some("10ms")), Err(ValidationError::InvalidDelay(_))));
    }

    #[test]
    fn test_is_valid_match_number() {
        assert!(is_valid_match_number("0"));
        assert!(is_valid_match_number("!250"));
        assert!(!is_valid_match_number("!"));
        assert!(!is_valid_match_number("1.5"));
    }
}
