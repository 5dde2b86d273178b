//! Timer prevention decision
//!
//! Shared by `prevent-setTimeout` and `prevent-setInterval`: given the
//! arguments of an intercepted timer call and the rule's `matchCallback` /
//! `matchDelay` arguments, decide whether the call should be swallowed.
//! Malformed rule arguments never lead to prevention.

use crate::pattern::{is_valid_match_number, is_valid_match_str, parse_delay_arg, parse_match_arg};
use crate::types::{CallbackArg, DelayArg, RawDelay};

/// Everything needed to decide on one intercepted timer call.
#[derive(Debug, Clone)]
pub struct PreventionData<'a> {
    pub callback: &'a CallbackArg,
    pub delay: &'a DelayArg,
    pub match_callback: &'a str,
    pub match_delay: Option<&'a str>,
}

/// Timers accept either a function or a code string.
pub fn is_valid_callback(callback: &CallbackArg) -> bool {
    matches!(callback, CallbackArg::Function(_) | CallbackArg::Code(_))
}

/// Reduce a timer delay to an integer with `parseInt(String(delay), 10)`
/// rules, leaving non-numeric values untouched.
///
/// `"1000ms"` becomes `1000` while `"soon"` passes through. Numbers are
/// truncated toward zero, except that those JS prints in exponent form keep
/// only the leading mantissa digit (`1e21` and `1e-7` both become `1`).
/// Integers beyond `i64` pass through.
pub fn parse_raw_delay(delay: &DelayArg) -> RawDelay {
    let parsed = match delay {
        DelayArg::Number(value) => parse_int_number(*value),
        DelayArg::Text(text) | DelayArg::Other(text) => parse_int_prefix(text),
        DelayArg::Missing => None,
    };

    match parsed {
        Some(value) => RawDelay::Int(value),
        None => RawDelay::Passthrough(delay.clone()),
    }
}

/// JS switches `String(number)` to exponent form outside this range.
const EXPONENT_FORM_MIN: f64 = 1e-6;
const EXPONENT_FORM_MAX: f64 = 1e21;

fn parse_int_number(value: f64) -> Option<i64> {
    if !value.is_finite() {
        return None;
    }

    let magnitude = value.abs();
    if value != 0.0 && !(EXPONENT_FORM_MIN..EXPONENT_FORM_MAX).contains(&magnitude) {
        return parse_int_prefix(&format!("{value:e}"));
    }

    let truncated = value.trunc();
    if truncated < i64::MIN as f64 || truncated >= i64::MAX as f64 {
        return None;
    }
    Some(truncated as i64)
}

fn parse_int_prefix(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let value: i64 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Decide whether an intercepted timer call should be prevented.
pub fn is_prevention_needed(data: &PreventionData<'_>) -> bool {
    if !is_valid_callback(data.callback) {
        return false;
    }

    let match_delay = data.match_delay.filter(|raw| !raw.is_empty());
    if !is_valid_match_str(data.match_callback)
        || match_delay.is_some_and(|raw| !is_valid_match_number(raw))
    {
        return false;
    }

    let (callback_matcher, delay_matcher) =
        match (parse_match_arg(data.match_callback), parse_delay_arg(match_delay)) {
            (Ok(callback), Ok(delay)) => (callback, delay),
            _ => return false,
        };

    let parsed_delay = parse_raw_delay(data.delay);
    let callback_matches = callback_matcher.matches(data.callback.as_text());

    match delay_matcher.delay_match {
        None => callback_matches,
        Some(target) => {
            let delay_matches = (parsed_delay == RawDelay::Int(target)) != delay_matcher.inverted;
            if data.match_callback.is_empty() {
                delay_matches
            } else {
                callback_matches && delay_matches
            }
        }
    }
}
