//! Request-property matching
//!
//! Used by the fetch/XHR prevention scriptlets. A props-to-match spec is a
//! space-separated list of `field:value` or bare `value` tokens, e.g.
//! `method:POST url:/track` or just `/ads\.js$/`. Bare tokens target `url`.
//! A request matches only if every listed field is present and matches.

use std::collections::BTreeMap;

use crate::error::ValidationError;
use crate::host::Source;
use crate::pattern::{parse_match_arg, ParsedMatcher};
use crate::types::{RequestData, RequestField};

const PROPS_DIVIDER: char = ' ';
const PAIRS_MARKER: char = ':';
const SCHEME_SEPARATOR: &str = "://";
const MATCH_ALL: &str = "*";

/// Raw `field name -> match argument` pairs, in field-name order.
pub type ParsedProps = BTreeMap<String, String>;

/// Split a props spec into name/argument pairs.
///
/// A token is a pair when the text before its first `:` is a run of ASCII
/// letters and the colon does not open a `://` scheme separator; every other
/// token is assigned to `url`. Later tokens for a field replace earlier ones.
pub fn parse_match_props(props_to_match: &str) -> ParsedProps {
    let mut parsed = ParsedProps::new();

    for token in props_to_match.split(PROPS_DIVIDER).filter(|t| !t.is_empty()) {
        let (key, value) = split_prop_token(token);
        parsed.insert(key.to_string(), value.to_string());
    }

    parsed
}

fn split_prop_token(token: &str) -> (&str, &str) {
    if let Some(pos) = token.find(PAIRS_MARKER) {
        let key = &token[..pos];
        let is_key = !key.is_empty() && key.bytes().all(|b| b.is_ascii_alphabetic());
        if is_key && !token[pos..].starts_with(SCHEME_SEPARATOR) {
            return (key, &token[pos + 1..]);
        }
    }
    (RequestField::Url.as_str(), token)
}

/// Check every field name against the allow-list and every argument for
/// well-formedness.
pub fn validate_parsed_data(parsed: &ParsedProps) -> Result<(), ValidationError> {
    for (key, value) in parsed {
        if RequestField::from_name(key).is_none() {
            return Err(ValidationError::UnknownField(key.clone()));
        }
        parse_match_arg(value)?;
    }
    Ok(())
}

/// Compile each field's argument into a matcher.
pub fn get_match_props_data(parsed: &ParsedProps) -> Result<Vec<(RequestField, ParsedMatcher)>, ValidationError> {
    parsed
        .iter()
        .map(|(key, value)| {
            let field = RequestField::from_name(key).ok_or_else(|| ValidationError::UnknownField(key.clone()))?;
            Ok((field, parse_match_arg(value)?))
        })
        .collect()
}

/// Decide whether `request` matches `props_to_match`.
///
/// `""` and `"*"` match everything. A malformed spec is logged through
/// `source` and never matches.
pub fn match_request_props(source: &Source, props_to_match: &str, request: &RequestData) -> bool {
    if props_to_match.is_empty() || props_to_match == MATCH_ALL {
        return true;
    }

    let parsed = parse_match_props(props_to_match);
    let matchers = match validate_parsed_data(&parsed).and_then(|()| get_match_props_data(&parsed)) {
        Ok(matchers) => matchers,
        Err(e) => {
            source.log_message(&format!("Invalid parameter: {props_to_match} ({e})"));
            return false;
        }
    };

    matchers
        .iter()
        .all(|(field, matcher)| request.get(*field).is_some_and(|value| matcher.matches(value)))
}
