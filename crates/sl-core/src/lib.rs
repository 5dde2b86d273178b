//! Scriptlet helpers core library
//!
//! This crate provides the rule-driven logic shared by content blocker
//! scriptlets: deciding *whether* an injected scriptlet should intervene on
//! an intercepted call, and parsing the user-supplied arguments that drive
//! that decision.
//!
//! # Architecture
//!
//! Everything here is a pure function over its inputs. The only side
//! effects (cookies, `localStorage`, page reloads, hit reporting) go through
//! the [`Host`] capability passed into the scriptlet entry points. Malformed
//! rule arguments fail closed: they are logged through the scriptlet's
//! [`Source`] and produce "no action".
//!
//! # Modules
//!
//! - `pattern`: match-argument and delay-argument parsing
//! - `prevent`: timer (`setTimeout`/`setInterval`) prevention decision
//! - `request_props`: fetch/XHR request-property matching
//! - `keyword`: `$now$` / `$currentDate$` value keywords
//! - `cookie`: cookie offsets, paths and cookie string assembly
//! - `storage`: Web Storage writes
//! - `host`: host capabilities, clock and scriptlet identity
//! - `scriptlets`: trusted cookie/storage scriptlets and prevention entry points
//! - `types`: shared type definitions

pub mod cookie;
pub mod error;
pub mod host;
pub mod keyword;
pub mod pattern;
pub mod prevent;
pub mod request_props;
pub mod scriptlets;
pub mod storage;
pub mod types;

#[cfg(test)]
mod test_log;

// Re-export commonly used types
pub use cookie::{get_trusted_cookie_offset_ms, is_valid_cookie_path, CookieSpec};
pub use error::ValidationError;
pub use host::{Clock, FixedClock, Host, MemoryHost, Source, SystemClock};
pub use keyword::{parse_keyword_value, KeywordValue};
pub use pattern::{parse_delay_arg, parse_match_arg, MatchPattern, ParsedDelay, ParsedMatcher};
pub use prevent::{is_prevention_needed, PreventionData};
pub use request_props::match_request_props;
pub use types::{CallbackArg, CookiePath, DelayArg, RawDelay, RequestData, RequestField};
