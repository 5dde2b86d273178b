//! Core type definitions for the scriptlet helpers
//!
//! These types describe the values a scriptlet receives from the page it is
//! injected into (callbacks, delays, request descriptors) and the values it
//! writes back (cookie paths).

use std::collections::HashMap;
use std::fmt;

// =============================================================================
// Request Fields
// =============================================================================

/// Request property that a props-to-match spec may target.
///
/// The list is fixed: these are the properties the fetch/XHR wrappers copy
/// out of a live request before asking whether it should be prevented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RequestField {
    Url,
    Method,
    Headers,
    Body,
    Mode,
    Credentials,
    Cache,
    Redirect,
    Referrer,
    ReferrerPolicy,
    Integrity,
    Keepalive,
    Signal,
}

impl RequestField {
    /// Every recognized field, in declaration order.
    pub const ALL: [RequestField; 13] = [
        Self::Url,
        Self::Method,
        Self::Headers,
        Self::Body,
        Self::Mode,
        Self::Credentials,
        Self::Cache,
        Self::Redirect,
        Self::Referrer,
        Self::ReferrerPolicy,
        Self::Integrity,
        Self::Keepalive,
        Self::Signal,
    ];

    /// Look up a field by the name used in rule arguments.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "url" => Some(Self::Url),
            "method" => Some(Self::Method),
            "headers" => Some(Self::Headers),
            "body" => Some(Self::Body),
            "mode" => Some(Self::Mode),
            "credentials" => Some(Self::Credentials),
            "cache" => Some(Self::Cache),
            "redirect" => Some(Self::Redirect),
            "referrer" => Some(Self::Referrer),
            "referrerPolicy" => Some(Self::ReferrerPolicy),
            "integrity" => Some(Self::Integrity),
            "keepalive" => Some(Self::Keepalive),
            "signal" => Some(Self::Signal),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Url => "url",
            Self::Method => "method",
            Self::Headers => "headers",
            Self::Body => "body",
            Self::Mode => "mode",
            Self::Credentials => "credentials",
            Self::Cache => "cache",
            Self::Redirect => "redirect",
            Self::Referrer => "referrer",
            Self::ReferrerPolicy => "referrerPolicy",
            Self::Integrity => "integrity",
            Self::Keepalive => "keepalive",
            Self::Signal => "signal",
        }
    }
}

impl fmt::Display for RequestField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Request Data
// =============================================================================

/// Flat view of an intercepted request, built by the caller at match time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestData {
    fields: HashMap<RequestField, String>,
}

impl RequestData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, field: RequestField, value: impl Into<String>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: RequestField, value: impl Into<String>) {
        self.fields.insert(field, value.into());
    }

    pub fn get(&self, field: RequestField) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: RequestField) -> bool {
        self.fields.contains_key(&field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Build from `(name, value)` pairs, skipping names outside the allow-list.
    ///
    /// Request objects coming from the page carry arbitrary extra keys; only
    /// the recognized ones are ever compared against.
    pub fn from_named_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, String)>,
    {
        pairs
            .into_iter()
            .filter_map(|(name, value)| RequestField::from_name(name).map(|field| (field, value)))
            .collect()
    }
}

impl FromIterator<(RequestField, String)> for RequestData {
    fn from_iter<T: IntoIterator<Item = (RequestField, String)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

// =============================================================================
// Timer Arguments
// =============================================================================

/// Callback argument passed to `setTimeout`/`setInterval`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackArg {
    /// An invocable; holds its source text (`String(fn)`).
    Function(String),
    /// A code string, which timers accept in place of a function.
    Code(String),
    /// Anything else, kept in its display form for logging.
    Other(String),
}

impl CallbackArg {
    /// Text the callback matcher is tested against.
    pub fn as_text(&self) -> &str {
        match self {
            Self::Function(text) | Self::Code(text) | Self::Other(text) => text,
        }
    }
}

/// Delay argument passed to `setTimeout`/`setInterval`.
#[derive(Debug, Clone, PartialEq)]
pub enum DelayArg {
    Number(f64),
    Text(String),
    Missing,
    /// Any other value, in its `String(value)` form.
    Other(String),
}

/// Delay after normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum RawDelay {
    Int(i64),
    /// Not numeric-like; never equal to an integer target.
    Passthrough(DelayArg),
}

// =============================================================================
// Regex Flags
// =============================================================================

bitflags::bitflags! {
    /// Flags that may follow a `/pattern/` literal.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RegexFlags: u8 {
        /// `g` - no effect on a single test
        const GLOBAL = 1 << 0;
        /// `i` - case-insensitive
        const IGNORE_CASE = 1 << 1;
        /// `m` - `^`/`$` match at line boundaries
        const MULTILINE = 1 << 2;
        /// `s` - `.` matches newlines
        const DOT_ALL = 1 << 3;
        /// `u` - unicode mode, always on for Rust regexes
        const UNICODE = 1 << 4;
        /// `y` - no effect on a single test
        const STICKY = 1 << 5;
    }
}

impl RegexFlags {
    /// Parse a flags suffix. Unknown or repeated flags are rejected.
    pub fn parse(flags: &str) -> Option<Self> {
        let mut parsed = Self::empty();
        for ch in flags.chars() {
            let flag = match ch {
                'g' => Self::GLOBAL,
                'i' => Self::IGNORE_CASE,
                'm' => Self::MULTILINE,
                's' => Self::DOT_ALL,
                'u' => Self::UNICODE,
                'y' => Self::STICKY,
                _ => return None,
            };
            if parsed.contains(flag) {
                return None;
            }
            parsed |= flag;
        }
        Some(parsed)
    }
}

// =============================================================================
// Cookie Path
// =============================================================================

/// Path attribute accepted by the cookie scriptlets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CookiePath {
    /// `/` - emits `path=/`
    #[default]
    Root,
    /// `none` - emits no path attribute
    NoPath,
}

impl CookiePath {
    pub fn parse(path: &str) -> Option<Self> {
        match path {
            "/" => Some(Self::Root),
            "none" => Some(Self::NoPath),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Root => "/",
            Self::NoPath => "none",
        }
    }
}
