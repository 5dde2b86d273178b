//! Validation errors raised while parsing rule arguments.
//!
//! None of these escape a scriptlet: callers log them through the
//! scriptlet's [`Source`](crate::host::Source) and fall back to "no action".

/// Error type for malformed scriptlet arguments.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
    #[error("Invalid delay: {0}")]
    InvalidDelay(String),
    #[error("Unknown request property: {0}")]
    UnknownField(String),
    #[error("Invalid cookie path: '{0}'")]
    InvalidCookiePath(String),
    #[error("Invalid offsetExpiresSec value: {0}")]
    InvalidOffset(String),
    #[error("{0} should be specified")]
    MissingArgument(&'static str),
}
