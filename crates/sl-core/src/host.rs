//! Host environment capabilities
//!
//! Scriptlets act on page globals (`document.cookie`, `localStorage`,
//! `location.reload`, the current time). Here those globals are an explicit
//! [`Host`] handed to each operation, and the scriptlet identity used for
//! logging and hit reporting is a [`Source`].

use chrono::{DateTime, Utc};

use crate::storage::{MemoryStorage, Storage};

// =============================================================================
// Clock
// =============================================================================

/// Source of the current time.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;

    /// Milliseconds since the Unix epoch (`Date.now()`).
    fn now_ms(&self) -> i64 {
        self.now().timestamp_millis()
    }
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock stuck at one instant, for deterministic output.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

// =============================================================================
// Source
// =============================================================================

/// Identity of the running scriptlet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Source {
    pub name: String,
    pub args: Vec<String>,
    /// Verbose sources log validation messages at `warn` instead of `debug`.
    pub verbose: bool,
}

impl Source {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
            verbose: false,
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// The rule that injected this scriptlet, e.g.
    /// `//scriptlet('prevent-fetch', 'method:POST')`.
    pub fn rule_text(&self) -> String {
        let mut text = format!("//scriptlet('{}'", self.name);
        for arg in &self.args {
            text.push_str(&format!(", '{arg}'"));
        }
        text.push(')');
        text
    }

    /// Advisory diagnostic; never changes a match outcome.
    pub fn log_message(&self, message: &str) {
        if self.verbose {
            log::warn!("{}: {}", self.name, message);
        } else {
            log::debug!("{}: {}", self.name, message);
        }
    }
}

// =============================================================================
// Host
// =============================================================================

/// Page capabilities a scriptlet may touch.
pub trait Host: Clock {
    /// Current `document.cookie` string (`a=1; b=2`).
    fn cookie(&self) -> String;

    /// Assign to `document.cookie`.
    fn set_cookie(&mut self, cookie: &str);

    fn local_storage(&mut self) -> &mut dyn Storage;

    /// `location.reload()`.
    fn reload(&mut self);

    /// Report that the scriptlet acted.
    fn hit(&mut self, source: &Source, message: Option<&str>);
}

/// In-process host for native callers and tests.
#[derive(Debug, Default)]
pub struct MemoryHost {
    /// Cookie jar in insertion order.
    cookies: Vec<(String, String)>,
    storage: MemoryStorage,
    fixed_now: Option<DateTime<Utc>>,
    /// When set, cookie writes are silently dropped, like a browser
    /// that blocks them.
    pub block_cookies: bool,
    pub reloads: usize,
    pub hits: Vec<String>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fixed_time(now: DateTime<Utc>) -> Self {
        Self {
            fixed_now: Some(now),
            ..Self::default()
        }
    }

    pub fn with_storage(mut self, storage: MemoryStorage) -> Self {
        self.storage = storage;
        self
    }

    pub fn cookie_value(&self, name: &str) -> Option<&str> {
        self.cookies
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn storage(&self) -> &MemoryStorage {
        &self.storage
    }

    fn is_expired(&self, attributes: &str) -> bool {
        attributes
            .split(';')
            .filter_map(|attr| {
                let (key, value) = attr.split_once('=')?;
                key.trim().eq_ignore_ascii_case("expires").then_some(value.trim())
            })
            .filter_map(|value| DateTime::parse_from_rfc2822(value).ok())
            .any(|expires| expires.with_timezone(&Utc) <= self.now())
    }
}

impl Clock for MemoryHost {
    fn now(&self) -> DateTime<Utc> {
        self.fixed_now.unwrap_or_else(Utc::now)
    }
}

impl Host for MemoryHost {
    fn cookie(&self) -> String {
        self.cookies
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ")
    }

    fn set_cookie(&mut self, cookie: &str) {
        if self.block_cookies {
            return;
        }

        let (pair, attributes) = cookie.split_once(';').unwrap_or((cookie, ""));
        let Some((name, value)) = pair.split_once('=') else {
            return;
        };
        let name = name.trim().to_string();
        let value = value.trim().to_string();

        self.cookies.retain(|(n, _)| *n != name);
        if !self.is_expired(attributes) {
            self.cookies.push((name, value));
        }
    }

    fn local_storage(&mut self) -> &mut dyn Storage {
        &mut self.storage
    }

    fn reload(&mut self) {
        self.reloads += 1;
    }

    fn hit(&mut self, source: &Source, message: Option<&str>) {
        match message {
            Some(message) => log::debug!("{} hit: {}", source.rule_text(), message),
            None => log::debug!("{} hit", source.rule_text()),
        }
        self.hits.push(source.name.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_log::capture;
    use log::Level;
    use chrono::TimeZone;

    #[test]
    fn test_fixed_clock_now_ms() {
        let clock = FixedClock(Utc.with_ymd_and_hms(2022, 11, 8, 10, 53, 19).unwrap());
        assert_eq!(clock.now_ms(), 1_667_904_799_000);
    }

    #[test]
    fn test_memory_host_cookie_jar() {
        let mut host = MemoryHost::new();
        host.set_cookie("consent=accept; path=/;");
        host.set_cookie("theme=dark;");
        host.set_cookie("consent=decline; path=/;");
        assert_eq!(host.cookie(), "theme=dark; consent=decline");
        assert_eq!(host.cookie_value("consent"), Some("decline"));
    }

    #[test]
    fn test_memory_host_expired_cookie_removed() {
        let now = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        let mut host = MemoryHost::with_fixed_time(now);
        host.set_cookie("a=1;");
        host.set_cookie("a=1; expires=Mon, 01 Jan 2024 00:00:00 GMT;");
        assert_eq!(host.cookie_value("a"), None);
    }

    #[test]
    fn test_memory_host_blocked_cookies() {
        let mut host = MemoryHost::new();
        host.block_cookies = true;
        host.set_cookie("a=1;");
        assert_eq!(host.cookie(), "");
    }

    #[test]
    fn test_memory_host_records_hits() {
        let mut host = MemoryHost::new();
        let source = Source::new("prevent-fetch").verbose(true);
        host.hit(&source, None);
        host.hit(&source, Some("fetch blocked"));
        assert_eq!(host.hits, vec!["prevent-fetch", "prevent-fetch"]);
    }

    #[test]
    fn test_rule_text() {
        assert_eq!(Source::new("nowebrtc").rule_text(), "//scriptlet('nowebrtc')");
        let source = Source::new("prevent-fetch").with_args(["method:POST", "emptyObj"]);
        assert_eq!(source.rule_text(), "//scriptlet('prevent-fetch', 'method:POST', 'emptyObj')");
    }

    #[test]
    fn test_hit_logs_rule_text() {
        let mut host = MemoryHost::new();
        let source = Source::new("prevent-fetch").with_args(["pagead"]);
        let ((), logged) = capture(|| host.hit(&source, None));
        assert_eq!(logged, vec![(Level::Debug, "//scriptlet('prevent-fetch', 'pagead') hit".to_string())]);
    }
}
