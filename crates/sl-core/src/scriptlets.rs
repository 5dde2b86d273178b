//! Rule-driven scriptlets, run against a [`Host`]
//!
//! Each entry point validates its raw arguments, logs and bails out on bad
//! input, and reports a hit through the host when it acts.

use crate::cookie::{is_cookie_set_with_value, CookieSpec};
use crate::error::ValidationError;
use crate::host::{Host, Source};
use crate::keyword::parse_keyword_value;
use crate::prevent::{is_prevention_needed, PreventionData};
use crate::request_props::match_request_props;
use crate::storage::set_storage_item;
use crate::types::RequestData;

/// Default `path` argument of the cookie scriptlets.
pub const DEFAULT_COOKIE_PATH: &str = "/";

/// Arguments of `trusted-set-cookie` and `trusted-set-cookie-reload`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CookieArgs<'a> {
    pub name: Option<&'a str>,
    pub value: Option<&'a str>,
    /// Empty for no `expires`.
    pub offset_expires_sec: &'a str,
    pub path: &'a str,
}

impl<'a> CookieArgs<'a> {
    pub fn new(name: &'a str, value: &'a str) -> Self {
        Self {
            name: Some(name),
            value: Some(value),
            offset_expires_sec: "",
            path: DEFAULT_COOKIE_PATH,
        }
    }

    pub fn offset(mut self, offset_expires_sec: &'a str) -> Self {
        self.offset_expires_sec = offset_expires_sec;
        self
    }

    pub fn path(mut self, path: &'a str) -> Self {
        self.path = path;
        self
    }

    fn required(&self) -> Result<(&'a str, &'a str), ValidationError> {
        let name = self.name.ok_or(ValidationError::MissingArgument("Cookie name"))?;
        let value = self.value.ok_or(ValidationError::MissingArgument("Cookie value"))?;
        Ok((name, value))
    }
}

fn build_cookie<H: Host>(host: &H, args: &CookieArgs<'_>) -> Result<Option<String>, ValidationError> {
    let (name, value) = args.required()?;
    let spec = CookieSpec::parse(name, value, args.offset_expires_sec, args.path)?;
    Ok(spec.to_cookie_string(host))
}

// =============================================================================
// Cookies
// =============================================================================

/// `trusted-set-cookie`: write a cookie with an arbitrary value.
///
/// Returns whether a cookie string was written.
pub fn trusted_set_cookie<H: Host>(host: &mut H, source: &Source, args: &CookieArgs<'_>) -> bool {
    let cookie = match build_cookie(&*host, args) {
        Ok(Some(cookie)) => cookie,
        Ok(None) => {
            source.log_message("Unable to build cookie string");
            return false;
        }
        Err(e) => {
            source.log_message(&e.to_string());
            return false;
        }
    };

    host.set_cookie(&cookie);
    host.hit(source, None);
    true
}

/// `trusted-set-cookie-reload`: like [`trusted_set_cookie`], then reload.
///
/// Does nothing when the cookie already holds the value, and reloads only
/// when the write actually landed, so a blocked cookie cannot cause a
/// reload loop.
pub fn trusted_set_cookie_reload<H: Host>(host: &mut H, source: &Source, args: &CookieArgs<'_>) -> bool {
    let (name, value) = match args.required() {
        Ok(required) => required,
        Err(e) => {
            source.log_message(&e.to_string());
            return false;
        }
    };

    if is_cookie_set_with_value(&host.cookie(), name, value) {
        return false;
    }

    if !trusted_set_cookie(host, source, args) {
        return false;
    }

    if is_cookie_set_with_value(&host.cookie(), name, value) {
        host.reload();
    }
    true
}

// =============================================================================
// Storage
// =============================================================================

/// `trusted-set-local-storage-item`: write an arbitrary `localStorage` item.
pub fn trusted_set_local_storage_item<H: Host>(
    host: &mut H,
    source: &Source,
    key: Option<&str>,
    value: Option<&str>,
) -> bool {
    let Some(key) = key else {
        source.log_message("Item key should be specified");
        return false;
    };
    let Some(value) = value else {
        source.log_message("Item value should be specified");
        return false;
    };

    let parsed_value = parse_keyword_value(value, &*host);
    set_storage_item(source, host.local_storage(), key, &parsed_value);
    host.hit(source, None);
    true
}

// =============================================================================
// Prevention
// =============================================================================

/// Decision half of `prevent-setTimeout` / `prevent-setInterval`.
pub fn prevent_timer<H: Host>(host: &mut H, source: &Source, data: &PreventionData<'_>) -> bool {
    let prevent = is_prevention_needed(data);
    if prevent {
        host.hit(source, None);
    }
    prevent
}

/// Decision half of `prevent-fetch` / `prevent-xhr`.
pub fn prevent_request<H: Host>(host: &mut H, source: &Source, props_to_match: &str, request: &RequestData) -> bool {
    let prevent = match_request_props(source, props_to_match, request);
    if prevent {
        host.hit(source, None);
    }
    prevent
}
