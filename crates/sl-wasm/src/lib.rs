//! WebAssembly bindings for the scriptlet helpers
//!
//! Scriptlet code running in the page hands raw JS values (callbacks,
//! delays, request objects) to these exports, which convert them into the
//! typed arguments of `sl_core`.

use chrono::{DateTime, Utc};
use sl_core::{
    cookie::concat_cookie_name_value_path as concat_cookie,
    types::{CallbackArg, CookiePath, DelayArg, RequestData, RequestField},
    Clock, PreventionData, Source,
};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    /// `String(value)`
    #[wasm_bindgen(js_name = String)]
    fn js_string(value: &JsValue) -> String;
}

// =============================================================================
// Logging
// =============================================================================

struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let message = JsValue::from_str(&format!("[scriptlets] {}", record.args()));
        match record.level() {
            log::Level::Error => web_sys::console::error_1(&message),
            log::Level::Warn => web_sys::console::warn_1(&message),
            log::Level::Info => web_sys::console::info_1(&message),
            log::Level::Debug | log::Level::Trace => web_sys::console::debug_1(&message),
        }
    }

    fn flush(&self) {}
}

/// Route `log` output to the browser console.
///
/// Verbose mode shows `debug` messages too. Calling it again only changes
/// the level.
#[wasm_bindgen]
pub fn init_logging(verbose: bool) {
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    });
}

// =============================================================================
// Argument Conversion
// =============================================================================

fn callback_from_js(value: &JsValue) -> CallbackArg {
    if value.is_function() {
        CallbackArg::Function(js_string(value))
    } else if let Some(code) = value.as_string() {
        CallbackArg::Code(code)
    } else {
        CallbackArg::Other(js_string(value))
    }
}

fn delay_from_js(value: &JsValue) -> DelayArg {
    if let Some(number) = value.as_f64() {
        DelayArg::Number(number)
    } else if let Some(text) = value.as_string() {
        DelayArg::Text(text)
    } else if value.is_undefined() {
        DelayArg::Missing
    } else {
        DelayArg::Other(js_string(value))
    }
}

/// Read the recognized properties of a `Request` or init object.
///
/// Properties may live on the prototype (`Request` instances), so each
/// known name is looked up rather than enumerating own keys.
fn request_from_js(value: &JsValue) -> RequestData {
    if !value.is_object() {
        return RequestData::new();
    }

    let pairs = RequestField::ALL.iter().filter_map(|field| {
        let prop = js_sys::Reflect::get(value, &JsValue::from_str(field.as_str())).ok()?;
        if prop.is_undefined() || prop.is_null() {
            return None;
        }
        let text = prop.as_string().unwrap_or_else(|| js_string(&prop));
        Some((field.as_str(), text))
    });
    RequestData::from_named_pairs(pairs)
}

/// `Date.now()` as the time source.
struct JsClock;

impl Clock for JsClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(js_sys::Date::now() as i64).unwrap_or_default()
    }
}

fn source_for(name: &str, verbose: bool) -> Source {
    Source::new(name).verbose(verbose)
}

// =============================================================================
// Exports
// =============================================================================

/// `prevent-fetch` / `prevent-xhr` decision for one intercepted request.
#[wasm_bindgen]
pub fn match_request_props(source_name: &str, props_to_match: &str, request: JsValue, verbose: bool) -> bool {
    let data = request_from_js(&request);
    let source = source_for(source_name, verbose).with_args([props_to_match]);
    sl_core::match_request_props(&source, props_to_match, &data)
}

/// `prevent-setTimeout` / `prevent-setInterval` decision for one call.
#[wasm_bindgen]
pub fn is_prevention_needed(callback: JsValue, delay: JsValue, match_callback: &str, match_delay: Option<String>) -> bool {
    let callback = callback_from_js(&callback);
    let delay = delay_from_js(&delay);
    sl_core::is_prevention_needed(&PreventionData {
        callback: &callback,
        delay: &delay,
        match_callback,
        match_delay: match_delay.as_deref(),
    })
}

/// Resolve `$now$` / `$currentDate$`; other values pass through.
#[wasm_bindgen]
pub fn parse_keyword_value(value: &str) -> String {
    sl_core::parse_keyword_value(value, &JsClock)
}

/// Offset in milliseconds, or `undefined` when invalid.
#[wasm_bindgen]
pub fn get_trusted_cookie_offset_ms(offset: &str) -> Option<f64> {
    sl_core::get_trusted_cookie_offset_ms(offset).map(|ms| ms as f64)
}

#[wasm_bindgen]
pub fn is_valid_cookie_path(path: &str) -> bool {
    sl_core::is_valid_cookie_path(path)
}

/// `undefined` when the path is invalid or an unencoded `;` would split the
/// cookie.
#[wasm_bindgen]
pub fn concat_cookie_name_value_path(name: &str, value: &str, path: &str, encode: bool) -> Option<String> {
    let path = CookiePath::parse(path)?;
    concat_cookie(name, value, path, encode)
}

/// Full `document.cookie` assignment for `trusted-set-cookie`, including
/// `expires`. Throws on invalid arguments; `undefined` when the expiry date
/// is out of range.
#[wasm_bindgen]
pub fn build_trusted_cookie(name: &str, value: &str, offset_expires_sec: &str, path: &str) -> Result<Option<String>, JsValue> {
    let spec = sl_core::CookieSpec::parse(name, value, offset_expires_sec, path)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(spec.to_cookie_string(&JsClock))
}
