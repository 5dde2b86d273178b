use serde_json::Value;
use sl_core::RequestData;

/// Build request data from a JSON object such as
/// `{"url": "https://example.org/ads.js", "method": "POST"}`.
///
/// Unknown keys and `null` values are dropped. Non-string values are
/// compared in their JSON text form.
pub fn request_from_json(text: &str) -> Result<RequestData, String> {
    let value: Value = serde_json::from_str(text).map_err(|e| format!("Invalid request JSON: {}", e))?;
    let Value::Object(map) = value else {
        return Err("Request JSON must be an object".to_string());
    };

    let pairs = map.iter().filter_map(|(key, value)| {
        let text = match value {
            Value::Null => return None,
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        Some((key.as_str(), text))
    });
    Ok(RequestData::from_named_pairs(pairs))
}
