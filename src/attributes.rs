use geojson::Feature;
use serde_json::{Map, Value};

pub type JsonObject = Map<String, Value>;

pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0 && !f.is_nan()),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Finds the raw value for `name`. A missing or falsy exact key falls back to
/// the first truthy key that differs only in case.
pub fn lookup<'a>(props: &'a JsonObject, name: &str) -> Option<&'a Value> {
    match props.get(name) {
        Some(v) if is_truthy(v) => Some(v),
        _ => {
            let lowered = name.to_lowercase();
            props
                .iter()
                .find(|(k, v)| k.as_str() != name && k.to_lowercase() == lowered && is_truthy(v))
                .map(|(_, v)| v)
        }
    }
}

pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub fn resolve_attribute(props: &JsonObject, name: &str) -> Option<String> {
    let value = lookup(props, name)?;
    let text = stringify(value);
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

pub fn feature_attribute(feature: &Feature, name: &str) -> Option<String> {
    feature
        .properties
        .as_ref()
        .and_then(|props| resolve_attribute(props, name))
}

/// Exact-key lookup without the case-insensitive fallback. Falsy values count
/// as absent.
pub fn direct_attribute(feature: &Feature, name: &str) -> Option<String> {
    feature
        .properties
        .as_ref()
        .and_then(|props| props.get(name))
        .filter(|v| is_truthy(v))
        .map(stringify)
}
