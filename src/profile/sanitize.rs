//! Allow-list sanitization of untrusted profile input.
//!
//! Only `name`, `email` and `interests` pass through, and only when their value
//! is a JSON string. Every other key is dropped, which is what keeps
//! operator-shaped keys (`$set`, `$where`, ...) away from the store.

use serde_json::{Map, Value};

use crate::profile::types::ProfileFields;

/// Maximum length of a stored field, in characters.
pub const MAX_FIELD_CHARS: usize = 500;

/// Field names accepted from clients.
pub const ALLOWED_FIELDS: [&str; 3] = ["name", "email", "interests"];

/// Sanitize an arbitrary request body. Non-object input yields no fields.
pub fn sanitize(input: &Value) -> ProfileFields {
    match input {
        Value::Object(map) => sanitize_map(map),
        _ => ProfileFields::default(),
    }
}

/// Sanitize a field map.
fn sanitize_map(map: &Map<String, Value>) -> ProfileFields {
    ProfileFields {
        name: text_field(map, "name"),
        email: text_field(map, "email"),
        interests: text_field(map, "interests"),
    }
}

fn text_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key) {
        Some(Value::String(s)) => Some(truncate_chars(s, MAX_FIELD_CHARS)),
        _ => None,
    }
}

fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}
