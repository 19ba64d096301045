//! Canonical image references: `image` becomes `{"img1": path}` and the
//! question text carries the `![](img1)` marker.

use serde_json::{Map, Value};

pub const IMG_KEY: &str = "img1";
pub const IMG_MARKER: &str = "![](img1)";

fn single(path: &str) -> Value {
    let mut map = Map::new();
    map.insert(IMG_KEY.to_string(), Value::String(path.to_string()));
    Value::Object(map)
}

/// Returns the canonical form of an `image` value and whether it differs
/// from the input. Mappings are scanned in insertion order.
pub fn normalize_image(image: &Value) -> (Value, bool) {
    match image {
        Value::String(path) => (single(path.trim()), true),
        Value::Object(map) => {
            if let Some(Value::String(path)) = map.get(IMG_KEY) {
                let canon = single(path);
                let changed = *image != canon;
                return (canon, changed);
            }
            let first = map.values().find_map(|v| match v {
                Value::String(s) if !s.trim().is_empty() => Some(s.as_str()),
                _ => None,
            });
            match first {
                Some(path) => {
                    let canon = single(path);
                    let changed = *image != canon;
                    (canon, changed)
                }
                None => (image.clone(), false),
            }
        }
        other => (other.clone(), false),
    }
}

pub fn ensure_img1_reference(question: &str) -> (String, bool) {
    if question.contains(IMG_MARKER) {
        return (question.to_string(), false);
    }
    (format!("{}\n\n{}", question, IMG_MARKER), true)
}

/// Rewrites one question object in place; true when anything changed.
pub fn convert_question(obj: &mut Map<String, Value>) -> bool {
    let Some(image) = obj.get("image") else { return false };
    let (image, mut changed) = normalize_image(image);
    if !image.is_object() { return false; }
    obj.insert("image".to_string(), image);

    if let Some(Value::String(question)) = obj.get_mut("question") {
        let (text, text_changed) = ensure_img1_reference(question);
        *question = text;
        changed |= text_changed;
    }
    changed
}

/// Accepts `{"data": [...]}` or a bare array; other roots are left alone.
pub fn convert_value(root: &mut Value) -> bool {
    let items = match root {
        Value::Object(map) => match map.get_mut("data") {
            Some(Value::Array(items)) => items,
            _ => return false,
        },
        Value::Array(items) => items,
        _ => return false,
    };
    let mut changed = false;
    for item in items.iter_mut() {
        if let Value::Object(obj) = item {
            changed |= convert_question(obj);
        }
    }
    changed
}
