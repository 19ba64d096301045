use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::bank::to_pretty_json;

use super::image::convert_value;

pub fn load_json(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    // tolerate a UTF-8 BOM
    let body = text.strip_prefix('\u{feff}').unwrap_or(&text);
    serde_json::from_str(body).with_context(|| format!("decode {}", path.display()))
}

pub fn save_json(path: &Path, value: &Value) -> Result<()> {
    let text = to_pretty_json(value, 4)?;
    fs::write(path, text).with_context(|| format!("write {}", path.display()))
}

/// Converts one bank file; rewrites it only when something changed and `apply` is set.
pub fn convert_file(path: &Path, apply: bool) -> Result<bool> {
    let mut root = load_json(path)?;
    let changed = convert_value(&mut root);
    if changed && apply {
        save_json(path, &root)?;
    }
    Ok(changed)
}
