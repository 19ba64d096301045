pub mod pta;
pub mod types;
pub mod xuexitong;
pub mod yuketang;

use std::fs;
use std::io;
use std::path::Path;

use anyhow::{Context, Result};

/// Reads an HTML export; `Ok(None)` when the file does not exist.
pub fn read_input(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(html) => Ok(Some(html)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("read {}", path.display())),
    }
}
