use serde::Serialize;

#[derive(Serialize, Debug, Default)]
pub struct TreeSummary {
    pub scanned: usize,
    pub changed: usize,
    pub failed: usize,
    pub changed_files: Vec<String>,
}
