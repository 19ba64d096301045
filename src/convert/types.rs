use serde::Serialize;

use crate::extractor::QuestionKind;

#[derive(Serialize)]
pub struct ExtractResult {
    pub kind: QuestionKind,
    pub extracted: usize,
    pub output: String,
}

#[derive(Serialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConvertStats {
    pub choice: usize,
    pub fill_blank: usize,
    pub total: usize,
}

#[derive(Serialize)]
pub struct YuketangResult {
    pub stats: ConvertStats,
    pub written: Vec<String>,
}
