pub mod pta;
pub mod text;
pub mod xuexitong;
pub mod yuketang;

use serde::Serialize;

/// Question kinds a structured export can be asked for; values are the
/// ProblemX `type` names.
#[derive(clap::ValueEnum, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuestionKind {
    #[value(name = "TrueorFalse")]
    #[serde(rename = "TrueorFalse")]
    TrueOrFalse,
    #[value(name = "Choice")]
    Choice,
    #[value(name = "FillBlank")]
    FillBlank,
}

impl QuestionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionKind::TrueOrFalse => "TrueorFalse",
            QuestionKind::Choice => "Choice",
            QuestionKind::FillBlank => "FillBlank",
        }
    }
}
