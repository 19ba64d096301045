//! ProblemX question bank: typed question records and the `{"data": [...]}` document.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::ser::{PrettyFormatter, Serializer};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrueFalse {
    T,
    F,
}

impl TrueFalse {
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "T" => Some(TrueFalse::T),
            "F" => Some(TrueFalse::F),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Question {
    #[serde(rename = "TrueorFalse")]
    TrueOrFalse {
        question: String,
        answer: Option<TrueFalse>,
    },
    Choice {
        question: String,
        choices: Vec<String>,
        answer: String,
    },
    FillBlank {
        question: String,
        #[serde(rename = "BlankNum")]
        blank_num: usize,
        answer: Vec<String>,
    },
}

impl Question {
    /// Fill-in question whose blank count always tracks its answers.
    pub fn fill_blank(question: String, answer: Vec<String>) -> Self {
        Question::FillBlank { question, blank_num: answer.len(), answer }
    }

    /// Checks the per-type invariants a well-formed record must hold.
    pub fn validate(&self) -> Result<()> {
        match self {
            Question::TrueOrFalse { .. } => {}
            Question::Choice { choices, answer, .. } => {
                if choices.is_empty() { bail!("choice question has no options"); }
                let mut letters = answer.chars();
                if !matches!((letters.next(), letters.next()), (Some(c), None) if c.is_ascii_uppercase()) {
                    bail!("answer {:?} is not a single option letter", answer);
                }
                let prefix = format!("{}.", answer);
                let leading = choices.iter().filter(|c| c.starts_with(&prefix)).count();
                if leading != 1 { bail!("answer {:?} leads {} options, expected 1", answer, leading); }
            }
            Question::FillBlank { blank_num, answer, .. } => {
                if answer.is_empty() { bail!("fill-blank question has no answers"); }
                if *blank_num != answer.len() { bail!("BlankNum {} but {} answers", blank_num, answer.len()); }
            }
        }
        Ok(())
    }

    pub fn question(&self) -> &str {
        match self {
            Question::TrueOrFalse { question, .. }
            | Question::Choice { question, .. }
            | Question::FillBlank { question, .. } => question,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionBank {
    pub data: Vec<Question>,
}

impl QuestionBank {
    pub fn new(data: Vec<Question>) -> Self { QuestionBank { data } }
    pub fn len(&self) -> usize { self.data.len() }
    pub fn is_empty(&self) -> bool { self.data.is_empty() }
}

/// Pretty JSON with the given indent width; non-ASCII is written as-is.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T, indent: usize) -> Result<String> {
    let pad = " ".repeat(indent);
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(pad.as_bytes()));
    value.serialize(&mut ser)?;
    let mut text = String::from_utf8(buf)?;
    text.push('\n');
    Ok(text)
}

pub fn write_bank(path: &Path, bank: &QuestionBank, indent: usize) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create output dir {}", parent.display()))?;
    }
    let text = to_pretty_json(bank, indent)?;
    fs::write(path, text).with_context(|| format!("write bank {}", path.display()))?;
    Ok(())
}
