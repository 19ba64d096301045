use std::path::PathBuf;
use std::time::Instant;

use anyhow::{anyhow, Result};
use clap::Args;

use crate::bank::{write_bank, QuestionBank};
use crate::extractor::{xuexitong, QuestionKind};
use crate::output::types::Meta;
use crate::telemetry::{self};
use crate::telemetry::ops::xuexitong::Phase as XuexitongPhase;

use super::read_input;
use super::types::ExtractResult;

#[derive(Args)]
pub struct XuexitongCmd {
    /// HTML export to read
    pub file: PathBuf,
    #[arg(long = "type", value_enum, default_value_t = QuestionKind::Choice)]
    pub kind: QuestionKind,
    /// Defaults to extracted_<type>_questions.json
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl XuexitongCmd {
    fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("extracted_{}_questions.json", self.kind.as_str())))
    }
}

pub fn run(args: XuexitongCmd) -> Result<()> {
    let t0 = Instant::now();
    let output_path = args.output_path();
    let output = output_path.display().to_string();
    let log = telemetry::xuexitong();
    let _g = log.root_span_kv([
        ("input", args.file.display().to_string()),
        ("type", args.kind.as_str().to_string()),
        ("output", output.clone()),
    ]).entered();

    // a missing export is fatal for this source
    let html = { let _s = log.span(&XuexitongPhase::Read).entered(); read_input(&args.file)? }
        .ok_or_else(|| anyhow!("input file not found: {}", args.file.display()))?;

    let questions = { let _s = log.span(&XuexitongPhase::Extract).entered(); xuexitong::extract(&html, args.kind) };
    let bank = QuestionBank::new(questions);
    { let _s = log.span(&XuexitongPhase::Write).entered(); write_bank(&output_path, &bank, 4)?; }
    log.summary(args.kind.as_str(), bank.len(), &output);

    if telemetry::config::json_mode() {
        let result = ExtractResult { kind: args.kind, extracted: bank.len(), output };
        log.result(&result, Some(Meta::since(t0, args.file.display().to_string())))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_output_names_the_type() {
        let cmd = XuexitongCmd { file: "in.html".into(), kind: QuestionKind::FillBlank, output: None };
        assert_eq!(cmd.output_path(), PathBuf::from("extracted_FillBlank_questions.json"));
        let cmd = XuexitongCmd { file: "in.html".into(), kind: QuestionKind::Choice, output: Some("x.json".into()) };
        assert_eq!(cmd.output_path(), PathBuf::from("x.json"));
    }
}
