use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::Args;

use crate::bank::{write_bank, QuestionBank};
use crate::extractor::{pta, QuestionKind};
use crate::output::types::Meta;
use crate::telemetry::{self};
use crate::telemetry::ops::pta::Phase as PtaPhase;

use super::read_input;
use super::types::ExtractResult;

/// problemx pta <input_file> -type <kind> [-o out.json]
#[derive(Args)]
pub struct PtaCmd {
    /// HTML export to read
    pub input_file: PathBuf,
    /// Question type to extract
    #[arg(long = "type", value_enum)]
    pub kind: QuestionKind,
    #[arg(short, long, default_value = "extracted_questions.json")]
    pub output: PathBuf,
}

pub fn run(args: PtaCmd) -> Result<()> {
    let t0 = Instant::now();
    let log = telemetry::pta();
    let _g = log.root_span_kv([
        ("input", args.input_file.display().to_string()),
        ("type", args.kind.as_str().to_string()),
        ("output", args.output.display().to_string()),
    ]).entered();

    let html = { let _s = log.span(&PtaPhase::Read).entered(); read_input(&args.input_file)? };
    let Some(html) = html else {
        log.error(format!("❌ input file not found: {}", args.input_file.display()));
        return Ok(());
    };
    log.info(format!("📄 Read HTML file: {}", args.input_file.display()));

    let questions = { let _s = log.span(&PtaPhase::Extract).entered(); pta::extract(&html, args.kind) };
    let bank = QuestionBank::new(questions);
    if bank.is_empty() {
        log.info(format!("⚠️ No {} questions matched; writing an empty bank", args.kind.as_str()));
    }

    let output = args.output.display().to_string();
    {
        let _s = log.span(&PtaPhase::Write).entered();
        if let Err(e) = write_bank(&args.output, &bank, 4) {
            log.error_kv("❌ failed to write JSON", [("output", output), ("error", format!("{:#}", e))]);
            return Ok(());
        }
    }
    log.summary(args.kind.as_str(), bank.len(), &output);

    if telemetry::config::json_mode() {
        let result = ExtractResult { kind: args.kind, extracted: bank.len(), output };
        log.result(&result, Some(Meta::since(t0, args.input_file.display().to_string())))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_input_writes_nothing_and_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.json");
        let args = PtaCmd { input_file: dir.path().join("absent.html"), kind: QuestionKind::Choice, output: output.clone() };
        assert!(run(args).is_ok());
        assert!(!output.exists());
    }

    #[test]
    fn existing_input_is_written_as_a_bank() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("page.html");
        std::fs::write(&input, r#"<div class="pc-x" id="q1"><div class="rendered-markdown"><p>Q</p></div>
<label class="w-full"><input type="radio" checked><span>A.</span><div class="rendered-markdown"><p>x</p></div></label></div>"#).unwrap();
        let output = dir.path().join("nested").join("out.json");
        run(PtaCmd { input_file: input, kind: QuestionKind::Choice, output: output.clone() }).unwrap();
        let bank: QuestionBank = serde_json::from_str(&std::fs::read_to_string(output).unwrap()).unwrap();
        assert_eq!(bank.len(), 1);
    }
}
