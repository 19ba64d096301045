use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Args;

use crate::bank::{write_bank, Question, QuestionBank};
use crate::extractor::yuketang::YuketangParser;
use crate::output::types::Meta;
use crate::telemetry::{self};
use crate::telemetry::ops::yuketang::Phase as YuketangPhase;

use super::types::{ConvertStats, YuketangResult};

/// problemx yuketang -i page.html -o out/ -name U1
#[derive(Args)]
pub struct YuketangCmd {
    /// HTML export to read
    #[arg(short, long)]
    pub input: PathBuf,
    /// Output directory; banks land in Choice/ and FillBlank/ below it
    #[arg(short, long)]
    pub output: PathBuf,
    /// File name prefix, e.g. U1 → U1_Choice.json
    #[arg(long, allow_hyphen_values = true)]
    pub name: String,
}

pub struct YuketangConverter {
    parser: YuketangParser,
    choice: Vec<Question>,
    fill_blank: Vec<Question>,
}

impl YuketangConverter {
    pub fn new() -> Result<Self> {
        Ok(YuketangConverter { parser: YuketangParser::new()?, choice: Vec::new(), fill_blank: Vec::new() })
    }

    pub fn stats(&self) -> ConvertStats {
        ConvertStats {
            choice: self.choice.len(),
            fill_blank: self.fill_blank.len(),
            total: self.choice.len() + self.fill_blank.len(),
        }
    }

    pub fn parse_html_file(&mut self, path: &Path) -> Result<()> {
        let log = telemetry::yuketang();
        let html = {
            let _s = log.span_kv(&YuketangPhase::Read, [("path", path.display().to_string())]).entered();
            fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?
        };
        self.parse_html(&html);
        Ok(())
    }

    /// Matches both question kinds, then files each record under its type.
    /// A record failing post-processing is logged with its 1-based ordinal and skipped.
    pub fn parse_html(&mut self, html: &str) {
        let log = telemetry::yuketang();
        let mut parsed = { let _s = log.span(&YuketangPhase::MatchChoice).entered(); self.parser.parse_choice(html) };
        parsed.extend({ let _s = log.span(&YuketangPhase::MatchFillBlank).entered(); self.parser.parse_fill_blank(html) });
        log.info(format!("🔎 Found {} question(s)", parsed.len()));

        let _f = log.span(&YuketangPhase::Finalize).entered();
        for (i, question) in parsed.into_iter().enumerate() {
            let ordinal = i + 1;
            match self.accept(question) {
                Ok(kind) => log.debug_kv("✓ accepted", [("ordinal", ordinal.to_string()), ("type", kind.to_string())]),
                Err(e) => log.error_kv("❌ question rejected", [("ordinal", ordinal.to_string()), ("error", format!("{:#}", e))]),
            }
        }
        let stats = self.stats();
        log.stats(stats.choice, stats.fill_blank);
    }

    fn accept(&mut self, question: Question) -> Result<&'static str> {
        question.validate()?;
        match question {
            Question::Choice { .. } => { self.choice.push(question); Ok("Choice") }
            Question::FillBlank { .. } => { self.fill_blank.push(question); Ok("FillBlank") }
            Question::TrueOrFalse { .. } => bail!("true/false questions are not supported for this export"),
        }
    }

    /// Writes `<dir>/Choice/<name>_Choice.json` and `<dir>/FillBlank/<name>_FillBlank.json`,
    /// skipping empty kinds. Returns the paths written.
    pub fn save(&self, output_dir: &Path, name: &str) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(output_dir).with_context(|| format!("create {}", output_dir.display()))?;
        let mut written = Vec::new();
        for (kind, questions) in [("Choice", &self.choice), ("FillBlank", &self.fill_blank)] {
            if questions.is_empty() { continue; }
            let path = output_dir.join(kind).join(format!("{}_{}.json", name, kind));
            write_bank(&path, &QuestionBank::new(questions.clone()), 2)?;
            written.push(path);
        }
        Ok(written)
    }
}

pub fn run(args: YuketangCmd) -> Result<()> {
    let t0 = Instant::now();
    let log = telemetry::yuketang();
    let _g = log.root_span_kv([
        ("input", args.input.display().to_string()),
        ("output", args.output.display().to_string()),
        ("name", args.name.clone()),
    ]).entered();

    if !args.input.exists() {
        log.error(format!("❌ HTML file does not exist: {}", args.input.display()));
        return Ok(());
    }

    let mut converter = YuketangConverter::new()?;
    converter.parse_html_file(&args.input)?;

    let written = { let _s = log.span(&YuketangPhase::Write).entered(); converter.save(&args.output, &args.name)? };
    for path in &written { log.info(format!("💾 Saved {}", path.display())); }
    log.info(format!("✅ Conversion finished → {}", args.output.display()));

    if telemetry::config::json_mode() {
        let result = YuketangResult {
            stats: converter.stats(),
            written: written.iter().map(|p| p.display().to_string()).collect(),
        };
        log.result(&result, Some(Meta::since(t0, args.input.display().to_string())))?;
    }
    Ok(())
}
