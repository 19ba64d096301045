pub mod file;
pub mod image;
pub mod types;

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Result;
use clap::Args;
use walkdir::{DirEntry, WalkDir};

use crate::output::types::Meta;
use crate::telemetry::{self};
use crate::telemetry::ops::bank_images::Phase as BankImagesPhase;

use self::types::TreeSummary;

/// problemx bank-images <root_dir>
#[derive(Args)]
pub struct BankImagesCmd {
    /// Directory holding ProblemX banks; searched recursively for *.json
    pub root_dir: PathBuf,
    /// Report files that would change without rewriting them
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

pub fn run(args: BankImagesCmd) -> Result<()> {
    let t0 = Instant::now();
    let apply = !args.dry_run;
    let log = telemetry::bank_images();
    let _g = log.root_span_kv([
        ("root_dir", args.root_dir.display().to_string()),
        ("mode", if apply { "apply".to_string() } else { "plan".to_string() }),
    ]).entered();

    let summary = normalize_tree(&args.root_dir, apply);
    log.totals(summary.scanned, summary.changed, summary.failed);
    if !apply && summary.changed > 0 { log.info("   Drop --dry-run to rewrite these files."); }

    if telemetry::config::json_mode() {
        let meta = Some(Meta::since(t0, args.root_dir.display().to_string()));
        if apply { log.result(&summary, meta)?; } else { log.plan(&summary, meta)?; }
    }
    Ok(())
}

/// Name ends in `.json` (any case); a bare `.json` counts.
fn is_json(name: &OsStr) -> bool {
    name.to_str()
        .is_some_and(|name| name.to_ascii_lowercase().ends_with(".json"))
}

/// Regular files, plus symlinks that resolve to one.
fn is_file(entry: &DirEntry) -> bool {
    entry.file_type().is_file() || (entry.path_is_symlink() && entry.path().is_file())
}

/// Walks `root` and converts every bank file. Per-file failures are logged
/// and counted; the walk always runs to completion.
pub fn normalize_tree(root: &Path, apply: bool) -> TreeSummary {
    let log = telemetry::bank_images();
    let _w = log.span(&BankImagesPhase::Walk).entered();
    let mut summary = TreeSummary::default();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log.error_kv("❌ walk error", [("error", e.to_string())]);
                continue;
            }
        };
        if !is_json(entry.file_name()) || !is_file(&entry) { continue; }
        summary.scanned += 1;

        let path = entry.path().display().to_string();
        let _c = log.span_kv(&BankImagesPhase::Convert, [("path", path.clone())]).entered();
        match file::convert_file(entry.path(), apply) {
            Ok(true) => {
                log.info_kv(if apply { "✏️ rewrote" } else { "🔎 would rewrite" }, [("path", path.clone())]);
                summary.changed += 1;
                summary.changed_files.push(path);
            }
            Ok(false) => log.debug_kv("unchanged", [("path", path)]),
            Err(e) => {
                summary.failed += 1;
                log.error_kv("❌ failed", [("path", path), ("error", format!("{:#}", e))]);
            }
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(dir: &Path, rel: &str, body: &str) -> PathBuf {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn rewrites_nested_banks_and_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let bank = write(dir.path(), "OS/Choice/U1.json",
            r#"{"data": [{"type": "Choice", "question": "看图", "image": "foo.png", "choices": ["A.x"], "answer": "A"}]}"#);

        let first = normalize_tree(dir.path(), true);
        assert_eq!((first.scanned, first.changed, first.failed), (1, 1, 0));

        let text = fs::read_to_string(&bank).unwrap();
        assert!(text.starts_with("{\n    \"data\": [\n"));
        assert!(text.ends_with("\n"));
        let v: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(v["data"][0]["image"], serde_json::json!({"img1": "foo.png"}));
        assert_eq!(v["data"][0]["question"], "看图\n\n![](img1)");
        // key order survives the rewrite
        let keys: Vec<&str> = v["data"][0].as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["type", "question", "image", "choices", "answer"]);

        let second = normalize_tree(dir.path(), true);
        assert_eq!((second.scanned, second.changed), (1, 0));
        assert_eq!(fs::read_to_string(&bank).unwrap(), text);
    }

    #[test]
    fn files_without_images_are_not_rewritten() {
        let dir = tempfile::tempdir().unwrap();
        let raw = r#"{"data":[{"type":"TrueorFalse","question":"q","answer":"T"}]}"#;
        let bank = write(dir.path(), "tf.json", raw);
        let summary = normalize_tree(dir.path(), true);
        assert_eq!((summary.scanned, summary.changed), (1, 0));
        assert_eq!(fs::read_to_string(bank).unwrap(), raw);
    }

    #[test]
    fn bad_files_are_counted_and_walk_continues() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a_broken.json", "{not json");
        write(dir.path(), "b_bank.JSON", "\u{feff}[{\"question\": \"q\", \"image\": {\"x\": \"\", \"y\": \"bar.png\"}}]");
        write(dir.path(), "notes.txt", "ignored");

        let summary = normalize_tree(dir.path(), true);
        assert_eq!((summary.scanned, summary.changed, summary.failed), (2, 1, 1));
        let v: serde_json::Value = serde_json::from_str(&fs::read_to_string(dir.path().join("b_bank.JSON")).unwrap()).unwrap();
        assert_eq!(v[0]["image"], serde_json::json!({"img1": "bar.png"}));
    }

    #[test]
    fn dry_run_reports_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let raw = r#"[{"question": "q", "image": "x.png"}]"#;
        let bank = write(dir.path(), "bank.json", raw);
        let summary = normalize_tree(dir.path(), false);
        assert_eq!(summary.changed, 1);
        assert_eq!(summary.changed_files, vec![bank.display().to_string()]);
        assert_eq!(fs::read_to_string(bank).unwrap(), raw);
    }

    #[test]
    fn bare_dot_json_file_is_scanned_and_json_dirs_are_not() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), ".json", r#"[{"question": "q", "image": "x.png"}]"#);
        write(dir.path(), "banks.json/inner.txt", "ignored");
        let summary = normalize_tree(dir.path(), true);
        assert_eq!((summary.scanned, summary.changed, summary.failed), (1, 1, 0));
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_bank_is_followed() {
        let root = tempfile::tempdir().unwrap();
        let elsewhere = tempfile::tempdir().unwrap();
        let target = write(elsewhere.path(), "real.json", r#"[{"question": "q", "image": "x.png"}]"#);
        std::os::unix::fs::symlink(&target, root.path().join("linked.json")).unwrap();

        let summary = normalize_tree(root.path(), true);
        assert_eq!((summary.scanned, summary.changed), (1, 1));
        let v: serde_json::Value = serde_json::from_str(&fs::read_to_string(&target).unwrap()).unwrap();
        assert_eq!(v[0]["image"], serde_json::json!({"img1": "x.png"}));
    }
}
