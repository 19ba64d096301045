use std::ffi::OsString;

use anyhow::Result;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;

mod bank;
mod convert;
mod extractor;
mod normalize;
mod output;
mod telemetry;

#[derive(Parser)]
#[command(name = "problemx", about = "Convert quiz exports into ProblemX question banks")]
struct Cli {
    /// Emit a single JSON envelope to stdout; logs go to stderr
    #[arg(global = true, long, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// PTA export (selector-based)
    Pta(convert::pta::PtaCmd),
    /// Xuexitong export (selector-based)
    Xuexitong(convert::xuexitong::XuexitongCmd),
    /// Yuketang export (pattern-based), Choice and FillBlank
    Yuketang(convert::yuketang::YuketangCmd),
    /// Canonicalize `image` fields in existing banks, in place
    BankImages(normalize::BankImagesCmd),
}

/// Options that consume the next argument as their value.
const VALUE_FLAGS: [&str; 8] = ["--type", "--name", "-o", "--output", "-i", "--input", "-type", "-name"];

/// `-type` and `-name` are accepted as spellings of `--type` and `--name`.
/// A token in value position (e.g. `--name -name`) is passed through as is.
fn legacy_flags<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut out = Vec::new();
    let mut value_next = false;
    for arg in args {
        let is_value = value_next;
        value_next = !is_value && arg.to_str().is_some_and(|t| VALUE_FLAGS.contains(&t));
        let rewritten = match arg.to_str() {
            _ if is_value => arg,
            Some("-type") => OsString::from("--type"),
            Some("-name") => OsString::from("--name"),
            _ => arg,
        };
        out.push(rewritten);
    }
    out
}

fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse_from(legacy_flags(std::env::args_os()));
    telemetry::config::set_json_mode(cli.json);

    // initialize logging/tracing (stderr). Respect RUST_LOG and PROBLEMX_LOG_FORMAT
    telemetry::config::init_tracing();

    match cli.command {
        Commands::Pta(args) => convert::pta::run(args)?,
        Commands::Xuexitong(args) => convert::xuexitong::run(args)?,
        Commands::Yuketang(args) => convert::yuketang::run(args)?,
        Commands::BankImages(args) => normalize::run(args)?,
    }

    Ok(())
}
