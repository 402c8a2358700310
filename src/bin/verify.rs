use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use house_qr::generator::{DEFAULT_FIRST, DEFAULT_LAST};
use house_qr::identifier::{DEFAULT_PREFIX, DEFAULT_WIDTH};
use house_qr::verify::Status;
use house_qr::{init_logging, verify_directory, IdScheme, QrPng, VerifyReport};

/// Decode every QR code PNG in a directory and check it against its file name.
#[derive(Debug, Parser)]
#[command(name = "house-qr-verify", version)]
struct Cli {
    #[arg(env = "HOUSE_QR_OUTPUT_DIR", default_value = house_qr::DEFAULT_OUTPUT_DIR)]
    dir: PathBuf,

    #[arg(long, default_value = DEFAULT_PREFIX)]
    prefix: String,

    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    width: usize,

    #[arg(long, default_value_t = DEFAULT_FIRST)]
    first: u64,

    #[arg(long, default_value_t = DEFAULT_LAST)]
    last: u64,

    /// Only check that each file decodes to its own name
    #[arg(long, conflicts_with_all = ["prefix", "width", "first", "last"])]
    any: bool,

    #[arg(long)]
    json: bool,
}

fn print_report(report: &VerifyReport) {
    for check in report.failures() {
        match &check.status {
            Status::Mismatch { decoded } => {
                println!("✗ {}: decodes to '{}'", check.path.display(), decoded)
            }
            Status::Unreadable { reason } => println!("✗ {}: {}", check.path.display(), reason),
            Status::Ok => {}
        }
    }
    for id in &report.missing {
        println!("✗ missing: {id}");
    }
    for path in &report.unexpected {
        println!("✗ unexpected: {}", path.display());
    }

    let ok = report.checked.len() - report.failures().count();
    println!("✓ {}/{} artifacts decode to their identifier", ok, report.checked.len());
    if report.is_clean() {
        println!("\n=== All checks passed! ===");
    }
}

fn run(cli: Cli) -> anyhow::Result<bool> {
    let expected: Option<Vec<String>> = if cli.any {
        None
    } else {
        let scheme = IdScheme::new(cli.prefix, cli.width)?;
        Some(scheme.range(cli.first, cli.last)?.collect())
    };

    let report = verify_directory(&QrPng::default(), &cli.dir, expected.as_deref())
        .with_context(|| format!("verifying {}", cli.dir.display()))?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(report.is_clean())
}

fn main() -> ExitCode {
    init_logging();

    match run(Cli::parse()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
