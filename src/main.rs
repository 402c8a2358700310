use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use house_qr::builder::DEFAULT_MIN_SIZE;
use house_qr::generator::{DEFAULT_FIRST, DEFAULT_LAST};
use house_qr::identifier::{DEFAULT_PREFIX, DEFAULT_WIDTH};
use house_qr::{init_logging, BatchConfig, EcLevel, Generator, IdScheme, RenderOptions, TracingSink};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Ec {
    L,
    M,
    Q,
    H,
}

impl From<Ec> for EcLevel {
    fn from(ec: Ec) -> Self {
        match ec {
            Ec::L => EcLevel::L,
            Ec::M => EcLevel::M,
            Ec::Q => EcLevel::Q,
            Ec::H => EcLevel::H,
        }
    }
}

/// Generate one QR code PNG per identifier (H001..H100 by default).
#[derive(Debug, Parser)]
#[command(name = "house-qr", version)]
struct Cli {
    /// Directory the PNG files are written to
    #[arg(short, long, env = "HOUSE_QR_OUTPUT_DIR", default_value = house_qr::DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    #[arg(long, default_value = DEFAULT_PREFIX)]
    prefix: String,

    /// Minimum number of digits; shorter numbers are zero-padded
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    width: usize,

    #[arg(long, default_value_t = DEFAULT_FIRST)]
    first: u64,

    #[arg(long, default_value_t = DEFAULT_LAST)]
    last: u64,

    /// QR error-correction level
    #[arg(long, value_enum, default_value_t = Ec::M)]
    ec_level: Ec,

    /// Minimum image edge in pixels
    #[arg(long, default_value_t = DEFAULT_MIN_SIZE)]
    size: u32,

    /// Print the batch summary as JSON on stdout
    #[arg(long)]
    json: bool,
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = BatchConfig {
        output_dir: cli.output_dir,
        scheme: IdScheme::new(cli.prefix, cli.width)?,
        first: cli.first,
        last: cli.last,
        render: RenderOptions {
            ec_level: cli.ec_level.into(),
            min_size: cli.size,
        },
    };

    let summary = Generator::new(config)
        .run(&mut TracingSink)
        .context("QR code generation aborted")?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "\nFinished generating all QR codes: {} written to {}",
            summary.count(),
            summary.output_dir.display()
        );
    }
    Ok(())
}

fn main() -> ExitCode {
    init_logging();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
