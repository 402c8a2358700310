use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use house_qr::init_logging;
use house_qr::sheet::{render_sheet, SheetOptions, DEFAULT_FONT, DEFAULT_FONT_DIR, DEFAULT_SHEET_NAME};

/// Lay the generated QR codes out on a printable PDF label sheet.
#[derive(Debug, Parser)]
#[command(name = "house-qr-sheet", version)]
struct Cli {
    #[arg(env = "HOUSE_QR_OUTPUT_DIR", default_value = house_qr::DEFAULT_OUTPUT_DIR)]
    dir: PathBuf,

    /// Defaults to labels.pdf inside the input directory
    output: Option<PathBuf>,

    #[arg(long, default_value = DEFAULT_FONT_DIR)]
    font_dir: PathBuf,

    #[arg(long, default_value = DEFAULT_FONT)]
    font: String,
}

impl Cli {
    fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| self.dir.join(DEFAULT_SHEET_NAME))
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let output = cli.output_path();
    let options = SheetOptions {
        font_dir: cli.font_dir,
        font_name: cli.font,
        ..SheetOptions::default()
    };

    println!("Generating PDF...");
    let count = render_sheet(&cli.dir, &output, &options).context("label sheet not written")?;
    println!("PDF generated with {} codes in {}", count, output.display());
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
