//! image-concordance CLI - Compare two images

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use image_concordance::ConcordanceAnalyzer;
use log::debug;

/// Report concordance and similarity metrics for two images.
#[derive(Parser, Debug)]
#[command(name = "image-concordance")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// File path of the first target image
    #[arg(long = "img1_path")]
    img1_path: PathBuf,

    /// File path of the second target image
    #[arg(long = "img2_path")]
    img2_path: PathBuf,

    /// Print the metrics as JSON instead of text lines
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    debug!(
        "Comparing {} with {}",
        cli.img1_path.display(),
        cli.img2_path.display()
    );

    let analyzer = ConcordanceAnalyzer::open(&cli.img1_path, &cli.img2_path)
        .context("Failed to load images")?;

    if cli.json {
        let report = analyzer.report().context("Failed to compute metrics")?;
        println!("{}", report.to_json()?);
    } else {
        let mut stdout = std::io::stdout().lock();
        analyzer
            .write_report(&mut stdout)
            .context("Failed to compute metrics")?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    run(&cli)
}
