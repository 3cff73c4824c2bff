// werview - main.rs
//
// CLI entry point. Handles:
// 1. Argument parsing
// 2. Logging initialisation (debug mode support)
// 3. Batch parse with a per-file progress bar
// 4. Console table (or JSON) output

use clap::{Parser, ValueEnum};
use indicatif::ProgressBar;
use std::path::PathBuf;

use werview::app::render;
use werview::app::scan;
use werview::core::discovery::DiscoveryConfig;
use werview::util;
use werview::util::constants;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFmt {
    /// Summary table, newest events first.
    Text,
    /// Full report collection as JSON on stdout.
    Json,
}

/// werview - Windows Error Reporting report parser and console viewer.
///
/// Point werview at a directory tree (e.g. a copied ProgramData\Microsoft\
/// Windows\WER\ReportArchive) to parse every .wer report into a normalized
/// record and list them newest-first.
#[derive(Parser, Debug)]
#[command(name = "werview", version, about)]
struct Cli {
    /// Directory tree to scan for .wer report files.
    path: PathBuf,

    /// Output format.
    #[arg(short = 'o', long = "output", value_enum, default_value = "text")]
    output: OutputFmt,

    /// Maximum directory recursion depth.
    #[arg(long = "max-depth")]
    max_depth: Option<usize>,

    /// Disable the progress bar.
    #[arg(long = "no-progress")]
    no_progress: bool,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    util::logging::init(cli.debug);

    tracing::info!(
        version = constants::APP_VERSION,
        root = %cli.path.display(),
        debug = cli.debug,
        "werview starting"
    );

    let mut config = DiscoveryConfig::default();
    if let Some(depth) = cli.max_depth {
        config.max_depth = depth;
    }

    // The bar is created on the first progress callback, once the file count
    // is known. JSON mode keeps stdout machine-consumable; the bar draws on
    // stderr anyway but is pointless without a human watching the table.
    let show_progress = !cli.no_progress && matches!(cli.output, OutputFmt::Text);
    let mut bar: Option<ProgressBar> = None;

    let outcome = match scan::run_batch(&cli.path, &config, |_path, done, total| {
        if show_progress {
            let pb = bar.get_or_insert_with(|| ProgressBar::new(total as u64));
            pb.set_position(done as u64);
        }
    }) {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!(error = %e, "Discovery failed");
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    if let Some(pb) = bar.take() {
        pb.finish_and_clear();
    }

    let mut reports = outcome.reports;
    render::sort_by_event_time_desc(&mut reports);

    match cli.output {
        OutputFmt::Text => println!("{}", render::summary_table(&reports)),
        OutputFmt::Json => match serde_json::to_string_pretty(&reports) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error: failed to serialise reports: {e}");
                std::process::exit(1);
            }
        },
    }

    for warning in &outcome.warnings {
        eprintln!("warning: {warning}");
    }
    if !outcome.failures.is_empty() {
        eprintln!(
            "{} report file(s) failed to parse:",
            outcome.failures.len()
        );
        for failure in &outcome.failures {
            eprintln!("  {}", failure.error);
        }
    }
}
