//! CLI entry point for the growth tracker.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use growth_tracker::config::{DEFAULT_INPUT, DEFAULT_OUTPUT};
use growth_tracker::{Pipeline, TrackerConfig};
use tracing::{debug, error, info};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Clean, summarize and chart a spreadsheet of video metrics",
    long_about = "Reads a spreadsheet of per-video metrics, fills and normalizes it, prints \
                  summary statistics, renders five charts and writes the cleaned table.\n\n\
                  EXAMPLES:\n  \
                  # Defaults: youtube_growth_tracker.xlsx -> youtube_data_trackers.xlsx\n  \
                  growth-tracker\n\n  \
                  # CSV in, charts into their own directory\n  \
                  growth-tracker -i metrics.csv -o out/cleaned.xlsx -c out/charts\n\n  \
                  # Table and JSON summary only\n  \
                  growth-tracker --no-charts --emit-report"
)]
struct Args {
    /// Spreadsheet to read (.xlsx, .xls, .ods or .csv)
    #[arg(short, long, default_value = DEFAULT_INPUT)]
    input: String,

    /// Cleaned output file (.xlsx or .csv)
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: String,

    /// Directory for the chart images
    #[arg(short, long, default_value = ".")]
    chart_dir: String,

    /// Skip chart rendering
    #[arg(long)]
    no_charts: bool,

    /// Write summary_report.json next to the output file
    #[arg(short = 'r', long)]
    emit_report: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// `RUST_LOG` takes precedence over `--log-level`.
fn init_logging(level: &str, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level, args.quiet);
    debug!("Arguments: {:?}", args);

    if !std::path::Path::new(&args.input).exists() {
        return Err(anyhow!("Input file not found: {}", args.input));
    }

    let config = TrackerConfig::builder()
        .input(&args.input)
        .output(&args.output)
        .chart_dir(&args.chart_dir)
        .render_charts(!args.no_charts)
        .emit_report(args.emit_report)
        .build()
        .context("Invalid configuration")?;

    let pipeline = Pipeline::builder().config(config).build()?;
    match pipeline.run() {
        Ok(result) => {
            info!(
                "Finished in {} ms: {} rows, {} charts",
                result.duration_ms,
                result.report.rows,
                result.charts.len()
            );
            Ok(())
        }
        Err(e) => {
            error!("[{}] {}", e.error_code(), e);
            if e.is_io() {
                error!(
                    "Check that {} is readable and {} is writable",
                    args.input, args.output
                );
            }
            Err(anyhow!("Pipeline failed: {}", e))
        }
    }
}
