//! CLI argument parsing for tracetally

use crate::chart::SortOrder;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Default trace log read by `tally`
pub const DEFAULT_LOG: &str = "output_trace.txt";
/// Default summary file written by `tally` and read by `chart`
pub const DEFAULT_SUMMARY: &str = "function_counts.json";

/// Upper bound for `--width`
pub const MAX_CHART_WIDTH: u64 = 1000;

/// Output format for charts
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ChartFormat {
    /// Horizontal bars in the terminal (default)
    Text,
    /// Standalone HTML page with an SVG bar chart
    Html,
    /// CSV rows for spreadsheet analysis
    Csv,
}

#[derive(Parser, Debug)]
#[command(name = "tracetally")]
#[command(version)]
#[command(about = "Tally per-function trace lines from analyzer logs and chart them", long_about = None)]
pub struct Cli {
    /// Enable debug logging to stderr
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Count trace lines per function and write a JSON summary
    Tally(TallyArgs),
    /// Render a bar chart from a JSON summary
    Chart(ChartArgs),
}

#[derive(Args, Debug)]
pub struct TallyArgs {
    /// Trace log to scan ("-" for stdin)
    #[arg(value_name = "LOG", default_value = DEFAULT_LOG)]
    pub input: PathBuf,

    /// Summary file to write ("-" for stdout)
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_SUMMARY)]
    pub output: PathBuf,

    /// Literal marker that starts a trace line
    #[arg(long, value_name = "PREFIX", default_value = crate::pattern::DEFAULT_PREFIX)]
    pub prefix: String,

    /// Only count these functions (comma-separated)
    #[arg(long = "only", value_name = "NAMES")]
    pub only: Option<String>,

    /// Print a per-function summary table to stderr
    #[arg(short = 'c', long = "summary")]
    pub summary: bool,
}

#[derive(Args, Debug)]
pub struct ChartArgs {
    /// Summary file to read ("-" for stdin)
    #[arg(value_name = "SUMMARY", default_value = DEFAULT_SUMMARY)]
    pub input: PathBuf,

    /// Plot each function's share of all trace lines instead of raw counts
    #[arg(short, long)]
    pub percentages: bool,

    /// Chart output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: ChartFormat,

    /// Bar order
    #[arg(long, value_enum, default_value = "first-seen")]
    pub sort: SortOrder,

    /// Width of the longest bar in text output (1-1000)
    #[arg(
        long,
        value_name = "COLUMNS",
        default_value = "60",
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..=MAX_CHART_WIDTH)
    )]
    pub width: usize,

    /// Write the chart to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}
