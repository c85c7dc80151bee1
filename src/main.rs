use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{BufReader, Write};
use tracetally::chart::BarChart;
use tracetally::cli::{ChartArgs, ChartFormat, Cli, Command, TallyArgs};
use tracetally::csv_output::CsvOutput;
use tracetally::filter::FunctionFilter;
use tracetally::html_output::HtmlOutput;
use tracetally::pattern::TracePattern;
use tracetally::summary::{TraceSummary, STDIO_PATH};
use tracetally::tally::FunctionTally;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Scan the trace log and write the function count summary
fn run_tally(args: TallyArgs) -> Result<()> {
    let pattern = TracePattern::new(&args.prefix)?;
    let filter = match &args.only {
        Some(list) => FunctionFilter::from_list(list),
        None => FunctionFilter::all(),
    };

    let tally = if args.input.as_os_str() == STDIO_PATH {
        FunctionTally::scan(std::io::stdin().lock(), &pattern, &filter)
            .context("Failed to read trace log from stdin")?
    } else {
        let file = File::open(&args.input)
            .with_context(|| format!("Failed to open trace log {}", args.input.display()))?;
        FunctionTally::scan(BufReader::new(file), &pattern, &filter)
            .with_context(|| format!("Failed to read trace log {}", args.input.display()))?
    };

    if args.summary {
        tally.print_summary();
    }

    TraceSummary::from(tally)
        .save(&args.output)
        .context("Failed to write function count summary")?;
    Ok(())
}

/// Load a summary and render it in the requested format
fn run_chart(args: ChartArgs) -> Result<()> {
    let summary = TraceSummary::load(&args.input).context("Failed to load function counts")?;
    let chart = BarChart::from_summary(&summary, args.percentages, args.sort);

    let rendered = match args.format {
        ChartFormat::Text => chart.to_text(args.width),
        ChartFormat::Html => HtmlOutput::new(&chart, "Function Trace Counts").to_html(),
        ChartFormat::Csv => CsvOutput::new(&chart).to_csv(),
    };

    match &args.output {
        Some(path) => std::fs::write(path, rendered)
            .with_context(|| format!("Failed to write chart to {}", path.display()))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(rendered.as_bytes())
                .context("Failed to write chart to stdout")?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Cli::parse();

    // Initialize tracing if --debug flag is set
    init_tracing(args.debug);

    match args.command {
        Command::Tally(tally_args) => run_tally(tally_args),
        Command::Chart(chart_args) => run_chart(chart_args),
    }
}
