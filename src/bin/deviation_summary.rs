use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::BufReader;
use syscap::cli::{DeviationCli, ReportFormat};
use syscap::deviation::{self, LogParser};
use syscap::logging::init_tracing;

fn main() -> Result<()> {
    let args = DeviationCli::parse();

    init_tracing(args.debug);

    let file = File::open(&args.log_file)
        .with_context(|| format!("Log file '{}' not found", args.log_file.display()))?;
    let parser = LogParser::new().context("Failed to compile report patterns")?;
    let data = parser
        .parse_log(BufReader::new(file))
        .with_context(|| format!("Failed to read log file '{}'", args.log_file.display()))?;

    if data.is_empty() {
        anyhow::bail!("No matching log entries found in the file.");
    }

    deviation::append_csv(&args.csv_file, &data, &deviation::unix_timestamp()).with_context(
        || format!("Error writing to CSV file '{}'", args.csv_file.display()),
    )?;

    match args.format {
        ReportFormat::Text => print!("{}", deviation::summarize(&data)),
        ReportFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&deviation::summaries(&data))?
        ),
    }

    Ok(())
}
