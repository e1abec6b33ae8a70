//! CLI argument parsing for the syscap binaries

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Report format for deviation summaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable text (default)
    Text,
    /// JSON array, one object per metric
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "tagger")]
#[command(version)]
#[command(
    about = "Tag a riscv64 listing with the syscall capability classes it uses",
    long_about = None
)]
pub struct TaggerCli {
    /// Disassembly listing to scan
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Tag file to create or overwrite
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Extra marker; "img" appends the img tag
    #[arg(value_name = "EXTRA_MARKER")]
    pub extra_marker: Option<String>,

    /// Log every recognized instruction to stderr
    #[arg(long)]
    pub debug: bool,
}

#[derive(Parser, Debug)]
#[command(name = "deviation-summary")]
#[command(version)]
#[command(about = "Summarise timer deviations from benchmark logs", long_about = None)]
pub struct DeviationCli {
    /// Benchmark log to analyse
    #[arg(value_name = "LOGFILE")]
    pub log_file: PathBuf,

    /// CSV history file to append to
    #[arg(value_name = "CSV", default_value = "summary.csv")]
    pub csv_file: PathBuf,

    /// Summary format printed to stdout
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: ReportFormat,

    /// Enable debug logging to stderr
    #[arg(long)]
    pub debug: bool,
}

#[derive(Parser, Debug)]
#[command(name = "parse-size")]
#[command(version)]
#[command(about = "Convert a size such as 4g or 0x1000b to bytes", long_about = None)]
pub struct ParseSizeCli {
    /// Size string
    #[arg(value_name = "SIZE", allow_hyphen_values = true)]
    pub size: String,

    /// Enable debug logging to stderr
    #[arg(long)]
    pub debug: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagger_positional_args() {
        let cli = TaggerCli::parse_from(["tagger", "app.S", "features.txt"]);
        assert_eq!(cli.input, PathBuf::from("app.S"));
        assert_eq!(cli.output, PathBuf::from("features.txt"));
        assert!(cli.extra_marker.is_none());
        assert!(!cli.debug);
    }

    #[test]
    fn test_tagger_extra_marker() {
        let cli = TaggerCli::parse_from(["tagger", "app.S", "features.txt", "img"]);
        assert_eq!(cli.extra_marker.as_deref(), Some("img"));
    }

    #[test]
    fn test_tagger_debug_flag() {
        let cli = TaggerCli::parse_from(["tagger", "--debug", "app.S", "features.txt"]);
        assert!(cli.debug);
    }

    #[test]
    fn test_tagger_requires_output() {
        assert!(TaggerCli::try_parse_from(["tagger", "app.S"]).is_err());
        assert!(TaggerCli::try_parse_from(["tagger"]).is_err());
    }

    #[test]
    fn test_deviation_default_csv() {
        let cli = DeviationCli::parse_from(["deviation-summary", "bench.log"]);
        assert_eq!(cli.csv_file, PathBuf::from("summary.csv"));
        assert_eq!(cli.format, ReportFormat::Text);
    }

    #[test]
    fn test_deviation_custom_csv_and_json() {
        let cli = DeviationCli::parse_from([
            "deviation-summary",
            "--format",
            "json",
            "bench.log",
            "out.csv",
        ]);
        assert_eq!(cli.csv_file, PathBuf::from("out.csv"));
        assert_eq!(cli.format, ReportFormat::Json);
    }

    #[test]
    fn test_deviation_rejects_extra_args() {
        assert!(DeviationCli::try_parse_from(["deviation-summary", "a", "b", "c"]).is_err());
    }

    #[test]
    fn test_parse_size_arg() {
        let cli = ParseSizeCli::parse_from(["parse-size", "4g"]);
        assert_eq!(cli.size, "4g");
    }
}
