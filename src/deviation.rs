//! Timer deviation analysis for benchmark logs
//!
//! Periodic benchmark tasks report the expected period next to the measured
//! `actual` and `full` latencies. This module extracts those reports, turns
//! them into absolute deviations from the expected period and summarises
//! them per log type and metric, both as a text report and as CSV rows
//! appended to a running history file.

use regex::Regex;
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::{BufRead, BufWriter, Write};
use std::path::Path;
use tracing::{debug, trace, warn};

/// A benchmark report line format
#[derive(Debug, Clone, Copy)]
pub struct LogPattern {
    pub name: &'static str,
    pub regex: &'static str,
    /// Name of the first capture (the reporter's id)
    pub id_key: &'static str,
    /// Metrics captured after `expected`, in capture order
    pub metrics: [&'static str; 2],
}

/// Known report formats, tried in order; the first match wins
pub static LOG_PATTERNS: [LogPattern; 2] = [
    LogPattern {
        name: "async_report",
        regex: r"ASYNC_TASK_REPORT (\d+): Iteration (\d+), expected (\d+)/ns, actual (\d+)/ns, full (\d+)/ns",
        id_key: "task_id",
        metrics: ["actual_ns", "full_ns"],
    },
    LogPattern {
        name: "native_report",
        regex: r"NATIVE_THREAD_REPORT (\d+): Iteration (\d+), expected (\d+)/ns, actual (\d+)/ns, full (\d+)/ns",
        id_key: "thread_id",
        metrics: ["actual_ns", "full_ns"],
    },
];

pub const CSV_HEADERS: [&str; 8] = [
    "timestamp",
    "log_type",
    "metric_name",
    "count",
    "mean_absolute_deviation",
    "std_deviation",
    "min_deviation",
    "max_deviation",
];

/// Deviations collected for one (log type, metric) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSeries {
    pub log_type: &'static str,
    pub metric: &'static str,
    pub deviations: Vec<u64>,
}

/// All deviations from one log, in pattern and metric declaration order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviationData {
    series: Vec<MetricSeries>,
}

impl Default for DeviationData {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviationData {
    pub fn new() -> Self {
        let series = LOG_PATTERNS
            .iter()
            .flat_map(|pattern| {
                pattern.metrics.iter().map(move |&metric| MetricSeries {
                    log_type: pattern.name,
                    metric,
                    deviations: Vec::new(),
                })
            })
            .collect();
        Self { series }
    }

    fn record(&mut self, log_type: &str, metric: &str, deviation: u64) {
        if let Some(series) = self
            .series
            .iter_mut()
            .find(|s| s.log_type == log_type && s.metric == metric)
        {
            series.deviations.push(deviation);
        }
    }

    /// True when no report line matched
    pub fn is_empty(&self) -> bool {
        self.series.iter().all(|s| s.deviations.is_empty())
    }

    /// Series that received at least one sample
    pub fn series(&self) -> impl Iterator<Item = &MetricSeries> {
        self.series.iter().filter(|s| !s.deviations.is_empty())
    }

    /// Log types that received at least one sample, in pattern order
    pub fn log_types(&self) -> Vec<&'static str> {
        let mut types: Vec<&'static str> = Vec::new();
        for series in self.series() {
            if !types.contains(&series.log_type) {
                types.push(series.log_type);
            }
        }
        types
    }
}

/// Descriptive statistics over absolute deviations
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviationStats {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; undefined for a single sample
    pub std_dev: Option<f64>,
    pub min: u64,
    pub max: u64,
}

impl DeviationStats {
    pub fn from_samples(samples: &[u64]) -> Option<Self> {
        let min = *samples.iter().min()?;
        let max = *samples.iter().max()?;
        let count = samples.len();
        let mean = samples.iter().map(|&s| s as f64).sum::<f64>() / count as f64;

        let std_dev = if count > 1 {
            let sum_sq: f64 = samples
                .iter()
                .map(|&s| {
                    let diff = s as f64 - mean;
                    diff * diff
                })
                .sum();
            Some((sum_sq / (count - 1) as f64).sqrt())
        } else {
            None
        };

        Some(Self {
            count,
            mean,
            std_dev,
            min,
            max,
        })
    }
}

/// One row of the JSON report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSummary {
    pub log_type: &'static str,
    pub metric_name: &'static str,
    #[serde(flatten)]
    pub stats: DeviationStats,
}

/// Compiled report patterns
#[derive(Debug)]
pub struct LogParser {
    patterns: Vec<(LogPattern, Regex)>,
}

impl LogParser {
    pub fn new() -> Result<Self, regex::Error> {
        let patterns = LOG_PATTERNS
            .iter()
            .map(|pattern| Ok((*pattern, Regex::new(pattern.regex)?)))
            .collect::<Result<Vec<_>, regex::Error>>()?;
        Ok(Self { patterns })
    }

    /// Record the deviations of one line, if it is a report line
    pub fn parse_line(&self, line: &str, data: &mut DeviationData) -> bool {
        for (pattern, regex) in &self.patterns {
            let Some(caps) = regex.captures(line) else {
                continue;
            };

            let values: Option<Vec<u64>> = caps
                .iter()
                .skip(1)
                .map(|m| m.and_then(|m| m.as_str().parse().ok()))
                .collect();
            let Some(values) = values else {
                warn!(
                    "{} line has a value that does not fit in 64 bits: {}",
                    pattern.name,
                    line.trim_end()
                );
                return false;
            };

            // id, iteration, expected, then one value per metric
            trace!("{} {}={} iteration={}", pattern.name, pattern.id_key, values[0], values[1]);
            let expected = values[2];
            for (metric, value) in pattern.metrics.iter().zip(&values[3..]) {
                data.record(pattern.name, metric, value.abs_diff(expected));
            }
            return true;
        }
        false
    }

    pub fn parse_log<R: BufRead>(&self, mut reader: R) -> std::io::Result<DeviationData> {
        let mut data = DeviationData::new();
        let mut buf = Vec::new();
        let mut matched = 0usize;
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            if self.parse_line(&String::from_utf8_lossy(&buf), &mut data) {
                matched += 1;
            }
        }
        debug!(matched, "report lines parsed");
        Ok(data)
    }
}

/// Per-metric statistics, in report order
pub fn summaries(data: &DeviationData) -> Vec<MetricSummary> {
    data.series()
        .filter_map(|series| {
            DeviationStats::from_samples(&series.deviations).map(|stats| MetricSummary {
                log_type: series.log_type,
                metric_name: series.metric,
                stats,
            })
        })
        .collect()
}

/// Human-readable report
pub fn summarize(data: &DeviationData) -> String {
    let mut output = String::new();
    let all = summaries(data);

    for log_type in data.log_types() {
        output.push_str(&format!("--- {} ---\n", log_type));
        for summary in all.iter().filter(|s| s.log_type == log_type) {
            let stats = &summary.stats;
            output.push_str(&format!("  Metric: {}\n", summary.metric_name));
            output.push_str(&format!("    Count: {}\n", stats.count));
            output.push_str(&format!(
                "    Mean Absolute Deviation: {:.2} ns\n",
                stats.mean
            ));
            match stats.std_dev {
                Some(sd) => output.push_str(&format!("    Std Dev: {:.2} ns\n", sd)),
                None => output.push_str("    Std Dev: N/A\n"),
            }
            output.push_str(&format!("    Min: {} ns\n", stats.min));
            output.push_str(&format!("    Max: {} ns\n", stats.max));
        }
        output.push('\n');
    }

    output
}

/// Round to two decimals, printed like a float (`10.0`, `12.5`, `12.35`)
fn round2(value: f64) -> String {
    format!("{:?}", (value * 100.0).round() / 100.0)
}

/// Escape CSV field (handle commas, quotes, newlines)
fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// CSV header line
pub fn csv_header() -> String {
    CSV_HEADERS.join(",")
}

/// CSV data rows, one per metric with samples
pub fn csv_rows(data: &DeviationData, timestamp: &str) -> Vec<String> {
    summaries(data)
        .iter()
        .map(|summary| {
            let stats = &summary.stats;
            [
                escape_field(timestamp),
                escape_field(summary.log_type),
                escape_field(summary.metric_name),
                stats.count.to_string(),
                round2(stats.mean),
                // A single sample has no spread; written as a bare integer 0
                stats.std_dev.map(round2).unwrap_or_else(|| "0".to_string()),
                stats.min.to_string(),
                stats.max.to_string(),
            ]
            .join(",")
        })
        .collect()
}

/// Append rows to `path`, writing the header first if the file is new
pub fn append_csv(path: &Path, data: &DeviationData, timestamp: &str) -> std::io::Result<()> {
    let is_new = !path.exists();
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut out = BufWriter::new(file);

    if is_new {
        writeln!(out, "{}", csv_header())?;
    }
    for row in csv_rows(data, timestamp) {
        writeln!(out, "{}", row)?;
    }
    out.flush()
}

/// Seconds since the Unix epoch, without a date-time dependency
pub fn unix_timestamp() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let duration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}", duration.as_secs())
}
