//! CLI argument parsing for benchcheck

use crate::checker::Checker;
use crate::stat::Center;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for comparison results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "benchcheck")]
#[command(version)]
#[command(
    about = "Compare benchmark runs of two revisions and gate on performance regressions",
    long_about = None
)]
pub struct Cli {
    /// Saved benchmark output of the old revision
    #[arg(long = "old-file", value_name = "FILE", requires = "new_file", conflicts_with_all = ["old", "new"])]
    pub old_file: Option<PathBuf>,

    /// Saved benchmark output of the new revision
    #[arg(long = "new-file", value_name = "FILE", requires = "old_file")]
    pub new_file: Option<PathBuf>,

    /// Name of the module being benchmarked (used in logs and errors)
    #[arg(long = "mod", value_name = "MODULE", default_value = ".")]
    pub module: String,

    /// Old revision to benchmark (a directory, relative to --root if given)
    #[arg(long, value_name = "REV", requires = "new")]
    pub old: Option<String>,

    /// New revision to benchmark (a directory, relative to --root if given)
    #[arg(long, value_name = "REV", requires = "old")]
    pub new: Option<String>,

    /// Directory holding one checkout per revision
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Benchmark runs per revision [default: 5]
    #[arg(long, value_name = "N")]
    pub count: Option<usize>,

    /// Benchmark selection pattern, substituted for {pattern} in the command [default: .]
    #[arg(long, value_name = "PATTERN")]
    pub bench: Option<String>,

    /// Check to perform, in the form <metric>=(+|-)<number>%. Eg: time/op=10%
    #[arg(long = "check", value_name = "CHECK", value_parser = Checker::parse)]
    pub checks: Vec<Checker>,

    /// TOML configuration file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Significance level for the Mann-Whitney U test [default: 0.05]
    #[arg(long, value_name = "ALPHA")]
    pub alpha: Option<f64>,

    /// Central estimate used for each side [default: mean]
    #[arg(long, value_enum)]
    pub center: Option<Center>,

    /// Keep outlying runs instead of discarding them
    #[arg(long = "keep-outliers")]
    pub keep_outliers: bool,

    /// Output format (text or json)
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Enable debug tracing output to stderr
    #[arg(long = "debug")]
    pub debug: bool,

    /// Benchmark command (everything after --), run in each revision's directory
    #[arg(last = true)]
    pub command: Option<Vec<String>>,
}
