// Benchmark statistics engine
//
// Compares repeated benchmark runs of an old and a new revision and reports,
// per metric and operation, a summary of each side and the percentage
// change between them.
//
// Pipeline:
// - parser: raw output lines -> flat samples
// - aggregate: samples -> (metric, name) groups present on both sides
// - stat: groups -> outlier rejection, summaries, Mann-Whitney U gating,
//   signed percentage deltas
//
// Noise handling:
// - Tukey's fences drop single disturbed runs before anything is computed
// - A difference is only reported when the rank test rejects "same
//   distribution" at the configured significance level (default 0.05)
// - Single-sample groups cannot be tested and are reported with reduced
//   confidence

mod config;
mod diff;
mod outliers;
mod statistics;
mod summary;

pub use config::{Center, StatConfig};
pub use diff::{diff_group, stat, BenchDiff, Confidence, GroupOutcome, StatResult};
pub use outliers::reject_outliers;
pub use statistics::{mann_whitney_u, mean, median, quantile, MannWhitney, TestError};
pub use summary::{Scaler, Summary};
