// Configuration for benchmark comparison statistics
//
// Defaults follow the conventions of Go's benchstat: outlier rejection via
// the interquartile range, mean of the remaining values, alpha = 0.05.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Central estimate reported for each side of a comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Center {
    /// Arithmetic mean of the values left after outlier rejection
    Mean,
    /// Median of the values left after outlier rejection
    Median,
}

/// Configuration for benchmark comparison
///
/// # Example
/// ```
/// use benchcheck::stat::StatConfig;
///
/// let config = StatConfig::default();
/// assert_eq!(config.significance_level, 0.05); // 95% confidence
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatConfig {
    /// Significance level (alpha) for the Mann-Whitney U test
    ///
    /// A difference whose p-value exceeds this level is reported as a
    /// delta of 0%.
    ///
    /// - 0.05 (default): 95% confidence
    /// - 0.01: stricter, fewer reported changes
    /// - 0.10: looser, more reported changes
    pub significance_level: f64,

    /// Which central estimate to summarize each side with
    pub center: Center,

    /// Discard values outside `[Q1 - k*IQR, Q3 + k*IQR]` before summarizing
    ///
    /// Default: true
    pub remove_outliers: bool,

    /// The `k` in the outlier fence above
    ///
    /// Default: 1.5 (Tukey's fences)
    pub outlier_iqr_factor: f64,
}

impl Default for StatConfig {
    fn default() -> Self {
        Self {
            significance_level: 0.05,
            center: Center::Mean,
            remove_outliers: true,
            outlier_iqr_factor: 1.5,
        }
    }
}

impl StatConfig {
    /// alpha = 0.01: only report changes the test is very sure about
    pub fn strict() -> Self {
        Self {
            significance_level: 0.01,
            ..Self::default()
        }
    }

    /// alpha = 0.10: surfaces borderline changes, at the cost of more noise
    pub fn permissive() -> Self {
        Self {
            significance_level: 0.10,
            ..Self::default()
        }
    }

    /// Reject settings the engine cannot work with
    pub fn validate(&self) -> Result<()> {
        if !(self.significance_level > 0.0 && self.significance_level < 1.0) {
            return Err(Error::Config(format!(
                "significance_level must be in (0, 1), got {}",
                self.significance_level
            )));
        }

        if !(self.outlier_iqr_factor.is_finite() && self.outlier_iqr_factor >= 0.0) {
            return Err(Error::Config(format!(
                "outlier_iqr_factor must be non-negative, got {}",
                self.outlier_iqr_factor
            )));
        }

        Ok(())
    }
}
