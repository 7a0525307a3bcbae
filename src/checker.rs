//! Threshold checks on benchmark deltas
//!
//! A check is written as `<metric>=<sign><number>%`:
//!
//! - `time/op=+10%` (or `time/op=10%`): fail if any operation got more than
//!   10% slower
//! - `speed=-5%`: fail if any operation lost more than 5% throughput
//!
//! The `%` is optional. A check only looks at results for the metric it
//! names; results for any other metric pass.

use crate::stat::{BenchDiff, StatResult};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Format of a check, for help texts
pub const CHECKER_FMT: &str = "<metric>=(+|-)<number>%";

/// Reasons a check rule fails to parse
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckerError {
    #[error("Empty check, expected format: {}", CHECKER_FMT)]
    Empty,

    #[error("Invalid check {0:?}: missing '=', expected format: {}", CHECKER_FMT)]
    MissingSeparator(String),

    #[error("Invalid check {0:?}: more than one '=', expected format: {}", CHECKER_FMT)]
    DuplicateSeparator(String),

    #[error("Invalid check {0:?}: metric name is empty")]
    EmptyMetric(String),

    #[error("Invalid check {0:?}: threshold is empty")]
    EmptyThreshold(String),

    #[error("Invalid check {rule:?}: threshold {threshold:?} is not a number")]
    InvalidThreshold { rule: String, threshold: String },
}

/// A pass/fail rule on the deltas of one metric
#[derive(Debug, Clone, PartialEq)]
pub struct Checker {
    metric: String,
    threshold: f64,
    repr: String,
}

impl Checker {
    /// Parse a check rule
    ///
    /// # Example
    /// ```
    /// use benchcheck::checker::Checker;
    ///
    /// let check = Checker::parse("time/op=+10%").unwrap();
    /// assert_eq!(check.metric(), "time/op");
    /// assert_eq!(check.threshold(), 10.0);
    ///
    /// assert!(Checker::parse("time/op=").is_err());
    /// ```
    pub fn parse(rule: &str) -> Result<Self, CheckerError> {
        if rule.is_empty() {
            return Err(CheckerError::Empty);
        }

        let mut parts = rule.split('=');
        let metric = parts.next().unwrap_or_default();
        let Some(value) = parts.next() else {
            return Err(CheckerError::MissingSeparator(rule.to_string()));
        };
        if parts.next().is_some() {
            return Err(CheckerError::DuplicateSeparator(rule.to_string()));
        }

        if metric.is_empty() {
            return Err(CheckerError::EmptyMetric(rule.to_string()));
        }

        let number = value.strip_suffix('%').unwrap_or(value);
        if number.is_empty() {
            return Err(CheckerError::EmptyThreshold(rule.to_string()));
        }

        let invalid = || CheckerError::InvalidThreshold {
            rule: rule.to_string(),
            threshold: number.to_string(),
        };
        // f64's parser also accepts "inf" and "NaN", which are not thresholds
        if !number
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.'))
        {
            return Err(invalid());
        }
        let threshold: f64 = number.parse().map_err(|_| invalid())?;

        Ok(Self {
            metric: metric.to_string(),
            threshold,
            repr: rule.to_string(),
        })
    }

    pub fn metric(&self) -> &str {
        &self.metric
    }

    /// Signed threshold in percent
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    fn violates(&self, diff: &BenchDiff) -> bool {
        if self.threshold >= 0.0 {
            diff.delta > self.threshold
        } else {
            diff.delta < self.threshold
        }
    }

    /// Evaluate the check against a result
    ///
    /// Returns `true` (pass) when the result is for another metric, or when
    /// no delta crosses the threshold. Equality with the threshold passes.
    pub fn check(&self, result: &StatResult) -> bool {
        result.metric != self.metric || !result.bench_diffs.iter().any(|d| self.violates(d))
    }

    /// Diffs of `result` that cross the threshold
    ///
    /// Empty when the result is for another metric.
    pub fn failures<'a>(&self, result: &'a StatResult) -> Vec<&'a BenchDiff> {
        if result.metric != self.metric {
            return Vec::new();
        }
        result
            .bench_diffs
            .iter()
            .filter(|d| self.violates(d))
            .collect()
    }
}

impl FromStr for Checker {
    type Err = CheckerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Checker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.repr)
    }
}
