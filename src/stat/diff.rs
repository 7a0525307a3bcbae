// Benchmark diffs: old vs new per (metric, operation)
//
// The delta is only reported when the Mann-Whitney U test says the two
// sides differ at the configured significance level; otherwise it is 0%.
// Groups with a single retained sample on either side cannot be tested and
// take a reduced-confidence path with a plain center-to-center delta.

use crate::aggregate::{group_samples, BenchmarkGroup};
use crate::error::{Error, Result};
use crate::parser::parse_samples;
use crate::stat::config::StatConfig;
use crate::stat::statistics::{mann_whitney_u, TestError};
use crate::stat::summary::{Scaler, Summary};
use serde::Serialize;
use std::fmt;

/// How much weight a reported delta carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    /// Delta gated by a significance test
    Full,
    /// Single sample on at least one side: direct delta, no significance test
    Reduced,
}

/// Comparison of one operation between old and new runs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchDiff {
    pub name: String,
    /// Old side summary, e.g. `13.6ms ± 1%`
    pub old: String,
    /// New side summary
    pub new: String,
    /// Signed percentage change; 0.0 when not statistically significant
    pub delta: f64,
    pub old_center: f64,
    pub new_center: f64,
    /// p-value of the significance test, absent on the reduced path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p_value: Option<f64>,
    pub confidence: Confidence,
    /// Samples used on each side after outlier rejection
    pub old_samples: usize,
    pub new_samples: usize,
}

impl BenchDiff {
    /// Build a diff carrying only a name and delta
    ///
    /// Handy for evaluating checkers against hand-made results.
    pub fn with_delta(name: impl Into<String>, delta: f64) -> Self {
        Self {
            name: name.into(),
            old: String::new(),
            new: String::new(),
            delta,
            old_center: 0.0,
            new_center: 0.0,
            p_value: None,
            confidence: Confidence::Full,
            old_samples: 0,
            new_samples: 0,
        }
    }
}

impl fmt::Display for BenchDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: old {}: new {}: delta: {:+.2}%",
            self.name, self.old, self.new, self.delta
        )?;
        if self.confidence == Confidence::Reduced {
            write!(f, " (single sample, not significance tested)")?;
        }
        Ok(())
    }
}

/// All diffs observed under one metric
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatResult {
    pub metric: String,
    /// Diffs in order of first appearance in the old samples
    pub bench_diffs: Vec<BenchDiff>,
    /// Operations whose delta is undefined (zero old center)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub undefined: Vec<String>,
}

impl StatResult {
    pub fn new(metric: impl Into<String>, bench_diffs: Vec<BenchDiff>) -> Self {
        Self {
            metric: metric.into(),
            bench_diffs,
            undefined: Vec::new(),
        }
    }
}

/// Outcome of diffing a single group
#[derive(Debug, Clone, PartialEq)]
pub enum GroupOutcome {
    Diff(BenchDiff),
    /// Old center is zero, or a center or the change is not finite
    Undefined { name: String },
}

/// Signed change relative to the magnitude of `old`, so a positive result
/// always means the value went up, including for negative baselines.
fn percent_change(old: f64, new: f64) -> f64 {
    let delta = (new - old) / old.abs() * 100.0;
    // adding 0.0 turns a rounded -0.0 into 0.0
    (delta * 100.0).round() / 100.0 + 0.0
}

/// Compute the diff for one benchmark group
///
/// # Errors
/// Returns [`Error::Inconsistent`] if either side of the group is empty,
/// which a correctly aggregated group never is.
pub fn diff_group(group: &BenchmarkGroup, config: &StatConfig) -> Result<GroupOutcome> {
    let inconsistent = || {
        Error::Inconsistent(format!(
            "group {} ({}) has {} old and {} new samples",
            group.name,
            group.metric,
            group.old.len(),
            group.new.len()
        ))
    };
    let old = Summary::from_values(&group.old, config).ok_or_else(inconsistent)?;
    let new = Summary::from_values(&group.new, config).ok_or_else(inconsistent)?;

    let reduced = old.retained.len() < 2 || new.retained.len() < 2;
    let (confidence, p_value, significant) = if reduced {
        (Confidence::Reduced, None, true)
    } else {
        match mann_whitney_u(&old.retained, &new.retained) {
            Ok(test) => {
                tracing::debug!(
                    "{} ({}): U={} p={:.4} exact={}",
                    group.name,
                    group.metric,
                    test.u,
                    test.p_value,
                    test.exact
                );
                (
                    Confidence::Full,
                    Some(test.p_value),
                    test.p_value <= config.significance_level,
                )
            }
            Err(TestError::SamplesEqual) => (Confidence::Full, Some(1.0), false),
            Err(e @ TestError::SampleSize { .. }) => {
                return Err(Error::Inconsistent(format!("{} ({}): {}", group.name, group.metric, e)))
            }
        }
    };

    let undefined = |reason: &str| {
        tracing::warn!(
            "{} ({}): {}, delta is undefined",
            group.name,
            group.metric,
            reason
        );
        GroupOutcome::Undefined {
            name: group.name.clone(),
        }
    };

    if !old.center.is_finite() || !new.center.is_finite() {
        return Ok(undefined("center is not finite"));
    }

    let delta = if !significant || old.center == new.center {
        0.0
    } else if old.center == 0.0 {
        return Ok(undefined("old center is zero"));
    } else {
        let delta = percent_change(old.center, new.center);
        if !delta.is_finite() {
            return Ok(undefined("change overflows"));
        }
        delta
    };

    let scaler = Scaler::for_unit(old.center, &group.unit);
    Ok(GroupOutcome::Diff(BenchDiff {
        name: group.name.clone(),
        old: old.format(&scaler),
        new: new.format(&scaler),
        delta,
        old_center: old.center,
        new_center: new.center,
        p_value,
        confidence,
        old_samples: old.retained.len(),
        new_samples: new.retained.len(),
    }))
}

/// Compare raw old and new benchmark output
///
/// Lines that are not benchmark records are ignored. Benchmarks present on
/// only one side are dropped. Results are ordered by metric, then
/// operation, following first appearance in `old`.
///
/// # Example
/// ```
/// use benchcheck::stat::{stat, StatConfig};
///
/// let old = ["BenchmarkA 10 100 ns/op", "BenchmarkA 10 100 ns/op"];
/// let new = ["BenchmarkA 10 100 ns/op", "BenchmarkA 10 100 ns/op"];
///
/// let results = stat(&old, &new, &StatConfig::default()).unwrap();
/// assert_eq!(results[0].metric, "time/op");
/// assert_eq!(results[0].bench_diffs[0].delta, 0.0);
/// ```
pub fn stat<S: AsRef<str>>(old: &[S], new: &[S], config: &StatConfig) -> Result<Vec<StatResult>> {
    config.validate()?;

    let old_samples = parse_samples(old);
    let new_samples = parse_samples(new);
    tracing::debug!(
        "parsed {} old and {} new samples",
        old_samples.len(),
        new_samples.len()
    );

    let mut results = Vec::new();
    for metric in group_samples(&old_samples, &new_samples) {
        let mut result = StatResult::new(metric.metric, Vec::new());
        for group in &metric.groups {
            match diff_group(group, config)? {
                GroupOutcome::Diff(diff) => result.bench_diffs.push(diff),
                GroupOutcome::Undefined { name } => result.undefined.push(name),
            }
        }
        results.push(result);
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(old: &[f64], new: &[f64]) -> BenchmarkGroup {
        BenchmarkGroup {
            name: "Op".to_string(),
            metric: "time/op".to_string(),
            unit: "ns/op".to_string(),
            old: old.to_vec(),
            new: new.to_vec(),
        }
    }

    fn unwrap_diff(outcome: GroupOutcome) -> BenchDiff {
        match outcome {
            GroupOutcome::Diff(diff) => diff,
            other => panic!("Expected diff, got {:?}", other),
        }
    }

    #[test]
    fn test_percent_change_rounds_to_hundredths() {
        assert_eq!(percent_change(13599058.0, 11789288.6), -13.31);
        assert_eq!(percent_change(100.0, 120.0), 20.0);
        assert_eq!(percent_change(100.0, 80.0), -20.0);
    }

    #[test]
    fn test_percent_change_never_negative_zero() {
        let delta = percent_change(100_000.0, 99_999.999);
        assert_eq!(delta, 0.0);
        assert!(delta.is_sign_positive());
    }

    #[test]
    fn test_significant_change_reports_delta() {
        let outcome = diff_group(
            &group(&[100.0, 101.0, 102.0, 100.0, 101.0], &[120.0, 121.0, 122.0, 120.0, 121.0]),
            &StatConfig::default(),
        )
        .unwrap();
        let diff = unwrap_diff(outcome);

        assert_eq!(diff.confidence, Confidence::Full);
        assert!(diff.p_value.unwrap() < 0.05);
        assert!((diff.delta - 19.84).abs() < 0.01, "delta = {}", diff.delta);
    }

    #[test]
    fn test_insignificant_change_reports_zero() {
        let outcome = diff_group(
            &group(&[100.0, 105.0, 98.0, 102.0, 101.0], &[102.0, 106.0, 99.0, 103.0, 100.0]),
            &StatConfig::default(),
        )
        .unwrap();
        let diff = unwrap_diff(outcome);

        assert_eq!(diff.delta, 0.0);
        assert!(diff.p_value.unwrap() > 0.05);
        assert_ne!(diff.old_center, diff.new_center);
    }

    #[test]
    fn test_single_sample_takes_reduced_path() {
        let diff = unwrap_diff(diff_group(&group(&[100.0], &[110.0]), &StatConfig::default()).unwrap());

        assert_eq!(diff.confidence, Confidence::Reduced);
        assert_eq!(diff.p_value, None);
        assert_eq!(diff.delta, 10.0);
        assert!(diff.to_string().contains("single sample"));
    }

    #[test]
    fn test_single_sample_one_side_only() {
        let diff = unwrap_diff(
            diff_group(&group(&[100.0, 100.0, 100.0], &[90.0]), &StatConfig::default()).unwrap(),
        );

        assert_eq!(diff.confidence, Confidence::Reduced);
        assert_eq!(diff.delta, -10.0);
    }

    #[test]
    fn test_all_equal_is_no_change() {
        let diff = unwrap_diff(
            diff_group(&group(&[50.0, 50.0], &[50.0, 50.0, 50.0]), &StatConfig::default()).unwrap(),
        );

        assert_eq!(diff.delta, 0.0);
        assert_eq!(diff.p_value, Some(1.0));
    }

    #[test]
    fn test_zero_baseline_is_undefined() {
        let outcome = diff_group(&group(&[0.0], &[5.0]), &StatConfig::default()).unwrap();
        assert_eq!(
            outcome,
            GroupOutcome::Undefined {
                name: "Op".to_string()
            }
        );
    }

    #[test]
    fn test_zero_baseline_without_change_is_zero() {
        let diff = unwrap_diff(diff_group(&group(&[0.0], &[0.0]), &StatConfig::default()).unwrap());
        assert_eq!(diff.delta, 0.0);
    }

    #[test]
    fn test_zero_baseline_significant_change_is_undefined() {
        let outcome = diff_group(
            &group(&[0.0, 0.0, 0.0, 0.0, 0.0], &[5.0, 6.0, 7.0, 8.0, 9.0]),
            &StatConfig::default(),
        )
        .unwrap();
        assert_eq!(
            outcome,
            GroupOutcome::Undefined {
                name: "Op".to_string()
            }
        );
    }

    #[test]
    fn test_zero_baseline_leaves_other_operations_intact() {
        let old = [
            "BenchmarkZero 10 0 allocs/op",
            "BenchmarkKept 10 10 allocs/op",
            "BenchmarkZero 10 0 allocs/op",
            "BenchmarkKept 10 11 allocs/op",
            "BenchmarkZero 10 0 allocs/op",
            "BenchmarkKept 10 12 allocs/op",
            "BenchmarkZero 10 0 allocs/op",
            "BenchmarkKept 10 13 allocs/op",
            "BenchmarkZero 10 0 allocs/op",
            "BenchmarkKept 10 14 allocs/op",
        ];
        let new = [
            "BenchmarkZero 10 5 allocs/op",
            "BenchmarkKept 10 20 allocs/op",
            "BenchmarkZero 10 6 allocs/op",
            "BenchmarkKept 10 21 allocs/op",
            "BenchmarkZero 10 7 allocs/op",
            "BenchmarkKept 10 22 allocs/op",
            "BenchmarkZero 10 8 allocs/op",
            "BenchmarkKept 10 23 allocs/op",
            "BenchmarkZero 10 9 allocs/op",
            "BenchmarkKept 10 24 allocs/op",
        ];

        let results = stat(&old, &new, &StatConfig::default()).unwrap();

        assert_eq!(results[0].undefined, vec!["Zero".to_string()]);
        assert_eq!(results[0].bench_diffs.len(), 1);
        let kept = &results[0].bench_diffs[0];
        assert_eq!(kept.name, "Kept");
        assert_eq!(kept.confidence, Confidence::Full);
        assert_eq!(kept.delta, 83.33);
    }

    #[test]
    fn test_negative_baseline_keeps_direction() {
        let up = unwrap_diff(diff_group(&group(&[-10.0], &[-5.0]), &StatConfig::default()).unwrap());
        assert_eq!(up.delta, 50.0);

        let down = unwrap_diff(diff_group(&group(&[-10.0], &[-15.0]), &StatConfig::default()).unwrap());
        assert_eq!(down.delta, -50.0);

        let results = stat(
            &["BenchmarkNeg 1 -10 score"],
            &["BenchmarkNeg 1 -5 score"],
            &StatConfig::default(),
        )
        .unwrap();
        assert!(results[0].bench_diffs[0].delta > 0.0);
    }

    #[test]
    fn test_huge_values_give_finite_delta() {
        let old = [1.0e308, 1.1e308, 1.2e308, 1.3e308];
        let new = [1.0e300, 1.1e300, 1.2e300, 1.3e300];
        let diff = unwrap_diff(diff_group(&group(&old, &new), &StatConfig::default()).unwrap());

        assert!(diff.old_center.is_finite());
        assert!(diff.delta.is_finite());
        assert_eq!(diff.delta, -100.0);

        let result = StatResult::new("time/op", vec![diff]);
        let check = crate::checker::Checker::parse("time/op=-10%").unwrap();
        assert!(!check.check(&result));
    }

    #[test]
    fn test_overflowing_change_is_undefined() {
        let outcome = diff_group(&group(&[1.0e-300], &[1.0e308]), &StatConfig::default()).unwrap();
        assert_eq!(
            outcome,
            GroupOutcome::Undefined {
                name: "Op".to_string()
            }
        );
    }

    #[test]
    fn test_empty_side_is_inconsistent() {
        let result = diff_group(&group(&[], &[1.0]), &StatConfig::default());
        assert!(matches!(result, Err(Error::Inconsistent(_))));
    }

    #[test]
    fn test_display_format() {
        let diff = BenchDiff {
            name: "GobEncode".to_string(),
            old: "13.6ms ± 1%".to_string(),
            new: "11.8ms ± 1%".to_string(),
            ..BenchDiff::with_delta("GobEncode", -13.31)
        };
        assert_eq!(
            diff.to_string(),
            "GobEncode: old 13.6ms ± 1%: new 11.8ms ± 1%: delta: -13.31%"
        );

        assert!(BenchDiff::with_delta("X", 0.0)
            .to_string()
            .ends_with("delta: +0.00%"));
    }

    #[test]
    fn test_stat_rejects_invalid_config() {
        let config = StatConfig {
            significance_level: 2.0,
            ..StatConfig::default()
        };
        let lines: [&str; 0] = [];
        assert!(matches!(stat(&lines, &lines, &config), Err(Error::Config(_))));
    }
}
