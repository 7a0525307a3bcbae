//! Text and JSON rendering of stat results and check verdicts

use crate::checker::Checker;
use crate::stat::StatResult;
use serde::Serialize;

/// Verdict of one checker across all results
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckOutcome {
    /// Rule as written by the user
    pub rule: String,
    pub metric: String,
    pub threshold: f64,
    pub passed: bool,
    /// Operations whose delta crossed the threshold
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<String>,
}

/// Evaluate every checker against every result
pub fn evaluate(results: &[StatResult], checks: &[Checker]) -> Vec<CheckOutcome> {
    checks
        .iter()
        .map(|check| {
            let failures: Vec<String> = results
                .iter()
                .flat_map(|result| check.failures(result))
                .map(|diff| diff.name.clone())
                .collect();
            CheckOutcome {
                rule: check.to_string(),
                metric: check.metric().to_string(),
                threshold: check.threshold(),
                passed: failures.is_empty(),
                failures,
            }
        })
        .collect()
}

/// True when no checker fails on any result
pub fn all_passed(results: &[StatResult], checks: &[Checker]) -> bool {
    checks
        .iter()
        .all(|check| results.iter().all(|result| check.check(result)))
}

/// Plain text report
///
/// ```text
/// metric: time/op
/// GobEncode: old 13.6ms ± 1%: new 11.8ms ± 1%: delta: -13.31%
/// check failed: time/op=-10%
///   GobEncode: delta: -13.31%
/// ```
pub fn render_text(results: &[StatResult], checks: &[Checker]) -> String {
    let mut out = String::new();

    for result in results {
        out.push_str(&format!("metric: {}\n", result.metric));
        for diff in &result.bench_diffs {
            out.push_str(&format!("{}\n", diff));
        }
        for name in &result.undefined {
            out.push_str(&format!("{}: delta undefined (zero or non-finite old value)\n", name));
        }
        for check in checks {
            let failures = check.failures(result);
            if failures.is_empty() {
                continue;
            }
            out.push_str(&format!("check failed: {}\n", check));
            for diff in failures {
                out.push_str(&format!("  {}: delta: {:+.2}%\n", diff.name, diff.delta));
            }
        }
    }

    out
}

#[derive(Serialize)]
struct JsonReport<'a> {
    results: &'a [StatResult],
    #[serde(skip_serializing_if = "Vec::is_empty")]
    checks: Vec<CheckOutcome>,
    passed: bool,
}

/// Pretty printed JSON document with results and check outcomes
pub fn render_json(results: &[StatResult], checks: &[Checker]) -> anyhow::Result<String> {
    let report = JsonReport {
        results,
        checks: evaluate(results, checks),
        passed: all_passed(results, checks),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}
