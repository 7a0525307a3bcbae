// Outlier rejection for repeated benchmark runs
//
// A single run disturbed by the OS (scheduling, frequency scaling, page
// cache misses) can drag a mean far from the typical value. Values outside
// Tukey's fences are dropped before a side is summarized or tested.

use crate::stat::statistics::{quantile_sorted, sorted};

/// Split `values` into those inside `[Q1 - k*IQR, Q3 + k*IQR]` and those outside
///
/// Order of the input is preserved in both halves. Empty input yields two
/// empty vectors.
///
/// # Example
/// ```
/// use benchcheck::stat::reject_outliers;
///
/// let (kept, dropped) = reject_outliers(&[10.0, 11.0, 10.0, 12.0, 95.0], 1.5);
/// assert_eq!(kept, vec![10.0, 11.0, 10.0, 12.0]);
/// assert_eq!(dropped, vec![95.0]);
/// ```
pub fn reject_outliers(values: &[f64], factor: f64) -> (Vec<f64>, Vec<f64>) {
    if values.is_empty() {
        return (Vec::new(), Vec::new());
    }

    let ordered = sorted(values);
    let q1 = quantile_sorted(&ordered, 0.25);
    let q3 = quantile_sorted(&ordered, 0.75);
    let iqr = q3 - q1;
    let (lo, hi) = (q1 - factor * iqr, q3 + factor * iqr);

    values.iter().partition(|&&v| lo <= v && v <= hi)
}
