// Statistical primitives for benchmark comparison
//
// - Quantiles use the R-8 definition (median-unbiased), which is also what
//   Go's benchstat relies on for outlier fences.
// - The Mann-Whitney U test is nonparametric: benchmark timings are skewed
//   and rarely normal, so a rank test is preferred over a t-test.
// - Small untied samples use the exact null distribution; everything else
//   uses the normal approximation with tie and continuity correction.

use thiserror::Error;

/// Largest per-side sample size for which the exact U distribution is used
pub const EXACT_LIMIT: usize = 50;

/// Reasons a significance test cannot be performed
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TestError {
    #[error("Need at least {required} samples per side, got {old} and {new}")]
    SampleSize {
        required: usize,
        old: usize,
        new: usize,
    },

    #[error("All samples are equal")]
    SamplesEqual,
}

/// Result of a two-sided Mann-Whitney U test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MannWhitney {
    /// U statistic of the first sample
    pub u: f64,
    /// Two-sided p-value
    pub p_value: f64,
    /// Whether the exact null distribution was used
    pub exact: bool,
}

/// Arithmetic mean; `NaN` for an empty slice
///
/// Falls back to a running mean when the plain sum overflows, so finite
/// inputs near `f64::MAX` still give a finite result.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let sum: f64 = values.iter().sum();
    if sum.is_finite() {
        return sum / values.len() as f64;
    }
    values
        .iter()
        .enumerate()
        .fold(0.0, |m, (i, &v)| m + (v / (i + 1) as f64 - m / (i + 1) as f64))
}

/// Minimum and maximum of `values`
pub fn bounds(values: &[f64]) -> Option<(f64, f64)> {
    let first = *values.first()?;
    Some(
        values
            .iter()
            .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))),
    )
}

/// Quantile `q` in `[0, 1]` of an already sorted slice (R-8 definition)
///
/// Returns `NaN` for an empty slice.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let Some((&first, &last)) = sorted.first().zip(sorted.last()) else {
        return f64::NAN;
    };
    if q <= 0.0 {
        return first;
    }
    if q >= 1.0 {
        return last;
    }

    let n = sorted.len() as f64;
    let h = 1.0 / 3.0 + q * (n + 1.0 / 3.0);
    let k = h.floor();
    let frac = h - k;
    let k = k as usize;

    if k == 0 {
        first
    } else if k >= sorted.len() {
        last
    } else {
        sorted[k - 1] + frac * (sorted[k] - sorted[k - 1])
    }
}

/// Quantile `q` of unsorted values
pub fn quantile(values: &[f64], q: f64) -> f64 {
    quantile_sorted(&sorted(values), q)
}

/// Median of unsorted values
///
/// The R-8 quantile at 0.5 coincides with the textbook median (middle value,
/// or mean of the two middle values).
pub fn median(values: &[f64]) -> f64 {
    quantile(values, 0.5)
}

pub(crate) fn sorted(values: &[f64]) -> Vec<f64> {
    let mut v = values.to_vec();
    v.sort_by(f64::total_cmp);
    v
}

/// Two-sided Mann-Whitney U test of whether `x` and `y` differ in location
///
/// # Example
/// ```
/// use benchcheck::stat::mann_whitney_u;
///
/// let old = [10.0, 11.0, 12.0, 13.0, 14.0];
/// let new = [20.0, 21.0, 22.0, 23.0, 24.0];
///
/// let test = mann_whitney_u(&old, &new).unwrap();
/// assert!(test.p_value < 0.05);
/// ```
pub fn mann_whitney_u(x: &[f64], y: &[f64]) -> Result<MannWhitney, TestError> {
    let (n1, n2) = (x.len(), y.len());
    if n1 == 0 || n2 == 0 {
        return Err(TestError::SampleSize {
            required: 1,
            old: n1,
            new: n2,
        });
    }

    // Pool both samples, remembering which side each value came from
    let mut pooled: Vec<(f64, bool)> = x
        .iter()
        .map(|&v| (v, true))
        .chain(y.iter().map(|&v| (v, false)))
        .collect();
    pooled.sort_by(|a, b| a.0.total_cmp(&b.0));

    if pooled.first().map(|p| p.0) == pooled.last().map(|p| p.0) {
        return Err(TestError::SamplesEqual);
    }

    // Average ranks over tie blocks
    let mut rank_sum_x = 0.0;
    let mut tie_correction = 0.0;
    let mut i = 0;
    while i < pooled.len() {
        let mut j = i + 1;
        while j < pooled.len() && pooled[j].0 == pooled[i].0 {
            j += 1;
        }
        let t = (j - i) as f64;
        let avg_rank = (i + 1 + j) as f64 / 2.0;
        rank_sum_x += pooled[i..j].iter().filter(|p| p.1).count() as f64 * avg_rank;
        tie_correction += t * t * t - t;
        i = j;
    }

    let (n1f, n2f) = (n1 as f64, n2 as f64);
    let u1 = rank_sum_x - n1f * (n1f + 1.0) / 2.0;
    let u2 = n1f * n2f - u1;
    let has_ties = tie_correction > 0.0;

    if !has_ties && n1 <= EXACT_LIMIT && n2 <= EXACT_LIMIT {
        let u_min = u1.min(u2).round() as usize;
        let p_value = (2.0 * exact_cdf(n1, n2, u_min)).min(1.0);
        return Ok(MannWhitney {
            u: u1,
            p_value,
            exact: true,
        });
    }

    let n = n1f + n2f;
    let mu = n1f * n2f / 2.0;
    let variance = n1f * n2f / 12.0 * ((n + 1.0) - tie_correction / (n * (n - 1.0)));
    if variance <= 0.0 {
        return Err(TestError::SamplesEqual);
    }
    let z = ((u1 - mu).abs() - 0.5).max(0.0) / variance.sqrt();
    let p_value = erfc(z / std::f64::consts::SQRT_2).min(1.0);

    Ok(MannWhitney {
        u: u1,
        p_value,
        exact: false,
    })
}

/// P(U <= u) under the null hypothesis for sample sizes `m` and `n`
///
/// The number of arrangements with a given U is the coefficient of the
/// Gaussian binomial `[m + n choose m]_q`, built up one factor at a time:
/// `[n + i choose i] = [n + i - 1 choose i - 1] * (1 - q^(n+i)) / (1 - q^i)`.
fn exact_cdf(m: usize, n: usize, u: usize) -> f64 {
    let max_u = m * n;
    let mut coeffs = vec![0i128; max_u + 1];
    coeffs[0] = 1;

    for i in 1..=m {
        let deg = (i - 1) * n;
        // multiply by (1 - q^(n+i))
        for k in (0..=deg).rev() {
            if k + n + i <= max_u {
                coeffs[k + n + i] -= coeffs[k];
            }
        }
        // divide by (1 - q^i); exact, so everything above degree i*n returns to zero
        for k in i..=max_u {
            coeffs[k] += coeffs[k - i];
        }
    }

    let total: i128 = coeffs.iter().sum();
    let below: i128 = coeffs[..=u.min(max_u)].iter().sum();
    below as f64 / total as f64
}

/// Complementary error function
///
/// Numerical Recipes' Chebyshev fit, fractional error below 1.2e-7.
pub(crate) fn erfc(x: f64) -> f64 {
    let z = x.abs();
    let t = 1.0 / (1.0 + 0.5 * z);
    let poly = -z * z - 1.265_512_23
        + t * (1.000_023_68
            + t * (0.374_091_96
                + t * (0.096_784_18
                    + t * (-0.186_288_06
                        + t * (0.278_868_07
                            + t * (-1.135_203_98
                                + t * (1.488_515_87
                                    + t * (-0.822_152_23 + t * 0.170_872_77))))))));
    let r = t * poly.exp();
    if x >= 0.0 {
        r
    } else {
        2.0 - r
    }
}
