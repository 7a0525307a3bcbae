// Per-side summaries and human readable value scaling
//
// Summary strings look like `13.6ms ± 1%`: the center scaled to a readable
// unit with three significant digits, then the largest relative distance
// of any retained value from that center.

use crate::stat::config::{Center, StatConfig};
use crate::stat::outliers::reject_outliers;
use crate::stat::statistics::{bounds, mean, median};
use serde::Serialize;

/// Descriptive statistics for one side of a benchmark group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Values left after outlier rejection
    pub retained: Vec<f64>,
    /// Number of values rejected as outliers
    pub rejected: usize,
    pub center: f64,
    pub min: f64,
    pub max: f64,
}

impl Summary {
    /// Summarize raw values according to `config`
    ///
    /// Returns `None` for an empty slice.
    pub fn from_values(values: &[f64], config: &StatConfig) -> Option<Self> {
        let (retained, rejected) = if config.remove_outliers {
            reject_outliers(values, config.outlier_iqr_factor)
        } else {
            (values.to_vec(), Vec::new())
        };

        let (min, max) = bounds(&retained)?;
        let center = match config.center {
            Center::Mean => mean(&retained),
            Center::Median => median(&retained),
        };

        Some(Self {
            retained,
            rejected: rejected.len(),
            center,
            min,
            max,
        })
    }

    /// Largest relative deviation of a retained value from the center
    ///
    /// `None` when the center or maximum is zero, where a ratio is meaningless.
    pub fn spread(&self) -> Option<f64> {
        if self.center == 0.0 || self.max == 0.0 {
            return None;
        }
        let below = 1.0 - self.min / self.center;
        let above = self.max / self.center - 1.0;
        Some(below.max(above))
    }

    /// Render as `<scaled center> ± <spread>%`
    pub fn format(&self, scaler: &Scaler) -> String {
        match self.spread() {
            Some(spread) => format!("{} ± {:.0}%", scaler.format(self.center), spread * 100.0),
            None => scaler.format(self.center),
        }
    }
}

/// Formats values of one unit with a fixed scale and precision
///
/// A scaler is chosen once per benchmark (from the old center) so both
/// sides of a comparison print in the same magnitude.
#[derive(Debug, Clone, PartialEq)]
pub struct Scaler {
    divisor: f64,
    precision: usize,
    suffix: String,
}

// (threshold, divisor, precision, prefix) for SI-scaled plain units
const SI_STEPS: &[(f64, f64, usize, &str)] = &[
    (99.5e12, 1e12, 0, "T"),
    (9.95e12, 1e12, 1, "T"),
    (995e9, 1e12, 2, "T"),
    (99.5e9, 1e9, 0, "G"),
    (9.95e9, 1e9, 1, "G"),
    (995e6, 1e9, 2, "G"),
    (99.5e6, 1e6, 0, "M"),
    (9.95e6, 1e6, 1, "M"),
    (995e3, 1e6, 2, "M"),
    (99.5e3, 1e3, 0, "k"),
    (9.95e3, 1e3, 1, "k"),
    (995.0, 1e3, 2, "k"),
    (99.5, 1.0, 0, ""),
    (9.95, 1.0, 1, ""),
];

// (threshold in seconds, seconds per displayed unit, precision, unit)
const TIME_STEPS: &[(f64, f64, usize, &str)] = &[
    (99.5, 1.0, 0, "s"),
    (9.95, 1.0, 1, "s"),
    (0.995, 1.0, 2, "s"),
    (0.0995, 1e-3, 0, "ms"),
    (0.00995, 1e-3, 1, "ms"),
    (0.000995, 1e-3, 2, "ms"),
    (0.0000995, 1e-6, 0, "µs"),
    (0.00000995, 1e-6, 1, "µs"),
    (0.000000995, 1e-6, 2, "µs"),
    (0.0000000995, 1e-9, 0, "ns"),
    (0.00000000995, 1e-9, 1, "ns"),
];

impl Scaler {
    /// Pick a scale for values of `unit` around magnitude `value`
    ///
    /// `ns/op` is shown as a duration, `MB/s` and `B/op` as byte quantities,
    /// anything else as a plain SI-scaled number.
    pub fn for_unit(value: f64, unit: &str) -> Self {
        if unit == "ns/op" {
            return Self::for_time(value);
        }

        let prescale = if unit == "MB/s" { 1e6 } else { 1.0 };
        let x = value.abs() * prescale;
        let (divisor, precision, prefix) = SI_STEPS
            .iter()
            .find(|step| x >= step.0)
            .map(|&(_, divisor, precision, prefix)| (divisor, precision, prefix))
            .unwrap_or((1.0, 2, ""));

        let suffix = match unit {
            "MB/s" => format!("{}B/s", prefix),
            "B/op" => format!("{}B", prefix),
            _ => prefix.to_string(),
        };

        Self {
            divisor: divisor / prescale,
            precision,
            suffix,
        }
    }

    fn for_time(ns: f64) -> Self {
        let seconds = ns.abs() / 1e9;
        let (unit_seconds, precision, suffix) = TIME_STEPS
            .iter()
            .find(|step| seconds >= step.0)
            .map(|&(_, unit_seconds, precision, suffix)| (unit_seconds, precision, suffix))
            .unwrap_or((1e-9, 2, "ns"));

        Self {
            divisor: unit_seconds * 1e9,
            precision,
            suffix: suffix.to_string(),
        }
    }

    pub fn format(&self, value: f64) -> String {
        format!("{:.*}{}", self.precision, value / self.divisor, self.suffix)
    }
}
