//! Benchmark record parsing
//!
//! Turns raw `go test -bench` style output into flat [`Sample`]s:
//!
//! ```text
//! BenchmarkGobEncode   	100	  13552735 ns/op	  56.63 MB/s
//! ```
//!
//! Anything that does not look like a benchmark record (headers, `PASS`,
//! `ok` lines, log noise) is silently ignored.

use serde::{Deserialize, Serialize};

/// Prefix every benchmark record starts with
pub const RECORD_PREFIX: &str = "Benchmark";

/// A single measured value with its unit (e.g. `13552735 ns/op`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub value: f64,
    pub unit: String,
}

/// One fully parsed benchmark line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Operation name with the `Benchmark` prefix stripped
    pub name: String,
    /// Iteration count reported by the runner
    pub iterations: u64,
    /// Value/unit pairs, in line order
    pub measurements: Vec<Measurement>,
}

/// One measurement of one metric for one operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub name: String,
    pub metric: String,
    pub value: f64,
    pub unit: String,
}

impl Record {
    /// Flatten the record into one sample per measurement
    pub fn samples(&self) -> Vec<Sample> {
        self.measurements
            .iter()
            .map(|m| Sample {
                name: self.name.clone(),
                metric: metric_name(&m.unit).to_string(),
                value: m.value,
                unit: m.unit.clone(),
            })
            .collect()
    }
}

/// Map a unit to the metric name used when reporting
///
/// Well-known Go benchmark units get their conventional names, anything
/// else is reported under the unit itself.
pub fn metric_name(unit: &str) -> &str {
    match unit {
        "ns/op" => "time/op",
        "MB/s" => "speed",
        "B/op" => "alloc/op",
        "allocs/op" => "allocs/op",
        other => other,
    }
}

/// Parse a single line into a [`Record`]
///
/// Returns `None` for anything that is not a complete record. A line
/// either yields every one of its measurements or nothing at all.
pub fn parse_line(line: &str) -> Option<Record> {
    let fields: Vec<&str> = line.split_whitespace().collect();

    // name, iterations, and at least one value/unit pair
    if fields.len() < 4 {
        return None;
    }

    let name = fields[0].strip_prefix(RECORD_PREFIX)?;
    if name.is_empty() {
        return None;
    }

    let iterations: u64 = fields[1].parse().ok()?;
    if iterations == 0 {
        return None;
    }

    let pairs = &fields[2..];
    if pairs.len() % 2 != 0 {
        tracing::trace!("dangling value without unit: {}", line);
        return None;
    }

    let mut measurements = Vec::with_capacity(pairs.len() / 2);
    for pair in pairs.chunks_exact(2) {
        let value: f64 = match pair[0].parse() {
            Ok(v) if f64::is_finite(v) => v,
            _ => {
                tracing::trace!("non-numeric measurement {:?}: {}", pair[0], line);
                return None;
            }
        };
        measurements.push(Measurement {
            value,
            unit: pair[1].to_string(),
        });
    }

    Some(Record {
        name: name.to_string(),
        iterations,
        measurements,
    })
}

/// Parse every record in `lines`, preserving order of appearance
pub fn parse_samples<S: AsRef<str>>(lines: &[S]) -> Vec<Sample> {
    let mut samples = Vec::new();
    for line in lines {
        let line = line.as_ref();
        match parse_line(line) {
            Some(record) => samples.extend(record.samples()),
            None => tracing::trace!("ignoring non-record line: {:?}", line),
        }
    }
    samples
}
