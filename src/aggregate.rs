//! Grouping of old/new samples into comparable benchmark groups
//!
//! Samples are keyed by `(metric, name)`. Only keys observed on both sides
//! survive; a benchmark added or removed between revisions cannot be
//! compared and is dropped without error.

use crate::parser::Sample;
use std::collections::HashMap;

/// All old and new values recorded for one `(metric, name)` identity
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkGroup {
    pub name: String,
    pub metric: String,
    pub unit: String,
    pub old: Vec<f64>,
    pub new: Vec<f64>,
}

/// Groups sharing one metric, in old-collection order
#[derive(Debug, Clone, PartialEq)]
pub struct MetricGroups {
    pub metric: String,
    pub groups: Vec<BenchmarkGroup>,
}

/// Insertion-ordered collection of values per `(metric, name)`
#[derive(Default)]
struct OrderedSamples<'a> {
    index: HashMap<&'a str, HashMap<&'a str, usize>>,
    entries: Vec<(&'a Sample, Vec<f64>)>,
}

impl<'a> OrderedSamples<'a> {
    fn collect(samples: &'a [Sample]) -> Self {
        let mut ordered = Self::default();
        for sample in samples {
            let names = ordered.index.entry(sample.metric.as_str()).or_default();
            match names.get(sample.name.as_str()) {
                Some(&i) => ordered.entries[i].1.push(sample.value),
                None => {
                    names.insert(sample.name.as_str(), ordered.entries.len());
                    ordered.entries.push((sample, vec![sample.value]));
                }
            }
        }
        ordered
    }

    fn get(&self, metric: &str, name: &str) -> Option<&[f64]> {
        let &i = self.index.get(metric)?.get(name)?;
        Some(self.entries[i].1.as_slice())
    }
}

/// Pair old and new samples into per-metric benchmark groups
///
/// Metrics and the operations under each metric are ordered by their first
/// appearance in `old`. An empty side produces an empty result.
pub fn group_samples(old: &[Sample], new: &[Sample]) -> Vec<MetricGroups> {
    let old_samples = OrderedSamples::collect(old);
    let new_samples = OrderedSamples::collect(new);

    let mut metrics: Vec<MetricGroups> = Vec::new();
    for (first, old_values) in &old_samples.entries {
        let Some(new_values) = new_samples.get(&first.metric, &first.name) else {
            tracing::debug!(
                "dropping {} ({}): not present in new samples",
                first.name,
                first.metric
            );
            continue;
        };

        let group = BenchmarkGroup {
            name: first.name.clone(),
            metric: first.metric.clone(),
            unit: first.unit.clone(),
            old: old_values.clone(),
            new: new_values.to_vec(),
        };

        match metrics.iter_mut().find(|m| m.metric == group.metric) {
            Some(existing) => existing.groups.push(group),
            None => metrics.push(MetricGroups {
                metric: group.metric.clone(),
                groups: vec![group],
            }),
        }
    }

    for (first, _) in &new_samples.entries {
        if old_samples.get(&first.metric, &first.name).is_none() {
            tracing::debug!(
                "dropping {} ({}): not present in old samples",
                first.name,
                first.metric
            );
        }
    }

    metrics
}
