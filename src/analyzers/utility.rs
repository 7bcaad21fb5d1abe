use std::collections::BTreeMap;

use crate::error::ReportError;

/// Counts occurrences of each value. Keys iterate in ascending order.
pub fn value_counts<K, I>(values: I) -> BTreeMap<K, usize>
where
    K: Ord,
    I: IntoIterator<Item = K>,
{
    let mut counts = BTreeMap::new();
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }
    counts
}

/// Returns the most frequent key. Ties go to the lowest key.
pub fn mode<K: Ord + Clone>(counts: &BTreeMap<K, usize>) -> Option<K> {
    let mut best: Option<(&K, usize)> = None;
    for (key, &count) in counts {
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((key, count)),
        }
    }
    best.map(|(key, _)| key.clone())
}

/// Mode of `values`, failing with [`ReportError::EmptyDataset`] when there
/// are none. `statistic` names the figure in the error.
pub fn mode_of<K, I>(values: I, statistic: &'static str) -> Result<K, ReportError>
where
    K: Ord + Clone,
    I: IntoIterator<Item = K>,
{
    mode(&value_counts(values)).ok_or(ReportError::EmptyDataset { statistic })
}

/// Fraction of `part` in `total`. Returns 0.0 when `total` is zero.
pub fn share(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64
    }
}

/// Same as [`share`], scaled to a percentage.
pub fn pct(part: usize, total: usize) -> f64 {
    share(part, total) * 100.0
}
