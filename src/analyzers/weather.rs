//! Collapsing of rare weather conditions into a single `OTHER` bucket.

use std::collections::BTreeMap;

use crate::analyzers::types::CategoryCount;
use crate::analyzers::utility::share;
use crate::dataset::Dataset;

pub const OTHER_LABEL: &str = "OTHER";

/// Categories whose share of all records is strictly below this are merged.
pub const COLLAPSE_THRESHOLD: f64 = 0.02;

/// Weather condition counts with rare conditions merged into [`OTHER_LABEL`].
///
/// Blank conditions are left out, so shares are measured against the
/// records that report a condition. Works on a local count table; the
/// dataset's weather labels are not rewritten.
pub fn weather_distribution(dataset: &Dataset) -> Vec<CategoryCount> {
    collapse_categories(
        dataset.iter().filter_map(|r| r.known_weather()).map(|w| (w, 1)),
        COLLAPSE_THRESHOLD,
    )
}

/// Merges every category with `share < threshold` into [`OTHER_LABEL`].
///
/// Input pairs may repeat a label; their counts are summed first. An existing
/// `OTHER` category absorbs the merged counts. The result is sorted by count
/// descending, then label. Applying it to its own output changes nothing.
pub fn collapse_categories<'a, I>(counts: I, threshold: f64) -> Vec<CategoryCount>
where
    I: IntoIterator<Item = (&'a str, usize)>,
{
    let mut merged: BTreeMap<&str, usize> = BTreeMap::new();
    for (label, count) in counts {
        *merged.entry(label).or_insert(0) += count;
    }
    let total: usize = merged.values().sum();

    let mut collapsed: BTreeMap<&str, usize> = BTreeMap::new();
    for (label, count) in merged {
        let target = if share(count, total) < threshold {
            OTHER_LABEL
        } else {
            label
        };
        *collapsed.entry(target).or_insert(0) += count;
    }

    let mut out: Vec<CategoryCount> = collapsed
        .into_iter()
        .map(|(label, count)| CategoryCount::new(label, count))
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    out
}
