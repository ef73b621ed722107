//! Term counting, top-K truncation and cloud size weighting.

use indexmap::IndexMap;
use tracing::debug;

use crate::constants::aggregate::{SIZE_OFFSET, SIZE_SCALE};
use crate::data::{CloudEntry, FrequencyTable};
use crate::types::Term;

/// Count every term across all records.
///
/// Excluded terms are removed first (absent exclusions are ignored), then the
/// table is truncated to the `max_terms` highest counts with ties kept in
/// first-seen order.
pub fn aggregate<I, T, S, E>(term_sequences: I, max_terms: Option<usize>, exclude: &[E]) -> FrequencyTable
where
    I: IntoIterator<Item = T>,
    T: IntoIterator<Item = S>,
    S: AsRef<str>,
    E: AsRef<str>,
{
    let mut counts: IndexMap<Term, u64> = IndexMap::new();
    for terms in term_sequences {
        for term in terms {
            *counts.entry(term.as_ref().to_string()).or_insert(0) += 1;
        }
    }
    let distinct = counts.len();
    let mut table = FrequencyTable::from_counts(counts);
    table.exclude(exclude);
    if let Some(max_terms) = max_terms {
        table.truncate(max_terms);
    }
    debug!(
        distinct,
        kept = table.len(),
        excluded = exclude.len(),
        "aggregated term counts"
    );
    table
}

/// Split whitespace-joined texts into term sequences for `aggregate`.
pub fn split_terms<S: AsRef<str>>(texts: &[S]) -> Vec<Vec<Term>> {
    texts
        .iter()
        .map(|text| text.as_ref().split_whitespace().map(str::to_string).collect())
        .collect()
}

/// Map counts to render sizes.
///
/// `range = max - min + 1` (1 for an empty table), `ratio = 100 / range`,
/// `size = floor(count * ratio) + 10`. Entries keep table order.
pub fn normalize_weights(table: &FrequencyTable) -> Vec<CloudEntry> {
    let range = table
        .count_bounds()
        .map(|(min, max)| max - min + 1)
        .unwrap_or(1);
    let ratio = SIZE_SCALE / range as f64;
    table
        .iter()
        .map(|(term, count)| CloudEntry {
            text: term.to_string(),
            size: (count as f64 * ratio).floor() as u64 + SIZE_OFFSET,
        })
        .collect()
}
