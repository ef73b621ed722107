use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub use crate::types::{OriginIndex, RecordText, SourceId, Term};

/// One unit of raw input text produced by the loader.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Position in the concatenated input, before post-processing.
    pub origin: OriginIndex,
    /// Source that produced this record.
    pub source: SourceId,
    /// Record text; `None` for missing values (JSON `null`, empty cells).
    pub text: Option<RecordText>,
}

/// Ordered records plus the origin indexes removed by post-processing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSet {
    records: Vec<Record>,
    dropped: Vec<OriginIndex>,
}

impl RecordSet {
    /// Build a record set from already-ordered records with no drops.
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records,
            dropped: Vec::new(),
        }
    }

    /// Build a record set from plain texts, one source, dense origins.
    pub fn from_texts<I, S>(source: impl Into<SourceId>, texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<RecordText>,
    {
        let source = source.into();
        let records = texts
            .into_iter()
            .enumerate()
            .map(|(origin, text)| Record {
                origin,
                source: source.clone(),
                text: Some(text.into()),
            })
            .collect();
        Self::new(records)
    }

    pub(crate) fn with_dropped(records: Vec<Record>, dropped: Vec<OriginIndex>) -> Self {
        Self { records, dropped }
    }

    /// Kept records, in post-processed order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Origin indexes removed by sort/dedup/missing filtering, ascending.
    pub fn dropped(&self) -> &[OriginIndex] {
        &self.dropped
    }

    /// Origin index of each surviving record, in order.
    pub fn origins(&self) -> Vec<OriginIndex> {
        self.records.iter().map(|record| record.origin).collect()
    }

    /// Record texts in order; missing values become empty strings so the
    /// record count is preserved downstream.
    pub fn texts(&self) -> Vec<RecordText> {
        self.records
            .iter()
            .map(|record| record.text.clone().unwrap_or_default())
            .collect()
    }

    /// Number of kept records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no record was kept.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Term counts ranked by descending count, ties in first-seen order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyTable {
    counts: IndexMap<Term, u64>,
}

impl FrequencyTable {
    /// Rank raw first-seen counts. The sort is stable, so equal counts keep
    /// their first-seen order.
    pub fn from_counts(counts: IndexMap<Term, u64>) -> Self {
        let mut counts = counts;
        counts.sort_by(|_, left, _, right| right.cmp(left));
        Self { counts }
    }

    /// Count of `term`, if present.
    pub fn get(&self, term: &str) -> Option<u64> {
        self.counts.get(term).copied()
    }

    /// Number of distinct terms.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether the table has no terms.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Entries in rank order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(term, count)| (term.as_str(), *count))
    }

    /// Highest-ranked term, if any.
    pub fn top(&self) -> Option<(&str, u64)> {
        self.iter().next()
    }

    /// Remove the given terms; absent terms are ignored.
    pub fn exclude<S: AsRef<str>>(&mut self, terms: &[S]) {
        for term in terms {
            self.counts.shift_remove(term.as_ref());
        }
    }

    /// Keep only the `max_terms` highest-ranked entries.
    pub fn truncate(&mut self, max_terms: usize) {
        self.counts.truncate(max_terms);
    }

    /// Smallest and largest count, or `None` when empty.
    pub fn count_bounds(&self) -> Option<(u64, u64)> {
        let min = self.counts.values().min()?;
        let max = self.counts.values().max()?;
        Some((*min, *max))
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }
}

/// A sized word handed to the renderer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloudEntry {
    /// Term shown in the cloud.
    pub text: Term,
    /// Font size weight.
    pub size: u64,
}
