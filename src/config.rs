use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::constants::aggregate::{MAX_TERMS, N_GRAMS};
use crate::constants::normalizer::{IGNORE_PREFIXES, MIN_WORD_LEN};
use crate::constants::reducer::IGNORE_CHARS;
use crate::stopwords::StopwordList;
use crate::types::{ColumnName, LangCode, RecordText, Term};

/// Per-record transform applied to present values right after concatenation.
pub type RecordTransform = Arc<dyn Fn(RecordText) -> RecordText + Send + Sync + 'static>;

/// Table columns requested by the loader.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ColumnSelection {
    /// No projection; the source must already be one-dimensional.
    #[default]
    All,
    /// A single column by header name or 0-based position.
    One(ColumnName),
    /// Several columns; projecting more than one is a format error.
    Many(Vec<ColumnName>),
}

impl ColumnSelection {
    /// Build a selection from a list, collapsing one entry to `One`.
    pub fn from_list<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ColumnName>,
    {
        let mut columns: Vec<ColumnName> = columns.into_iter().map(Into::into).collect();
        match columns.len() {
            0 => Self::All,
            1 => Self::One(columns.remove(0)),
            _ => Self::Many(columns),
        }
    }

    /// Requested column names, in order.
    pub fn names(&self) -> Vec<ColumnName> {
        match self {
            Self::All => Vec::new(),
            Self::One(column) => vec![column.clone()],
            Self::Many(columns) => columns.clone(),
        }
    }

    /// Whether a column projection was requested.
    pub fn is_requested(&self) -> bool {
        !matches!(self, Self::All)
    }
}

/// Options consumed by the source loader.
#[derive(Clone)]
pub struct LoaderOptions {
    /// Column(s) projected into record text.
    pub column: ColumnSelection,
    /// Explicit table delimiter; `None` sniffs it when a table is read.
    pub delimiter: Option<char>,
    /// Physical rows skipped before a table's header row.
    pub skip_rows: usize,
    /// Columns used for the descending sort after concatenation.
    pub sort_keys: Vec<ColumnName>,
    /// Remove repeated records, keeping the first occurrence.
    pub drop_duplicates: bool,
    /// Remove missing records.
    pub drop_missing: bool,
    /// Read `.json` files as JSON-lines (`true`) or as one document (`false`).
    pub json_records: bool,
    /// Transform applied to every present record.
    pub transform: Option<RecordTransform>,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            column: ColumnSelection::All,
            delimiter: None,
            skip_rows: 0,
            sort_keys: Vec::new(),
            drop_duplicates: false,
            drop_missing: false,
            json_records: true,
            transform: None,
        }
    }
}

impl fmt::Debug for LoaderOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoaderOptions")
            .field("column", &self.column)
            .field("delimiter", &self.delimiter)
            .field("skip_rows", &self.skip_rows)
            .field("sort_keys", &self.sort_keys)
            .field("drop_duplicates", &self.drop_duplicates)
            .field("drop_missing", &self.drop_missing)
            .field("json_records", &self.json_records)
            .field("transform", &self.transform.is_some())
            .finish()
    }
}

impl LoaderOptions {
    /// Select a single column by name or position.
    pub fn with_column(mut self, column: impl Into<ColumnName>) -> Self {
        self.column = ColumnSelection::One(column.into());
        self
    }

    /// Select a list of columns.
    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ColumnName>,
    {
        self.column = ColumnSelection::from_list(columns);
        self
    }

    /// Table delimiter used instead of sniffing.
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    /// Rows skipped before a table header.
    pub fn with_skip_rows(mut self, skip_rows: usize) -> Self {
        self.skip_rows = skip_rows;
        self
    }

    /// Columns used to sort records in descending order.
    pub fn with_sort_keys<I, S>(mut self, sort_keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ColumnName>,
    {
        self.sort_keys = sort_keys.into_iter().map(Into::into).collect();
        self
    }

    /// Drop repeated records, keeping the first.
    pub fn with_drop_duplicates(mut self, drop_duplicates: bool) -> Self {
        self.drop_duplicates = drop_duplicates;
        self
    }

    /// Drop records without text.
    pub fn with_drop_missing(mut self, drop_missing: bool) -> Self {
        self.drop_missing = drop_missing;
        self
    }

    /// Read `.json` files as JSON lines (`true`) or one document (`false`).
    pub fn with_json_records(mut self, json_records: bool) -> Self {
        self.json_records = json_records;
        self
    }

    /// Transform applied to every present record text.
    pub fn with_transform(mut self, transform: RecordTransform) -> Self {
        self.transform = Some(transform);
        self
    }
}

/// Word filtering rules applied by the text normalizer.
#[derive(Clone, Debug)]
pub struct NormalizerConfig {
    /// Minimum token length, in characters.
    pub min_word_len: usize,
    /// Prefixes that discard a word (checked before punctuation stripping).
    pub ignore_prefixes: Vec<String>,
    /// Stopwords, matched after normalization.
    pub stopwords: HashSet<Term>,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            min_word_len: MIN_WORD_LEN,
            ignore_prefixes: IGNORE_PREFIXES.iter().map(|p| p.to_string()).collect(),
            stopwords: HashSet::new(),
        }
    }
}

impl NormalizerConfig {
    /// Minimum token length, in characters.
    pub fn with_min_word_len(mut self, min_word_len: usize) -> Self {
        self.min_word_len = min_word_len;
        self
    }

    /// Prefixes that discard a word.
    pub fn with_ignore_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the stopword set.
    pub fn with_stopwords<I, S>(mut self, stopwords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Term>,
    {
        self.stopwords = stopwords.into_iter().map(Into::into).collect();
        self
    }

    /// Use one of the built-in stopword lists.
    pub fn with_stopword_list(self, list: StopwordList) -> Self {
        self.with_stopwords(list.words())
    }
}

/// Top-level pipeline configuration; stage toggles drive the builder.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    /// Loader options used when the pipeline reads sources.
    pub loader: LoaderOptions,
    /// Word filtering rules for the normalizer stage.
    pub normalizer: NormalizerConfig,
    /// Enable the normalizer stage.
    pub use_tokens: bool,
    /// Enable the Snowball stemmer stage.
    pub use_stemmer: bool,
    /// Language hint for the stemmer; `None` detects per record.
    pub lang: Option<LangCode>,
    /// Leading characters that remove a word before stemming.
    pub ignore_chars: String,
    /// Leave the language's stopwords unstemmed.
    pub ignore_stopwords: bool,
    /// N-gram width; `None` skips the n-gram stage.
    pub n_grams: Option<usize>,
    /// Number of terms kept by the aggregator; `None` keeps all.
    pub max_terms: Option<usize>,
    /// Terms removed by the aggregator before truncation.
    pub exclude_terms: Vec<Term>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            loader: LoaderOptions::default(),
            normalizer: NormalizerConfig::default(),
            use_tokens: true,
            use_stemmer: false,
            lang: None,
            ignore_chars: IGNORE_CHARS.to_string(),
            ignore_stopwords: true,
            n_grams: Some(N_GRAMS),
            max_terms: Some(MAX_TERMS),
            exclude_terms: Vec::new(),
        }
    }
}
