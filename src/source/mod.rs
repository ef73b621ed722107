//! Source descriptors and the multi-source loader.
//!
//! Loading model:
//! - every `SourceDescriptor` is resolved on its own (in parallel) into
//!   projected rows: one text value plus the requested sort key values;
//! - rows are concatenated in input order and given dense origin indexes;
//! - post-steps run in a fixed order: transform, sort, drop duplicates,
//!   drop missing. Removed origins are kept on the `RecordSet`.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::debug;

use crate::config::LoaderOptions;
use crate::constants::loader::MEMORY_SOURCE_PREFIX;
use crate::data::{Record, RecordSet};
use crate::errors::PipelineError;
use crate::types::{ColumnName, RecordText, SourceId};

/// Column-named frames and one-dimensional projection.
pub mod frame;
/// Format readers (delimited table, JSON, plain lines).
pub mod readers;
/// Delimiter sniffing and path classification.
pub mod sniff;

use frame::ProjectedRow;
use readers::json::{read_json_document, read_json_lines};
use readers::lines::read_lines;
use readers::table::read_table;
use sniff::{SourceFormat, classify, table_format};

/// One input to the loader.
///
/// `Path` is classified by extension and sniffing; the other path variants
/// force a reader.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SourceDescriptor {
    /// Path classified by extension, options and first-line sniffing.
    Path(PathBuf),
    /// Delimited table; `None` uses the loader delimiter or sniffs one.
    Table {
        /// Table file.
        path: PathBuf,
        /// Field delimiter.
        delimiter: Option<char>,
    },
    /// One JSON value per line.
    JsonLines(PathBuf),
    /// One JSON document for the whole file.
    JsonDocument(PathBuf),
    /// One record per non-blank line.
    Lines(PathBuf),
    /// Records already in memory; `None` entries are missing values.
    InMemory {
        /// Source id; `None` falls back to `memory[<position>]`.
        id: Option<SourceId>,
        /// Record texts in order.
        records: Vec<Option<RecordText>>,
    },
}

impl SourceDescriptor {
    /// Path source, classified at load time.
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }

    /// In-memory source from plain texts.
    pub fn memory<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<RecordText>,
    {
        Self::InMemory {
            id: None,
            records: texts.into_iter().map(|text| Some(text.into())).collect(),
        }
    }

    /// Source id used in records, logs and errors.
    pub fn source_id(&self, position: usize) -> SourceId {
        match self {
            Self::Path(path)
            | Self::Table { path, .. }
            | Self::JsonLines(path)
            | Self::JsonDocument(path)
            | Self::Lines(path) => path.display().to_string(),
            Self::InMemory { id: Some(id), .. } => id.clone(),
            Self::InMemory { id: None, .. } => format!("{MEMORY_SOURCE_PREFIX}[{position}]"),
        }
    }
}

impl From<PathBuf> for SourceDescriptor {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&Path> for SourceDescriptor {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

/// Rows produced by one source, before concatenation.
struct SourceRows {
    source_id: SourceId,
    rows: Vec<ProjectedRow>,
}

/// A concatenated row moving through the post-steps.
struct PendingRecord {
    record: Record,
    sort_values: Vec<Option<String>>,
}

/// Resolves source descriptors into a single ordered `RecordSet`.
#[derive(Clone, Debug, Default)]
pub struct SourceLoader {
    options: LoaderOptions,
}

impl SourceLoader {
    /// Loader over `options`.
    pub fn new(options: LoaderOptions) -> Self {
        Self { options }
    }

    /// Options this loader applies.
    pub fn options(&self) -> &LoaderOptions {
        &self.options
    }

    /// Load, concatenate and post-process every source.
    pub fn load(&self, sources: &[SourceDescriptor]) -> Result<RecordSet, PipelineError> {
        let loaded = sources
            .par_iter()
            .enumerate()
            .map(|(position, source)| self.load_one(position, source))
            .collect::<Result<Vec<_>, _>>()?;

        let mut pending = Vec::new();
        for source in loaded {
            for row in source.rows {
                pending.push(PendingRecord {
                    record: Record {
                        origin: pending.len(),
                        source: source.source_id.clone(),
                        text: row.text,
                    },
                    sort_values: row.sort_values,
                });
            }
        }
        let total = pending.len();

        if let Some(transform) = &self.options.transform {
            for entry in &mut pending {
                entry.record.text = entry.record.text.take().map(|text| transform(text));
            }
        }
        if !self.options.sort_keys.is_empty() {
            let modes = key_modes(&pending, self.options.sort_keys.len());
            debug!(modes = ?modes, "sorting records");
            pending.sort_by(|a, b| compare_descending(&a.sort_values, &b.sort_values, &modes));
        }
        if self.options.drop_duplicates {
            let mut seen: HashSet<Option<RecordText>> = HashSet::new();
            pending.retain(|entry| seen.insert(entry.record.text.clone()));
        }
        if self.options.drop_missing {
            pending.retain(|entry| entry.record.text.is_some());
        }

        let records: Vec<Record> = pending.into_iter().map(|entry| entry.record).collect();
        let kept: BTreeSet<usize> = records.iter().map(|record| record.origin).collect();
        let dropped: Vec<usize> = (0..total).filter(|origin| !kept.contains(origin)).collect();
        debug!(
            sources = sources.len(),
            total,
            kept = records.len(),
            dropped = ?dropped,
            "loaded records"
        );
        Ok(RecordSet::with_dropped(records, dropped))
    }

    fn load_one(
        &self,
        position: usize,
        source: &SourceDescriptor,
    ) -> Result<SourceRows, PipelineError> {
        let source_id = source.source_id(position);
        let rows = match source {
            SourceDescriptor::InMemory { records, .. } => self.series_rows(records.clone()),
            SourceDescriptor::Lines(path) => self.read_format(&source_id, path, SourceFormat::Lines)?,
            SourceDescriptor::JsonLines(path) => {
                self.read_format(&source_id, path, SourceFormat::JsonLines)?
            }
            SourceDescriptor::JsonDocument(path) => {
                self.read_format(&source_id, path, SourceFormat::JsonDocument)?
            }
            SourceDescriptor::Table { path, delimiter } => {
                let format = table_format(path, delimiter.or(self.options.delimiter))?;
                self.read_format(&source_id, path, format)?
            }
            SourceDescriptor::Path(path) => {
                let format = classify(path, &self.options)?;
                self.read_format(&source_id, path, format)?
            }
        };
        debug!(source_id = %source_id, rows = rows.len(), "resolved source");
        Ok(SourceRows { source_id, rows })
    }

    fn read_format(
        &self,
        source_id: &str,
        path: &Path,
        format: SourceFormat,
    ) -> Result<Vec<ProjectedRow>, PipelineError> {
        let options = &self.options;
        let frame = match format {
            SourceFormat::Lines => {
                let texts = read_lines(path)?;
                return Ok(self.series_rows(texts.into_iter().map(Some).collect()));
            }
            SourceFormat::JsonLines => read_json_lines(source_id, path)?,
            SourceFormat::JsonDocument => read_json_document(source_id, path)?,
            SourceFormat::Table { delimiter } => read_table(
                source_id,
                path,
                delimiter,
                options.skip_rows,
                &self.wanted_columns(),
            )?,
        };
        debug!(
            source_id = %source_id,
            format = ?format,
            columns = ?frame.columns(),
            "read tabular source"
        );
        frame.project(&options.column, &options.sort_keys)
    }

    /// One-dimensional rows; sort keys resolve to missing values.
    fn series_rows(&self, records: Vec<Option<RecordText>>) -> Vec<ProjectedRow> {
        let keys = self.options.sort_keys.len();
        records
            .into_iter()
            .map(|text| ProjectedRow {
                text,
                sort_values: vec![None; keys],
            })
            .collect()
    }

    /// Union of the requested text columns and sort keys, in request order.
    fn wanted_columns(&self) -> Vec<ColumnName> {
        let mut wanted: Vec<ColumnName> = Vec::new();
        for column in self
            .options
            .column
            .names()
            .into_iter()
            .chain(self.options.sort_keys.iter().cloned())
        {
            if !wanted.contains(&column) {
                wanted.push(column);
            }
        }
        wanted
    }
}

/// Load `sources` with `options`.
pub fn load(
    sources: &[SourceDescriptor],
    options: &LoaderOptions,
) -> Result<RecordSet, PipelineError> {
    SourceLoader::new(options.clone()).load(sources)
}

/// How the values of one sort key compare.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum KeyMode {
    Numeric,
    Lexicographic,
}

/// A key is numeric only when every present value parses as a number.
fn key_modes(pending: &[PendingRecord], keys: usize) -> Vec<KeyMode> {
    (0..keys)
        .map(|key| {
            let numeric = pending
                .iter()
                .filter_map(|entry| entry.sort_values.get(key).and_then(Option::as_deref))
                .all(|value| value.trim().parse::<f64>().is_ok());
            if numeric {
                KeyMode::Numeric
            } else {
                KeyMode::Lexicographic
            }
        })
        .collect()
}

/// Descending order over sort key tuples; missing values sort last.
fn compare_descending(
    left: &[Option<String>],
    right: &[Option<String>],
    modes: &[KeyMode],
) -> Ordering {
    for ((a, b), mode) in left.iter().zip(right).zip(modes) {
        let ordering = match (a, b) {
            (Some(a), Some(b)) => compare_values(a, b, *mode).reverse(),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

fn compare_values(a: &str, b: &str, mode: KeyMode) -> Ordering {
    match mode {
        KeyMode::Numeric => match (a.trim().parse::<f64>(), b.trim().parse::<f64>()) {
            (Ok(x), Ok(y)) => x.total_cmp(&y),
            _ => a.cmp(b),
        },
        KeyMode::Lexicographic => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Arc;
    use tempfile::tempdir;

    fn texts(set: &RecordSet) -> Vec<Option<String>> {
        set.records().iter().map(|record| record.text.clone()).collect()
    }

    #[test]
    fn in_memory_sources_concatenate_with_dense_origins() {
        let sources = vec![
            SourceDescriptor::memory(["a", "b"]),
            SourceDescriptor::memory(["c"]),
        ];
        let set = load(&sources, &LoaderOptions::default()).unwrap();
        assert_eq!(set.origins(), vec![0, 1, 2]);
        assert_eq!(set.records()[2].source, "memory[1]");
        assert!(set.dropped().is_empty());
    }

    #[test]
    fn transform_runs_before_duplicate_removal() {
        let options = LoaderOptions::default()
            .with_transform(Arc::new(|text: String| text.to_lowercase()))
            .with_drop_duplicates(true);
        let set = load(&[SourceDescriptor::memory(["Hi", "hi", "Bye"])], &options).unwrap();
        assert_eq!(texts(&set), vec![Some("hi".into()), Some("bye".into())]);
        assert_eq!(set.dropped(), &[1]);
    }

    #[test]
    fn drop_missing_records_dropped_origins() {
        let source = SourceDescriptor::InMemory {
            id: Some("inline".into()),
            records: vec![Some("x".into()), None, Some("y".into()), None],
        };
        let options = LoaderOptions::default().with_drop_missing(true);
        let set = load(&[source], &options).unwrap();
        assert_eq!(set.origins(), vec![0, 2]);
        assert_eq!(set.dropped(), &[1, 3]);
        assert_eq!(set.records()[0].source, "inline");
    }

    #[test]
    fn sort_keys_order_rows_descending_numerically() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("posts.csv");
        fs::write(&path, "text,likes\nlow,2\nhigh,10\nnone,\nmid,7\n").unwrap();
        let options = LoaderOptions::default()
            .with_column("text")
            .with_sort_keys(["likes"]);
        let set = load(&[SourceDescriptor::path(&path)], &options).unwrap();
        assert_eq!(
            texts(&set),
            vec![
                Some("high".into()),
                Some("mid".into()),
                Some("low".into()),
                Some("none".into())
            ]
        );
        assert_eq!(set.origins(), vec![1, 3, 0, 2]);
    }

    #[test]
    fn mixed_sort_column_compares_every_value_as_text() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("posts.csv");
        fs::write(&path, "text,key\nx,10\ny,9\nz,1a\nw,b\nv,100\n").unwrap();
        let options = LoaderOptions::default()
            .with_column("text")
            .with_sort_keys(["key"]);
        let set = load(&[SourceDescriptor::path(&path)], &options).unwrap();
        // b > 9 > 1a > 100 > 10 as strings.
        assert_eq!(set.texts(), vec!["w", "y", "z", "v", "x"]);
    }

    #[test]
    fn key_mode_is_numeric_only_when_every_present_value_parses() {
        let entry = |value: Option<&str>| PendingRecord {
            record: Record {
                origin: 0,
                source: "inline".into(),
                text: None,
            },
            sort_values: vec![value.map(str::to_string), Some("1a".into())],
        };
        let pending = vec![entry(Some("10")), entry(None), entry(Some(" 2.5 "))];
        assert_eq!(
            key_modes(&pending, 2),
            vec![KeyMode::Numeric, KeyMode::Lexicographic]
        );
    }

    #[test]
    fn mixed_formats_load_in_input_order() {
        let temp = tempdir().unwrap();
        let lines = temp.path().join("notes.txt");
        let json = temp.path().join("posts.json");
        fs::write(&lines, "first note\n\nsecond note\n").unwrap();
        fs::write(&json, "{\"text\":\"json one\"}\n{\"text\":\"json two\"}\n").unwrap();

        let options = LoaderOptions::default();
        let sources = vec![
            SourceDescriptor::Lines(lines.clone()),
            SourceDescriptor::path(&json),
            SourceDescriptor::memory(["memory"]),
        ];
        let set = load(&sources, &options).unwrap();
        assert_eq!(set.len(), 5);
        assert_eq!(set.origins(), vec![0, 1, 2, 3, 4]);
        assert_eq!(
            set.texts(),
            vec!["first note", "second note", "json one", "json two", "memory"]
        );
        assert_eq!(set.records()[2].source, json.display().to_string());
    }

    #[test]
    fn table_descriptor_uses_its_own_delimiter() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("data.txt");
        fs::write(&path, "id|text\n1|piped\n").unwrap();
        let options = LoaderOptions::default().with_column("text");
        let source = SourceDescriptor::Table {
            path,
            delimiter: Some('|'),
        };
        let set = load(&[source], &options).unwrap();
        assert_eq!(set.texts(), vec!["piped"]);
    }

    #[test]
    fn first_failing_source_aborts_the_load() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("table.csv");
        fs::write(&path, "id,text\n1,hi\n").unwrap();
        let options = LoaderOptions::default().with_column("body");
        let err = load(
            &[SourceDescriptor::memory(["ok"]), SourceDescriptor::path(&path)],
            &options,
        )
        .unwrap_err();
        assert!(matches!(err, PipelineError::Lookup { .. }));
    }

    #[test]
    fn wanted_columns_union_keeps_request_order() {
        let loader = SourceLoader::new(
            LoaderOptions::default()
                .with_columns(["text", "likes"])
                .with_sort_keys(["likes", "date"]),
        );
        assert_eq!(loader.wanted_columns(), vec!["text", "likes", "date"]);
    }
}
