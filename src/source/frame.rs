use crate::config::ColumnSelection;
use crate::errors::PipelineError;
use crate::types::{ColumnName, RecordText, SourceId};

/// A source row after projection: record text plus its sort key values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectedRow {
    /// Projected text; `None` is a missing value.
    pub text: Option<RecordText>,
    /// Sort key values, one per requested key.
    pub sort_values: Vec<Option<String>>,
}

/// Column-named, row-major cells read from a tabular source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    source_id: SourceId,
    columns: Vec<ColumnName>,
    rows: Vec<Vec<Option<String>>>,
}

impl Frame {
    /// Build a frame; rows shorter than the header are padded with missing cells.
    pub fn new(
        source_id: impl Into<SourceId>,
        columns: Vec<ColumnName>,
        rows: Vec<Vec<Option<String>>>,
    ) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, None);
                row
            })
            .collect();
        Self {
            source_id: source_id.into(),
            columns,
            rows,
        }
    }

    /// Source that produced the frame.
    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    /// Column names, in header order.
    pub fn columns(&self) -> &[ColumnName] {
        &self.columns
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the frame has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Resolve a column by exact header name, else by 0-based position.
    pub fn resolve(&self, column: &str) -> Result<usize, PipelineError> {
        resolve_column(&self.source_id, &self.columns, column)
    }

    /// Project the frame to one text column plus sort key values.
    ///
    /// More than one selected column, or several columns with no selection,
    /// is a format error; unknown columns are lookup errors.
    pub fn project(
        &self,
        selection: &ColumnSelection,
        sort_keys: &[ColumnName],
    ) -> Result<Vec<ProjectedRow>, PipelineError> {
        let requested = selection.names();
        let mut text_columns = Vec::with_capacity(requested.len());
        for column in &requested {
            text_columns.push(self.resolve(column)?);
        }
        let sort_columns = sort_keys
            .iter()
            .map(|key| self.resolve(key))
            .collect::<Result<Vec<_>, _>>()?;

        let text_column = match (requested.len(), self.columns.len()) {
            (0, 1) => 0,
            (0, _) => {
                return Err(PipelineError::not_one_dimensional(
                    &self.source_id,
                    &self.columns,
                ));
            }
            (1, _) => text_columns[0],
            _ => {
                return Err(PipelineError::not_one_dimensional(
                    &self.source_id,
                    &requested,
                ));
            }
        };

        Ok(self
            .rows
            .iter()
            .map(|row| ProjectedRow {
                text: row[text_column].clone(),
                sort_values: sort_columns.iter().map(|idx| row[*idx].clone()).collect(),
            })
            .collect())
    }
}

/// Resolve `column` against a header: exact name first, then position.
pub fn resolve_column(
    source_id: &str,
    header: &[ColumnName],
    column: &str,
) -> Result<usize, PipelineError> {
    if let Some(idx) = header.iter().position(|name| name == column) {
        return Ok(idx);
    }
    column
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|idx| *idx < header.len())
        .ok_or_else(|| PipelineError::lookup(source_id, column))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(value: &str) -> Option<String> {
        Some(value.to_string())
    }

    fn frame() -> Frame {
        Frame::new(
            "t.csv",
            vec!["id".into(), "text".into(), "likes".into()],
            vec![
                vec![cell("1"), cell("hello"), cell("3")],
                vec![cell("2"), cell("world")],
            ],
        )
    }

    #[test]
    fn projects_one_named_column_with_sort_values() {
        let rows = frame()
            .project(&ColumnSelection::One("text".into()), &["likes".into()])
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].text.as_deref(), Some("hello"));
        assert_eq!(rows[0].sort_values, vec![cell("3")]);
        assert_eq!(rows[1].sort_values, vec![None]);
    }

    #[test]
    fn resolves_columns_by_position_when_name_is_absent() {
        let rows = frame()
            .project(&ColumnSelection::One("1".into()), &[])
            .unwrap();
        assert_eq!(rows[1].text.as_deref(), Some("world"));
    }

    #[test]
    fn multi_column_projection_is_a_format_error() {
        let err = frame()
            .project(&ColumnSelection::Many(vec!["id".into(), "text".into()]), &[])
            .unwrap_err();
        assert!(matches!(err, PipelineError::Format { .. }));
        assert!(err.to_string().contains("1-dimensional"));

        let err = frame().project(&ColumnSelection::All, &[]).unwrap_err();
        assert!(matches!(err, PipelineError::Format { .. }));
    }

    #[test]
    fn unknown_column_is_a_lookup_error() {
        let err = frame()
            .project(&ColumnSelection::One("missing".into()), &[])
            .unwrap_err();
        match err {
            PipelineError::Lookup { source_id, column } => {
                assert_eq!(source_id, "t.csv");
                assert_eq!(column, "missing");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(frame().resolve("7").is_err());
    }

    #[test]
    fn single_column_frame_needs_no_selection() {
        let frame = Frame::new("one", vec!["0".into()], vec![vec![cell("a")], vec![None]]);
        let rows = frame.project(&ColumnSelection::All, &[]).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].text, None);
    }
}
