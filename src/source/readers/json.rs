use std::fs;
use std::path::Path;

use indexmap::IndexSet;
use serde_json::{Map, Value};

use crate::constants::loader::SCALAR_COLUMN;
use crate::errors::PipelineError;
use crate::source::frame::Frame;
use crate::types::ColumnName;

/// Text of a JSON value as a record: strings verbatim, `null` missing,
/// everything else in compact JSON form.
pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

/// Read one JSON value per physical line; blank lines are ignored.
pub fn read_json_lines(source_id: &str, path: &Path) -> Result<Frame, PipelineError> {
    let content = fs::read_to_string(path)?;
    let mut values = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let value = serde_json::from_str::<Value>(line.trim()).map_err(|err| {
            PipelineError::format(
                source_id,
                format!("invalid JSON on line {}: {err}", idx + 1),
            )
        })?;
        values.push(value);
    }
    frame_from_values(source_id, values)
}

/// Read the whole file as one JSON document.
///
/// Arrays are rows; an object maps column names to value lists (or to
/// index-keyed objects); any other value is a single record.
pub fn read_json_document(source_id: &str, path: &Path) -> Result<Frame, PipelineError> {
    let content = fs::read_to_string(path)?;
    let document = serde_json::from_str::<Value>(&content)
        .map_err(|err| PipelineError::format(source_id, format!("invalid JSON document: {err}")))?;
    match document {
        Value::Array(values) => frame_from_values(source_id, values),
        Value::Object(map) => Ok(frame_from_columns(source_id, map)),
        scalar => frame_from_values(source_id, vec![scalar]),
    }
}

/// Build a frame from row values: objects contribute columns in first-seen
/// key order, scalars form a single column.
fn frame_from_values(source_id: &str, values: Vec<Value>) -> Result<Frame, PipelineError> {
    let objects = values.iter().filter(|value| value.is_object()).count();
    if objects == 0 {
        let rows = values.iter().map(|value| vec![value_text(value)]).collect();
        return Ok(Frame::new(source_id, vec![SCALAR_COLUMN.to_string()], rows));
    }
    if objects != values.len() {
        return Err(PipelineError::format(
            source_id,
            "cannot mix JSON objects and scalar values in one source",
        ));
    }

    let mut columns: IndexSet<ColumnName> = IndexSet::new();
    for value in &values {
        if let Value::Object(map) = value {
            columns.extend(map.keys().cloned());
        }
    }
    let rows = values
        .iter()
        .map(|value| {
            columns
                .iter()
                .map(|column| value.get(column).and_then(value_text))
                .collect()
        })
        .collect();
    Ok(Frame::new(source_id, columns.into_iter().collect(), rows))
}

fn frame_from_columns(source_id: &str, map: Map<String, Value>) -> Frame {
    let mut columns = Vec::with_capacity(map.len());
    let mut cells: Vec<Vec<Option<String>>> = Vec::with_capacity(map.len());
    for (column, value) in map {
        let values: Vec<Option<String>> = match value {
            Value::Array(items) => items.iter().map(value_text).collect(),
            Value::Object(indexed) => indexed.values().map(value_text).collect(),
            scalar => vec![value_text(&scalar)],
        };
        columns.push(column);
        cells.push(values);
    }
    let height = cells.iter().map(Vec::len).max().unwrap_or(0);
    let rows = (0..height)
        .map(|row| {
            cells
                .iter()
                .map(|column| column.get(row).cloned().flatten())
                .collect()
        })
        .collect();
    Frame::new(source_id, columns, rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColumnSelection;
    use tempfile::tempdir;

    fn write(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let temp = tempdir().unwrap();
        let path = temp.path().join("data.json");
        fs::write(&path, content).unwrap();
        (temp, path)
    }

    #[test]
    fn json_lines_objects_become_columns() {
        let (_temp, path) = write("{\"text\":\"Café Müller\",\"id\":1}\n\n{\"text\":null,\"id\":2}\n");
        let frame = read_json_lines("data.json", &path).unwrap();
        assert_eq!(frame.columns(), &["text".to_string(), "id".to_string()]);
        let rows = frame
            .project(&ColumnSelection::One("text".into()), &["id".into()])
            .unwrap();
        assert_eq!(rows[0].text.as_deref(), Some("Café Müller"));
        assert_eq!(rows[1].text, None);
        assert_eq!(rows[1].sort_values, vec![Some("2".to_string())]);
    }

    #[test]
    fn json_lines_scalars_form_one_column() {
        let (_temp, path) = write("\"first\"\n\"second\"\n");
        let frame = read_json_lines("data.json", &path).unwrap();
        let rows = frame.project(&ColumnSelection::All, &[]).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].text.as_deref(), Some("second"));
    }

    #[test]
    fn malformed_line_names_source_and_line() {
        let (_temp, path) = write("{\"text\":\"ok\"}\n{broken\n");
        let err = read_json_lines("data.json", &path).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("data.json"));
        assert!(message.contains("line 2"));
    }

    #[test]
    fn document_array_and_column_object_are_flattened() {
        let (_temp, path) = write("[{\"text\":\"a\"},{\"text\":\"b\"}]");
        let frame = read_json_document("doc", &path).unwrap();
        assert_eq!(frame.len(), 2);

        let (_temp, path) = write("{\"text\":{\"0\":\"x\",\"1\":\"y\"},\"n\":[1]}");
        let frame = read_json_document("doc", &path).unwrap();
        let rows = frame
            .project(&ColumnSelection::One("text".into()), &["n".into()])
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].text.as_deref(), Some("y"));
        assert_eq!(rows[1].sort_values, vec![None]);
    }

    #[test]
    fn mixing_objects_and_scalars_is_rejected() {
        let (_temp, path) = write("{\"text\":\"a\"}\n\"b\"\n");
        assert!(matches!(
            read_json_lines("doc", &path),
            Err(PipelineError::Format { .. })
        ));
    }

    #[test]
    fn non_string_values_are_rendered_as_json() {
        assert_eq!(value_text(&serde_json::json!(3)), Some("3".to_string()));
        assert_eq!(value_text(&serde_json::json!(["a"])), Some("[\"a\"]".to_string()));
        assert_eq!(value_text(&Value::Null), None);
    }
}
