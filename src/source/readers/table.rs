use std::fs;
use std::path::Path;

use crate::errors::PipelineError;
use crate::source::frame::{Frame, resolve_column};
use crate::types::ColumnName;

/// Read a delimited table.
///
/// `skip_rows` physical lines are skipped before the header row. With
/// `delimiter = None` the file is a single column: the first line is the
/// header and every following non-blank line is one value. When `wanted` is
/// non-empty only those columns are kept, named as requested.
pub fn read_table(
    source_id: &str,
    path: &Path,
    delimiter: Option<char>,
    skip_rows: usize,
    wanted: &[ColumnName],
) -> Result<Frame, PipelineError> {
    let content = fs::read_to_string(path)?;
    let body = skip_lines(&content, skip_rows);
    let (header, rows) = match delimiter {
        Some(delimiter) => parse_delimited(source_id, body, delimiter)?,
        None => parse_single_column(body),
    };
    prune(source_id, header, rows, wanted)
}

fn skip_lines(content: &str, skip_rows: usize) -> &str {
    let mut rest = content;
    for _ in 0..skip_rows {
        match rest.find('\n') {
            Some(pos) => rest = &rest[pos + 1..],
            None => return "",
        }
    }
    rest
}

type Cells = Vec<Option<String>>;

fn cell(raw: &str) -> Option<String> {
    if raw.is_empty() {
        None
    } else {
        Some(raw.to_string())
    }
}

fn parse_delimited(
    source_id: &str,
    body: &str,
    delimiter: char,
) -> Result<(Vec<ColumnName>, Vec<Cells>), PipelineError> {
    let byte = u8::try_from(delimiter)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| {
            PipelineError::Configuration(format!(
                "delimiter {delimiter:?} must be a single ASCII character"
            ))
        })?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(byte)
        .has_headers(true)
        .flexible(true)
        .from_reader(body.as_bytes());
    let header: Vec<ColumnName> = reader
        .headers()
        .map_err(|err| csv_error(source_id, err))?
        .iter()
        .map(str::to_string)
        .collect();
    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|err| csv_error(source_id, err))?;
        rows.push(record.iter().map(cell).collect());
    }
    Ok((header, rows))
}

fn parse_single_column(body: &str) -> (Vec<ColumnName>, Vec<Cells>) {
    let mut lines = body.lines().filter(|line| !line.trim().is_empty());
    let Some(header) = lines.next() else {
        return (Vec::new(), Vec::new());
    };
    let rows = lines.map(|line| vec![cell(line)]).collect();
    (vec![header.to_string()], rows)
}

fn prune(
    source_id: &str,
    header: Vec<ColumnName>,
    rows: Vec<Cells>,
    wanted: &[ColumnName],
) -> Result<Frame, PipelineError> {
    if wanted.is_empty() {
        return Ok(Frame::new(source_id, header, rows));
    }
    let picks = wanted
        .iter()
        .map(|column| resolve_column(source_id, &header, column))
        .collect::<Result<Vec<_>, _>>()?;
    let rows = rows
        .into_iter()
        .map(|row| {
            picks
                .iter()
                .map(|idx| row.get(*idx).cloned().flatten())
                .collect()
        })
        .collect();
    Ok(Frame::new(source_id, wanted.to_vec(), rows))
}

fn csv_error(source_id: &str, err: csv::Error) -> PipelineError {
    if err.is_io_error() {
        if let csv::ErrorKind::Io(err) = err.into_kind() {
            return PipelineError::Io(err);
        }
        return PipelineError::format(source_id, "csv reader I/O failure");
    }
    PipelineError::format(source_id, err.to_string())
}
