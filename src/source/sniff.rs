use std::path::Path;

use crate::config::LoaderOptions;
use crate::constants::loader::DELIMITER_CANDIDATES;
use crate::errors::PipelineError;
use crate::transport::fs::{is_json_file, read_first_line};

/// Concrete reader chosen for a path source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceFormat {
    /// One JSON value per physical line.
    JsonLines,
    /// One JSON document (array or column-oriented object).
    JsonDocument,
    /// One record per non-blank line.
    Lines,
    /// Delimited table; `None` means a single column with one value per line.
    Table {
        /// Field delimiter.
        delimiter: Option<char>,
    },
}

/// First candidate delimiter present in `header`, in priority order.
pub fn sniff_delimiter(header: &str) -> Option<char> {
    DELIMITER_CANDIDATES
        .into_iter()
        .find(|candidate| header.contains(*candidate))
}

/// Classify a path source by extension, options and (for tables without an
/// explicit delimiter) the delimiter found in its first line.
pub fn classify(path: &Path, options: &LoaderOptions) -> Result<SourceFormat, PipelineError> {
    if is_json_file(path) {
        return Ok(if options.json_records {
            SourceFormat::JsonLines
        } else {
            SourceFormat::JsonDocument
        });
    }
    if options.delimiter.is_none() && !options.column.is_requested() {
        return Ok(SourceFormat::Lines);
    }
    table_format(path, options.delimiter)
}

/// Table format with an explicit delimiter, or one sniffed from the file.
pub fn table_format(path: &Path, delimiter: Option<char>) -> Result<SourceFormat, PipelineError> {
    let delimiter = match delimiter {
        Some(delimiter) => Some(delimiter),
        None => sniff_delimiter(&read_first_line(path)?),
    };
    Ok(SourceFormat::Table { delimiter })
}
