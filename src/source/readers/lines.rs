use std::fs;
use std::path::Path;

use crate::errors::PipelineError;
use crate::types::RecordText;

/// Read one record per line, right-trimmed, dropping blank lines.
pub fn read_lines(path: &Path) -> Result<Vec<RecordText>, PipelineError> {
    let content = fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
