use std::io;

use thiserror::Error;

use crate::types::{ColumnName, SourceId};

/// Error type for loading, configuration, aggregation and rendering failures.
///
/// Normalization and linguistic reduction never produce these: they degrade
/// to a valid output instead.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A source could not be parsed, or its projection is not one column.
    #[error("source '{source_id}' could not be parsed: {details}")]
    Format {
        /// Offending source.
        source_id: SourceId,
        /// Parser message or projection problem.
        details: String,
    },
    /// A requested column is neither a header name nor a valid position.
    #[error("source '{source_id}' has no column '{column}'")]
    Lookup {
        /// Source searched.
        source_id: SourceId,
        /// Column as requested.
        column: ColumnName,
    },
    /// An external asset could not be read, fetched or cached.
    #[error("resource '{resource}' is unavailable: {reason}")]
    ResourceUnavailable {
        /// URL or path of the asset.
        resource: String,
        /// Underlying failure.
        reason: String,
    },
    /// Filesystem failure while reading inputs or writing outputs.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// Invalid options or stage wiring.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl PipelineError {
    pub(crate) fn format(source_id: &str, details: impl Into<String>) -> Self {
        Self::Format {
            source_id: source_id.to_string(),
            details: details.into(),
        }
    }

    pub(crate) fn lookup(source_id: &str, column: &str) -> Self {
        Self::Lookup {
            source_id: source_id.to_string(),
            column: column.to_string(),
        }
    }

    /// Error raised when a projection leaves more than one column.
    pub(crate) fn not_one_dimensional(source_id: &str, columns: &[ColumnName]) -> Self {
        Self::format(
            source_id,
            format!(
                "expected a 1-dimensional result (column={:?}), got {} columns",
                columns,
                columns.len()
            ),
        )
    }
}
