use std::fs;
use std::path::Path;

use tracing::debug;

use crate::data::FrequencyTable;
use crate::errors::PipelineError;

/// Write `table` as `term,count` CSV rows in rank order.
///
/// Missing parent directories are created.
pub fn write_table_csv(table: &FrequencyTable, path: &Path) -> Result<(), PipelineError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let mut writer = csv::Writer::from_path(path).map_err(|err| csv_error(path, err))?;
    writer
        .write_record(["term", "count"])
        .map_err(|err| csv_error(path, err))?;
    for (term, count) in table.iter() {
        writer
            .write_record([term, count.to_string().as_str()])
            .map_err(|err| csv_error(path, err))?;
    }
    writer.flush()?;
    debug!(path = %path.display(), terms = table.len(), "wrote frequency table");
    Ok(())
}

fn csv_error(path: &Path, err: csv::Error) -> PipelineError {
    if !err.is_io_error() {
        return PipelineError::Configuration(format!("cannot write {}: {err}", path.display()));
    }
    match err.into_kind() {
        csv::ErrorKind::Io(io) => PipelineError::Io(io),
        _ => PipelineError::Configuration(format!("cannot write {}", path.display())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use tempfile::tempdir;

    #[test]
    fn writes_header_and_rows_in_rank_order() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("out/cloud_wordcloud.csv");
        let mut counts = IndexMap::new();
        counts.insert("cat".to_string(), 2);
        counts.insert("the".to_string(), 3);
        let table = FrequencyTable::from_counts(counts);

        write_table_csv(&table, &path).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, "term,count\nthe,3\ncat,2\n");
    }

    #[test]
    fn terms_with_commas_are_quoted() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("t.csv");
        let mut counts = IndexMap::new();
        counts.insert("a,b".to_string(), 1);
        write_table_csv(&FrequencyTable::from_counts(counts), &path).unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains("\"a,b\",1"));
    }
}
