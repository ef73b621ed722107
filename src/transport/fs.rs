use std::fs;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::constants::loader::JSON_EXTENSION;
use crate::constants::render::OUTPUT_SUFFIX;
use crate::errors::PipelineError;

/// Expand input arguments into an ordered file list.
///
/// Files are kept as given; a directory contributes its direct child files
/// sorted by name. Nested directories are not descended into.
pub fn discover_inputs<P: AsRef<Path>>(inputs: &[P]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for input in inputs {
        let input = input.as_ref();
        if !input.is_dir() {
            files.push(input.to_path_buf());
            continue;
        }
        let walker = WalkDir::new(input)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();
        for entry in walker
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
        {
            files.push(entry.path().to_path_buf());
        }
    }
    files
}

/// True if the path has a `.json` extension (case-insensitive).
pub fn is_json_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(JSON_EXTENSION))
        .unwrap_or(false)
}

/// Read the first physical line of a file, without its line terminator.
pub fn read_first_line(path: &Path) -> Result<String, PipelineError> {
    let file = fs::File::open(path)?;
    let mut line = String::new();
    BufReader::new(file).read_line(&mut line)?;
    Ok(line.trim_end_matches(['\n', '\r']).to_string())
}

/// Output folder and base name for exported files.
///
/// An explicit `output` supplies both (its parent, or `.`, and its file
/// name); otherwise the base name is `<first input stem>_wordcloud` in `.`.
pub fn output_target(first_input: Option<&Path>, output: Option<&Path>) -> (PathBuf, String) {
    if let Some(output) = output {
        let folder = output
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let name = output
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| format!("output{OUTPUT_SUFFIX}"));
        return (folder, name);
    }
    let stem = first_input
        .and_then(|path| path.file_stem())
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| "output".to_string());
    (PathBuf::from("."), format!("{stem}{OUTPUT_SUFFIX}"))
}
