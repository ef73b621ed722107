/// JSON-lines and whole-document JSON readers.
pub mod json;
/// Plain record-per-line reader.
pub mod lines;
/// Delimited table reader with column pruning.
pub mod table;
