/// Filesystem helpers: input discovery, first-line reads and output naming.
pub mod fs;
