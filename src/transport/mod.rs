/// Filesystem transport for JSON corpora.
pub mod fs;
