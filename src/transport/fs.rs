use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use walkdir::WalkDir;

use crate::constants::source::JSON_EXTENSION;
use crate::errors::AlignmentError;

/// Filesystem transport that resolves a root into JSON documents.
///
/// A root may be a single file or a directory; directories are walked for
/// `*.json` files in sorted path order.
pub struct JsonFileStream {
    root: PathBuf,
}

impl JsonFileStream {
    /// Create a stream rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Configured root path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Paths of every document under the root, sorted.
    pub fn paths(&self) -> Result<Vec<PathBuf>, AlignmentError> {
        if self.root.is_file() {
            return Ok(vec![self.root.clone()]);
        }
        if !self.root.is_dir() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no such file or directory: {}", self.root.display()),
            )
            .into());
        }
        let mut paths: Vec<PathBuf> = WalkDir::new(&self.root)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| is_json_file(path))
            .collect();
        paths.sort();
        Ok(paths)
    }

    /// Parse every document under the root, in path order.
    pub fn documents(&self) -> Result<Vec<(PathBuf, Value)>, AlignmentError> {
        self.paths()?
            .into_iter()
            .map(|path| {
                let value = read_json_document(&path)?;
                Ok((path, value))
            })
            .collect()
    }
}

/// True if the path has a `.json` extension (case-insensitive).
pub fn is_json_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(JSON_EXTENSION))
        .unwrap_or(false)
}

/// Read and parse one JSON document.
pub fn read_json_document(path: &Path) -> Result<Value, AlignmentError> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}
