//! Output error type: an I/O failure tagged with the path it hit.

use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;

/// An I/O failure while writing trace or result files.
#[derive(Debug)]
pub struct OutputError {
    path: PathBuf,
    source: io::Error,
}

impl OutputError {
    /// Wrap an I/O error with the path that was being written.
    pub fn new(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self {
            path: path.into(),
            source,
        }
    }

    /// The path that was being written when the failure occurred.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl fmt::Display for OutputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot write {}: {}", self.path.display(), self.source)
    }
}

impl Error for OutputError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}
