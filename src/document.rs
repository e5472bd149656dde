//! Document handles: path- or buffer-backed references to a page document.

use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// An immutable reference to a PDF document.
///
/// A handle is either a filesystem path (not yet loaded) or an in-memory
/// byte buffer produced by an earlier operation. Operations never mutate a
/// handle in place; each pipeline stage consumes its input handle and
/// produces a fresh one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentHandle {
    /// Document referenced by filesystem path.
    Path(PathBuf),
    /// Document held in memory.
    Buffer(Vec<u8>),
}

impl DocumentHandle {
    /// Create a handle from a filesystem path, verifying the path exists.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::NotFound(path.to_path_buf()));
        }
        Ok(DocumentHandle::Path(path.to_path_buf()))
    }

    /// Create a handle from raw document bytes.
    pub fn from_bytes(data: Vec<u8>) -> Self {
        DocumentHandle::Buffer(data)
    }

    /// Read the document content as bytes.
    ///
    /// For path-backed handles this reads the file; buffer-backed handles
    /// return their content directly.
    pub fn bytes(&self) -> Result<Vec<u8>> {
        match self {
            DocumentHandle::Path(path) => Ok(fs::read(path)?),
            DocumentHandle::Buffer(data) => Ok(data.clone()),
        }
    }

    /// Write the document content to `path`.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        match self {
            DocumentHandle::Path(src) => {
                fs::copy(src, path.as_ref())?;
            }
            DocumentHandle::Buffer(data) => {
                fs::write(path.as_ref(), data)?;
            }
        }
        Ok(())
    }

    /// The backing path, if this handle is path-backed.
    pub fn path(&self) -> Option<&Path> {
        match self {
            DocumentHandle::Path(path) => Some(path),
            DocumentHandle::Buffer(_) => None,
        }
    }
}
