//! Loading Newick tree text from the local filesystem.

use std::io;
use std::path::{Path, PathBuf};

use cap_std::{ambient_authority, fs::Dir};
use thiserror::Error;

/// Errors returned while reading a tree file.
#[derive(Debug, Error)]
pub enum TreeSourceError {
    /// The file could not be opened or read.
    #[error("failed to read tree file at {path}: {source}")]
    Read {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The file was read but held no tree text.
    #[error("tree file at {path} is empty")]
    Empty {
        /// Path that was requested.
        path: PathBuf,
    },
}

/// Newick text read from disk together with the file's own name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeSource {
    /// Tree text with surrounding whitespace removed.
    pub newick: String,
    /// Final path component, used as the default display name.
    pub file_name: String,
}

/// Read a Newick file through a capability handle on its parent directory.
///
/// # Errors
///
/// Returns [`TreeSourceError::Read`] when the path has no file name, cannot
/// be read, or is not UTF-8, and [`TreeSourceError::Empty`] when it contains
/// only whitespace.
pub fn load_tree_file(path: &Path) -> Result<TreeSource, TreeSourceError> {
    let read_error = |source: io::Error| TreeSourceError::Read {
        path: path.to_path_buf(),
        source,
    };
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path.file_name().ok_or_else(|| {
        read_error(io::Error::new(
            io::ErrorKind::InvalidInput,
            "tree path must name a file",
        ))
    })?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(read_error)?;
    let payload = dir.read(Path::new(file_name)).map_err(read_error)?;
    let contents = String::from_utf8(payload)
        .map_err(|source| read_error(io::Error::new(io::ErrorKind::InvalidData, source)))?;

    let newick = contents.trim();
    if newick.is_empty() {
        return Err(TreeSourceError::Empty {
            path: path.to_path_buf(),
        });
    }
    Ok(TreeSource {
        newick: newick.to_owned(),
        file_name: file_name.to_string_lossy().into_owned(),
    })
}
