//! Identifier allocation for new document entries.
//!
//! Keys are unique within one mapping only, so allocation always checks the
//! mapping the new entry is inserted into and never consults the others.

use crate::document::RecordMap;
use crate::error::DocumentError;

/// Return `<prefix>-<n>` for the smallest `n >= 1` not already a key.
///
/// # Example
///
/// ```
/// use project_document::{RecordMap, next_free_id};
///
/// let mut files = RecordMap::new();
/// assert_eq!(next_free_id(&files, "tree-file"), "tree-file-1");
///
/// files.insert("tree-file-1".to_owned(), ());
/// assert_eq!(next_free_id(&files, "tree-file"), "tree-file-2");
/// ```
#[must_use]
pub fn next_free_id<T>(existing: &RecordMap<T>, prefix: &str) -> String {
    let mut n: usize = 1;
    loop {
        let candidate = format!("{prefix}-{n}");
        if !existing.contains_key(&candidate) {
            return candidate;
        }
        n = n.saturating_add(1);
    }
}

/// Pick the identifier for a new entry in `mapping`.
///
/// An explicit identifier is used as-is and must be unused; otherwise one is
/// allocated with [`next_free_id`].
pub(crate) fn choose_id<T>(
    existing: &RecordMap<T>,
    mapping: &'static str,
    explicit: Option<&str>,
    prefix: &str,
) -> Result<String, DocumentError> {
    match explicit {
        Some(id) if existing.contains_key(id) => Err(DocumentError::IdentifierCollision {
            mapping,
            id: id.to_owned(),
        }),
        Some(id) if id.trim().is_empty() => Err(DocumentError::BlankIdentifier { mapping }),
        Some(id) => Ok(id.to_owned()),
        None => Ok(next_free_id(existing, prefix)),
    }
}
