//! The additive "attach phylogenetic tree" mutation.
//!
//! Attaching a tree inserts one Newick [`FileRecord`] into `files` and one
//! [`TreeRecord`] pointing at it into `trees`. Existing entries are never
//! replaced: identifiers are allocated against the target mapping, and an
//! explicitly requested identifier that is already taken is an error. All
//! checks run before the document is touched, so a failed call leaves it
//! unchanged.

use serde_json::Map;

use crate::document::{FileRecord, NEWICK_FORMAT, ProjectDocument, RecordMap, TreeRecord};
use crate::error::DocumentError;
use crate::identifiers::choose_id;

/// File extensions the service recognises as Newick trees.
pub const TREE_FILE_EXTENSIONS: [&str; 5] = ["nwk", "newick", "nh", "tre", "tree"];

/// Display name used when the caller does not supply one.
pub const DEFAULT_TREE_FILE_NAME: &str = "demo.nwk";

/// Label column used when the caller does not supply one.
pub const DEFAULT_LABEL_FIELD: &str = "id";

const TREE_FILE_ID_PREFIX: &str = "tree-file";
const TREE_ID_PREFIX: &str = "tree";

/// A request to attach one Newick tree to a document.
///
/// # Example
///
/// ```
/// use project_document::TreeAttachment;
///
/// let attachment = TreeAttachment::new("(A:0.1,B:0.2);")
///     .with_label_field("sample")
///     .with_file_name("primates.newick");
///
/// assert_eq!(attachment.label_field(), "sample");
/// assert_eq!(attachment.file_name(), "primates.newick");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeAttachment {
    newick: String,
    label_field: String,
    file_name: String,
    file_id: Option<String>,
    tree_id: Option<String>,
}

impl TreeAttachment {
    /// Start a request for the given Newick text with default label field
    /// and file name, and allocated identifiers.
    pub fn new(newick: impl Into<String>) -> Self {
        Self {
            newick: newick.into(),
            label_field: DEFAULT_LABEL_FIELD.to_owned(),
            file_name: DEFAULT_TREE_FILE_NAME.to_owned(),
            file_id: None,
            tree_id: None,
        }
    }

    /// Set the data column that supplies leaf labels.
    #[must_use]
    pub fn with_label_field(mut self, label_field: impl Into<String>) -> Self {
        self.label_field = label_field.into();
        self
    }

    /// Set the display name of the new tree file.
    #[must_use]
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    /// Request a specific key for the new entry in `files`.
    #[must_use]
    pub fn with_file_id(mut self, file_id: impl Into<String>) -> Self {
        self.file_id = Some(file_id.into());
        self
    }

    /// Request a specific key for the new entry in `trees`.
    #[must_use]
    pub fn with_tree_id(mut self, tree_id: impl Into<String>) -> Self {
        self.tree_id = Some(tree_id.into());
        self
    }

    /// Newick text stored as the file blob.
    #[must_use]
    pub fn newick(&self) -> &str {
        &self.newick
    }

    /// Data column supplying leaf labels.
    #[must_use]
    pub fn label_field(&self) -> &str {
        &self.label_field
    }

    /// Display name of the tree file.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }
}

/// Keys of the entries inserted by [`attach_tree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachedTree {
    /// Key of the new Newick file in `files`.
    pub file_id: String,
    /// Key of the new tree in `trees`.
    pub tree_id: String,
}

/// Attach a Newick tree to `document`.
///
/// `trees` is created when the document has none. The Newick text is stored
/// verbatim; its syntax is left to the service to check.
///
/// # Errors
///
/// - [`DocumentError::EmptyLabelField`] when the label field is blank. A
///   non-blank label field is stored exactly as given.
/// - [`DocumentError::InvalidTreeFileName`] when the file name lacks one of
///   [`TREE_FILE_EXTENSIONS`].
/// - [`DocumentError::IdentifierCollision`] or
///   [`DocumentError::BlankIdentifier`] for unusable explicit identifiers.
///
/// # Example
///
/// ```
/// use project_document::{ProjectDocument, TreeAttachment, attach_tree};
///
/// let mut document = ProjectDocument::default();
/// let attached = attach_tree(&mut document, &TreeAttachment::new("(A,B);"))
///     .expect("attach succeeds");
///
/// assert_eq!(attached.file_id, "tree-file-1");
/// assert_eq!(attached.tree_id, "tree-1");
/// let trees = document.trees.expect("trees created");
/// assert_eq!(trees["tree-1"].file, "tree-file-1");
/// ```
pub fn attach_tree(
    document: &mut ProjectDocument,
    attachment: &TreeAttachment,
) -> Result<AttachedTree, DocumentError> {
    if attachment.label_field.trim().is_empty() {
        return Err(DocumentError::EmptyLabelField);
    }
    if !has_tree_extension(&attachment.file_name) {
        return Err(DocumentError::InvalidTreeFileName {
            name: attachment.file_name.clone(),
            expected: TREE_FILE_EXTENSIONS.map(|ext| format!(".{ext}")).join(", "),
        });
    }

    let file_id = choose_id(
        &document.files,
        "files",
        attachment.file_id.as_deref(),
        TREE_FILE_ID_PREFIX,
    )?;
    let no_trees = RecordMap::new();
    let tree_id = choose_id(
        document.trees.as_ref().unwrap_or(&no_trees),
        "trees",
        attachment.tree_id.as_deref(),
        TREE_ID_PREFIX,
    )?;

    document.files.insert(
        file_id.clone(),
        FileRecord::inline(NEWICK_FORMAT, &attachment.file_name, &attachment.newick),
    );
    document.trees.get_or_insert_with(RecordMap::new).insert(
        tree_id.clone(),
        TreeRecord {
            file: file_id.clone(),
            label_field: attachment.label_field.clone().into(),
            extra: Map::new(),
        },
    );

    Ok(AttachedTree { file_id, tree_id })
}

/// Return whether `file_name` ends in a recognised tree extension.
#[must_use]
pub fn has_tree_extension(file_name: &str) -> bool {
    file_name
        .rsplit_once('.')
        .is_some_and(|(stem, ext)| {
            !stem.is_empty()
                && TREE_FILE_EXTENSIONS
                    .iter()
                    .any(|known| ext.eq_ignore_ascii_case(known))
        })
}
