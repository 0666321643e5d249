//! Typed Microreact project documents and the additive tree attachment
//! operation.
//!
//! A project document bundles raw files, datasets, map views, metadata tables
//! and, optionally, phylogenetic trees. This crate decodes documents fetched
//! from the service into typed records (keeping unknown fields for a verbatim
//! round trip), checks cross-record references, and attaches Newick trees
//! without overwriting existing entries. It performs no I/O.
//!
//! # Example
//!
//! ```
//! use project_document::{
//!     DEMO_NEWICK, NEWICK_FORMAT, ProjectDocument, TreeAttachment, attach_tree, demo_project,
//! };
//!
//! let fetched = demo_project("New Project").to_value().expect("encodes");
//! let mut document = ProjectDocument::from_value(fetched).expect("decodes");
//!
//! let attached = attach_tree(&mut document, &TreeAttachment::new(DEMO_NEWICK))
//!     .expect("attach succeeds");
//!
//! let file = &document.files[attached.file_id.as_str()];
//! assert_eq!(file.format, NEWICK_FORMAT);
//! assert!(document.validate_references().is_ok());
//! ```

mod demo;
mod document;
mod error;
mod field;
mod identifiers;
mod tree;

pub use demo::{
    DEFAULT_PROJECT_NAME, DEMO_CSV, DEMO_NEWICK, PROJECT_FORMAT_VERSION, PROJECT_SCHEMA_URL,
    demo_project,
};
pub use document::{
    CSV_FORMAT, ColumnRecord, DanglingReference, DatasetRecord, FileRecord, MapRecord,
    NEWICK_FORMAT, ProjectDocument, ProjectMeta, RecordMap, ReferenceKind, TableRecord,
    TreeRecord,
};
pub use error::DocumentError;
pub use field::Field;
pub use identifiers::next_free_id;
pub use tree::{
    AttachedTree, DEFAULT_LABEL_FIELD, DEFAULT_TREE_FILE_NAME, TREE_FILE_EXTENSIONS,
    TreeAttachment, attach_tree, has_tree_extension,
};
