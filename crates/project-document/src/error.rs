//! Error types for the project-document crate.
//!
//! Structural problems with a fetched document are reported separately from
//! problems with the requested mutation so callers can tell "the service sent
//! something unexpected" apart from "the attachment request was wrong".

use thiserror::Error;

use crate::document::DanglingReference;

/// Errors raised while decoding or mutating a project document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    /// The document does not have the expected shape.
    #[error("invalid project document: `{field}` {message}")]
    InvalidDocument {
        /// Top-level field that failed validation, or `document` for the root.
        field: String,
        /// Description of the structural problem.
        message: String,
    },

    /// An explicitly requested identifier is already used in its mapping.
    #[error("identifier '{id}' already exists in `{mapping}`")]
    IdentifierCollision {
        /// Name of the mapping (`files` or `trees`).
        mapping: &'static str,
        /// The identifier that collided.
        id: String,
    },

    /// An explicitly requested identifier was blank.
    #[error("identifiers in `{mapping}` must not be blank")]
    BlankIdentifier {
        /// Name of the mapping the identifier was meant for.
        mapping: &'static str,
    },

    /// The display name of a tree file does not carry a tree extension.
    #[error("tree file name '{name}' must end with one of: {expected}")]
    InvalidTreeFileName {
        /// The rejected display name.
        name: String,
        /// Comma-separated list of accepted extensions.
        expected: String,
    },

    /// The label field naming the leaf label column was blank.
    #[error("tree label field must not be empty")]
    EmptyLabelField,

    /// One or more records reference identifiers that do not exist.
    #[error("document contains {} dangling reference(s): {}", .0.len(), join_references(.0))]
    DanglingReferences(Vec<DanglingReference>),
}

impl DocumentError {
    pub(crate) fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidDocument {
            field: field.into(),
            message: message.into(),
        }
    }
}

fn join_references(references: &[DanglingReference]) -> String {
    references
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
