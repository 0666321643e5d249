//! Driven port for the hosted project service.
//!
//! The domain owns the request and response contract so orchestration can be
//! exercised without a network. Documents travel as typed
//! [`ProjectDocument`]s on the way out; fetched documents come back as raw
//! JSON so that shape validation stays a domain concern.

use std::fmt;

use async_trait::async_trait;
use project_document::ProjectDocument;
use serde_json::Value;
use thiserror::Error;
use url::Url;

/// Server-assigned project identifier.
///
/// ## Invariants
/// - Never blank; surrounding whitespace is trimmed.
///
/// # Examples
/// ```
/// use tree_publisher::domain::ports::ProjectId;
///
/// let id = ProjectId::try_new(" 9bx3LHaYk ").expect("valid id");
/// assert_eq!(id.as_str(), "9bx3LHaYk");
/// assert!(ProjectId::try_new("  ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectId(String);

impl ProjectId {
    /// Validate and wrap a raw identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectIdError::Blank`] when the identifier is blank.
    pub fn try_new(raw: impl AsRef<str>) -> Result<Self, ProjectIdError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ProjectIdError::Blank);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validation failures for [`ProjectId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ProjectIdError {
    /// The identifier was empty once trimmed.
    #[error("project id must not be blank")]
    Blank,
}

/// Response to a successful create call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedProject {
    /// Identifier assigned by the service.
    pub id: ProjectId,
}

/// Response to a successful replace call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatedProject {
    /// User-facing address of the updated project.
    pub url: Url,
}

/// Errors surfaced while calling the project service.
///
/// Every variant is a transport-level failure: the service was unreachable,
/// refused the call, or answered with something other than the expected
/// envelope.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProjectServiceError {
    /// Network transport failed before a response was received.
    #[error("project service transport failed: {message}")]
    Transport {
        /// Description of the transport failure.
        message: String,
    },
    /// The call exceeded its timeout.
    #[error("project service timeout: {message}")]
    Timeout {
        /// Description of the timeout.
        message: String,
    },
    /// The service rejected the access token.
    #[error("project service rejected credentials (status {status}): {message}")]
    Unauthorized {
        /// HTTP status returned.
        status: u16,
        /// Response summary.
        message: String,
    },
    /// The service answered with another non-success status.
    #[error("project service returned status {status}: {message}")]
    Rejected {
        /// HTTP status returned.
        status: u16,
        /// Response summary.
        message: String,
    },
    /// The response body could not be decoded.
    #[error("project service response decode failed: {message}")]
    Decode {
        /// Description of the decode failure.
        message: String,
    },
}

impl ProjectServiceError {
    /// Build a [`ProjectServiceError::Transport`] error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Build a [`ProjectServiceError::Timeout`] error.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    /// Build a [`ProjectServiceError::Unauthorized`] error.
    pub fn unauthorized(status: u16, message: impl Into<String>) -> Self {
        Self::Unauthorized {
            status,
            message: message.into(),
        }
    }

    /// Build a [`ProjectServiceError::Rejected`] error.
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }

    /// Build a [`ProjectServiceError::Decode`] error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }
}

/// Port for creating, reading and replacing project documents.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectService: Send + Sync {
    /// Create a project from an initial document and return its identifier.
    async fn create_project(
        &self,
        document: &ProjectDocument,
    ) -> Result<CreatedProject, ProjectServiceError>;

    /// Fetch the authoritative document for a project.
    async fn fetch_document(&self, project_id: &ProjectId) -> Result<Value, ProjectServiceError>;

    /// Overwrite the stored document wholesale.
    async fn replace_document(
        &self,
        project_id: &ProjectId,
        document: &ProjectDocument,
    ) -> Result<UpdatedProject, ProjectServiceError>;
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("", ProjectIdError::Blank)]
    #[case(" \t ", ProjectIdError::Blank)]
    fn blank_project_ids_are_rejected(#[case] raw: &str, #[case] expected: ProjectIdError) {
        assert_eq!(ProjectId::try_new(raw), Err(expected));
    }

    #[rstest]
    #[case(ProjectServiceError::transport("connection reset"), "project service transport failed: connection reset")]
    #[case(ProjectServiceError::unauthorized(401, "bad token"), "project service rejected credentials (status 401): bad token")]
    #[case(ProjectServiceError::rejected(500, "boom"), "project service returned status 500: boom")]
    fn errors_format_with_context(#[case] error: ProjectServiceError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }
}
