//! Tree publication orchestration service.
//!
//! Runs the four strictly sequential steps:
//! - create a project from the initial document;
//! - fetch the authoritative document the service stored;
//! - attach the tree locally;
//! - replace the stored document with the augmented one.
//!
//! No step is retried. A failure after the create call leaves the created
//! project on the service; its identifier is logged when it is assigned and
//! carried in document errors.

use std::fmt;
use std::sync::Arc;

use project_document::{
    AttachedTree, DocumentError, ProjectDocument, TreeAttachment, attach_tree,
};
use thiserror::Error;
use tracing::{info, warn};
use url::Url;

use crate::domain::ports::{ProjectId, ProjectService, ProjectServiceError};

/// Remote step of the publication pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublicationStep {
    /// Creating the project.
    Create,
    /// Fetching the stored document.
    Fetch,
    /// Replacing the stored document.
    Replace,
}

impl fmt::Display for PublicationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => write!(f, "create project"),
            Self::Fetch => write!(f, "fetch project document"),
            Self::Replace => write!(f, "replace project document"),
        }
    }
}

/// Errors returned by [`TreePublicationService::publish`].
#[derive(Debug, Error)]
pub enum PublicationError {
    /// The service was unreachable or refused a call.
    #[error("{step} failed: {source}")]
    Transport {
        /// Step that failed.
        step: PublicationStep,
        /// Underlying port error.
        #[source]
        source: ProjectServiceError,
    },
    /// The fetched document was malformed or the tree could not be attached.
    #[error("project {project_id}: {source}")]
    Document {
        /// Project whose document was being processed.
        project_id: ProjectId,
        /// Underlying document error.
        #[source]
        source: DocumentError,
    },
}

impl PublicationError {
    /// Return whether the failure came from the transport rather than the
    /// document.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Return the created project left behind by the failure, if any.
    #[must_use]
    pub const fn project_id(&self) -> Option<&ProjectId> {
        match self {
            Self::Document { project_id, .. } => Some(project_id),
            Self::Transport { .. } => None,
        }
    }
}

/// Inputs for one publication run.
#[derive(Debug, Clone, PartialEq)]
pub struct PublicationRequest {
    /// Document sent with the create call.
    pub initial_document: ProjectDocument,
    /// Tree to attach to the fetched document.
    pub tree: TreeAttachment,
}

/// Result of a successful publication run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicationOutcome {
    /// Identifier of the created project.
    pub project_id: ProjectId,
    /// User-facing address of the updated project.
    pub url: Url,
    /// Keys of the inserted file and tree entries.
    pub attached: AttachedTree,
}

/// Domain service publishing a tree into a freshly created project.
#[derive(Clone)]
pub struct TreePublicationService<S> {
    service: Arc<S>,
}

impl<S> TreePublicationService<S> {
    /// Create a publication service over a project service port.
    pub const fn new(service: Arc<S>) -> Self {
        Self { service }
    }
}

impl<S> TreePublicationService<S>
where
    S: ProjectService,
{
    /// Create the project, attach the tree and save the document.
    ///
    /// # Errors
    ///
    /// Returns [`PublicationError::Transport`] when any remote call fails and
    /// [`PublicationError::Document`] when the fetched document is malformed
    /// or the attachment is rejected. The first failure aborts the run.
    pub async fn publish(
        &self,
        request: &PublicationRequest,
    ) -> Result<PublicationOutcome, PublicationError> {
        let created = self
            .service
            .create_project(&request.initial_document)
            .await
            .map_err(|source| PublicationError::Transport {
                step: PublicationStep::Create,
                source,
            })?;
        let project_id = created.id;
        info!(project_id = %project_id, "project created");

        let fetched = self
            .service
            .fetch_document(&project_id)
            .await
            .map_err(|source| PublicationError::Transport {
                step: PublicationStep::Fetch,
                source,
            })?;
        let mut document = ProjectDocument::from_value(fetched)
            .map_err(|source| document_error(&project_id, source))?;
        info!(
            project_id = %project_id,
            files = document.files.len(),
            has_trees = document.trees.is_some(),
            "project document fetched"
        );
        warn_on_dangling_references(&project_id, &document);

        let attached = attach_tree(&mut document, &request.tree)
            .map_err(|source| document_error(&project_id, source))?;
        info!(
            project_id = %project_id,
            file_id = %attached.file_id,
            tree_id = %attached.tree_id,
            "tree attached"
        );

        let updated = self
            .service
            .replace_document(&project_id, &document)
            .await
            .map_err(|source| PublicationError::Transport {
                step: PublicationStep::Replace,
                source,
            })?;
        info!(project_id = %project_id, url = %updated.url, "project updated");

        Ok(PublicationOutcome {
            project_id,
            url: updated.url,
            attached,
        })
    }
}

fn document_error(project_id: &ProjectId, source: DocumentError) -> PublicationError {
    PublicationError::Document {
        project_id: project_id.clone(),
        source,
    }
}

fn warn_on_dangling_references(project_id: &ProjectId, document: &ProjectDocument) {
    for reference in document.dangling_references() {
        warn!(
            project_id = %project_id,
            reference = %reference,
            "fetched document contains a dangling reference"
        );
    }
}

#[cfg(test)]
#[path = "tree_publication_tests.rs"]
mod tests;
