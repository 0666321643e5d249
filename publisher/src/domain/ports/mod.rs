//! Domain ports and supporting types for the hexagonal boundary.

mod project_service;

#[cfg(test)]
pub use project_service::MockProjectService;
pub use project_service::{
    CreatedProject, ProjectId, ProjectIdError, ProjectService, ProjectServiceError,
    UpdatedProject,
};
