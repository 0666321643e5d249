//! DTOs for decoding Microreact API responses.
//!
//! The adapter decodes into these transport DTOs first, then maps them into
//! domain records in one pass.

use serde::Deserialize;
use url::Url;

use crate::domain::ports::{CreatedProject, ProjectId, UpdatedProject};

#[derive(Debug, Deserialize)]
pub(super) struct CreateProjectResponseDto {
    pub(super) id: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct UpdateProjectResponseDto {
    pub(super) url: String,
}

impl CreateProjectResponseDto {
    pub(super) fn into_domain(self) -> Result<CreatedProject, String> {
        let id = ProjectId::try_new(&self.id).map_err(|error| format!("create response: {error}"))?;
        Ok(CreatedProject { id })
    }
}

impl UpdateProjectResponseDto {
    pub(super) fn into_domain(self) -> Result<UpdatedProject, String> {
        let url = Url::parse(self.url.trim())
            .map_err(|error| format!("update response url '{}' is invalid: {error}", self.url))?;
        Ok(UpdatedProject { url })
    }
}
