//! Reqwest-backed Microreact project service adapter.
//!
//! This adapter owns transport details only: URL construction, credential
//! headers, timeout and HTTP error mapping, and JSON decoding into domain
//! records. It never inspects document contents.

use async_trait::async_trait;
use project_document::ProjectDocument;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderValue};
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::dto::{CreateProjectResponseDto, UpdateProjectResponseDto};
use super::endpoint::{AccessToken, MicroreactEndpoint};
use crate::domain::ports::{
    CreatedProject, ProjectId, ProjectService, ProjectServiceError, UpdatedProject,
};

const DEFAULT_USER_AGENT: &str = "tree-publisher/0.1";
const ACCESS_TOKEN_HEADER: &str = "Access-Token";
const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

const CREATE_PATH: &str = "/api/projects/create/";
const DOCUMENT_PATH: &str = "/api/projects/json";
const UPDATE_PATH: &str = "/api/projects/update";
const PROJECT_QUERY_KEY: &str = "project";

/// Project service adapter that talks JSON over HTTP to one deployment.
pub struct MicroreactHttpClient {
    client: Client,
    base_url: Url,
    access_token: AccessToken,
}

impl MicroreactHttpClient {
    /// Build an adapter using a reqwest client with the endpoint's timeout.
    ///
    /// # Examples
    /// ```
    /// use std::time::Duration;
    ///
    /// use tree_publisher::outbound::microreact::{
    ///     AccessToken, MicroreactEndpoint, MicroreactHttpClient,
    /// };
    /// use url::Url;
    ///
    /// let endpoint = MicroreactEndpoint {
    ///     base_url: Url::parse("https://microreact.org").expect("valid url"),
    ///     access_token: AccessToken::try_new("token").expect("valid token"),
    ///     timeout: Duration::from_secs(30),
    /// };
    /// let client = MicroreactHttpClient::new(endpoint).expect("client builds");
    /// # drop(client);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: MicroreactEndpoint) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(endpoint.timeout)
            .user_agent(DEFAULT_USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            base_url: endpoint.base_url,
            access_token: endpoint.access_token,
        })
    }

    fn create_url(&self) -> Result<Url, ProjectServiceError> {
        resolve(&self.base_url, CREATE_PATH)
    }

    fn project_url(&self, path: &str, project_id: &ProjectId) -> Result<Url, ProjectServiceError> {
        let mut url = resolve(&self.base_url, path)?;
        url.query_pairs_mut()
            .append_pair(PROJECT_QUERY_KEY, project_id.as_str());
        Ok(url)
    }

    fn token_header(&self) -> Result<HeaderValue, ProjectServiceError> {
        let mut value = HeaderValue::from_str(self.access_token.expose()).map_err(|_| {
            ProjectServiceError::transport("access token is not a valid header value")
        })?;
        value.set_sensitive(true);
        Ok(value)
    }

    fn authorised(&self, request: RequestBuilder) -> Result<RequestBuilder, ProjectServiceError> {
        Ok(request
            .header(ACCESS_TOKEN_HEADER, self.token_header()?)
            .header(ACCEPT, "application/json"))
    }

    fn with_document(
        request: RequestBuilder,
        document: &ProjectDocument,
    ) -> Result<RequestBuilder, ProjectServiceError> {
        let body = serde_json::to_vec(document).map_err(|error| {
            ProjectServiceError::transport(format!("serialise project document: {error}"))
        })?;
        Ok(request.header(CONTENT_TYPE, JSON_CONTENT_TYPE).body(body))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Vec<u8>, ProjectServiceError> {
        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            let error = map_status_error(status, body.as_ref());
            debug!(status = status.as_u16(), %error, "microreact call rejected");
            return Err(error);
        }
        Ok(body.to_vec())
    }
}

#[async_trait]
impl ProjectService for MicroreactHttpClient {
    async fn create_project(
        &self,
        document: &ProjectDocument,
    ) -> Result<CreatedProject, ProjectServiceError> {
        let url = self.create_url()?;
        let request = Self::with_document(self.authorised(self.client.post(url))?, document)?;
        let body = self.send(request).await?;
        decode::<CreateProjectResponseDto>(&body)?
            .into_domain()
            .map_err(ProjectServiceError::decode)
    }

    async fn fetch_document(&self, project_id: &ProjectId) -> Result<Value, ProjectServiceError> {
        let url = self.project_url(DOCUMENT_PATH, project_id)?;
        let request = self.authorised(self.client.get(url))?;
        let body = self.send(request).await?;
        decode::<Value>(&body)
    }

    async fn replace_document(
        &self,
        project_id: &ProjectId,
        document: &ProjectDocument,
    ) -> Result<UpdatedProject, ProjectServiceError> {
        let url = self.project_url(UPDATE_PATH, project_id)?;
        let request = Self::with_document(self.authorised(self.client.post(url))?, document)?;
        let body = self.send(request).await?;
        decode::<UpdateProjectResponseDto>(&body)?
            .into_domain()
            .map_err(ProjectServiceError::decode)
    }
}

// Paths are absolute, so they replace any path on the base URL.
fn resolve(base_url: &Url, path: &str) -> Result<Url, ProjectServiceError> {
    base_url.join(path).map_err(|error| {
        ProjectServiceError::transport(format!("build request url for {path}: {error}"))
    })
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ProjectServiceError> {
    serde_json::from_slice(body).map_err(|error| {
        ProjectServiceError::decode(format!(
            "invalid JSON payload ({error}): {}",
            body_preview(body)
        ))
    })
}

fn map_transport_error(error: reqwest::Error) -> ProjectServiceError {
    debug!(%error, "microreact transport failure");
    if error.is_timeout() {
        ProjectServiceError::timeout(error.to_string())
    } else {
        ProjectServiceError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> ProjectServiceError {
    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("no response body")
            .to_owned()
    } else {
        body_preview
    };

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            ProjectServiceError::unauthorized(status.as_u16(), message)
        }
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            ProjectServiceError::timeout(format!("status {}: {message}", status.as_u16()))
        }
        _ => ProjectServiceError::rejected(status.as_u16(), message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
