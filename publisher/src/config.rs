//! Publisher settings loaded via OrthoConfig.
//!
//! Values come from `MICROREACT_*` environment variables (or an OrthoConfig
//! configuration file) and are validated into a [`MicroreactEndpoint`].

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::outbound::microreact::{AccessToken, AccessTokenError, MicroreactEndpoint};

/// Deployment used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://microreact.org";
/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Failures while turning settings into an endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    /// `MICROREACT_ACCESS_TOKEN` was not provided.
    #[error("MICROREACT_ACCESS_TOKEN must be set")]
    MissingAccessToken,
    /// The access token failed validation.
    #[error("MICROREACT_ACCESS_TOKEN is invalid: {0}")]
    InvalidAccessToken(#[from] AccessTokenError),
    /// The base URL could not be parsed or uses an unsupported scheme.
    #[error("MICROREACT_BASE_URL '{url}' is invalid: {message}")]
    InvalidBaseUrl {
        /// Configured value.
        url: String,
        /// Reason the value was rejected.
        message: String,
    },
    /// The timeout was zero.
    #[error("MICROREACT_TIMEOUT_SECONDS must be at least 1")]
    InvalidTimeout,
}

/// Connection settings for the Microreact deployment.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "MICROREACT")]
pub struct PublisherSettings {
    /// Base address of the deployment.
    pub base_url: Option<String>,
    /// API access token.
    pub access_token: Option<String>,
    /// Whole-request timeout in seconds.
    pub timeout_seconds: Option<u64>,
}

impl PublisherSettings {
    /// Return the configured base URL text, falling back to the default.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// Return the configured timeout, falling back to the default.
    #[must_use]
    pub fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }

    /// Validate the settings into an adapter endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when the token is missing or invalid, the
    /// base URL is not an absolute http(s) URL, or the timeout is zero.
    pub fn endpoint(&self) -> Result<MicroreactEndpoint, SettingsError> {
        let raw_token = self
            .access_token
            .as_deref()
            .ok_or(SettingsError::MissingAccessToken)?;
        let access_token = AccessToken::try_new(raw_token)?;
        let base_url = parse_base_url(self.base_url())?;
        let timeout_seconds = self.timeout_seconds();
        if timeout_seconds == 0 {
            return Err(SettingsError::InvalidTimeout);
        }
        Ok(MicroreactEndpoint {
            base_url,
            access_token,
            timeout: Duration::from_secs(timeout_seconds),
        })
    }
}

fn parse_base_url(raw: &str) -> Result<Url, SettingsError> {
    let invalid = |message: String| SettingsError::InvalidBaseUrl {
        url: raw.to_owned(),
        message,
    };
    let url = Url::parse(raw.trim()).map_err(|error| invalid(error.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(format!("unsupported scheme '{other}'"))),
    }
}
