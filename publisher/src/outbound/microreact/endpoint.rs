//! Connection settings for the Microreact adapter.

use std::fmt;
use std::time::Duration;

use thiserror::Error;
use url::Url;
use zeroize::Zeroizing;

/// Validation failures for [`AccessToken`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AccessTokenError {
    /// The token was empty once trimmed.
    #[error("access token must not be empty")]
    Empty,
    /// The token contains characters that cannot be sent in a header.
    #[error("access token must only contain visible ASCII characters")]
    InvalidCharacters,
}

/// API credential attached to every request.
///
/// ## Invariants
/// - Non-empty after trimming and made of visible ASCII only, so it is always
///   a valid header value.
/// - The secret is wiped on drop and never printed by `Debug`.
///
/// # Examples
/// ```
/// use tree_publisher::outbound::microreact::AccessToken;
///
/// let token = AccessToken::try_new(" eyJhbGciOi ").expect("valid token");
/// assert_eq!(token.expose(), "eyJhbGciOi");
/// assert_eq!(format!("{token:?}"), "AccessToken(<redacted>)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(Zeroizing<String>);

impl AccessToken {
    /// Validate and wrap a raw token.
    ///
    /// # Errors
    ///
    /// Returns [`AccessTokenError`] when the token is blank or contains
    /// characters outside visible ASCII.
    pub fn try_new(raw: &str) -> Result<Self, AccessTokenError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AccessTokenError::Empty);
        }
        if !trimmed.bytes().all(|byte| byte.is_ascii_graphic()) {
            return Err(AccessTokenError::InvalidCharacters);
        }
        Ok(Self(Zeroizing::new(trimmed.to_owned())))
    }

    /// Token text for the `Access-Token` header.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// Everything the adapter needs to reach one Microreact deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MicroreactEndpoint {
    /// Base address request paths are resolved against.
    pub base_url: Url,
    /// Credential sent with every call.
    pub access_token: AccessToken,
    /// Whole-request timeout applied by the HTTP client.
    pub timeout: Duration,
}
