//! Microreact outbound adapters.
//!
//! This module provides a thin HTTP implementation of the `ProjectService`
//! port plus the connection settings it is constructed from.

mod dto;
mod endpoint;
mod http_client;

pub use endpoint::{AccessToken, AccessTokenError, MicroreactEndpoint};
pub use http_client::MicroreactHttpClient;
