//! Client configuration

use std::path::PathBuf;

use crate::error::{ClientError, Result};

/// Default API base URL
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// Client configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL every API path is appended to
    pub api_url: String,
    /// Where the session token is persisted
    pub session_file: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            session_file: Self::default_session_file(),
        }
    }
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>, session_file: impl Into<PathBuf>) -> Self {
        Self {
            api_url: api_url.into(),
            session_file: session_file.into(),
        }
    }

    /// Checks the API URL before any request is built from it
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.api_url)?;
        match url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(ClientError::Config(format!("unsupported API scheme: {other}"))),
        }
    }

    /// `~/.marktauto/session.json`, or a relative path when there is no home directory
    pub fn default_session_file() -> PathBuf {
        dirs::home_dir()
            .map(|home| home.join(".marktauto"))
            .unwrap_or_else(|| PathBuf::from(".marktauto"))
            .join("session.json")
    }
}
