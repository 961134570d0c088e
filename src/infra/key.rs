//! Export key handling. The key is a base64 JSON payload carrying the API
//! host and the JWT that authorizes the export run.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KeyError {
    #[error("key is not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),
    #[error("key payload is not valid JSON: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Decoded export key payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ExportKey {
    pub host: String,
    pub jwt: String,
}

impl ExportKey {
    /// Decode a base64 key string into its payload. Surrounding whitespace
    /// (a trailing newline in a key file) is tolerated.
    pub fn decode(raw: &str) -> Result<Self, KeyError> {
        let bytes = STANDARD.decode(raw.trim())?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// The API base URL. A bare host resolves over https; a full URL is used
    /// as-is.
    pub fn base_url(&self) -> String {
        if self.host.contains("://") {
            self.host.clone()
        } else {
            format!("https://{}", self.host)
        }
    }
}
