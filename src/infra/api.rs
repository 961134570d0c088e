//! HTTP client for the publishing API.

use reqwest::{Client, Url};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server error: {0}")]
    Server(String),
}

/// One topic from the listing endpoint. Extra fields survive only in the raw
/// `topics.json` dump.
#[derive(Debug, Clone, Deserialize)]
pub struct Topic {
    pub id: String,
}

/// A fetched document. `content` is the JSON-encoded node tree exactly as
/// the API stores it; parsing into a [`Document`](crate::domain::document::Document)
/// happens in the export flow.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentEnvelope {
    pub id: String,
    pub content: String,
    pub title: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base: Url,
    token: String,
}

impl ApiClient {
    pub fn new(base: &str, token: String) -> Result<Self, ApiError> {
        let base = Url::parse(base)?.join("/")?;
        let client = Client::builder().user_agent(Self::user_agent()).build()?;
        Ok(Self {
            client,
            base,
            token,
        })
    }

    pub fn user_agent() -> &'static str {
        concat!("ricalco/", env!("CARGO_PKG_VERSION"))
    }

    /// GET `/api/topics`. Returned as a raw value so callers can persist the
    /// listing verbatim before picking out the ids.
    pub async fn topics(&self) -> Result<serde_json::Value, ApiError> {
        self.get_json("api/topics").await
    }

    /// GET `/api/documents/{id}`.
    pub async fn document(&self, id: &str) -> Result<DocumentEnvelope, ApiError> {
        self.get_json(&format!("api/documents/{id}")).await
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.base.join(path)?;
        let resp = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await?;
        let status = resp.status();
        let bytes = resp.bytes().await?;
        if !status.is_success() {
            let text = String::from_utf8_lossy(&bytes).into_owned();
            return Err(ApiError::Server(format!("status {status} body {text}")));
        }
        serde_json::from_slice(&bytes)
            .map_err(|e| ApiError::Server(format!("failed to parse body: {e}")))
    }
}
