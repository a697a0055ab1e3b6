//! Client for the course query service.
//!
//! The controllers only talk to [`QueryService`]; [`ApiClient`] is the
//! reqwest-backed implementation used by the application shell.

use crate::types::Source;
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};

// ============================================
// Error Types
// ============================================

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("Query failed ({status}): {body}")]
    Status { status: StatusCode, body: String },

    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid service URL: {0}")]
    InvalidUrl(String),
}

pub type ChatResult<T> = Result<T, ChatError>;

// ============================================
// Wire Types
// ============================================

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct QueryRequest {
    pub query: String,
    pub session_id: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct QueryResponse {
    pub answer: String,
    pub session_id: String,
    #[serde(default)]
    pub sources: Vec<Source>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct CourseStats {
    pub total_courses: usize,
    #[serde(default)]
    pub course_titles: Vec<String>,
}

/// Remote operations the controllers depend on.
#[async_trait]
pub trait QueryService: Send + Sync {
    async fn query(&self, request: &QueryRequest) -> ChatResult<QueryResponse>;

    async fn delete_session(&self, session_id: &str) -> ChatResult<()>;

    async fn course_stats(&self) -> ChatResult<CourseStats>;
}

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base: String,
}

impl ApiClient {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base: base.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// `<base>/api/session/<id>`, with the id encoded as a single path segment.
    fn session_url(&self, session_id: &str) -> ChatResult<Url> {
        let mut url =
            Url::parse(&self.base).map_err(|err| ChatError::InvalidUrl(err.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| ChatError::InvalidUrl(self.base.clone()))?
            .pop_if_empty()
            .extend(["api", "session", session_id]);
        Ok(url)
    }

    async fn read_body(response: reqwest::Response) -> ChatResult<String> {
        let status = response.status();
        let body = response.text().await?;
        if status.is_success() {
            Ok(body)
        } else {
            Err(ChatError::Status { status, body })
        }
    }
}

#[async_trait]
impl QueryService for ApiClient {
    async fn query(&self, request: &QueryRequest) -> ChatResult<QueryResponse> {
        let response = self
            .client
            .post(self.url("/api/query"))
            .json(request)
            .send()
            .await?;
        let body = Self::read_body(response).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn delete_session(&self, session_id: &str) -> ChatResult<()> {
        let response = self
            .client
            .delete(self.session_url(session_id)?)
            .send()
            .await?;
        Self::read_body(response).await.map(|_| ())
    }

    async fn course_stats(&self) -> ChatResult<CourseStats> {
        let response = self.client.get(self.url("/api/courses")).send().await?;
        let body = Self::read_body(response).await?;
        Ok(serde_json::from_str(&body)?)
    }
}
