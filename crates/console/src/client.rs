//! REST client for the resource routes.
//!
//! Wraps `/api/<resource>` (list, single read, create, update, delete) and
//! `/api/login` using [`reqwest`]. Non-2xx answers are decoded into the
//! API's `{ "message", "detail"? }` error body.

use aset_core::types::{DbId, Record};
use aset_core::validation::FieldIssue;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::ConsoleConfig;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// The `message` of an error body: either text or an itemised issue list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ErrorMessage {
    Text(String),
    Issues(Vec<FieldIssue>),
}

/// Error body returned by the API on any non-2xx answer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ErrorBody {
    pub message: ErrorMessage,
    #[serde(default)]
    pub detail: Option<String>,
}

impl ErrorBody {
    /// Decode a raw body, falling back to the text itself (e.g. the plain
    /// `Method X Not Allowed` answer).
    fn parse(raw: &[u8]) -> Self {
        serde_json::from_slice(raw).unwrap_or_else(|_| Self {
            message: ErrorMessage::Text(String::from_utf8_lossy(raw).into_owned()),
            detail: None,
        })
    }
}

/// Errors from the resource client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The HTTP request itself failed (network, DNS, TLS, decoding).
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-2xx status.
    #[error("API error ({status}): {body:?}")]
    Rejected { status: u16, body: ErrorBody },
}

impl ClientError {
    /// A single line suitable for a notification.
    pub fn summary(&self) -> String {
        match self {
            ClientError::Transport(err) => err.to_string(),
            ClientError::Rejected { body, .. } => match &body.message {
                ErrorMessage::Text(text) => text.clone(),
                ErrorMessage::Issues(issues) => issues
                    .iter()
                    .map(|i| i.message.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct MessageBody {
    message: String,
}

/// Result of a successful login.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginOutcome {
    pub token: String,
    pub user: Record,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// HTTP client for one API server.
#[derive(Clone)]
pub struct ResourceClient {
    client: reqwest::Client,
    api_route: String,
    token: Option<String>,
}

impl ResourceClient {
    pub fn new(config: &ConsoleConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Reuse an existing [`reqwest::Client`] (shared connection pool).
    pub fn with_client(client: reqwest::Client, config: &ConsoleConfig) -> Self {
        Self {
            client,
            api_route: config.api_route.clone(),
            token: None,
        }
    }

    /// Bearer token sent with every request from now on.
    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    /// List every record of `resource` (e.g. `"tahun"`).
    pub async fn list(&self, resource: &str) -> Result<Vec<Record>, ClientError> {
        let response = self.request(Method::GET, resource).send().await?;
        Self::parse_response(response).await
    }

    /// Read one record by id.
    pub async fn fetch(&self, resource: &str, id: DbId) -> Result<Option<Record>, ClientError> {
        let response = self
            .request(Method::GET, resource)
            .query(&[("id", id)])
            .send()
            .await?;
        let rows: Vec<Record> = Self::parse_response(response).await?;
        Ok(rows.into_iter().next())
    }

    /// Create a record; returns the server's success message.
    pub async fn create(&self, resource: &str, draft: &Record) -> Result<String, ClientError> {
        let response = self
            .request(Method::POST, resource)
            .json(draft)
            .send()
            .await?;
        Self::parse_message(response).await
    }

    /// Update a record; `draft` carries its `id`.
    pub async fn update(&self, resource: &str, draft: &Record) -> Result<String, ClientError> {
        let response = self
            .request(Method::PUT, resource)
            .json(draft)
            .send()
            .await?;
        Self::parse_message(response).await
    }

    /// Delete a record. Without an id the request is still sent and the
    /// server's refusal is returned.
    pub async fn delete(&self, resource: &str, id: Option<DbId>) -> Result<String, ClientError> {
        let mut request = self.request(Method::DELETE, resource);
        if let Some(id) = id {
            request = request.query(&[("id", id)]);
        }
        let response = request.send().await?;
        Self::parse_message(response).await
    }

    /// Exchange credentials for a bearer token.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginOutcome, ClientError> {
        let body = serde_json::json!({
            "username": username,
            "password": password,
        });
        let response = self
            .client
            .post(format!("{}/api/login", self.api_route))
            .json(&body)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    // ---- private helpers ----

    fn request(&self, method: Method, resource: &str) -> RequestBuilder {
        let request = self
            .client
            .request(method, format!("{}/api/{}", self.api_route, resource));
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Return the response on success, or a [`ClientError::Rejected`] with
    /// the decoded error body.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if !status.is_success() {
            let raw = response.bytes().await?;
            return Err(ClientError::Rejected {
                status: status.as_u16(),
                body: ErrorBody::parse(&raw),
            });
        }
        Ok(response)
    }

    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }

    async fn parse_message(response: reqwest::Response) -> Result<String, ClientError> {
        let body: MessageBody = Self::parse_response(response).await?;
        Ok(body.message)
    }
}
