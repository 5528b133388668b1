//! JSON envelope client for the kra.sk storage API.
//!
//! Every call POSTs `{session_id?, data?}` to `<api>/<path>` and parses
//! the body as JSON regardless of HTTP status; outcomes live inside the
//! envelope, not in status codes.

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::models::{
    CopyRequest, CreateRequest, DeleteRequest, Envelope, IdentRequest, ListRequest, LoginRequest,
    UpdateRequest,
};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Base URL for the storage API
const API_BASE_URL: &str = "https://api.kra.sk/api";

/// Base URL for the TUS upload host
const UPLOAD_BASE_URL: &str = "https://upload.kra.sk";

/// Timeout in seconds for envelope calls. reqwest's `timeout` is a
/// total request deadline, so it only suits small request/response
/// bodies.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Connect timeout in seconds for transfer requests. Transfers carry no
/// total deadline: a streamed body is healthy for as long as it makes
/// progress.
const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Environment overrides for self-hosted deployments and tests
const API_URL_ENV: &str = "KRACLI_API_URL";
const UPLOAD_URL_ENV: &str = "KRACLI_UPLOAD_URL";

/// API client for kra.sk.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    transfer_client: Client,
    api_base: String,
    upload_base: String,
    session_id: Option<String>,
}

impl ApiClient {
    pub fn new() -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        let transfer_client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            transfer_client,
            api_base: std::env::var(API_URL_ENV).unwrap_or_else(|_| API_BASE_URL.to_string()),
            upload_base: std::env::var(UPLOAD_URL_ENV)
                .unwrap_or_else(|_| UPLOAD_BASE_URL.to_string()),
            session_id: None,
        })
    }

    pub fn set_session(&mut self, id: &str) {
        self.session_id = Some(id.to_string());
    }

    pub fn clear_session(&mut self) {
        self.session_id = None;
    }

    /// HTTP client for the transfer engine: bounded connect, no total
    /// request deadline, so large downloads and PATCHes can stream for
    /// as long as they take.
    pub fn transfer_http(&self) -> &Client {
        &self.transfer_client
    }

    /// Base URL of the TUS upload host.
    pub fn upload_base(&self) -> &str {
        &self.upload_base
    }

    /// POST an envelope to `<api>/<path>` with the current session id.
    pub async fn call<T: Serialize>(
        &self,
        path: &str,
        data: Option<&T>,
    ) -> Result<Envelope, ApiError> {
        self.call_with(path, self.session_id.as_deref(), data).await
    }

    async fn call_with<T: Serialize>(
        &self,
        path: &str,
        session_id: Option<&str>,
        data: Option<&T>,
    ) -> Result<Envelope, ApiError> {
        let url = format!("{}/{}", self.api_base, path);
        let mut body = serde_json::Map::new();
        if let Some(id) = session_id {
            body.insert("session_id".to_string(), Value::String(id.to_string()));
        }
        if let Some(data) = data {
            body.insert("data".to_string(), serde_json::to_value(data)?);
        }

        let response = self
            .client
            .post(&url)
            .json(&Value::Object(body))
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;
        debug!(path, %status, bytes = text.len(), "api response");

        serde_json::from_str(&text).map_err(|_| ApiError::invalid_response(status, &text))
    }

    // ===== Per-endpoint methods =====

    /// `user/login`. Sent without a session id; the fresh id arrives in
    /// the response envelope.
    pub async fn login(&self, username: &str, password: &str) -> Result<Envelope, ApiError> {
        let payload = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        self.call_with("user/login", None, Some(&payload)).await
    }

    pub async fn user_info(&self) -> Result<Envelope, ApiError> {
        self.call("user/info", None::<&()>).await
    }

    pub async fn list(&self, request: &ListRequest) -> Result<Envelope, ApiError> {
        self.call("file/list", Some(request)).await
    }

    pub async fn object_info(&self, ident: &str) -> Result<Envelope, ApiError> {
        let payload = IdentRequest {
            ident: ident.to_string(),
        };
        self.call("file/info", Some(&payload)).await
    }

    pub async fn create(&self, request: &CreateRequest) -> Result<Envelope, ApiError> {
        self.call("file/create", Some(request)).await
    }

    pub async fn copy(&self, request: &CopyRequest) -> Result<Envelope, ApiError> {
        self.call("file/copy", Some(request)).await
    }

    pub async fn delete(&self, request: &DeleteRequest) -> Result<Envelope, ApiError> {
        self.call("file/delete", Some(request)).await
    }

    pub async fn update(&self, request: &UpdateRequest) -> Result<Envelope, ApiError> {
        self.call("file/update", Some(request)).await
    }

    /// `file/download`. The response's `data.link` is the direct URL the
    /// transfer engine streams from.
    pub async fn download_link(&self, ident: &str) -> Result<Envelope, ApiError> {
        let payload = IdentRequest {
            ident: ident.to_string(),
        };
        self.call("file/download", Some(&payload)).await
    }
}
