//! Outbound calls to the backend service.
//!
//! # Design Decisions
//! - Exactly one attempt per inbound request, no retries or backoff
//! - Client-level timeout so a stuck backend cannot hold a request forever
//! - Any transport failure or non-JSON answer is reported as [`ForwardError`]

use std::time::Duration;

use axum::body::Bytes;
use axum::http::{header, HeaderValue, Method, StatusCode};
use serde_json::Value;
use url::Url;

use crate::config::BackendConfig;
use crate::http::request::X_REQUEST_ID;

/// Why a backend answer could not be relayed.
#[derive(Debug, thiserror::Error)]
pub enum ForwardError {
    #[error("backend request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("backend response is not JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("invalid backend URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// The single outbound call made for one inbound request.
#[derive(Debug)]
pub struct ForwardedRequest {
    pub method: Method,
    pub url: Url,
    /// Copied verbatim from the inbound request.
    pub authorization: Option<HeaderValue>,
    pub request_id: Option<HeaderValue>,
    /// Inbound body bytes, unchanged.
    pub body: Option<Bytes>,
}

/// A backend answer with a JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendReply {
    pub status: StatusCode,
    pub body: Value,
}

/// HTTP client bound to the configured backend base URL.
#[derive(Debug, Clone)]
pub struct Forwarder {
    client: reqwest::Client,
    base_url: String,
}

impl Forwarder {
    pub fn new(config: &BackendConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .no_proxy()
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join the base URL, a rendered backend path and the query pairs to forward.
    pub fn url_for(&self, path: &str, query: &[(String, String)]) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, path))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    pub async fn send(&self, request: ForwardedRequest) -> Result<BackendReply, ForwardError> {
        let mut builder = self
            .client
            .request(request.method, request.url)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "application/json");

        if let Some(auth) = request.authorization {
            builder = builder.header(header::AUTHORIZATION, auth);
        }
        if let Some(id) = request.request_id {
            builder = builder.header(X_REQUEST_ID, id);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        let body = serde_json::from_slice(&bytes)?;

        Ok(BackendReply { status, body })
    }
}
