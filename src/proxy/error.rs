//! Terminal error outcomes of a proxied call.
//!
//! Every variant renders as a JSON body with a `message` field.

use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::proxy::forwarder::ForwardError;

pub const INVALID_JSON: &str = "Invalid JSON body";

#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("Method not allowed")]
    MethodNotAllowed { allowed: Vec<Method> },

    #[error("Not authorized, no token")]
    Unauthenticated,

    #[error("{0}")]
    Validation(String),

    #[error("Missing parameter: {0}")]
    MissingParameter(String),

    #[error("Request body too large")]
    PayloadTooLarge,

    #[error("Server error while contacting backend")]
    BackendUnreachable(#[source] ForwardError),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            ProxyError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ProxyError::Validation(_) | ProxyError::MissingParameter(_) => StatusCode::BAD_REQUEST,
            ProxyError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ProxyError::BackendUnreachable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Label used in logs and metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            ProxyError::MethodNotAllowed { .. } => "method_rejected",
            ProxyError::Unauthenticated => "auth_rejected",
            ProxyError::Validation(_)
            | ProxyError::MissingParameter(_)
            | ProxyError::PayloadTooLarge => "validation_rejected",
            ProxyError::BackendUnreachable(_) => "backend_unreachable",
        }
    }

    /// Render the error. With `expose_details` the underlying backend error
    /// is added as an `error` field.
    pub fn into_response_with(self, expose_details: bool) -> Response {
        let status = self.status();
        let mut body = json!({ "message": self.to_string() });
        if let (true, ProxyError::BackendUnreachable(source)) = (expose_details, &self) {
            body["error"] = json!(source.to_string());
        }

        let mut response = (status, Json(body)).into_response();
        if let ProxyError::MethodNotAllowed { allowed } = &self {
            let allow = allowed
                .iter()
                .map(Method::as_str)
                .collect::<Vec<_>>()
                .join(", ");
            if let Ok(value) = HeaderValue::from_str(&allow) {
                response.headers_mut().insert(header::ALLOW, value);
            }
        }
        response
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        self.into_response_with(false)
    }
}
