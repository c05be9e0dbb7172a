//! The forwarding handler behind every API route.
//!
//! # Steps
//! ```text
//! method gate → auth gate → body validation → outbound construction
//!     → single dispatch → response rules → relay
//! ```
//! Each step may end the request; nothing after a rejection reaches the backend.

use std::net::SocketAddr;
use std::time::Instant;

use axum::body::{Body, Bytes};
use axum::http::{header, request::Parts, Request};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;

use crate::http::request::X_REQUEST_ID;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::proxy::auth::bearer_token;
use crate::proxy::error::{ProxyError, INVALID_JSON};
use crate::proxy::forwarder::{BackendReply, ForwardedRequest};
use crate::proxy::rules::{self, Resolution};
use crate::routing::route::carries_body;
use crate::routing::{RouteConfig, TemplateError};

/// Handle one inbound request for `route`.
pub async fn handle(
    state: &AppState,
    route: &RouteConfig,
    client: SocketAddr,
    request: Request<Body>,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    tracing::debug!(
        request_id = %request_id,
        route = route.name,
        method = %method,
        path = %request.uri().path(),
        client = %client,
        "Proxying request"
    );

    let (response, outcome) = match forward(state, route, request).await {
        Ok((reply, outcome)) => {
            tracing::info!(
                request_id = %request_id,
                route = route.name,
                method = %method,
                status = reply.status.as_u16(),
                outcome,
                "Request relayed"
            );
            ((reply.status, Json(reply.body)).into_response(), outcome)
        }
        Err(err) => {
            let outcome = err.outcome();
            tracing::warn!(
                request_id = %request_id,
                route = route.name,
                method = %method,
                status = err.status().as_u16(),
                outcome,
                reason = %err,
                "Request rejected"
            );
            (err.into_response_with(state.expose_error_details), outcome)
        }
    };

    metrics::record_request(route.name, &method, response.status(), outcome, start);
    response
}

async fn forward(
    state: &AppState,
    route: &RouteConfig,
    request: Request<Body>,
) -> Result<(BackendReply, &'static str), ProxyError> {
    let (parts, body) = request.into_parts();

    // 1. Method gate
    if !route.allows(&parts.method) {
        return Err(ProxyError::MethodNotAllowed {
            allowed: route.allowed_methods.clone(),
        });
    }

    // 2. Auth gate
    let token_presented = bearer_token(&parts.headers).is_some();
    if route.auth.requires(&parts.method) && !token_presented {
        return Err(ProxyError::Unauthenticated);
    }

    // 3. Body validation
    let body = if carries_body(&parts.method) {
        let bytes = axum::body::to_bytes(body, state.max_body_size)
            .await
            .map_err(|_| ProxyError::PayloadTooLarge)?;
        validate_body(route, &bytes)?
    } else {
        None
    };

    // 4. Outbound construction
    let (path, query) = backend_path(route, &parts)?;
    let outcome = match state.forwarder.url_for(&path, &query) {
        Ok(url) => {
            let forwarded = ForwardedRequest {
                method: parts.method.clone(),
                url,
                authorization: parts.headers.get(header::AUTHORIZATION).cloned(),
                request_id: parts.headers.get(X_REQUEST_ID).cloned(),
                body,
            };
            tracing::debug!(route = route.name, url = %forwarded.url, "Forwarding to backend");

            // 5. Dispatch
            state.forwarder.send(forwarded).await
        }
        Err(err) => Err(err.into()),
    };

    if let Err(err) = &outcome {
        tracing::error!(route = route.name, error = %err, "Backend call failed");
        metrics::record_backend_unreachable(route.name);
    }

    // 6. Relay
    match rules::resolve(&route.response_rules, outcome, token_presented) {
        Resolution::Relay(reply) => Ok((reply, "relayed")),
        Resolution::Rewritten(reply) => Ok((reply, "rewritten")),
        Resolution::Failed(err) => Err(ProxyError::BackendUnreachable(err)),
    }
}

/// Parse and check the inbound body; returns the bytes to forward, if any.
fn validate_body(route: &RouteConfig, bytes: &Bytes) -> Result<Option<Bytes>, ProxyError> {
    let blank = bytes.iter().all(u8::is_ascii_whitespace);
    let value = if blank {
        Value::Null
    } else {
        serde_json::from_slice(bytes).map_err(|_| ProxyError::Validation(INVALID_JSON.into()))?
    };

    if let Some(rule) = route.first_body_violation(&value) {
        return Err(ProxyError::Validation(rule.message.to_string()));
    }

    Ok((!blank).then(|| bytes.clone()))
}

/// Render the backend path and split the inbound query into placeholder
/// values and pairs forwarded as-is.
fn backend_path(
    route: &RouteConfig,
    parts: &Parts,
) -> Result<(String, Vec<(String, String)>), ProxyError> {
    let mut params = route.path.capture(parts.uri.path()).unwrap_or_default();
    let mut forwarded_query = Vec::new();

    if let Some(query) = parts.uri.query() {
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            if route.query_params.iter().any(|q| *q == key) {
                params.entry(key.into_owned()).or_insert(value.into_owned());
            } else {
                forwarded_query.push((key.into_owned(), value.into_owned()));
            }
        }
    }

    let path = route.backend_path.render(&params).map_err(|err| match err {
        TemplateError::MissingParameter(name) => ProxyError::MissingParameter(name),
        other => ProxyError::Validation(other.to_string()),
    })?;

    Ok((path, forwarded_query))
}
