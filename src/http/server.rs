//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with one route per route-table entry
//! - Wire up middleware (tracing, request ID, timeout)
//! - Bind server to listener
//! - Serve until the shutdown signal fires

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    routing::{any, get},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ProxyConfig;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::http::response;
use crate::lifecycle::ShutdownSignal;
use crate::proxy::{self, Forwarder};
use crate::routing::{self, validate_routes, RouteConfig, RouteError};

/// Extra time the inbound side waits beyond the backend timeout, so a slow
/// backend surfaces as a relayed failure instead of a bare 408.
const INBOUND_TIMEOUT_GRACE: Duration = Duration::from_secs(5);

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub forwarder: Arc<Forwarder>,
    pub max_body_size: usize,
    pub expose_error_details: bool,
}

/// Errors that prevent the server from starting.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("invalid route table: {}", .0.iter().map(ToString::to_string).collect::<Vec<_>>().join(", "))]
    Routes(Vec<RouteError>),
    #[error("failed to build backend client: {0}")]
    Client(#[from] reqwest::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// HTTP server for the storefront API proxy.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a server serving the standard route table.
    pub fn new(config: ProxyConfig) -> Result<Self, ServerError> {
        Self::with_routes(config, routing::routes())
    }

    /// Create a server serving a custom route table.
    pub fn with_routes(config: ProxyConfig, routes: Vec<RouteConfig>) -> Result<Self, ServerError> {
        validate_routes(&routes).map_err(ServerError::Routes)?;

        let forwarder = Forwarder::new(&config.backend)?;
        tracing::info!(
            backend = forwarder.base_url(),
            routes = routes.len(),
            "Proxy initialised"
        );

        let state = AppState {
            forwarder: Arc::new(forwarder),
            max_body_size: config.security.max_body_size,
            expose_error_details: config.observability.expose_error_details,
        };

        let router = Self::build_router(&config, state, routes);
        Ok(Self { router })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ProxyConfig, state: AppState, routes: Vec<RouteConfig>) -> Router {
        let mut router = Router::new().route("/healthz", get(response::health));

        for route in routes {
            let path = route.path.as_str().to_string();
            let route = Arc::new(route);
            router = router.route(
                &path,
                any(
                    move |State(state): State<AppState>,
                          ConnectInfo(client): ConnectInfo<SocketAddr>,
                          request: Request<Body>| {
                        let route = Arc::clone(&route);
                        async move { proxy::handle(&state, &route, client, request).await }
                    },
                ),
            );
        }

        let inbound_timeout = Duration::from_secs(config.backend.timeout_secs) + INBOUND_TIMEOUT_GRACE;

        router
            .fallback(response::not_found)
            .with_state(state)
            .layer(TimeoutLayer::new(inbound_timeout))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: ShutdownSignal,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown.recv())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
