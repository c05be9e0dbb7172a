//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! table.rs (declarative RouteConfig list)
//!     → validate_routes (startup, all errors at once)
//!     → one axum route per entry, all served by proxy::handle
//!
//! Per request:
//!     template.rs capture (inbound path params)
//!     → template.rs render (backend path)
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Static segments win over placeholders (`/api/orders/stats` vs `/api/orders/{id}`)
//! - Method gating happens in the handler so rejections carry a JSON body

pub mod route;
pub mod table;
pub mod template;

use std::collections::HashSet;

pub use route::{AuthPolicy, FieldCheck, FieldRule, ResponseRule, RouteConfig, Transform, Trigger};
pub use table::routes;
pub use template::{PathTemplate, TemplateError};

/// A problem in the route table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    #[error("route {0:?} is defined more than once")]
    DuplicateName(&'static str),
    #[error("path {0:?} is served by more than one route")]
    DuplicatePath(String),
    #[error("route {0:?} accepts no methods")]
    NoMethods(&'static str),
    #[error("route {route:?}: {source}")]
    Template {
        route: &'static str,
        #[source]
        source: TemplateError,
    },
    #[error("route {route:?}: backend placeholder {placeholder:?} has no source")]
    UnboundPlaceholder {
        route: &'static str,
        placeholder: String,
    },
    #[error("route {0:?}: a rule keeping the backend status cannot fire without a backend answer")]
    StatusWithoutReply(&'static str),
}

/// Validate the route table, returning every problem found.
pub fn validate_routes(routes: &[RouteConfig]) -> Result<(), Vec<RouteError>> {
    let mut errors = Vec::new();
    let mut names = HashSet::new();
    let mut paths = HashSet::new();

    for route in routes {
        if !names.insert(route.name) {
            errors.push(RouteError::DuplicateName(route.name));
        }
        if !paths.insert(route.path.as_str()) {
            errors.push(RouteError::DuplicatePath(route.path.as_str().to_string()));
        }
        if route.allowed_methods.is_empty() {
            errors.push(RouteError::NoMethods(route.name));
        }

        for template in [&route.path, &route.backend_path] {
            if let Err(source) = template.check() {
                errors.push(RouteError::Template {
                    route: route.name,
                    source,
                });
            }
        }

        let inbound: HashSet<&str> = route.path.placeholders().collect();
        for placeholder in route.backend_path.placeholders() {
            if !inbound.contains(placeholder)
                && !route.query_params.iter().any(|q| *q == placeholder)
            {
                errors.push(RouteError::UnboundPlaceholder {
                    route: route.name,
                    placeholder: placeholder.to_string(),
                });
            }
        }

        let keeps_status_without_reply = route.response_rules.iter().any(|rule| {
            matches!(rule.trigger, Trigger::Unreachable | Trigger::Always)
                && matches!(rule.transform, Transform::Body(_))
        });
        if keeps_status_without_reply {
            errors.push(RouteError::StatusWithoutReply(route.name));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
