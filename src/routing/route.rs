//! Route definitions.
//!
//! A [`RouteConfig`] describes one inbound API endpoint: which methods it
//! accepts, when a bearer token is mandatory, which body fields must be
//! present, where it lives on the backend, and which backend outcomes are
//! rewritten before reaching the client.

use axum::http::{Method, StatusCode};
use serde_json::Value;

use crate::routing::template::PathTemplate;

/// When a route insists on an `Authorization` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthPolicy {
    /// Never required. A token is still forwarded when present.
    Optional,
    /// Required for every accepted method.
    Required,
    /// Required only for the listed methods.
    RequiredFor(Vec<Method>),
}

impl AuthPolicy {
    pub fn requires(&self, method: &Method) -> bool {
        match self {
            AuthPolicy::Optional => false,
            AuthPolicy::Required => true,
            AuthPolicy::RequiredFor(methods) => methods.contains(method),
        }
    }
}

/// Check applied to a single JSON body field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldCheck {
    /// Present, not null, not `false`, not a blank string.
    Present,
    /// A string of at least this many characters.
    MinLength(usize),
}

/// Declarative body validation rule; the first failing rule wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRule {
    pub fields: Vec<&'static str>,
    pub check: FieldCheck,
    pub message: &'static str,
}

impl FieldRule {
    pub fn present(fields: &[&'static str], message: &'static str) -> Self {
        Self {
            fields: fields.to_vec(),
            check: FieldCheck::Present,
            message,
        }
    }

    pub fn min_length(field: &'static str, len: usize, message: &'static str) -> Self {
        Self {
            fields: vec![field],
            check: FieldCheck::MinLength(len),
            message,
        }
    }

    /// True when every named field passes the check.
    pub fn accepts(&self, body: &Value) -> bool {
        self.fields.iter().all(|field| {
            let value = body.get(*field);
            match self.check {
                FieldCheck::Present => match value {
                    None | Some(Value::Null) | Some(Value::Bool(false)) => false,
                    Some(Value::String(s)) => !s.trim().is_empty(),
                    Some(_) => true,
                },
                FieldCheck::MinLength(min) => value
                    .and_then(Value::as_str)
                    .is_some_and(|s| s.chars().count() >= min),
            }
        })
    }
}

/// Backend outcome a response rule reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// The backend answered with exactly this status.
    Status(StatusCode),
    /// As `Status`, but only when the inbound request carried a bearer token.
    StatusWithToken(StatusCode),
    /// The backend answered with a 2xx status.
    Success,
    /// The backend could not be reached or sent something that is not JSON.
    Unreachable,
    /// Any outcome at all.
    Always,
}

/// What to send instead of the backend's answer.
#[derive(Debug, Clone, PartialEq)]
pub enum Transform {
    /// Keep the backend status, replace the body.
    Body(Value),
    /// Replace status and body.
    Reply(StatusCode, Value),
}

/// One predicate → transform pair, evaluated in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseRule {
    pub trigger: Trigger,
    pub transform: Transform,
}

impl ResponseRule {
    pub fn new(trigger: Trigger, transform: Transform) -> Self {
        Self { trigger, transform }
    }
}

/// Static configuration of one proxied endpoint.
#[derive(Debug, Clone)]
pub struct RouteConfig {
    /// Route identifier for logging/metrics.
    pub name: &'static str,
    /// Inbound path pattern, axum syntax.
    pub path: PathTemplate,
    /// Backend path; placeholders come from `path` parameters, then from `query_params`.
    pub backend_path: PathTemplate,
    /// Query parameters consumed by `backend_path` and not forwarded as query.
    pub query_params: Vec<&'static str>,
    pub allowed_methods: Vec<Method>,
    pub auth: AuthPolicy,
    /// Checked on body-carrying methods only.
    pub body_rules: Vec<FieldRule>,
    pub response_rules: Vec<ResponseRule>,
}

impl RouteConfig {
    /// A public GET route whose backend path equals its inbound path.
    pub fn new(name: &'static str, path: &'static str) -> Self {
        Self {
            name,
            path: PathTemplate::new(path),
            backend_path: PathTemplate::new(path),
            query_params: Vec::new(),
            allowed_methods: vec![Method::GET],
            auth: AuthPolicy::Optional,
            body_rules: Vec::new(),
            response_rules: Vec::new(),
        }
    }

    pub fn methods(mut self, methods: &[Method]) -> Self {
        self.allowed_methods = methods.to_vec();
        self
    }

    pub fn auth(mut self, auth: AuthPolicy) -> Self {
        self.auth = auth;
        self
    }

    pub fn backend(mut self, template: &'static str) -> Self {
        self.backend_path = PathTemplate::new(template);
        self
    }

    pub fn query_param(mut self, name: &'static str) -> Self {
        self.query_params.push(name);
        self
    }

    pub fn body_rule(mut self, rule: FieldRule) -> Self {
        self.body_rules.push(rule);
        self
    }

    pub fn response_rule(mut self, rule: ResponseRule) -> Self {
        self.response_rules.push(rule);
        self
    }

    pub fn allows(&self, method: &Method) -> bool {
        self.allowed_methods.contains(method)
    }

    /// First failing body rule, if any.
    pub fn first_body_violation(&self, body: &Value) -> Option<&FieldRule> {
        self.body_rules.iter().find(|rule| !rule.accepts(body))
    }
}

/// Methods whose body is validated and forwarded.
pub fn carries_body(method: &Method) -> bool {
    ![Method::GET, Method::HEAD, Method::OPTIONS].contains(method)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn auth_policy_per_method() {
        let policy = AuthPolicy::RequiredFor(vec![Method::GET]);
        assert!(policy.requires(&Method::GET));
        assert!(!policy.requires(&Method::POST));
        assert!(AuthPolicy::Required.requires(&Method::DELETE));
        assert!(!AuthPolicy::Optional.requires(&Method::GET));
    }

    #[test]
    fn present_rejects_falsy_values() {
        let rule = FieldRule::present(&["name", "email"], "missing");
        assert!(rule.accepts(&json!({"name": "A", "email": "a@b.co"})));
        assert!(!rule.accepts(&json!({"name": "A"})));
        assert!(!rule.accepts(&json!({"name": "  ", "email": "a@b.co"})));
        assert!(!rule.accepts(&json!({"name": null, "email": "a@b.co"})));
        assert!(!rule.accepts(&Value::Null));
    }

    #[test]
    fn min_length_counts_characters() {
        let rule = FieldRule::min_length("password", 6, "short");
        assert!(rule.accepts(&json!({"password": "æøåæøå"})));
        assert!(!rule.accepts(&json!({"password": "12345"})));
        assert!(!rule.accepts(&json!({"password": 123456})));
    }

    #[test]
    fn first_violation_follows_declaration_order() {
        let route = RouteConfig::new("test", "/api/test")
            .body_rule(FieldRule::present(&["token"], "first"))
            .body_rule(FieldRule::min_length("password", 6, "second"));

        let violation = route.first_body_violation(&json!({"password": "123"}));
        assert_eq!(violation.map(|r| r.message), Some("first"));

        let violation = route.first_body_violation(&json!({"token": "t", "password": "123"}));
        assert_eq!(violation.map(|r| r.message), Some("second"));

        assert!(route
            .first_body_violation(&json!({"token": "t", "password": "123456"}))
            .is_none());
    }
}
