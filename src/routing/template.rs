//! Path templates with `{name}` placeholder segments.
//!
//! The same syntax is used for the inbound axum route and for the backend
//! path, so a template can both capture parameters from a request path and
//! render a backend path from them.

use std::collections::HashMap;
use std::fmt;

/// A path template such as `/api/orders/{id}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    raw: String,
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// Errors raised while checking or rendering a template.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    #[error("template {0:?} must start with '/'")]
    NotAbsolute(String),
    #[error("template {template:?} has a malformed segment {segment:?}")]
    MalformedSegment { template: String, segment: String },
    #[error("Missing parameter: {0}")]
    MissingParameter(String),
}

impl PathTemplate {
    /// Build a template. Well-formedness is checked by [`PathTemplate::check`]
    /// when the route table is validated, so construction never fails.
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let segments = raw
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| match s.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                Some(name) => Segment::Param(name.to_string()),
                None => Segment::Literal(s.to_string()),
            })
            .collect();
        Self { raw, segments }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Placeholder names in order of appearance.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Reject templates axum or the renderer would misread.
    pub fn check(&self) -> Result<(), TemplateError> {
        if !self.raw.starts_with('/') {
            return Err(TemplateError::NotAbsolute(self.raw.clone()));
        }
        for segment in &self.segments {
            let bad = match segment {
                Segment::Param(name) => {
                    name.is_empty()
                        || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
                }
                Segment::Literal(text) => text.contains(['{', '}']),
            };
            if bad {
                let text = match segment {
                    Segment::Param(name) => format!("{{{name}}}"),
                    Segment::Literal(text) => text.clone(),
                };
                return Err(TemplateError::MalformedSegment {
                    template: self.raw.clone(),
                    segment: text,
                });
            }
        }
        Ok(())
    }

    /// Match a concrete path and return the percent-decoded parameters.
    pub fn capture(&self, path: &str) -> Option<HashMap<String, String>> {
        let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = HashMap::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(text) if text == part => {}
                Segment::Literal(_) => return None,
                Segment::Param(name) => {
                    let value = urlencoding::decode(part)
                        .map(|v| v.into_owned())
                        .unwrap_or_else(|_| part.to_string());
                    params.insert(name.clone(), value);
                }
            }
        }
        Some(params)
    }

    /// Substitute placeholders, percent-encoding each value.
    pub fn render(&self, params: &HashMap<String, String>) -> Result<String, TemplateError> {
        let mut out = String::with_capacity(self.raw.len());
        for segment in &self.segments {
            out.push('/');
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Param(name) => {
                    let value = params
                        .get(name)
                        .filter(|v| !v.is_empty())
                        .ok_or_else(|| TemplateError::MissingParameter(name.clone()))?;
                    out.push_str(&urlencoding::encode(value));
                }
            }
        }
        if out.is_empty() {
            out.push('/');
        }
        Ok(out)
    }
}

impl fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.raw)
    }
}
