//! RoutePattern: path templates with `:name` parameter segments
//!
//! `/book/:id` matches `/book/42` and captures `id = "42"`. Matching is
//! segment-wise; empty segments (leading, trailing or doubled slashes) are
//! ignored, and any query string or fragment is stripped first.

use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Captured path parameters, ordered by name.
pub type Params = BTreeMap<String, String>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PatternError {
    #[error("route pattern must start with '/': {0}")]
    NotAbsolute(String),
    #[error("empty parameter name in route pattern: {0}")]
    EmptyParam(String),
    #[error("duplicate parameter '{param}' in route pattern: {pattern}")]
    DuplicateParam { pattern: String, param: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// Compiled route template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    raw: String,
    segments: Vec<Segment>,
}

impl RoutePattern {
    pub fn parse(pattern: &str) -> Result<Self, PatternError> {
        if !pattern.starts_with('/') {
            return Err(PatternError::NotAbsolute(pattern.into()));
        }
        let mut segments = Vec::new();
        for seg in split_segments(pattern) {
            match seg.strip_prefix(':') {
                Some("") => return Err(PatternError::EmptyParam(pattern.into())),
                Some(name) => {
                    let taken = segments.iter().any(|s| matches!(s, Segment::Param(p) if p == name));
                    if taken {
                        return Err(PatternError::DuplicateParam { pattern: pattern.into(), param: name.into() });
                    }
                    segments.push(Segment::Param(name.into()));
                }
                None => segments.push(Segment::Literal(seg.into())),
            }
        }
        Ok(Self { raw: pattern.into(), segments })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Match a concrete location, returning captured params on success.
    pub fn matches(&self, location: &str) -> Option<Params> {
        let path = strip_query(location);
        let parts: Vec<&str> = split_segments(path).collect();
        if parts.len() != self.segments.len() {
            return None;
        }
        let mut params = Params::new();
        for (seg, part) in self.segments.iter().zip(parts) {
            match seg {
                Segment::Literal(lit) if lit == part => {}
                Segment::Literal(_) => return None,
                Segment::Param(name) => {
                    params.insert(name.clone(), part.to_string());
                }
            }
        }
        Some(params)
    }

    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn split_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

fn strip_query(location: &str) -> &str {
    let end = location.find(['?', '#']).unwrap_or(location.len());
    &location[..end]
}
