//! Route matching logic.
//!
//! # Responsibilities
//! - Match the request target against a route's regular expression
//! - Match the request method (case-insensitive)
//! - Keep the two checks separate so the router can tell a path hit with
//!   a method miss apart from a plain miss
//!
//! # Design Decisions
//! - Patterns are compiled once, when the document is loaded
//! - Patterns are unanchored: `^`/`$` are up to the config author
//! - Empty method condition = always matches (wildcard)

use axum::http::Method;
use regex::Regex;

/// Matches the request target (path plus query) against a regex.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    pattern: Regex,
}

impl PatternMatcher {
    /// Compile a pattern matcher.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }

    pub fn matches(&self, target: &str) -> bool {
        self.pattern.is_match(target)
    }

    pub fn as_str(&self) -> &str {
        self.pattern.as_str()
    }
}

/// Matches the request method.
#[derive(Debug, Clone, Default)]
pub struct MethodMatcher {
    expected: Option<Method>,
}

impl MethodMatcher {
    /// Create a method matcher. `None` accepts every method.
    /// The method is normalized to uppercase.
    pub fn new(method: Option<&str>) -> Result<Self, axum::http::method::InvalidMethod> {
        let expected = method
            .map(|m| Method::from_bytes(m.to_uppercase().as_bytes()))
            .transpose()?;
        Ok(Self { expected })
    }

    pub fn matches(&self, method: &Method) -> bool {
        match &self.expected {
            None => true,
            Some(expected) => expected.as_str().eq_ignore_ascii_case(method.as_str()),
        }
    }

    pub fn expected(&self) -> Option<&Method> {
        self.expected.as_ref()
    }
}
