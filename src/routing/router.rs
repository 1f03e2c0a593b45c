//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Compile route definitions into rules
//! - Look up the matching rule for a request
//! - Return matched rule or explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks); the only
//!   mutable part of a rule is its atomic hit counter
//! - O(n) scan in document order (acceptable for typical route counts)
//! - Explicit `None` rather than silent default

use std::path::{Path, PathBuf};

use axum::http::{Method, StatusCode};

use crate::config::schema::{HttpsConfig, MockConfig, ReplyWith, RouteConfig};
use crate::config::validation::ValidationError;
use crate::reply::{ReplySequence, ReplySource};
use crate::routing::matcher::{MethodMatcher, PatternMatcher};

/// A compiled route.
#[derive(Debug)]
pub struct Rule {
    index: usize,
    pattern: PatternMatcher,
    method: MethodMatcher,
    replies: ReplySequence,
    status: StatusCode,
}

impl Rule {
    /// Compile a route definition. Reply files are resolved against `folder`.
    pub fn compile(index: usize, folder: &Path, route: &RouteConfig) -> Result<Self, ValidationError> {
        let name = || route.matching.clone();

        let pattern = PatternMatcher::new(&route.matching).map_err(|e| ValidationError::InvalidPattern {
            route: name(),
            reason: e.to_string(),
        })?;

        let method = MethodMatcher::new(route.method.as_deref()).map_err(|_| ValidationError::InvalidMethod {
            route: name(),
            method: route.method.clone().unwrap_or_default(),
        })?;

        let status = match route.code {
            Some(code) => StatusCode::from_u16(code)
                .map_err(|_| ValidationError::InvalidStatusCode { route: name(), code })?,
            None => StatusCode::OK,
        };

        let source = match &route.reply_with {
            None => return Err(ValidationError::MissingReplyWith { route: name() }),
            Some(ReplyWith::Single(file)) => ReplySource::Single(folder.join(file)),
            Some(ReplyWith::Sequence(files)) => {
                ReplySource::Sequence(files.iter().map(|f| folder.join(f)).collect())
            }
        };
        let replies = ReplySequence::new(source)
            .ok_or_else(|| ValidationError::EmptyReplySequence { route: name() })?;

        Ok(Self {
            index,
            pattern,
            method,
            replies,
            status,
        })
    }

    /// Position of the rule in its document.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn method(&self) -> Option<&Method> {
        self.method.expected()
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn replies(&self) -> &ReplySequence {
        &self.replies
    }
}

/// The active set of rules, as loaded from one version of `config.json`.
///
/// Never mutated after construction apart from hit counters; a reload
/// builds a new document, so every counter starts again at zero.
#[derive(Debug)]
pub struct RuleDocument {
    rules: Vec<Rule>,
    https: Option<HttpsConfig>,
    folder: PathBuf,
}

impl RuleDocument {
    /// Compile a validated config. Returns every rule that failed to compile.
    pub fn compile(folder: &Path, config: &MockConfig) -> Result<Self, Vec<ValidationError>> {
        let mut rules = Vec::with_capacity(config.routes.len());
        let mut errors = Vec::new();

        for (index, route) in config.routes.iter().enumerate() {
            match Rule::compile(index, folder, route) {
                Ok(rule) => rules.push(rule),
                Err(e) => errors.push(e),
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Self {
            rules,
            https: config.https.clone(),
            folder: folder.to_path_buf(),
        })
    }

    /// Document without rules; every request is a no-match.
    pub fn empty(folder: &Path) -> Self {
        Self {
            rules: Vec::new(),
            https: None,
            folder: folder.to_path_buf(),
        }
    }

    /// Find the first rule whose pattern and method both match.
    ///
    /// `target` is the request path including its query string, if any.
    pub fn match_request(&self, method: &Method, target: &str) -> Option<&Rule> {
        for rule in &self.rules {
            if !rule.pattern.matches(target) {
                continue;
            }
            if rule.method.matches(method) {
                return Some(rule);
            }
            tracing::debug!(
                target_uri = %target,
                pattern = %rule.pattern(),
                method = %method,
                "Pattern matched, skipped by configured method"
            );
        }
        None
    }

    /// Restart every reply sequence of this document.
    pub fn reset_counters(&self) {
        for rule in &self.rules {
            rule.replies.reset();
        }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn https(&self) -> Option<&HttpsConfig> {
        self.https.as_ref()
    }

    /// Folder the document was loaded from.
    pub fn folder(&self) -> &Path {
        &self.folder
    }
}
