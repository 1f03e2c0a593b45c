//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that every reply file referenced by a route exists
//! - Check that TLS material is complete and present on disk
//! - Check patterns, methods and status codes before they reach the router
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure apart from file existence checks:
//!   (folder, MockConfig) → Result<(), Vec<ValidationError>>
//! - Runs before a document is accepted into the system, both at startup and on reload

use std::path::Path;

use axum::http::{Method, StatusCode};
use regex::Regex;
use thiserror::Error;

use crate::config::schema::{HttpsConfig, MockConfig, ReplyWith, RouteConfig};

/// A single semantic problem found in a route document.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("route {route}: expected field reply_with")]
    MissingReplyWith { route: String },

    #[error("route {route}: reply_with sequence is empty")]
    EmptyReplySequence { route: String },

    #[error("route {route}: could not find reply file {file}")]
    MissingReplyFile { route: String, file: String },

    #[error("route {route}: invalid pattern: {reason}")]
    InvalidPattern { route: String, reason: String },

    #[error("route {route}: invalid method {method}")]
    InvalidMethod { route: String, method: String },

    #[error("route {route}: invalid status code {code}")]
    InvalidStatusCode { route: String, code: u16 },

    #[error("https.{field} needs to point to an existing file ({file})")]
    MissingTlsFile { field: &'static str, file: String },

    #[error("invalid https configuration: {0}")]
    TlsIncomplete(&'static str),

    #[error("https.pfx is not supported; provide https.key and https.cert as PEM files")]
    PfxUnsupported,
}

/// Validate a parsed document against the folder it was loaded from.
pub fn validate_config(folder: &Path, config: &MockConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Some(https) = &config.https {
        validate_https(folder, https, &mut errors);
    }

    for route in &config.routes {
        validate_route(folder, route, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_https(folder: &Path, https: &HttpsConfig, errors: &mut Vec<ValidationError>) {
    let files = [("pfx", &https.pfx), ("key", &https.key), ("cert", &https.cert)];
    for (field, file) in files {
        if let Some(file) = file {
            if !folder.join(file).is_file() {
                errors.push(ValidationError::MissingTlsFile {
                    field,
                    file: file.clone(),
                });
            }
        }
    }

    if https.pfx.is_some() {
        errors.push(ValidationError::PfxUnsupported);
    } else if https.key.is_none() {
        errors.push(ValidationError::TlsIncomplete("https.key and https.cert are required"));
    } else if https.cert.is_none() {
        errors.push(ValidationError::TlsIncomplete("https.key requires https.cert"));
    }
}

fn validate_route(folder: &Path, route: &RouteConfig, errors: &mut Vec<ValidationError>) {
    let name = &route.matching;

    if let Err(e) = Regex::new(&route.matching) {
        errors.push(ValidationError::InvalidPattern {
            route: name.clone(),
            reason: e.to_string(),
        });
    }

    if let Some(method) = &route.method {
        if Method::from_bytes(method.to_uppercase().as_bytes()).is_err() {
            errors.push(ValidationError::InvalidMethod {
                route: name.clone(),
                method: method.clone(),
            });
        }
    }

    if let Some(code) = route.code {
        if StatusCode::from_u16(code).is_err() {
            errors.push(ValidationError::InvalidStatusCode {
                route: name.clone(),
                code,
            });
        }
    }

    match &route.reply_with {
        None => errors.push(ValidationError::MissingReplyWith { route: name.clone() }),
        Some(ReplyWith::Sequence(files)) if files.is_empty() => {
            errors.push(ValidationError::EmptyReplySequence { route: name.clone() })
        }
        Some(reply) => {
            for file in reply.files() {
                if !folder.join(file).is_file() {
                    errors.push(ValidationError::MissingReplyFile {
                        route: name.clone(),
                        file: file.to_string(),
                    });
                }
            }
        }
    }
}
