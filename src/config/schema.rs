//! Configuration schema definitions.
//!
//! This module defines the structure of `config.json`, the route document
//! read from the configuration folder. All types derive Serde traits for
//! deserialization; semantic checks live in `validation.rs`.

use serde::{Deserialize, Serialize};

/// Root of the route document.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct MockConfig {
    /// Route definitions, matched top to bottom.
    pub routes: Vec<RouteConfig>,

    /// Optional TLS settings. Presence switches the listener to HTTPS.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub https: Option<HttpsConfig>,
}

/// A single route mapping a request pattern to canned reply files.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct RouteConfig {
    /// Regular expression tested against the request target.
    pub matching: String,

    /// HTTP method to match (case-insensitive). Absent matches any method.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    /// File (or sequence of files) to reply with, relative to the config folder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_with: Option<ReplyWith>,

    /// Status code of the reply (default: 200).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
}

/// Reply target of a route: one file, or a sequence served in call order.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum ReplyWith {
    Single(String),
    Sequence(Vec<String>),
}

impl ReplyWith {
    /// All file names referenced by this reply, in order.
    pub fn files(&self) -> Vec<&str> {
        match self {
            ReplyWith::Single(file) => vec![file.as_str()],
            ReplyWith::Sequence(files) => files.iter().map(String::as_str).collect(),
        }
    }
}

impl std::fmt::Display for ReplyWith {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReplyWith::Single(file) => write!(f, "{}", file),
            ReplyWith::Sequence(files) => write!(f, "[{}]", files.join(", ")),
        }
    }
}

/// TLS configuration for the listener.
///
/// `key` together with `cert` must be given. `pfx` is parsed so that
/// validation can reject it with a clear message.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct HttpsConfig {
    /// PKCS#12 bundle, relative to the config folder. Not servable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pfx: Option<String>,

    /// Private key file (PEM), relative to the config folder.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    /// Certificate chain file (PEM), relative to the config folder.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cert: Option<String>,

    /// Passphrase for the key or bundle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passphrase: Option<String>,
}
