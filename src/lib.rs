//! Phony HTTP server library.
//!
//! Impersonates a backend by matching requests against the routes of a
//! `config.json` and replying with canned files, optionally walking through a
//! sequence of replies on repeated calls.

pub mod admin;
pub mod calls;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod reply;
pub mod routing;

pub use calls::CallLog;
pub use config::{ConfigStore, ServerSettings};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::RuleDocument;
