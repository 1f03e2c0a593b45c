//! Administrative routes.
//!
//! A fixed set of endpoints, independent of `config.json`, checked before any
//! configured route. The request method is not significant. Matching is on
//! the whole request target, so `/alive?x=1` is left to the configured routes.

pub mod handlers;

/// The administrative operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminRoute {
    /// `/alive`: liveness, answers with the impersonated server name.
    Alive,
    /// `/stop`: graceful shutdown.
    Stop,
    /// `/calls`: recorded call history, optionally filtered.
    Calls,
    /// `/calls/count`: number of recorded calls.
    CallsCount,
    /// `/calls/reset`: clear call history and reply sequences.
    CallsReset,
}

impl AdminRoute {
    pub const ALL: [AdminRoute; 5] = [
        AdminRoute::Alive,
        AdminRoute::Stop,
        AdminRoute::Calls,
        AdminRoute::CallsCount,
        AdminRoute::CallsReset,
    ];

    /// Exact match on the request target (path plus query, if any).
    pub fn from_target(target: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|route| route.path() == target)
    }

    pub fn path(&self) -> &'static str {
        match self {
            AdminRoute::Alive => "/alive",
            AdminRoute::Stop => "/stop",
            AdminRoute::Calls => "/calls",
            AdminRoute::CallsCount => "/calls/count",
            AdminRoute::CallsReset => "/calls/reset",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            AdminRoute::Alive => "URL to check if the server is alive",
            AdminRoute::Stop => "Stops the server",
            AdminRoute::Calls => "Retrieves the call history. Supports filtering by path equal to value",
            AdminRoute::CallsCount => "Retrieves the number of calls since the last reset or from the start",
            AdminRoute::CallsReset => "Resets the call history and reply sequences",
        }
    }
}
