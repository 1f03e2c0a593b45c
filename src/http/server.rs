//! HTTP server setup and request dispatch.
//!
//! # Responsibilities
//! - Create the Axum Router with the dispatcher as its only handler
//! - Wire up middleware (tracing, timeout, request ID)
//! - Dispatch admin routes ahead of configured routes
//! - Serve configured routes from the active rule document
//! - Swap in reloaded documents while serving
//! - Serve plain HTTP or HTTPS depending on config.json

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::{Request, State},
    response::Response,
    Router,
};
use axum_server::tls_rustls::RustlsConfig;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::admin::{handlers, AdminRoute};
use crate::calls::{CallLog, CallRecord};
use crate::config::{ConfigStore, ServerSettings};
use crate::http::request::{make_request_span, request_id, MakeRequestUuidV4};
use crate::http::response;
use crate::lifecycle::{Shutdown, StartupError};
use crate::observability::metrics::{self, RequestKind};
use crate::reply::assemble;
use crate::routing::RuleDocument;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ConfigStore>,
    pub calls: Arc<CallLog>,
    pub impersonating: Arc<str>,
    pub shutdown: Shutdown,
    pub max_body_bytes: usize,
}

/// HTTP server for the mock.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server serving the documents held by `config`.
    pub fn new(settings: &ServerSettings, config: Arc<ConfigStore>, calls: Arc<CallLog>, shutdown: Shutdown) -> Self {
        let state = AppState {
            config,
            calls,
            impersonating: Arc::from(settings.impersonating.as_str()),
            shutdown,
            max_body_bytes: settings.max_body_bytes,
        };

        let router = Self::build_router(Duration::from_secs(settings.request_timeout_secs), state.clone());
        Self { router, state }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    pub fn build_router(request_timeout: Duration, state: AppState) -> Router {
        Router::new()
            .fallback(dispatch)
            .with_state(state)
            .layer(TimeoutLayer::new(request_timeout))
            .layer(TraceLayer::new_for_http().make_span_with(make_request_span::<Body>))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Serves HTTPS when `tls` is given, plain HTTP otherwise. Documents
    /// arriving on `config_updates` are swapped into the store. Returns once
    /// `shutdown` fires and in-flight requests have drained.
    pub async fn run(
        self,
        listener: TcpListener,
        tls: Option<RustlsConfig>,
        mut config_updates: mpsc::UnboundedReceiver<RuleDocument>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), StartupError> {
        let addr = listener.local_addr()?;
        let store = self.state.config.clone();

        let reloads = tokio::spawn(async move {
            while let Some(document) = config_updates.recv().await {
                store.replace(document);
            }
        });

        let result = match tls {
            None => {
                tracing::info!(address = %addr, "Server listening on http");
                axum::serve(listener, self.router)
                    .with_graceful_shutdown(async move {
                        let _ = shutdown.recv().await;
                    })
                    .await
                    .map_err(StartupError::from)
            }
            Some(tls) => {
                let handle = axum_server::Handle::new();
                let shutdown_handle = handle.clone();
                tokio::spawn(async move {
                    let _ = shutdown.recv().await;
                    shutdown_handle.graceful_shutdown(Some(Duration::from_secs(5)));
                });

                tracing::info!(address = %addr, "Server listening on https");
                axum_server::from_tcp_rustls(listener.into_std()?, tls)
                    .handle(handle)
                    .serve(self.router.into_make_service())
                    .await
                    .map_err(StartupError::from)
            }
        };

        reloads.abort();
        tracing::info!("HTTP server stopped");
        result
    }

    /// Get a clone of the router, with state attached.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }
}

/// Entry point of every request.
async fn dispatch(State(state): State<AppState>, request: Request) -> Response {
    let request_id = request_id(request.headers()).to_string();
    let (parts, body) = request.into_parts();

    let target = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| parts.uri.path());

    // Admin routes first; configured routes never shadow them.
    if let Some(route) = AdminRoute::from_target(target) {
        let body = match axum::body::to_bytes(body, state.max_body_bytes).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!(request_id = %request_id, error = %e, "Failed to read request body");
                metrics::record_request(RequestKind::Admin, 500);
                return response::internal_error();
            }
        };
        let response = handlers::handle(route, &state, &body);
        metrics::record_request(RequestKind::Admin, response.status().as_u16());
        return response;
    }

    let document = state.config.snapshot();
    let Some(rule) = document.match_request(&parts.method, target) else {
        tracing::info!(request_id = %request_id, target_uri = %target, "No match");
        metrics::record_request(RequestKind::Unmatched, 404);
        return response::not_found();
    };

    let body = match axum::body::to_bytes(body, state.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Failed to read request body");
            metrics::record_request(RequestKind::Business, 500);
            return response::internal_error();
        }
    };

    match assemble(rule).await {
        Ok(reply) => {
            tracing::debug!(
                request_id = %request_id,
                pattern = %rule.pattern(),
                file = ?reply.file,
                hits = rule.replies().hits(),
                "Route matched"
            );
            state
                .calls
                .append(CallRecord::capture(&parts.method, &parts.uri, &parts.headers, &body));
            metrics::record_request(RequestKind::Business, reply.status.as_u16());
            response::from_reply(reply)
        }
        Err(e) => {
            tracing::error!(request_id = %request_id, pattern = %rule.pattern(), error = %e, "Failed to assemble reply");
            metrics::record_request(RequestKind::Business, 500);
            response::internal_error()
        }
    }
}
