//! Startup orchestration.
//!
//! # Responsibilities
//! - Check the config folder before anything else
//! - Load and validate configuration (fatal on error)
//! - Announce admin and configured routes
//! - Load TLS material before binding
//! - Call the optional startup callback once listening
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The callback is best effort: failures are logged, never fatal

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::net::TcpListener;
use url::Url;

use crate::admin::AdminRoute;
use crate::calls::CallLog;
use crate::config::{ConfigError, ConfigStore, ConfigWatcher, ServerSettings, CONFIG_FILE_NAME};
use crate::http::HttpServer;
use crate::lifecycle::Shutdown;
use crate::net::tls::{load_tls_config, TlsError};
use crate::observability::metrics;
use crate::routing::RuleDocument;

/// Errors that prevent the server from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid argument: {0}")]
    ArgumentInvalid(String),

    #[error("configuration is not valid: {0}")]
    Config(#[from] ConfigError),

    #[error("could not set up https: {0}")]
    Tls(#[from] TlsError),

    #[error("could not start listening: {0}")]
    Io(#[from] std::io::Error),
}

/// Start the server and serve until `shutdown` fires.
pub async fn run(settings: ServerSettings, shutdown: Shutdown) -> Result<(), StartupError> {
    check_config_folder(&settings)?;

    let config_path = settings.config_path();
    let store = Arc::new(ConfigStore::open(&config_path)?);
    announce(&settings, &store.snapshot());

    // Must fail before binding and before the callback.
    let document = store.snapshot();
    let tls = match document.https() {
        Some(https) => Some(load_tls_config(document.folder(), https).await?),
        None => None,
    };

    if let Some(addr) = settings.metrics_address {
        if let Err(e) = metrics::init_metrics(addr) {
            tracing::error!(address = %addr, error = %e, "Failed to start metrics endpoint");
        }
    }

    let listener = TcpListener::bind(settings.bind_address()).await?;

    let (watcher, config_updates) = ConfigWatcher::new(&config_path);
    // Reloads stop when the watcher is dropped.
    let _watcher = match watcher.run() {
        Ok(w) => Some(w),
        Err(e) => {
            tracing::warn!(error = %e, "Could not watch config file; hot reload disabled");
            None
        }
    };

    let server = HttpServer::new(&settings, store, Arc::new(CallLog::new()), shutdown.clone());

    if let Some(url) = settings.callback_url.clone() {
        tokio::spawn(async move { notify_started(&url).await });
    }

    server.run(listener, tls, config_updates, shutdown.subscribe()).await
}

/// Check that the config folder exists and holds a `config.json`.
pub fn check_config_folder(settings: &ServerSettings) -> Result<(), StartupError> {
    if !settings.config_folder.is_dir() {
        return Err(StartupError::ArgumentInvalid(format!(
            "config folder {:?} does not exist",
            settings.config_folder
        )));
    }
    if !settings.config_path().is_file() {
        return Err(StartupError::ArgumentInvalid(format!(
            "could not find {} in {:?}",
            CONFIG_FILE_NAME, settings.config_folder
        )));
    }
    Ok(())
}

/// Log what is about to be served.
pub fn announce(settings: &ServerSettings, document: &RuleDocument) {
    tracing::info!(
        impersonating = %settings.impersonating,
        folder = ?settings.config_folder,
        port = settings.port,
        version = env!("CARGO_PKG_VERSION"),
        "Starting up phony server"
    );

    for route in AdminRoute::ALL {
        tracing::info!(path = route.path(), "Admin route: {}", route.description());
    }

    for rule in document.rules() {
        tracing::info!(
            method = %rule.method().map(|m| m.as_str()).unwrap_or("*"),
            pattern = %rule.pattern(),
            reply = ?rule.replies().source(),
            code = rule.status().as_u16(),
            "Configured route"
        );
    }
}

/// Call `url` once to signal that the server is listening.
pub async fn notify_started(url: &Url) {
    let client = match reqwest::Client::builder()
        .danger_accept_invalid_certs(true)
        .timeout(Duration::from_secs(10))
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            tracing::warn!(error = %e, "Could not build callback client");
            return;
        }
    };

    match client.get(url.clone()).send().await {
        Ok(response) => {
            tracing::info!(url = %url, status = %response.status(), "Done calling back");
        }
        Err(e) => {
            tracing::warn!(url = %url, error = %e, "Callback url not available");
        }
    }
}
