//! Phony HTTP server.
//!
//! Stands in for a real backend during tests: requests are matched against
//! the routes in `<config_folder>/config.json` and answered with files from
//! the same folder.
//!
//! # Architecture Overview
//!
//! ```text
//!                       ┌──────────────────────────────────────────────────┐
//!                       │                  PHONY SERVER                     │
//!                       │                                                   │
//!   Client Request      │  ┌─────────┐    ┌──────────┐    ┌─────────────┐  │
//!   ────────────────────┼─▶│  http   │───▶│  admin   │    │   routing   │  │
//!                       │  │ server  │───────────────────▶│ RuleDocument│  │
//!                       │  └─────────┘    └──────────┘    └──────┬──────┘  │
//!                       │       ▲                                │         │
//!                       │       │                                ▼         │
//!   Client Response     │  ┌─────────┐                    ┌─────────────┐  │
//!   ◀───────────────────┼──│response │◀───────────────────│    reply    │◀─┼── reply files
//!                       │  └─────────┘                    │ seq + file  │  │
//!                       │                                 └─────────────┘  │
//!                       │  ┌───────────────┐  ┌───────┐  ┌──────────────┐  │
//!   config.json ────────┼─▶│config watcher │─▶│ store │  │  call log    │  │
//!                       │  └───────────────┘  └───────┘  └──────────────┘  │
//!                       └──────────────────────────────────────────────────┘
//! ```
//!
//! Example: `phony-server Jenkins 8081 ./config-folders/jenkins`

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use clap::Parser;
use url::Url;

use phony_server::config::ServerSettings;
use phony_server::lifecycle::{startup, Shutdown};
use phony_server::observability::logging;

#[derive(Parser, Debug)]
#[command(
    name = "phony-server",
    about = "HTTP server replying to configured routes with canned files",
    version
)]
struct Args {
    /// Name of the server being replaced (e.g. GIT, Jenkins, Artifactory)
    impersonating: String,

    /// Port to listen on
    port: u16,

    /// Folder containing config.json and the reply files
    config_folder: PathBuf,

    /// URL called once the server is listening
    callback_url: Option<Url>,

    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    bind: IpAddr,

    /// Largest request body accepted, in bytes
    #[arg(long, default_value_t = 2 * 1024 * 1024)]
    max_body_bytes: usize,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    request_timeout_secs: u64,

    /// Serve Prometheus metrics on this address
    #[arg(long, value_name = "ADDR")]
    metrics_address: Option<SocketAddr>,
}

impl From<Args> for ServerSettings {
    fn from(args: Args) -> Self {
        Self {
            impersonating: args.impersonating,
            bind_ip: args.bind,
            port: args.port,
            config_folder: args.config_folder,
            callback_url: args.callback_url,
            max_body_bytes: args.max_body_bytes,
            request_timeout_secs: args.request_timeout_secs,
            metrics_address: args.metrics_address,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    logging::init()?;

    let shutdown = Shutdown::new();
    let ctrl_c = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Shutdown signal received");
                ctrl_c.trigger();
            }
            Err(e) => tracing::error!(error = %e, "Failed to install Ctrl+C handler"),
        }
    });

    if let Err(e) = startup::run(args.into(), shutdown).await {
        tracing::error!(error = %e, "Could not run server");
        return Err(e.into());
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
