//! Process-level server settings, taken from the command line.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use url::Url;

use crate::config::loader::CONFIG_FILE_NAME;

/// Settings that stay fixed for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct ServerSettings {
    /// Name of the impersonated server, returned by `/alive`.
    pub impersonating: String,

    /// Address to bind.
    pub bind_ip: IpAddr,

    /// Port to listen on.
    pub port: u16,

    /// Folder holding `config.json` and the reply files.
    pub config_folder: PathBuf,

    /// URL called once the server is listening.
    pub callback_url: Option<Url>,

    /// Largest request body read into memory, in bytes.
    pub max_body_bytes: usize,

    /// Request timeout (total time for request/response) in seconds.
    pub request_timeout_secs: u64,

    /// Prometheus endpoint bind address.
    pub metrics_address: Option<SocketAddr>,
}

impl ServerSettings {
    pub fn config_path(&self) -> PathBuf {
        self.config_folder.join(CONFIG_FILE_NAME)
    }

    pub fn bind_address(&self) -> SocketAddr {
        SocketAddr::new(self.bind_ip, self.port)
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            impersonating: "N/A".to_string(),
            bind_ip: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8080,
            config_folder: PathBuf::from("."),
            callback_url: None,
            max_body_bytes: 2 * 1024 * 1024, // 2MB
            request_timeout_secs: 30,
            metrics_address: None,
        }
    }
}
