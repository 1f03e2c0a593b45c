//! Shared utilities for integration testing.

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use notify::RecommendedWatcher;
use phony_server::config::{ConfigStore, ConfigWatcher, ServerSettings, CONFIG_FILE_NAME};
use phony_server::{CallLog, HttpServer, Shutdown};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// A temporary config folder.
pub struct ConfigFolder {
    dir: tempfile::TempDir,
}

#[allow(dead_code)]
impl ConfigFolder {
    pub fn new(config: &str, files: &[(&str, &str)]) -> Self {
        let folder = Self {
            dir: tempfile::tempdir().unwrap(),
        };
        for (name, content) in files {
            folder.write(name, content);
        }
        folder.write_config(config);
        folder
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join(CONFIG_FILE_NAME)
    }

    pub fn write(&self, name: &str, content: &str) {
        fs::write(self.dir.path().join(name), content).unwrap();
    }

    pub fn write_config(&self, config: &str) {
        self.write(CONFIG_FILE_NAME, config);
    }
}

/// A server running in the background on an ephemeral port.
pub struct RunningServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    _watcher: RecommendedWatcher,
}

#[allow(dead_code)]
impl RunningServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for RunningServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start a server with hot reload for `folder`.
pub async fn start_server(folder: &ConfigFolder) -> RunningServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let settings = ServerSettings {
        impersonating: "Artifactory".into(),
        port: addr.port(),
        config_folder: folder.path().to_path_buf(),
        ..Default::default()
    };

    let store = Arc::new(ConfigStore::open(&folder.config_path()).unwrap());
    let (watcher, config_updates) = ConfigWatcher::new(&folder.config_path());
    let watcher = watcher.run().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(&settings, store, Arc::new(CallLog::new()), shutdown.clone());
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, None, config_updates, server_shutdown).await;
    });

    RunningServer {
        addr,
        shutdown,
        _watcher: watcher,
    }
}

/// Reserve a free local port. The port is released before returning.
#[allow(dead_code)]
pub async fn free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}

/// Start a backend that counts the requests it receives and answers 200.
#[allow(dead_code)]
pub async fn start_counting_backend(hits: Arc<AtomicU32>) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let hits = hits.clone();
                    tokio::spawn(async move {
                        let mut buf = [0u8; 1024];
                        let _ = socket.read(&mut buf).await;
                        hits.fetch_add(1, Ordering::SeqCst);
                        let response = "HTTP/1.1 200 OK\r\nContent-Length: 0\r\nConnection: close\r\n\r\n";
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Poll `check` until it returns true or `timeout` passes.
#[allow(dead_code)]
pub async fn eventually<F, Fut>(timeout: Duration, mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if check().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    false
}
