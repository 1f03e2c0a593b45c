//! TLS configuration and certificate loading.

use std::path::{Path, PathBuf};

use axum_server::tls_rustls::RustlsConfig;
use thiserror::Error;

use crate::config::HttpsConfig;

/// Error type for TLS setup.
#[derive(Debug, Error)]
pub enum TlsError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no certificate found in {0:?}")]
    NoCertificate(PathBuf),

    #[error("no private key found in {0:?}")]
    NoPrivateKey(PathBuf),

    #[error("https.key and https.cert are both required")]
    Incomplete,

    #[error("invalid certificate or key: {0}")]
    Rustls(#[source] std::io::Error),
}

/// Build the rustls configuration described by the `https` section.
///
/// Paths are relative to `folder`. Only PEM key and certificate files are
/// read; `pfx` bundles are rejected during validation.
pub async fn load_tls_config(folder: &Path, https: &HttpsConfig) -> Result<RustlsConfig, TlsError> {
    if https.passphrase.is_some() {
        tracing::warn!("https.passphrase is ignored; encrypted keys are not supported");
    }

    let (cert, key) = match (&https.cert, &https.key) {
        (Some(cert), Some(key)) => (folder.join(cert), folder.join(key)),
        _ => return Err(TlsError::Incomplete),
    };

    let cert_pem = read(&cert)?;
    let key_pem = read(&key)?;
    let (certs, key_der) = parse_pem(&cert, &cert_pem, &key, &key_pem)?;

    tracing::info!(cert = ?cert, key = ?key, "TLS material loaded");
    RustlsConfig::from_der(certs, key_der).await.map_err(TlsError::Rustls)
}

fn read(path: &Path) -> Result<Vec<u8>, TlsError> {
    std::fs::read(path).map_err(|source| TlsError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Decode a PEM certificate chain and private key into DER.
fn parse_pem(
    cert_path: &Path,
    cert_pem: &[u8],
    key_path: &Path,
    key_pem: &[u8],
) -> Result<(Vec<Vec<u8>>, Vec<u8>), TlsError> {
    let certs = rustls_pemfile::certs(&mut &cert_pem[..])
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| TlsError::Io {
            path: cert_path.to_path_buf(),
            source,
        })?;
    if certs.is_empty() {
        return Err(TlsError::NoCertificate(cert_path.to_path_buf()));
    }

    let key = rustls_pemfile::private_key(&mut &key_pem[..])
        .map_err(|source| TlsError::Io {
            path: key_path.to_path_buf(),
            source,
        })?
        .ok_or_else(|| TlsError::NoPrivateKey(key_path.to_path_buf()))?;

    let certs = certs.iter().map(|c| c.as_ref().to_vec()).collect();
    Ok((certs, key.secret_der().to_vec()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pem_without_certificate() {
        let err = parse_pem(Path::new("c.pem"), b"not a pem", Path::new("k.pem"), b"").unwrap_err();
        assert!(matches!(err, TlsError::NoCertificate(_)));
    }

    #[tokio::test]
    async fn test_pfx_without_pem_files_is_incomplete() {
        let https = HttpsConfig {
            pfx: Some("bundle.pfx".into()),
            ..Default::default()
        };
        let err = load_tls_config(Path::new("."), &https).await.unwrap_err();
        assert!(matches!(err, TlsError::Incomplete));
    }

    #[tokio::test]
    async fn test_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let https = HttpsConfig {
            key: Some("key.pem".into()),
            cert: Some("cert.pem".into()),
            ..Default::default()
        };
        let err = load_tls_config(dir.path(), &https).await.unwrap_err();
        assert!(matches!(err, TlsError::Io { .. }));
    }
}
