//! Response assembly from reply files.

use std::path::{Path, PathBuf};

use axum::body::Bytes;
use axum::http::StatusCode;
use thiserror::Error;

use crate::routing::router::Rule;

/// Errors raised while building a reply.
#[derive(Debug, Error)]
pub enum ReplyError {
    /// The reply file vanished or became unreadable after validation.
    #[error("failed to read reply file {path:?}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A canned reply ready to be written to the client.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: StatusCode,
    pub content_type: &'static str,
    pub body: Bytes,
    /// File the body was read from.
    pub file: PathBuf,
}

/// Select the next reply file of `rule` and read it from disk.
///
/// The file is read on every call, so edits to reply files are served
/// without a reload. The sequence only advances when the read succeeds.
pub async fn assemble(rule: &Rule) -> Result<Reply, ReplyError> {
    let turn = rule.replies().next_turn().await;
    let file = turn.file().to_path_buf();
    let body = tokio::fs::read(&file).await.map_err(|source| ReplyError::FileRead {
        path: file.clone(),
        source,
    })?;
    turn.commit();

    Ok(Reply {
        status: rule.status(),
        content_type: content_type_for(&file),
        body: Bytes::from(body),
        file,
    })
}

/// Content type derived from the file extension only.
pub fn content_type_for(file: &Path) -> &'static str {
    match file.extension().and_then(|e| e.to_str()) {
        Some("json") => "application/json",
        Some("xml") => "application/xml",
        _ => "text/plain",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{ReplyWith, RouteConfig};
    use std::fs;

    fn rule_in(dir: &Path, reply: ReplyWith, code: Option<u16>) -> Rule {
        let route = RouteConfig {
            matching: "^/x$".into(),
            method: None,
            reply_with: Some(reply),
            code,
        };
        Rule::compile(0, dir, &route).unwrap()
    }

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for(Path::new("a.json")), "application/json");
        assert_eq!(content_type_for(Path::new("dir/b.xml")), "application/xml");
        assert_eq!(content_type_for(Path::new("c.txt")), "text/plain");
        assert_eq!(content_type_for(Path::new("noext")), "text/plain");
        // Extension match is exact.
        assert_eq!(content_type_for(Path::new("d.JSON")), "text/plain");
    }

    #[tokio::test]
    async fn test_assemble_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.json"), r#"{"a":1}"#).unwrap();
        let rule = rule_in(dir.path(), ReplyWith::Single("a.json".into()), None);

        let reply = assemble(&rule).await.unwrap();
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.content_type, "application/json");
        assert_eq!(&reply.body[..], br#"{"a":1}"#);
    }

    #[tokio::test]
    async fn test_assemble_custom_status_and_fresh_read() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("gone.xml"), "<v1/>").unwrap();
        let rule = rule_in(dir.path(), ReplyWith::Single("gone.xml".into()), Some(410));

        let reply = assemble(&rule).await.unwrap();
        assert_eq!(reply.status, StatusCode::GONE);
        assert_eq!(&reply.body[..], b"<v1/>");

        fs::write(dir.path().join("gone.xml"), "<v2/>").unwrap();
        let reply = assemble(&rule).await.unwrap();
        assert_eq!(&reply.body[..], b"<v2/>");
    }

    #[tokio::test]
    async fn test_assemble_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.json"), "{}").unwrap();
        let rule = rule_in(dir.path(), ReplyWith::Single("a.json".into()), None);
        fs::remove_file(dir.path().join("a.json")).unwrap();

        let err = assemble(&rule).await.unwrap_err();
        assert!(matches!(err, ReplyError::FileRead { .. }));
        assert_eq!(rule.replies().hits(), 0);
    }

    #[tokio::test]
    async fn test_failed_read_does_not_advance_sequence() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.json"), "A").unwrap();
        fs::write(dir.path().join("b.json"), "B").unwrap();
        let rule = rule_in(
            dir.path(),
            ReplyWith::Sequence(vec!["a.json".into(), "b.json".into()]),
            None,
        );

        fs::rename(dir.path().join("a.json"), dir.path().join("a.json.bak")).unwrap();
        assert!(assemble(&rule).await.is_err());

        fs::rename(dir.path().join("a.json.bak"), dir.path().join("a.json")).unwrap();
        assert_eq!(&assemble(&rule).await.unwrap().body[..], b"A");
        assert_eq!(&assemble(&rule).await.unwrap().body[..], b"B");
        assert_eq!(rule.replies().hits(), 2);
    }
}
