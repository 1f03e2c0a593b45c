//! Active rule document shared by all request handlers.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::config::loader::{load_document, ConfigError};
use crate::routing::RuleDocument;

/// Holds the current `RuleDocument` and swaps it atomically on reload.
///
/// Readers take a snapshot and keep using it for the whole request, so a
/// request never sees half of one document and half of another.
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    current: ArcSwap<RuleDocument>,
}

impl ConfigStore {
    /// Load and validate the document at `path`. Fails if it is invalid.
    pub fn open(path: &Path) -> Result<Self, ConfigError> {
        let document = load_document(path)?;
        Ok(Self::with_document(path, document))
    }

    /// Wrap an already loaded document.
    pub fn with_document(path: &Path, document: RuleDocument) -> Self {
        Self {
            path: path.to_path_buf(),
            current: ArcSwap::from_pointee(document),
        }
    }

    /// Current document.
    pub fn snapshot(&self) -> Arc<RuleDocument> {
        self.current.load_full()
    }

    /// Publish a new document. In-flight requests keep their snapshot.
    pub fn replace(&self, document: RuleDocument) {
        if self.current.load().https() != document.https() {
            tracing::warn!("https settings changed; they take effect on restart only");
        }
        tracing::info!(routes = document.rules().len(), "Configuration swapped in");
        self.current.store(Arc::new(document));
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
