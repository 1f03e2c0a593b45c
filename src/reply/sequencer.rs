//! Reply sequencing.
//!
//! A route answers either with one file or walks through a list of files, one
//! per call, and sticks to the last entry once the list is exhausted. The hit
//! counter lives here, next to the files it indexes, so every compiled rule
//! owns exactly one counter and a reload starts from zero.
//!
//! Picking a file, reading it and advancing the counter happen under one
//! per-rule lock. The counter only moves once the reply was read, so a failed
//! read leaves the sequence where it was.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{Mutex, MutexGuard};

/// Files a rule replies with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplySource {
    Single(PathBuf),
    /// Non-empty, enforced by [`ReplySequence::new`].
    Sequence(Vec<PathBuf>),
}

impl ReplySource {
    fn file_at(&self, count: u64) -> &Path {
        match self {
            ReplySource::Single(path) => path,
            ReplySource::Sequence(entries) => {
                let last = entries.len() - 1;
                let index = usize::try_from(count).map_or(last, |c| c.min(last));
                &entries[index]
            }
        }
    }
}

/// Reply files of a rule together with its invocation counter.
#[derive(Debug)]
pub struct ReplySequence {
    source: ReplySource,
    hits: AtomicU64,
    turn: Mutex<()>,
}

/// Exclusive right to serve the next reply of a sequence.
///
/// Dropping a turn without calling [`ReplyTurn::commit`] leaves the counter
/// untouched.
#[derive(Debug)]
pub struct ReplyTurn<'a> {
    sequence: &'a ReplySequence,
    count: u64,
    _guard: MutexGuard<'a, ()>,
}

impl ReplyTurn<'_> {
    /// File to serve on this turn.
    pub fn file(&self) -> &Path {
        self.sequence.source.file_at(self.count)
    }

    /// Record the reply as served.
    ///
    /// A reset that landed while the turn was held wins.
    pub fn commit(self) {
        let _ = self.sequence.hits.compare_exchange(
            self.count,
            self.count + 1,
            Ordering::SeqCst,
            Ordering::SeqCst,
        );
    }
}

impl ReplySequence {
    /// Create a sequence starting at zero hits.
    ///
    /// Returns `None` for an empty sequence; validation rejects those before
    /// a document is compiled.
    pub fn new(source: ReplySource) -> Option<Self> {
        if let ReplySource::Sequence(entries) = &source {
            if entries.is_empty() {
                return None;
            }
        }
        Some(Self {
            source,
            hits: AtomicU64::new(0),
            turn: Mutex::new(()),
        })
    }

    /// Wait for this rule's turn and pick the file for it.
    pub async fn next_turn(&self) -> ReplyTurn<'_> {
        let guard = self.turn.lock().await;
        ReplyTurn {
            sequence: self,
            count: self.hits.load(Ordering::SeqCst),
            _guard: guard,
        }
    }

    /// Number of replies served since creation or the last reset.
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::SeqCst)
    }

    /// Restart the sequence from its first entry.
    pub fn reset(&self) {
        self.hits.store(0, Ordering::SeqCst);
    }

    pub fn source(&self) -> &ReplySource {
        &self.source
    }
}
