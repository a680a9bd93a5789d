//! Hot reload of the status vocabulary file.
//!
//! The vocabulary is shared as an `Arc` snapshot behind a lock: the check
//! cycle grabs a snapshot at the start of each run and keeps it for the
//! whole cycle, so a reload mid-cycle never mixes old and new keyword sets.
//! The watcher polls the file on an interval and swaps in a new snapshot
//! only when the bytes actually changed and parse cleanly; a broken edit
//! leaves the last good vocabulary in place.

use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use docwatch_core::StatusVocabulary;
use sha2::{Digest, Sha256};
use tokio::sync::watch;

use crate::watch::interruptible_sleep;

/// Shared, swappable handle to the current vocabulary.
#[derive(Clone)]
pub struct VocabHandle {
    inner: Arc<RwLock<Arc<StatusVocabulary>>>,
}

impl VocabHandle {
    #[must_use]
    pub fn new(vocab: StatusVocabulary) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(vocab))),
        }
    }

    /// Returns the current vocabulary snapshot. Cheap; clones an `Arc`.
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned, which requires a prior panic while
    /// swapping.
    #[must_use]
    pub fn snapshot(&self) -> Arc<StatusVocabulary> {
        Arc::clone(&self.inner.read().expect("vocab lock poisoned"))
    }

    fn swap(&self, vocab: StatusVocabulary) {
        *self.inner.write().expect("vocab lock poisoned") = Arc::new(vocab);
    }
}

impl Default for VocabHandle {
    fn default() -> Self {
        Self::new(StatusVocabulary::default())
    }
}

/// Polls a vocabulary file and swaps new content into a [`VocabHandle`].
pub struct VocabWatcher {
    path: PathBuf,
    handle: VocabHandle,
    last_digest: Option<[u8; 32]>,
}

impl VocabWatcher {
    #[must_use]
    pub fn new(path: PathBuf, handle: VocabHandle) -> Self {
        Self {
            path,
            handle,
            last_digest: None,
        }
    }

    /// One poll: re-reads the file and swaps the vocabulary if its content
    /// digest changed since the last poll. Returns `true` when a swap
    /// happened. Read and parse failures are logged and leave the current
    /// vocabulary untouched.
    pub fn poll_once(&mut self) -> bool {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "could not read vocabulary file; keeping current vocabulary"
                );
                return false;
            }
        };

        let digest: [u8; 32] = Sha256::digest(&bytes).into();
        if self.last_digest == Some(digest) {
            return false;
        }

        match StatusVocabulary::from_yaml_file(&self.path) {
            Ok(vocab) => {
                self.handle.swap(vocab);
                self.last_digest = Some(digest);
                tracing::info!(path = %self.path.display(), "vocabulary reloaded");
                true
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "vocabulary file did not parse; keeping current vocabulary"
                );
                false
            }
        }
    }

    /// Polls until `shutdown` flips to `true`.
    pub async fn run(mut self, poll_interval: Duration, mut shutdown: watch::Receiver<bool>) {
        tracing::info!(
            path = %self.path.display(),
            interval_secs = poll_interval.as_secs(),
            "watching vocabulary file"
        );
        loop {
            self.poll_once();
            if interruptible_sleep(poll_interval, &mut shutdown).await {
                tracing::debug!("vocabulary watcher stopping");
                return;
            }
        }
    }
}
