//! Mock IaC provider for testing.
//!
//! Provides a configurable implementation of the [`IacProvider`] trait that
//! records every load call, so executor behavior can be checked without
//! real IaC sources on disk.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::json;

use crate::error::{LoadError, LoadResult};
use crate::provider::{IacProvider, NormalizedTree};

/// Which provider operation was invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadKind {
    File,
    Dir,
}

/// Captured call information for verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedLoad {
    pub kind: LoadKind,
    pub path: PathBuf,
}

/// Mock provider.
///
/// Clones share state, so a test can keep one handle and register a
/// factory that hands out clones.
#[derive(Clone)]
pub struct MockProvider {
    name: String,
    file_result: Arc<RwLock<Option<NormalizedTree>>>,
    dir_result: Arc<RwLock<Option<NormalizedTree>>>,
    failure: Arc<RwLock<Option<String>>>,
    captured_calls: Arc<RwLock<Vec<CapturedLoad>>>,
    call_count: Arc<AtomicUsize>,
}

impl MockProvider {
    /// Create a mock that echoes the load kind and path.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            file_result: Arc::new(RwLock::new(None)),
            dir_result: Arc::new(RwLock::new(None)),
            failure: Arc::new(RwLock::new(None)),
            captured_calls: Arc::new(RwLock::new(Vec::new())),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Fixed tree returned by `load_file`.
    pub fn with_file_result(self, tree: NormalizedTree) -> Self {
        *self.file_result.write() = Some(tree);
        self
    }

    /// Fixed tree returned by `load_dir`.
    pub fn with_dir_result(self, tree: NormalizedTree) -> Self {
        *self.dir_result.write() = Some(tree);
        self
    }

    /// Make every load fail with a parse error carrying `message`.
    pub fn failing(self, message: impl Into<String>) -> Self {
        *self.failure.write() = Some(message.into());
        self
    }

    pub fn captured_calls(&self) -> Vec<CapturedLoad> {
        self.captured_calls.read().clone()
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    fn record(&self, kind: LoadKind, path: &Path) -> LoadResult<NormalizedTree> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.captured_calls.write().push(CapturedLoad {
            kind,
            path: path.to_path_buf(),
        });

        if let Some(message) = self.failure.read().clone() {
            return Err(LoadError::Parse {
                path: path.to_path_buf(),
                message,
            });
        }

        let fixed = match kind {
            LoadKind::File => self.file_result.read().clone(),
            LoadKind::Dir => self.dir_result.read().clone(),
        };

        Ok(fixed.unwrap_or_else(|| {
            json!({
                "kind": match kind {
                    LoadKind::File => "file",
                    LoadKind::Dir => "dir",
                },
                "path": path.to_string_lossy(),
            })
        }))
    }
}

impl IacProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn load_file(&self, path: &Path) -> LoadResult<NormalizedTree> {
        self.record(LoadKind::File, path)
    }

    fn load_dir(&self, path: &Path) -> LoadResult<NormalizedTree> {
        self.record(LoadKind::Dir, path)
    }
}
