use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::Result;
use crate::models::{Annotation, AnnotationPatch, BookId};

/// Per-book annotations persisted as a single JSON blob keyed by book id.
///
/// The whole mapping is rewritten on every mutation; there is no batching
/// and no partial write. At this catalog scale the blob stays tiny.
#[derive(Debug)]
pub struct AnnotationStore {
    path: PathBuf,
    entries: HashMap<BookId, Annotation>,
}

impl AnnotationStore {
    /// Open the store backed by `path`. Never fails: a missing file yields
    /// an empty store and an unreadable or corrupt blob is discarded with
    /// a warning, so a fresh profile and a damaged one both start clean.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!("discarding corrupt annotation blob at {}: {e}", path.display());
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => {
                warn!("cannot read annotation blob at {}: {e}", path.display());
                HashMap::new()
            }
        };
        Self { path, entries }
    }

    /// Annotation for `id`, or the default if none was ever stored.
    pub fn get(&self, id: BookId) -> Annotation {
        self.entries.get(&id).copied().unwrap_or_default()
    }

    /// Merge `patch` into the annotation for `id`, then persist the whole
    /// mapping. The in-memory entry is updated before the write, so `get`
    /// reflects the merge even if the disk write errors.
    pub fn set(&mut self, id: BookId, patch: AnnotationPatch) -> Result<()> {
        let entry = self.entries.entry(id).or_default();
        entry.apply(patch);
        self.save()
    }

    /// Number of books with a stored annotation.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let blob = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, blob)?;
        debug!("persisted {} annotations to {}", self.entries.len(), self.path.display());
        Ok(())
    }
}
