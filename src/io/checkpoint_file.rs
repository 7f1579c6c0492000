//! File-backed checkpoint store
//!
//! The checkpoint is a small text file holding the last processed date and,
//! optionally, the last posted transaction id on a second line.
//!
//! # Atomicity
//!
//! Every save writes a temporary file next to the checkpoint and renames it
//! over the old one, so a crash leaves either the previous or the new
//! checkpoint on disk, never a partial one.

use crate::core::CheckpointStore;
use crate::types::{Checkpoint, SyncError};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Checkpoint store backed by a single text file
#[derive(Debug, Clone)]
pub struct FileCheckpointStore {
    path: PathBuf,
}

impl FileCheckpointStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileCheckpointStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn directory(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

impl CheckpointStore for FileCheckpointStore {
    fn load(&self) -> Result<Option<Checkpoint>, SyncError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(SyncError::checkpoint_io(&self.path, &e)),
        };

        Checkpoint::parse(&contents).map(Some)
    }

    fn save(&mut self, checkpoint: &Checkpoint) -> Result<(), SyncError> {
        let mut file = NamedTempFile::new_in(self.directory())
            .map_err(|e| SyncError::checkpoint_io(&self.path, &e))?;

        file.write_all(checkpoint.render().as_bytes())
            .and_then(|_| file.as_file().sync_all())
            .map_err(|e| SyncError::checkpoint_io(&self.path, &e))?;

        file.persist(&self.path)
            .map_err(|e| SyncError::checkpoint_io(&self.path, &e.error))?;

        debug!(path = %self.path.display(), checkpoint = %checkpoint, "Checkpoint saved");
        Ok(())
    }
}
