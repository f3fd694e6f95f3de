//! Staging files for inbound images.
//!
//! Each request writes its image to `<upload_dir>/<uuid>.<ext>`. The name is
//! generated, never taken from the client, so it cannot escape the upload
//! directory and concurrent requests never share a path.

use std::io;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::error::CoreError;
use crate::payload::InboundImage;

/// The managed directory staging files are written into.
#[derive(Debug, Clone)]
pub struct StagingArea {
    dir: PathBuf,
}

impl StagingArea {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the directory (and parents) if it does not exist yet.
    pub async fn ensure_dir(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await
    }

    /// Write `image` to a fresh, request-unique path.
    pub async fn stage(&self, image: &InboundImage) -> Result<StagedFile, CoreError> {
        let ext: String = image
            .staging_extension()
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .collect();
        let name = format!("{}.{}", Uuid::new_v4(), ext);
        let path = self.dir.join(name);

        tokio::fs::write(&path, &image.bytes).await.map_err(|e| {
            CoreError::Internal(format!(
                "failed to write staging file {}: {e}",
                path.display()
            ))
        })?;

        Ok(StagedFile {
            path,
            removed: false,
        })
    }
}

/// A staged image on disk, exclusively owned by one request.
///
/// Call [`StagedFile::remove`] once the upload attempt is over. If the value
/// is dropped first (request cancelled or timed out) the file is removed
/// synchronously on drop.
#[derive(Debug)]
pub struct StagedFile {
    path: PathBuf,
    removed: bool,
}

impl StagedFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
    }

    pub async fn read(&self) -> io::Result<Vec<u8>> {
        tokio::fs::read(&self.path).await
    }

    /// Delete the file. A file that is already gone counts as removed.
    pub async fn remove(mut self) -> io::Result<()> {
        self.removed = true;
        match tokio::fs::remove_file(&self.path).await {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if !self.removed {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}
