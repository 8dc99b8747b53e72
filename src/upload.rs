//! Temporary storage for uploaded videos.
//!
//! An upload lives at `<dir>/temp_<uuid>_<name>` only as long as its
//! [`TempUpload`] guard; dropping the guard deletes the file, whichever way
//! the request ends.

use std::io;
use std::path::{Path, PathBuf};

use crate::constants::{MAX_UPLOAD_NAME_CHARS, TEMP_UPLOAD_PREFIX};

#[derive(Debug)]
pub struct TempUpload {
    path: PathBuf,
}

impl TempUpload {
    /// Reserves a path for `original_name` under `dir`. The file itself is
    /// created by the caller.
    pub fn reserve(dir: &Path, original_name: &str) -> io::Result<Self> {
        std::fs::create_dir_all(dir)?;
        let file_name = format!(
            "{TEMP_UPLOAD_PREFIX}{}_{}",
            uuid::Uuid::new_v4().simple(),
            sanitize_file_name(original_name)
        );
        Ok(Self {
            path: dir.join(file_name),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempUpload {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "Temporary upload removed"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::error!(
                    path = %self.path.display(),
                    error = %e,
                    "Failed to remove temporary upload"
                )
            }
        }
    }
}

/// Keeps the last path component of a client supplied name, restricted to
/// a safe character set.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .take(MAX_UPLOAD_NAME_CHARS)
        .collect();
    let trimmed = cleaned.trim_start_matches('.');
    if trimmed.is_empty() {
        "upload".to_string()
    } else {
        trimmed.to_string()
    }
}
