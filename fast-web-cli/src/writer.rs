//! File writer for the generated route table.
//!
//! The new content goes to a temporary file next to the destination and is
//! renamed into place once the previous output has been removed. Dry-run mode
//! returns the content without touching the disk.

use crate::error::{CliResult, WriteError};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Result of a write operation.
#[derive(Debug)]
pub enum WriteResult {
    /// File was written successfully.
    Written {
        /// Path to the written file.
        path: PathBuf,
        /// Number of bytes written.
        bytes: usize,
    },
    /// Dry run - content was not written.
    DryRun {
        /// Content that would have been written.
        content: String,
        /// Path where content would have been written.
        path: PathBuf,
    },
}

/// File writer with dry-run support.
#[derive(Debug)]
pub struct FileWriter {
    /// Whether to run in dry-run mode.
    dry_run: bool,
}

impl FileWriter {
    /// Create a new file writer.
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    /// Write content to a file.
    ///
    /// In dry-run mode, returns the content without writing.
    pub fn write(&self, path: &Path, content: &str) -> CliResult<WriteResult> {
        if self.dry_run {
            return Ok(WriteResult::DryRun {
                content: content.to_string(),
                path: path.to_path_buf(),
            });
        }

        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        if !parent.exists() {
            std::fs::create_dir_all(&parent).map_err(|e| WriteError::CreateDir {
                path: parent.clone(),
                source: e,
            })?;
        }

        let mut temp = NamedTempFile::new_in(&parent).map_err(|e| WriteError::WriteFile {
            path: parent.clone(),
            source: e,
        })?;
        temp.write_all(content.as_bytes())
            .map_err(|e| WriteError::WriteFile {
                path: temp.path().to_path_buf(),
                source: e,
            })?;

        if path.exists() {
            std::fs::remove_file(path).map_err(|e| WriteError::Remove {
                path: path.to_path_buf(),
                source: e,
            })?;
        }
        temp.persist(path).map_err(|e| WriteError::Persist {
            path: path.to_path_buf(),
            source: e.error,
        })?;

        Ok(WriteResult::Written {
            path: path.to_path_buf(),
            bytes: content.len(),
        })
    }

    /// Check if running in dry-run mode.
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }
}

impl WriteResult {
    /// Get the path associated with this result.
    pub fn path(&self) -> &Path {
        match self {
            WriteResult::Written { path, .. } => path,
            WriteResult::DryRun { path, .. } => path,
        }
    }

    /// Check if the write was successful (not dry-run).
    pub fn was_written(&self) -> bool {
        matches!(self, WriteResult::Written { .. })
    }
}
