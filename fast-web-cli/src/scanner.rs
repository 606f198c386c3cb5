//! Source file scanner for discovering Rust files.
//!
//! This module recursively scans directories for Rust source files,
//! respecting `.gitignore` patterns and skipping files that never carry
//! routes: hidden entries, `vendor`, `docs`, `target` and `tests` directories,
//! and test files (`tests.rs`, `*_test.rs`, `*_tests.rs`).
//!
//! Files are returned in sorted path order so generation is deterministic.

use crate::error::{CliResult, ScanError};
use ignore::{DirEntry, WalkBuilder};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directory names that are never scanned.
pub const SKIPPED_DIRS: &[&str] = &["vendor", "docs", "target", "tests"];

/// A discovered source file with its content.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Path to the file as walked.
    pub path: PathBuf,

    /// Path relative to the scan root.
    pub relative_path: PathBuf,

    /// File content.
    pub content: String,
}

/// Scanner for discovering Rust source files.
#[derive(Debug)]
pub struct SourceScanner {
    /// Root directory to scan.
    root: PathBuf,
}

impl SourceScanner {
    /// Create a new scanner for the given root directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Scan the directory and return all discovered Rust files, sorted by path.
    pub fn scan(&self) -> CliResult<Vec<SourceFile>> {
        if !self.root.is_dir() {
            return Err(ScanError::not_found(self.root.clone()).into());
        }

        let mut files = Vec::new();

        let walker = WalkBuilder::new(&self.root)
            .hidden(false)
            .filter_entry(|entry| entry.depth() == 0 || !is_skipped(entry))
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();

        for entry in walker {
            let entry = entry.map_err(ScanError::Walk)?;
            let path = entry.path();

            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }

            if path.extension().is_none_or(|ext| ext != "rs") || is_test_file(path) {
                continue;
            }

            let content = std::fs::read_to_string(path).map_err(|e| ScanError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

            debug!(file = %path.display(), "Scanning source file");
            files.push(SourceFile {
                path: path.to_path_buf(),
                relative_path: self.relative_path(path),
                content,
            });
        }

        Ok(files)
    }

    /// Get the relative path from root.
    fn relative_path(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.root).unwrap_or(path).to_path_buf()
    }
}

/// Scan several roots in order, dropping files already seen under an earlier root.
pub fn scan_all(roots: &[PathBuf]) -> CliResult<Vec<SourceFile>> {
    let mut seen = std::collections::HashSet::new();
    let mut files = Vec::new();
    for root in roots {
        for file in SourceScanner::new(root).scan()? {
            let key = std::fs::canonicalize(&file.path).unwrap_or_else(|_| file.path.clone());
            if seen.insert(key) {
                files.push(file);
            }
        }
    }
    Ok(files)
}

fn is_skipped(entry: &DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy();
    if name.starts_with('.') {
        return true;
    }
    entry.file_type().is_some_and(|t| t.is_dir()) && SKIPPED_DIRS.contains(&name.as_ref())
}

/// Whether `path` names a test file by convention.
pub fn is_test_file(path: &Path) -> bool {
    let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
        return false;
    };
    stem == "tests" || stem.ends_with("_test") || stem.ends_with("_tests")
}
