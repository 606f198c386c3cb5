//! File watcher for development mode.
//!
//! Watches the scan directories and reports changed `.rs` files so the route
//! table can be regenerated. The generated file itself is ignored, otherwise
//! every write would trigger another run.

use crate::error::{CliResult, WatchError};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use notify_debouncer_mini::{DebouncedEvent, Debouncer, new_debouncer};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, channel};
use std::time::Duration;

/// Event types for file changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// A file was created or modified.
    Changed(PathBuf),
    /// A file was deleted.
    Removed(PathBuf),
    /// An error occurred.
    Error(String),
}

/// Quiet period before a burst of changes is reported.
const DEBOUNCE: Duration = Duration::from_millis(500);

/// File watcher for monitoring Rust source files.
pub struct FileWatcher {
    /// Directories to watch.
    roots: Vec<PathBuf>,
    /// Paths whose changes are not reported.
    ignored: Vec<PathBuf>,
}

impl FileWatcher {
    /// Create a new file watcher for the given directories.
    pub fn new(roots: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            roots: roots.into_iter().collect(),
            ignored: Vec::new(),
        }
    }

    /// Do not report changes to `path`.
    pub fn ignoring(mut self, path: &Path) -> Self {
        self.ignored.push(normalize(path));
        self
    }

    /// Start watching for file changes.
    ///
    /// The debouncer must be kept alive for events to keep arriving.
    pub fn watch(&self) -> CliResult<(Debouncer<RecommendedWatcher>, Receiver<WatchEvent>)> {
        let (tx, rx) = channel::<WatchEvent>();
        let ignored = self.ignored.clone();

        let mut debouncer = new_debouncer(
            DEBOUNCE,
            move |result: Result<Vec<DebouncedEvent>, notify::Error>| match result {
                Ok(events) => {
                    for event in events {
                        if let Some(watch_event) = classify(event.path, &ignored) {
                            let _ = tx.send(watch_event);
                        }
                    }
                }
                Err(e) => {
                    let _ = tx.send(WatchEvent::Error(e.to_string()));
                }
            },
        )
        .map_err(|e| WatchError::Init(e.to_string()))?;

        for root in &self.roots {
            debouncer
                .watcher()
                .watch(root, RecursiveMode::Recursive)
                .map_err(|e| WatchError::Init(format!("{}: {e}", root.display())))?;
        }

        Ok((debouncer, rx))
    }
}

fn normalize(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Turn a raw path into an event, dropping non-Rust and ignored files.
fn classify(path: PathBuf, ignored: &[PathBuf]) -> Option<WatchEvent> {
    if path.extension().is_none_or(|ext| ext != "rs") {
        return None;
    }
    if ignored.contains(&normalize(&path)) {
        return None;
    }
    Some(if path.exists() {
        WatchEvent::Changed(path)
    } else {
        WatchEvent::Removed(path)
    })
}

impl WatchEvent {
    /// Get the path associated with this event.
    pub fn path(&self) -> Option<&Path> {
        match self {
            WatchEvent::Changed(p) | WatchEvent::Removed(p) => Some(p),
            WatchEvent::Error(_) => None,
        }
    }

    /// Get the error message if this is an error event.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            WatchEvent::Error(msg) => Some(msg),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_watch_event_path() {
        let path = PathBuf::from("/test/file.rs");

        assert_eq!(WatchEvent::Changed(path.clone()).path(), Some(path.as_path()));
        assert_eq!(WatchEvent::Removed(path.clone()).path(), Some(path.as_path()));
        assert_eq!(WatchEvent::Error("test error".to_string()).path(), None);
    }

    #[test]
    fn test_watch_event_error_message() {
        assert_eq!(WatchEvent::Changed(PathBuf::from("/test")).error_message(), None);

        let error = WatchEvent::Error("test error".to_string());
        assert_eq!(error.error_message(), Some("test error"));
    }

    #[test]
    fn test_classify() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("user.rs");
        let output = dir.path().join("load_router.rs");
        std::fs::write(&source, "").unwrap();
        std::fs::write(&output, "").unwrap();
        let ignored = vec![normalize(&output)];

        assert_eq!(
            classify(source.clone(), &ignored),
            Some(WatchEvent::Changed(source))
        );
        assert_eq!(classify(output, &ignored), None);
        assert_eq!(classify(dir.path().join("notes.md"), &ignored), None);

        let gone = dir.path().join("gone.rs");
        assert_eq!(classify(gone.clone(), &ignored), Some(WatchEvent::Removed(gone)));
    }

    #[test]
    fn test_file_watcher_builder() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("load_router.rs");
        std::fs::write(&output, "").unwrap();

        let watcher = FileWatcher::new([dir.path().to_path_buf()]).ignoring(&output);
        assert_eq!(watcher.roots, [dir.path().to_path_buf()]);
        assert_eq!(watcher.ignored, [normalize(&output)]);
    }
}
