//! Error types for the generator.
//!
//! Every stage returns a [`CliResult`]. Any error aborts the run before the
//! output file is touched.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Main error type for CLI operations.
#[derive(Debug, Error)]
pub enum CliError {
    /// Error during source file scanning.
    #[error("Failed to scan directory: {0}")]
    Scan(#[from] ScanError),

    /// Error during Rust source parsing or annotation reading.
    #[error("Failed to parse source file: {0}")]
    Parse(#[from] ParseError),

    /// Error while resolving limits or emitting code.
    #[error("Failed to generate routes: {0}")]
    Generate(#[from] GenerateError),

    /// Error loading configuration.
    #[error("Failed to load configuration: {0}")]
    Config(#[from] ConfigError),

    /// Error writing output files.
    #[error("Failed to write output: {0}")]
    Write(#[from] WriteError),

    /// Error during file watching.
    #[error("Watch error: {0}")]
    Watch(#[from] WatchError),

    /// `--check` found the output out of date.
    #[error("Generated routes are out of date: {0}")]
    OutOfDate(String),

    /// Generic IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error during source file scanning.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Directory does not exist.
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// IO error during scanning.
    #[error("IO error scanning {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from ignore crate walker.
    #[error("Walk error: {0}")]
    Walk(#[from] ignore::Error),
}

/// Error during Rust source parsing.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Syntax error in Rust source.
    #[error("Syntax error in {file}:{line}:{column}: {message}")]
    Syntax {
        file: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },

    /// `@router` line that does not match `<path> [<METHOD>]`.
    #[error("can not parse router comment \"{text}\" on `{function}` in {file}:{line}")]
    Annotation {
        file: PathBuf,
        line: usize,
        function: String,
        text: String,
    },

    /// `@limit` line with a non-numeric rate or capacity.
    #[error("can not parse limit comment \"{text}\" on `{function}` in {file}:{line}")]
    Limit {
        file: PathBuf,
        line: usize,
        function: String,
        text: String,
    },

    /// Routed method whose receiver is not `self` by value.
    #[error("route method `{function}` in {file}:{line} must take `self` by value")]
    Receiver {
        file: PathBuf,
        line: usize,
        function: String,
    },

    /// Path key declared with different placeholders in several modules.
    #[error("path key `{name}` used by `{function}` in {file}:{line} has conflicting placeholders: {placeholders}")]
    PathKey {
        file: PathBuf,
        line: usize,
        function: String,
        name: String,
        placeholders: String,
    },
}

/// Error while resolving limits or emitting code.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// A named limiter group never received a rate.
    #[error("limiter '{name}' has no rate in any @limit declaration")]
    LimitWithoutRate { name: String },

    /// Two limiter names map to the same identifier.
    #[error("limiters '{first}' and '{second}' both map to `{ident}`")]
    LimiterConflict {
        first: String,
        second: String,
        ident: String,
    },

    /// HTTP method without a routing function.
    #[error("unsupported HTTP method '{method}' for route {path}")]
    UnsupportedMethod { method: String, path: String },

    /// Route path with a capture that has no name.
    #[error("route {path} has an unnamed capture")]
    UnnamedCapture { path: String },

    /// Two module paths produce the same import alias.
    #[error("modules {first} and {second} both map to alias {alias}")]
    AliasConflict {
        first: String,
        second: String,
        alias: String,
    },
}

/// Error loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid TOML syntax.
    #[error("Invalid TOML in {path}: {message}")]
    InvalidToml { path: PathBuf, message: String },

    /// Invalid configuration value.
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// IO error reading config.
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Error writing output files.
#[derive(Debug, Error)]
pub enum WriteError {
    /// Failed to create directory.
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write file.
    #[error("Failed to write file {path}: {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to remove the previous output.
    #[error("Failed to remove {path}: {source}")]
    Remove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to move the temporary file into place.
    #[error("Failed to move output into {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Error during file watching.
#[derive(Debug, Error)]
pub enum WatchError {
    /// Failed to initialize watcher.
    #[error("Failed to initialize file watcher: {0}")]
    Init(String),
}

impl ParseError {
    /// Create a syntax error with location information.
    pub fn syntax(file: PathBuf, line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            file,
            line,
            column,
            message: message.into(),
        }
    }

    /// Create a malformed `@router` error.
    pub fn annotation(
        file: PathBuf,
        line: usize,
        function: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self::Annotation {
            file,
            line,
            function: function.into(),
            text: text.into(),
        }
    }

    /// Create a malformed `@limit` error.
    pub fn limit(
        file: PathBuf,
        line: usize,
        function: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self::Limit {
            file,
            line,
            function: function.into(),
            text: text.into(),
        }
    }
}

impl ScanError {
    /// Create a directory not found error.
    pub fn not_found(path: PathBuf) -> Self {
        Self::DirectoryNotFound { path }
    }
}

impl ConfigError {
    /// Create an invalid TOML error.
    pub fn invalid_toml(path: PathBuf, message: impl Into<String>) -> Self {
        Self::InvalidToml {
            path,
            message: message.into(),
        }
    }

    /// Create an invalid value error.
    pub fn invalid_value(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            message: message.into(),
        }
    }
}
