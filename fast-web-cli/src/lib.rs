//! # fast-web-cli
//!
//! Library behind the `fast-wgen` tool, which turns `@router` doc annotations
//! into a static axum route table.
//!
//! ## Architecture
//!
//! ```text
//! scanner ──► parser ──► resolver ──► emitter ──► writer
//!  (.rs files)  (routes)  (limiters)   (source)    (atomic file)
//! ```
//!
//! - [`config`] - `fast-wgen.toml`, CLI flags and `fn main` tags
//! - [`scanner`] - Source file discovery and filtering
//! - [`annotation`] - `@router` / `@limit` grammar
//! - [`parser`] - Route extraction with `syn`
//! - [`resolver`] - Shared limiter groups
//! - [`emitter`] - Route table code generation
//! - [`writer`] - File output and dry-run support
//! - [`watcher`] - File system watching for development mode
//! - [`error`] - Error types and handling
//!
//! Any error aborts the run before the output file is touched.

pub mod annotation;
pub mod config;
pub mod emitter;
pub mod error;
pub mod parser;
pub mod resolver;
pub mod scanner;
pub mod watcher;
pub mod writer;

pub use config::{ConfigManager, GenConfig};
pub use emitter::{CodeEmitter, GeneratedOutput};
pub use error::{CliError, CliResult};
pub use parser::{RouteParser, RouteProperties};
pub use resolver::{BuildContext, LimitResolver};
pub use scanner::{SourceFile, SourceScanner};
pub use watcher::FileWatcher;
pub use writer::{FileWriter, WriteResult};

use tracing::info;

/// Runs the whole pipeline for one configuration.
#[derive(Debug, Clone)]
pub struct RouteGenerator {
    config: GenConfig,
}

impl RouteGenerator {
    /// Create a generator for `config`.
    pub fn new(config: GenConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &GenConfig {
        &self.config
    }

    /// Scan, parse, resolve and emit, without writing anything.
    pub fn generate(&self) -> CliResult<GeneratedOutput> {
        self.config.validate()?;

        let files = scanner::scan_all(&self.config.dirs)?;
        let routes = RouteParser::new()
            .with_crate_prefix(&self.config.crate_prefix)
            .parse_files(&files)?;
        let ctx = LimitResolver::resolve(routes)?;
        let output = CodeEmitter::new(self.config.wraps()).emit(&ctx)?;

        info!(
            files = files.len(),
            routes = output.route_count,
            limiters = output.limiter_count,
            "Generated route table"
        );
        Ok(output)
    }

    /// Generate and write the output file.
    pub fn run(&self, dry_run: bool) -> CliResult<(GeneratedOutput, WriteResult)> {
        let output = self.generate()?;
        let written = FileWriter::new(dry_run).write(&self.config.output, &output.content)?;
        Ok((output, written))
    }

    /// Compare the file on disk with a fresh generation.
    pub fn check(&self) -> CliResult<GeneratedOutput> {
        let output = self.generate()?;
        let existing = std::fs::read_to_string(&self.config.output).unwrap_or_default();
        if existing != output.content {
            return Err(CliError::OutOfDate(self.config.output.display().to_string()));
        }
        Ok(output)
    }
}
