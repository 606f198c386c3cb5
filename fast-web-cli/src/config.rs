//! Configuration management for the CLI.
//!
//! Settings come from four layers, highest precedence first:
//!
//! 1. `@genDir`, `@genOutput` and `@genWrapper` in the doc comment of `fn main`
//! 2. command-line flags
//! 3. a `fast-wgen.toml` file
//! 4. built-in defaults

use crate::annotation::MainTags;
use crate::error::{CliResult, ConfigError};
use crate::parser::doc_lines;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use syn::Item;
use tracing::debug;

/// Default configuration filename.
pub const CONFIG_FILENAME: &str = "fast-wgen.toml";

/// Wrapper value selecting wrap mode.
pub const WRAP_ENABLED: &str = "1";

/// Generator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GenConfig {
    /// Directories to scan, in order.
    pub dirs: Vec<PathBuf>,

    /// Output file.
    pub output: PathBuf,

    /// `"1"` wraps handlers with `fast_web::wrap`; anything else registers them as-is.
    pub wrapper: String,

    /// First segment of generated module paths.
    pub crate_prefix: String,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            dirs: vec![PathBuf::from("./")],
            output: PathBuf::from("./load_router.rs"),
            wrapper: WRAP_ENABLED.to_string(),
            crate_prefix: "crate".to_string(),
        }
    }
}

impl GenConfig {
    /// Whether handlers are wrapped.
    pub fn wraps(&self) -> bool {
        self.wrapper == WRAP_ENABLED
    }

    /// Resolve relative scan directories and output against `base`.
    pub fn rooted_at(mut self, base: &Path) -> Self {
        for dir in &mut self.dirs {
            if dir.is_relative() {
                *dir = base.join(&*dir);
            }
        }
        if self.output.is_relative() {
            self.output = base.join(&self.output);
        }
        self
    }

    /// Check values that deserialization cannot.
    pub fn validate(&self) -> CliResult<()> {
        if self.dirs.is_empty() {
            return Err(ConfigError::invalid_value("dirs", "at least one directory is required").into());
        }
        if self.output.as_os_str().is_empty() {
            return Err(ConfigError::invalid_value("output", "must not be empty").into());
        }
        if self.crate_prefix.is_empty() {
            return Err(ConfigError::invalid_value("crate_prefix", "must not be empty").into());
        }
        Ok(())
    }
}

/// Split a comma-separated directory list.
pub fn split_dirs(value: &str) -> Vec<PathBuf> {
    value
        .split(',')
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(PathBuf::from)
        .collect()
}

/// Configuration manager for loading and merging configs.
pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration from a file path.
    ///
    /// If the path is None, attempts to load from the default location.
    /// If no config file exists, returns default configuration.
    pub fn load(path: Option<&Path>) -> CliResult<GenConfig> {
        let config_path = path
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME));

        if !config_path.exists() {
            return Ok(GenConfig::default());
        }

        let content = std::fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })?;

        let config: GenConfig = toml::from_str(&content)
            .map_err(|e| ConfigError::invalid_toml(config_path, e.to_string()))?;

        Ok(config)
    }

    /// Merge CLI arguments into configuration.
    ///
    /// CLI arguments take precedence over config file values.
    pub fn merge_cli_args(mut config: GenConfig, args: &CliArgs) -> GenConfig {
        if let Some(ref dir) = args.dir {
            config.dirs = split_dirs(dir);
        }

        if let Some(ref output) = args.output {
            config.output = output.clone();
        }

        if let Some(ref wrapper) = args.wrapper {
            config.wrapper = wrapper.clone();
        }

        config
    }

    /// Apply tags from `fn main`, which override everything else.
    pub fn apply_main_tags(mut config: GenConfig, tags: &MainTags) -> GenConfig {
        if let Some(ref dir) = tags.dir {
            config.dirs = split_dirs(dir);
        }
        if let Some(ref output) = tags.output {
            config.output = PathBuf::from(output);
        }
        if let Some(ref wrapper) = tags.wrapper {
            config.wrapper = wrapper.clone();
        }
        config
    }

    /// Generate default configuration file content with comments.
    pub fn default_config_content() -> &'static str {
        r#"# fast-wgen configuration file

# Directories to scan for @router annotations
dirs = ["./"]

# Generated route table
output = "./load_router.rs"

# "1" wraps handlers with fast_web::wrap, anything else registers them as-is
wrapper = "1"

# First segment of generated module paths
crate_prefix = "crate"
"#
    }
}

/// CLI arguments that can override configuration.
#[derive(Debug, Default)]
pub struct CliArgs {
    /// Comma-separated scan directories.
    pub dir: Option<String>,

    /// Output file override.
    pub output: Option<PathBuf>,

    /// Wrapper mode override.
    pub wrapper: Option<String>,
}

/// Read generator tags from the doc comment of a parameterless `fn main` in
/// `base/main.rs` or `base/src/main.rs`. Unreadable or unparsable files are
/// skipped.
pub fn read_main_tags(base: &Path) -> MainTags {
    for candidate in [base.join("main.rs"), base.join("src").join("main.rs")] {
        let Ok(content) = std::fs::read_to_string(&candidate) else {
            continue;
        };
        let Ok(syntax) = syn::parse_file(&content) else {
            debug!(file = %candidate.display(), "Skipping unparsable main file");
            continue;
        };

        let main = syntax.items.iter().find_map(|item| match item {
            Item::Fn(f) if f.sig.ident == "main" && f.sig.inputs.is_empty() => Some(f),
            _ => None,
        });
        if let Some(main) = main {
            let lines = doc_lines(&main.attrs);
            let tags = MainTags::from_doc_lines(lines.iter().map(|(text, _)| text.as_str()));
            if !tags.is_empty() {
                debug!(file = %candidate.display(), ?tags, "Read generator tags from main");
                return tags;
            }
        }
    }
    MainTags::default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = GenConfig::default();
        assert_eq!(config.dirs, vec![PathBuf::from("./")]);
        assert_eq!(config.output, PathBuf::from("./load_router.rs"));
        assert!(config.wraps());
        assert_eq!(config.crate_prefix, "crate");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_toml_config() {
        let config: GenConfig = toml::from_str(
            r#"
dirs = ["./src/api", "./src/admin"]
output = "./src/load_router.rs"
wrapper = "0"
"#,
        )
        .unwrap();
        assert_eq!(config.dirs.len(), 2);
        assert_eq!(config.output, PathBuf::from("./src/load_router.rs"));
        assert!(!config.wraps());
        assert_eq!(config.crate_prefix, "crate");
    }

    #[test]
    fn test_default_content_parses() {
        let config: GenConfig = toml::from_str(ConfigManager::default_config_content()).unwrap();
        assert_eq!(config, GenConfig::default());
    }

    #[test]
    fn test_precedence() {
        let file = GenConfig {
            wrapper: "0".into(),
            ..Default::default()
        };
        let args = CliArgs {
            dir: Some("./a, ./b".into()),
            output: Some(PathBuf::from("cli.rs")),
            wrapper: None,
        };
        let merged = ConfigManager::merge_cli_args(file, &args);
        assert_eq!(merged.dirs, vec![PathBuf::from("./a"), PathBuf::from("./b")]);
        assert_eq!(merged.wrapper, "0");

        let tags = MainTags {
            output: Some("tag.rs".into()),
            ..Default::default()
        };
        let merged = ConfigManager::apply_main_tags(merged, &tags);
        assert_eq!(merged.output, PathBuf::from("tag.rs"));
        assert_eq!(merged.dirs.len(), 2);
    }

    #[test]
    fn test_invalid_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "dirs = 3").unwrap();
        assert!(matches!(
            ConfigManager::load(Some(&path)).unwrap_err(),
            crate::error::CliError::Config(ConfigError::InvalidToml { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_empty_dirs() {
        let config = GenConfig {
            dirs: Vec::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_read_main_tags() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("src")).unwrap();
        std::fs::write(
            dir.path().join("src/main.rs"),
            r#"
/// Demo service.
/// @genDir ./src/api
/// @genOutput ./src/load_router.rs
fn main() {}
"#,
        )
        .unwrap();

        let tags = read_main_tags(dir.path());
        assert_eq!(tags.dir.as_deref(), Some("./src/api"));
        assert_eq!(tags.output.as_deref(), Some("./src/load_router.rs"));
        assert_eq!(tags.wrapper, None);
    }

    #[test]
    fn test_read_main_tags_missing() {
        let dir = TempDir::new().unwrap();
        assert!(read_main_tags(dir.path()).is_empty());
    }

    #[test]
    fn test_rooted_at() {
        let config = GenConfig::default().rooted_at(Path::new("/project"));
        assert_eq!(config.dirs, vec![PathBuf::from("/project/./")]);
        assert_eq!(config.output, PathBuf::from("/project/./load_router.rs"));
    }
}
