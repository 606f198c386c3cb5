//! Property-based tests for fast-web-cli.
//!
//! Properties tested:
//! - Property 1: File Discovery Completeness
//! - Property 2: Route Extraction Completeness
//! - Property 3: First Limit Declaration Wins
//! - Property 4: Alias Shape
//! - Property 5: Generation Idempotence
//! - Property 6: Dry Run Safety
//! - Property 7: Config Override Precedence

use proptest::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use fast_web_cli::{
    RouteGenerator,
    annotation::MainTags,
    config::{CliArgs, ConfigManager, GenConfig},
    emitter::module_alias,
    parser::RouteParser,
    resolver::LimitResolver,
    scanner::SourceScanner,
};

// =============================================================================
// Generators for property tests
// =============================================================================

/// Generate a lowercase Rust identifier that is not a keyword.
fn arb_identifier() -> impl Strategy<Value = String> {
    "h_[a-z][a-z0-9_]{0,10}".prop_map(|s| s)
}

/// Generate an HTTP method as written in annotations.
fn arb_method() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["get", "POST", "Put", "delete", "patch", "ANY"])
}

/// Generate a route path.
fn arb_path() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-z0-9]{1,6}", 1..4).prop_map(|segments| format!("/{}", segments.join("/")))
}

/// An annotated handler.
fn annotated_fn(name: &str, path: &str, method: &str, limit: Option<&str>) -> String {
    let limit = limit
        .map(|l| format!("/// @limit {l}\n"))
        .unwrap_or_default();
    format!("/// Handler {name}.\n/// @router {path} [{method}]\n{limit}pub async fn {name}(ctx: RequestContext) {{}}\n\n")
}

/// Generate a directory structure with Rust files.
fn create_test_directory(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (path, content) in files {
        let full_path = dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(full_path, content).unwrap();
    }
    dir
}

fn config_for(dir: &Path) -> GenConfig {
    GenConfig {
        dirs: vec![dir.join("src")],
        output: dir.join("src/load_router.rs"),
        ..Default::default()
    }
}

// =============================================================================
// Property 1: File Discovery Completeness
//
// Every non-test .rs file below the root is discovered exactly once, in
// sorted path order.
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn prop_file_discovery_completeness(
        file_count in 1usize..10,
        depth in 1usize..4,
    ) {
        let dir = TempDir::new().unwrap();
        let mut expected = Vec::new();

        for i in 0..file_count {
            let subdir = (0..(i % depth))
                .map(|j| format!("dir{j}"))
                .collect::<Vec<_>>()
                .join("/");
            let file_path = if subdir.is_empty() {
                format!("file{i}.rs")
            } else {
                format!("{subdir}/file{i}.rs")
            };

            let full_path = dir.path().join(&file_path);
            fs::create_dir_all(full_path.parent().unwrap()).unwrap();
            fs::write(&full_path, "fn f() {}").unwrap();
            expected.push(full_path);
        }

        // Never discovered
        fs::write(dir.path().join("README.md"), "# Test").unwrap();
        fs::write(dir.path().join("file_test.rs"), "fn t() {}").unwrap();

        let files = SourceScanner::new(dir.path()).scan().unwrap();
        prop_assert_eq!(files.len(), expected.len());

        let mut sorted: Vec<PathBuf> = files.iter().map(|f| f.path.clone()).collect();
        let walked = sorted.clone();
        sorted.sort();
        prop_assert_eq!(walked, sorted);
    }
}

// =============================================================================
// Property 2: Route Extraction Completeness
//
// Every annotated function yields one route, in declaration order, with the
// method upper-cased and the path preserved.
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_route_extraction_completeness(
        handlers in prop::collection::btree_map(arb_identifier(), (arb_path(), arb_method()), 1..8),
    ) {
        let source: String = handlers
            .iter()
            .map(|(name, (path, method))| annotated_fn(name, path, method, None))
            .collect();

        let routes = RouteParser::new()
            .parse_source(&source, Path::new("api.rs"), "crate::api")
            .unwrap();

        prop_assert_eq!(routes.len(), handlers.len());
        for (route, (name, (path, method))) in routes.iter().zip(&handlers) {
            prop_assert_eq!(&route.method_name, name);
            prop_assert_eq!(&route.path, path);
            prop_assert_eq!(route.http_method.clone(), method.to_uppercase());
            prop_assert!(route.descriptor.is_plain());
        }
    }
}

// =============================================================================
// Property 3: First Limit Declaration Wins
//
// For any sequence of complete declarations sharing a name, the merged
// group carries the first declaration's rate and capacity.
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_first_limit_declaration_wins(
        limits in prop::collection::vec((0u32..1000, 0u32..1000), 1..6),
    ) {
        let source: String = limits
            .iter()
            .enumerate()
            .map(|(i, (num, cap))| {
                annotated_fn(&format!("h{i}"), &format!("/r{i}"), "GET", Some(&format!("{num} {cap} shared")))
            })
            .collect();

        let routes = RouteParser::new()
            .parse_source(&source, Path::new("api.rs"), "crate::api")
            .unwrap();
        let ctx = LimitResolver::resolve(routes).unwrap();

        prop_assert_eq!(ctx.limiters.len(), 1);
        prop_assert_eq!(ctx.limiters[0].num, limits[0].0);
        prop_assert_eq!(ctx.limiters[0].cap, limits[0].1);
    }
}

// =============================================================================
// Property 4: Alias Shape
//
// Aliases contain no path separators and start each segment upper-cased.
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_alias_shape(segments in prop::collection::vec("[a-z][a-z0-9]{0,6}", 1..5)) {
        let alias = module_alias(&segments.join("::"));

        prop_assert!(!alias.contains(':'));
        prop_assert!(!alias.contains('/'));
        prop_assert!(!alias.contains('.'));
        prop_assert_eq!(alias.len(), segments.iter().map(String::len).sum::<usize>());

        let expected: String = segments
            .iter()
            .map(|s| format!("{}{}", s[..1].to_uppercase(), &s[1..]))
            .collect();
        prop_assert_eq!(alias, expected);
    }
}

// =============================================================================
// Property 5: Generation Idempotence
//
// Two runs over unchanged sources produce byte-identical output.
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn prop_generation_idempotence(
        handlers in prop::collection::btree_map(arb_identifier(), (arb_path(), arb_method()), 1..6),
    ) {
        let source: String = handlers
            .iter()
            .map(|(name, (path, method))| annotated_fn(name, path, method, Some("5 10 shared")))
            .collect();
        let dir = create_test_directory(&[
            ("Cargo.toml", "[package]\nname = \"app\""),
            ("src/api/user.rs", &source),
        ]);

        let generator = RouteGenerator::new(config_for(dir.path()));
        generator.run(false).unwrap();
        let first = fs::read_to_string(dir.path().join("src/load_router.rs")).unwrap();
        generator.run(false).unwrap();
        let second = fs::read_to_string(dir.path().join("src/load_router.rs")).unwrap();

        prop_assert_eq!(first, second);
        prop_assert!(generator.check().is_ok());
    }
}

// =============================================================================
// Property 6: Dry Run Safety
//
// A dry run never creates the output file.
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn prop_dry_run_safety(name in arb_identifier(), path in arb_path()) {
        let source = annotated_fn(&name, &path, "GET", None);
        let dir = create_test_directory(&[("src/api.rs", &source)]);

        let (output, _) = RouteGenerator::new(config_for(dir.path())).run(true).unwrap();

        prop_assert!(!dir.path().join("src/load_router.rs").exists());
        prop_assert_eq!(output.route_count, 1);
    }
}

// =============================================================================
// Property 7: Config Override Precedence
//
// Main-fn tags beat CLI flags, which beat the config file.
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_config_override_precedence(
        file_output in "[a-z]{1,8}\\.rs",
        cli_output in proptest::option::of("[a-z]{1,8}\\.rs"),
        tag_output in proptest::option::of("[a-z]{1,8}\\.rs"),
    ) {
        let file = GenConfig {
            output: PathBuf::from(&file_output),
            ..Default::default()
        };
        let args = CliArgs {
            output: cli_output.as_ref().map(PathBuf::from),
            ..Default::default()
        };
        let tags = MainTags {
            output: tag_output.clone(),
            ..Default::default()
        };

        let merged = ConfigManager::apply_main_tags(ConfigManager::merge_cli_args(file, &args), &tags);
        let expected = tag_output.or(cli_output).unwrap_or(file_output);
        prop_assert_eq!(merged.output, PathBuf::from(expected));
    }
}
