//! Integration tests for fast-web-cli.
//!
//! These tests build small project trees in temporary directories and run
//! the whole pipeline over them: scanning, parsing, limit resolution,
//! emission and writing.

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use fast_web_cli::{
    CliError, RouteGenerator,
    config::{ConfigManager, GenConfig, read_main_tags},
    error::{GenerateError, ParseError},
};

/// Create a temporary directory with test files.
fn create_temp_project(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (name, content) in files {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }
    dir
}

fn generator_for(dir: &Path, scan: &str) -> RouteGenerator {
    let config = GenConfig {
        dirs: vec![dir.join(scan)],
        output: dir.join("src/load_router.rs"),
        ..Default::default()
    };
    RouteGenerator::new(config)
}

const CARGO_TOML: &str = "[package]\nname = \"app\"\n";

const USER_API: &str = r#"
use fast_web::{Body, PathParam, RequestContext, path_key};

path_key!(pub UserId = "id");

/// Fetch one user.
/// @router /user/{id} [get]
/// @limit 10 20 user
pub async fn get_user(id: PathParam<UserId>) -> Result<User, ApiError> {
    todo!()
}

/// @router /user/add [POST]
/// @limit 0 0 user
pub async fn add_user(user: Body<User>) -> Result<(), ApiError> {
    todo!()
}

/// @router /user/export [GET]
pub async fn export(ctx: RequestContext) {}

pub struct UserApi;

impl UserApi {
    /// @router /user/search [post]
    pub async fn search(self, query: Body<Query>) -> Envelope {
        todo!()
    }
}
"#;

const ADMIN_API: &str = r#"
/// @router /admin/ping [ANY]
/// @limit 5
pub async fn ping() {}
"#;

// =============================================================================
// Pipeline Tests
// =============================================================================

#[test]
fn test_generate_route_table() {
    let dir = create_temp_project(&[
        ("Cargo.toml", CARGO_TOML),
        ("src/api/user.rs", USER_API),
        ("src/api/admin/mod.rs", ADMIN_API),
    ]);

    let (output, written) = generator_for(dir.path(), "src/api").run(false).unwrap();
    assert!(written.was_written());
    assert_eq!(output.route_count, 5);
    assert_eq!(output.limiter_count, 1);
    assert_eq!(output.module_count, 2);

    let content = fs::read_to_string(dir.path().join("src/load_router.rs")).unwrap();
    let expected = r#"//! Code generated by fast-wgen. DO NOT EDIT.
#![allow(non_snake_case)]

use axum::Router;
use axum::routing::{any, get, post};
use fast_web::{RateLimiter, method, plain, wrap};

use crate::api::admin as CrateApiAdmin;
use crate::api::user as CrateApiUser;

/// Register every annotated route on `router`.
pub fn load_routers<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let limit_user = RateLimiter::new(10, 20);

    let router = router.route("/admin/ping", any(wrap(CrateApiAdmin::ping)).route_layer(RateLimiter::new(5, 5).layer()));
    let router = router.route("/user/{id}", get(wrap(CrateApiUser::get_user)).route_layer(limit_user.layer()));
    let router = router.route("/user/add", post(wrap(CrateApiUser::add_user)).route_layer(limit_user.layer()));
    let router = router.route("/user/export", get(plain(CrateApiUser::export)));
    let router = router.route("/user/search", post(wrap(method(CrateApiUser::UserApi::search))));
    router
}
"#;
    assert_eq!(content, expected);
}

#[test]
fn test_generation_is_idempotent() {
    let dir = create_temp_project(&[("Cargo.toml", CARGO_TOML), ("src/api/user.rs", USER_API)]);
    let generator = generator_for(dir.path(), "src");

    generator.run(false).unwrap();
    let first = fs::read(dir.path().join("src/load_router.rs")).unwrap();
    generator.run(false).unwrap();
    let second = fs::read(dir.path().join("src/load_router.rs")).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_bare_mode() {
    let dir = create_temp_project(&[("Cargo.toml", CARGO_TOML), ("src/api/user.rs", USER_API)]);
    let mut config = generator_for(dir.path(), "src").config().clone();
    config.wrapper = "0".into();

    let output = RouteGenerator::new(config).generate().unwrap();
    assert!(output.content.contains("get(CrateApiUser::export)"));
    assert!(output.content.contains("post(CrateApiUser::UserApi::search)"));
    assert!(output.content.contains("use fast_web::RateLimiter;"));
    assert!(!output.content.contains("wrap("));
}

#[test]
fn test_colon_placeholder_becomes_axum_capture() {
    let dir = create_temp_project(&[
        ("Cargo.toml", CARGO_TOML),
        (
            "src/api/order.rs",
            r#"
use fast_web::{PathParam, path_key};

path_key!(pub OrderId = "oid");

/// @router /order/:oid/items/:item [GET]
pub async fn items(id: PathParam<OrderId>) -> Envelope {
    todo!()
}
"#,
        ),
    ]);

    let output = generator_for(dir.path(), "src/api").generate().unwrap();

    assert!(output.content.contains(
        "let router = router.route(\"/order/{oid}/items/{item}\", get(wrap(CrateApiOrder::items)));"
    ));
    assert!(!output.content.contains("/:"));
}

// =============================================================================
// Abort Tests
// =============================================================================

#[test]
fn test_malformed_router_leaves_no_output() {
    let dir = create_temp_project(&[
        ("Cargo.toml", CARGO_TOML),
        ("src/api/user.rs", USER_API),
        ("src/api/zbroken.rs", "/// @router foo\npub async fn broken() {}\n"),
    ]);

    let err = generator_for(dir.path(), "src").run(false).unwrap_err();

    assert!(matches!(err, CliError::Parse(ParseError::Annotation { .. })));
    assert!(err.to_string().contains("can not parse router comment"));
    assert!(!dir.path().join("src/load_router.rs").exists());
}

#[test]
fn test_error_keeps_previous_output() {
    let dir = create_temp_project(&[
        ("Cargo.toml", CARGO_TOML),
        ("src/load_router.rs", "// previous\n"),
        ("src/api.rs", "/// @router /a [CONNECT]\npub async fn a() {}\n"),
    ]);

    let err = generator_for(dir.path(), "src").run(false).unwrap_err();

    assert!(matches!(
        err,
        CliError::Generate(GenerateError::UnsupportedMethod { .. })
    ));
    assert_eq!(
        fs::read_to_string(dir.path().join("src/load_router.rs")).unwrap(),
        "// previous\n"
    );
}

#[test]
fn test_borrowed_receiver_aborts() {
    let dir = create_temp_project(&[(
        "src/api.rs",
        "pub struct Api;\nimpl Api {\n    /// @router /a [GET]\n    pub async fn a(&self) {}\n}\n",
    )]);

    let err = generator_for(dir.path(), "src").generate().unwrap_err();
    assert!(matches!(err, CliError::Parse(ParseError::Receiver { .. })));
}

#[test]
fn test_conflicting_path_keys_abort() {
    let dir = create_temp_project(&[
        ("Cargo.toml", CARGO_TOML),
        ("src/api/user.rs", "fast_web::path_key!(pub Id = \"id\");\n"),
        ("src/api/order.rs", "fast_web::path_key!(pub Id = \"oid\");\n"),
        (
            "src/api/admin.rs",
            "use super::user::Id;\n/// @router /admin/{id} [GET]\npub async fn get(id: PathParam<Id>) {}\n",
        ),
    ]);

    let err = generator_for(dir.path(), "src").run(false).unwrap_err();

    assert!(matches!(err, CliError::Parse(ParseError::PathKey { .. })));
    assert!(err.to_string().contains("id, oid"));
    assert!(!dir.path().join("src/load_router.rs").exists());
}

#[test]
fn test_missing_scan_directory() {
    let dir = TempDir::new().unwrap();
    let err = generator_for(dir.path(), "nope").generate().unwrap_err();
    assert!(matches!(err, CliError::Scan(_)));
}

// =============================================================================
// Scanning Rules
// =============================================================================

#[test]
fn test_skipped_files_contribute_nothing() {
    let annotated = "/// @router /hidden [GET]\npub async fn hidden() {}\n";
    let dir = create_temp_project(&[
        ("Cargo.toml", CARGO_TOML),
        ("src/api.rs", "/// @router /visible [GET]\npub async fn visible() {}\n"),
        ("src/api_test.rs", annotated),
        ("src/tests.rs", annotated),
        ("src/tests/more.rs", annotated),
        ("src/vendor/dep.rs", annotated),
        ("src/docs/example.rs", annotated),
        ("src/.cache/gen.rs", annotated),
        ("src/notes.txt", annotated),
    ]);

    let output = generator_for(dir.path(), "src").generate().unwrap();

    assert_eq!(output.route_count, 1);
    assert!(output.content.contains("/visible"));
    assert!(!output.content.contains("/hidden"));
}

#[test]
fn test_overlapping_dirs_register_routes_once() {
    let dir = create_temp_project(&[("Cargo.toml", CARGO_TOML), ("src/api/user.rs", USER_API)]);
    let config = GenConfig {
        dirs: vec![dir.path().join("src/api"), dir.path().join("src")],
        output: dir.path().join("src/load_router.rs"),
        ..Default::default()
    };

    let output = RouteGenerator::new(config).generate().unwrap();
    assert_eq!(output.route_count, 4);
}

// =============================================================================
// Check Mode
// =============================================================================

#[test]
fn test_check_detects_stale_output() {
    let dir = create_temp_project(&[("Cargo.toml", CARGO_TOML), ("src/api/user.rs", USER_API)]);
    let generator = generator_for(dir.path(), "src");

    assert!(matches!(generator.check(), Err(CliError::OutOfDate(_))));

    generator.run(false).unwrap();
    assert!(generator.check().is_ok());

    fs::write(
        dir.path().join("src/api/extra.rs"),
        "/// @router /extra [GET]\npub async fn extra() {}\n",
    )
    .unwrap();
    assert!(matches!(generator.check(), Err(CliError::OutOfDate(_))));
}

// =============================================================================
// Main Tags
// =============================================================================

#[test]
fn test_main_tags_override_flags() {
    let dir = create_temp_project(&[
        ("Cargo.toml", CARGO_TOML),
        (
            "src/main.rs",
            "/// Service.\n/// @genDir ./src/api\n/// @genOutput ./src/routes.rs\n/// @genWrapper 0\nfn main() {}\n",
        ),
        ("src/api/user.rs", USER_API),
    ]);

    let config = ConfigManager::apply_main_tags(GenConfig::default(), &read_main_tags(dir.path()))
        .rooted_at(dir.path());
    assert!(!config.wraps());

    let (_, written) = RouteGenerator::new(config).run(false).unwrap();
    assert!(written.path().ends_with("src/routes.rs"));
    assert!(dir.path().join("src/routes.rs").exists());
}
