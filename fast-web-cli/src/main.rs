//! # fast-wgen
//!
//! Generates a static axum route table from `@router` doc annotations.
//!
//! ## Usage
//!
//! ```bash
//! # Scan ./ and write ./load_router.rs
//! fast-wgen
//!
//! # Scan two directories, write into src/
//! fast-wgen -d ./src/api,./src/admin -s ./src/load_router.rs
//!
//! # Register handlers as plain axum handlers
//! fast-wgen -w 0
//!
//! # Fail when the checked-in table is stale
//! fast-wgen --check
//!
//! # Regenerate on every change
//! fast-wgen --watch
//! ```
//!
//! `@genDir`, `@genOutput` and `@genWrapper` in the doc comment of `fn main`
//! override the matching flags.

use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use fast_web_cli::{
    RouteGenerator,
    config::{CONFIG_FILENAME, CliArgs, ConfigManager, GenConfig, read_main_tags},
    error::CliError,
    watcher::FileWatcher,
    writer::WriteResult,
};

#[derive(Parser)]
#[command(name = "fast-wgen")]
#[command(author, version, about = "Generate axum route wiring from @router annotations", long_about = None)]
struct Cli {
    /// Comma-separated directories to scan
    #[arg(short, long)]
    dir: Option<String>,

    /// Generated route file
    #[arg(short = 's', long)]
    output: Option<PathBuf>,

    /// "1" wraps handlers with fast_web::wrap, anything else registers them as-is
    #[arg(short, long)]
    wrapper: Option<String>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Exit with an error if the route file is out of date
    #[arg(long, conflicts_with_all = ["dry_run", "watch"])]
    check: bool,

    /// Print the route table instead of writing it
    #[arg(long)]
    dry_run: bool,

    /// Watch for file changes and regenerate
    #[arg(long)]
    watch: bool,

    /// Write a default fast-wgen.toml and exit
    #[arg(long)]
    init: bool,

    /// Log pipeline details
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    if cli.init {
        return cmd_init(cli.config.unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME)));
    }

    let config = ConfigManager::load(cli.config.as_deref())?;
    let config = ConfigManager::merge_cli_args(
        config,
        &CliArgs {
            dir: cli.dir,
            output: cli.output,
            wrapper: cli.wrapper,
        },
    );
    let base = std::env::current_dir()?;
    let config = ConfigManager::apply_main_tags(config, &read_main_tags(&base));
    print_settings(&config);

    let generator = RouteGenerator::new(config);
    if cli.check {
        cmd_check(&generator)
    } else if cli.watch {
        run_watch_mode(&generator, cli.dry_run)
    } else {
        run_generate(&generator, cli.dry_run)
    }
}

fn print_settings(config: &GenConfig) {
    let dirs: Vec<String> = config.dirs.iter().map(|d| d.display().to_string()).collect();
    println!("{} {}", "Scan:".cyan(), dirs.join(", "));
    println!("{} {}", "Output:".cyan(), config.output.display());
    println!(
        "{} {}",
        "Wrap:".cyan(),
        if config.wraps() { "yes" } else { "no" }
    );
}

/// Generate once and report.
fn run_generate(generator: &RouteGenerator, dry_run: bool) -> Result<(), CliError> {
    let (output, written) = generator.run(dry_run)?;

    match written {
        WriteResult::Written { path, bytes } => {
            println!(
                "{} {} route(s), {} limiter(s) from {} module(s); {} bytes to {}",
                "✓".green(),
                output.route_count.to_string().green(),
                output.limiter_count,
                output.module_count,
                bytes,
                path.display()
            );
        }
        WriteResult::DryRun { content, path } => {
            println!(
                "{} Would write to {}:",
                "[dry-run]".yellow(),
                path.display()
            );
            println!("{}", "─".repeat(60).dimmed());
            print!("{content}");
            println!("{}", "─".repeat(60).dimmed());
        }
    }

    Ok(())
}

/// Check command implementation.
fn cmd_check(generator: &RouteGenerator) -> Result<(), CliError> {
    let output = generator.check()?;
    println!(
        "{} {} is up to date ({} route(s))",
        "✓".green(),
        generator.config().output.display(),
        output.route_count
    );
    Ok(())
}

/// Run in watch mode.
fn run_watch_mode(generator: &RouteGenerator, dry_run: bool) -> Result<(), CliError> {
    println!("{}", "Starting watch mode...".cyan());
    println!("  Press Ctrl+C to stop\n");

    if let Err(e) = run_generate(generator, dry_run) {
        println!("{} {}", "Generation error:".red(), e);
    }

    let config = generator.config();
    let watcher = FileWatcher::new(config.dirs.iter().cloned()).ignoring(&config.output);
    let (_debouncer, rx) = watcher.watch()?;

    println!("\n{}", "Watching for changes...".cyan());

    while let Ok(event) = rx.recv() {
        if let Some(message) = event.error_message() {
            println!("{} {}", "Watch error:".red(), message);
            continue;
        }

        if let Some(path) = event.path() {
            println!("\n{} {}", "File changed:".cyan(), path.display());
        }

        if let Err(e) = run_generate(generator, dry_run) {
            println!("{} {}", "Generation error:".red(), e);
        }

        println!("\n{}", "Watching for changes...".cyan());
    }

    Ok(())
}

/// Init command implementation.
fn cmd_init(output: PathBuf) -> Result<(), CliError> {
    if output.exists() {
        println!(
            "{} Configuration file already exists: {}",
            "Skipped:".yellow(),
            output.display()
        );
        return Ok(());
    }

    std::fs::write(&output, ConfigManager::default_config_content())?;

    println!(
        "{} Created configuration file: {}",
        "✓".green(),
        output.display()
    );

    Ok(())
}
