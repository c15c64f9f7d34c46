use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use scout_discovery::{ProjectConfig, ProjectScanner, ValidationStatus, Validator};
use scout_schema::SchemaRegistry;
use std::path::PathBuf;

mod output;

#[derive(Parser)]
#[command(name = "feature-scout")]
#[command(about = "Schema discovery for feature artifact files", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for output)
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a project tree and report discovered features
    Scan {
        /// Project root (defaults to the current directory)
        root: Option<PathBuf>,

        /// Emit the full scan result as JSON
        #[arg(long)]
        json: bool,

        /// Override the configured maximum traversal depth
        #[arg(long)]
        max_depth: Option<usize>,

        /// Additional ignore globs on top of the configured set
        #[arg(long)]
        ignore: Vec<String>,
    },

    /// Scan and validate against the feature specification
    Validate {
        /// Project root (defaults to the current directory)
        root: Option<PathBuf>,

        /// Emit the validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the registered schemas
    Schemas {
        /// Emit the schema catalog as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match run(cli) {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(err) => {
            eprintln!("error: {err:#}");
            std::process::exit(2);
        }
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let level = if quiet {
        "warn"
    } else if verbose {
        "debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Scan {
            root,
            json,
            max_depth,
            ignore,
        } => {
            let root = resolve_root(root)?;
            let mut config = ProjectConfig::load(&root)?;
            if let Some(depth) = max_depth {
                config.max_depth = depth;
            }
            config.ignore.extend(ignore);

            let scanner = ProjectScanner::new(SchemaRegistry::with_builtins(), config)?;
            let result = scanner.scan(&root).context("scan failed")?;

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                output::render_scan(&result);
            }
            Ok(0)
        }

        Commands::Validate { root, json } => {
            let root = resolve_root(root)?;
            let config = ProjectConfig::load(&root)?;
            let registry = SchemaRegistry::with_builtins();
            let spec = config.feature_spec();

            let scanner = ProjectScanner::new(registry.clone(), config)?;
            let result = scanner.scan(&root).context("scan failed")?;
            let report = Validator::new(registry).validate(&result, &spec);

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                output::render_validation(&report);
            }
            Ok(if report.status == ValidationStatus::Error {
                1
            } else {
                0
            })
        }

        Commands::Schemas { json } => {
            let registry = SchemaRegistry::with_builtins();
            if json {
                println!("{}", serde_json::to_string_pretty(&registry.all())?);
            } else {
                output::render_schemas(&registry);
            }
            Ok(0)
        }
    }
}

fn resolve_root(root: Option<PathBuf>) -> Result<PathBuf> {
    let root = root.unwrap_or_else(|| PathBuf::from("."));
    let root = root
        .canonicalize()
        .with_context(|| format!("cannot resolve project root {}", root.display()))?;
    log::debug!("project root: {}", root.display());
    Ok(root)
}
