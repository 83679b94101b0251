//! `reqspec`: resolves `#[client]` traits across a source tree.
//!
//! Usage:
//!   reqspec [-c reqspec.toml] [-i <path>]... [-o <file>] [--no-strict] [--compact]
//!
//! Every trait in the scanned files is a potential supertrait, so inherited
//! metadata is merged across files. The result is written as JSON, one
//! entry per `#[client]` trait.

mod config;
mod emit;
mod scan;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};

use config::CodegenConfig;

/// Resolve declarative HTTP client traits into request specs.
#[derive(Parser, Debug)]
#[command(name = "reqspec", about = "Resolve #[client] traits into request specs")]
struct Cli {
    /// Path to the config file.
    #[arg(short = 'c', long = "config", default_value = CodegenConfig::DEFAULT_PATH)]
    config: PathBuf,

    /// Source file or directory to scan (repeatable, replaces configured inputs).
    #[arg(short = 'i', long = "input")]
    inputs: Vec<PathBuf>,

    /// Output file for the JSON report.
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Report failures without failing the process.
    #[arg(long = "no-strict")]
    no_strict: bool,

    /// Write compact JSON.
    #[arg(long = "compact")]
    compact: bool,
}

impl Cli {
    /// The config file, with flags layered on top.
    fn resolve_config(self) -> Result<CodegenConfig> {
        let mut config = CodegenConfig::load(&self.config)?;
        if !self.inputs.is_empty() {
            config.inputs = self.inputs;
        }
        if let Some(output) = self.output {
            config.output = output;
        }
        if self.no_strict {
            config.strict = false;
        }
        if self.compact {
            config.pretty = false;
        }
        Ok(config)
    }
}

/// Counts from one run.
#[derive(Debug, Default, PartialEq, Eq)]
struct Summary {
    clients: usize,
    specs: usize,
    failed: usize,
}

fn main() -> Result<()> {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = Cli::parse().resolve_config()?;
    run(&config)?;
    Ok(())
}

fn run(config: &CodegenConfig) -> Result<Summary> {
    let files = scan::rust_files(&config.inputs)?;
    info!("Scanning {} source file(s)", files.len());
    let decls = scan::load_decls(&files)?;

    let reports = reqspec_resolve::resolve_all(&decls);
    let mut summary = Summary::default();
    for report in &reports {
        summary.clients += 1;
        summary.specs += report.specs.len();
        summary.failed += report.failures.len() + report.type_errors.len();
        for failure in &report.failures {
            error!(root = %report.root, "{failure}");
        }
        for type_error in &report.type_errors {
            error!(root = %report.root, "{type_error}");
        }
        for dup in report.duplicate_signatures() {
            warn!(root = %report.root, signature = %dup, "reachable through several supertrait paths");
        }
    }

    let json = emit::render(&reports, config.pretty).context("serializing request specs")?;
    if let Some(parent) = config.output.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    std::fs::write(&config.output, json)
        .with_context(|| format!("writing {}", config.output.display()))?;
    info!(
        "Wrote {} spec(s) for {} client(s) to {}",
        summary.specs,
        summary.clients,
        config.output.display()
    );

    if config.strict && summary.failed > 0 {
        anyhow::bail!(
            "{} resolution failure(s); see {}",
            summary.failed,
            config.output.display()
        );
    }
    Ok(summary)
}
