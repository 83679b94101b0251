//! Codegen configuration.
//!
//! Reads `reqspec.toml`; every key is optional.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodegenConfig {
    /// Source roots to scan: `.rs` files, or directories searched recursively.
    pub inputs: Vec<PathBuf>,

    /// Where the JSON report is written.
    pub output: PathBuf,

    /// Fail when any method or type fails to resolve.
    pub strict: bool,

    /// Pretty-print the JSON report.
    pub pretty: bool,
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            inputs: vec![PathBuf::from("src")],
            output: PathBuf::from("reqspec.json"),
            strict: true,
            pretty: true,
        }
    }
}

impl CodegenConfig {
    pub const DEFAULT_PATH: &'static str = "reqspec.toml";

    /// Load config from disk, or return default if file doesn't exist.
    ///
    /// Relative paths in the file are taken relative to the file's directory.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: CodegenConfig =
            toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(config.rebase(base))
    }

    fn rebase(mut self, base: &Path) -> Self {
        for input in self.inputs.iter_mut() {
            *input = base.join(&*input);
        }
        self.output = base.join(&self.output);
        self
    }
}
