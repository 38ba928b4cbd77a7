//! Translator configuration, loadable from a JSON file

use hvm_codegen::CodegenOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Read(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// When to emit the bootstrap sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BootstrapMode {
    /// Only if some input unit declares the entry point function
    #[default]
    Auto,
    Always,
    Never,
}

/// Driver settings. Code generation options sit at the top level of the
/// JSON document next to `bootstrap`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatorConfig {
    pub bootstrap: BootstrapMode,
    #[serde(flatten)]
    pub codegen: CodegenOptions,
}

impl TranslatorConfig {
    /// Load a config file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}
