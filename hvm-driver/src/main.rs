//! Hack VM Translator
//!
//! Translates a `.vm` file, or a directory of them, into one Hack assembly
//! program.

use anyhow::{Context, Result};
use clap::Parser;
use hvm_driver::{run, BootstrapMode, TranslatorConfig};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "hvmt", version, about = "Hack VM to Hack assembly translator")]
struct Cli {
    /// Input .vm file or directory of .vm files
    input: PathBuf,

    /// Output assembly file (defaults to <stem>.asm or <dir>/<dir>.asm)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// When to emit the bootstrap sequence
    #[arg(long, value_enum)]
    bootstrap: Option<BootstrapMode>,

    /// Function called by the bootstrap
    #[arg(long)]
    entry_point: Option<String>,

    /// Omit the VM command comments from the output
    #[arg(long)]
    no_comments: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    } else {
        env_logger::init();
    }

    let mut config = match &cli.config {
        Some(path) => TranslatorConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => TranslatorConfig::default(),
    };
    if let Some(mode) = cli.bootstrap {
        config.bootstrap = mode;
    }
    if let Some(entry_point) = cli.entry_point {
        config.codegen.entry_point = entry_point;
    }
    if cli.no_comments {
        config.codegen.emit_comments = false;
    }

    let output = run(&cli.input, cli.output.as_deref(), &config)?;
    if cli.verbose {
        println!("Assembly written to: {}", output.display());
    }
    Ok(())
}
