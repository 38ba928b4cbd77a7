//! Hack VM Translator - Driver
//!
//! Collects `.vm` inputs, runs one translation over all of them and writes
//! the resulting `.asm` file.

pub mod config;

pub use config::{BootstrapMode, ConfigError, TranslatorConfig};
pub use hvm_codegen::CodegenOptions;

use hvm_codegen::{emit_program, translate_unit, CodeGenerator};
use hvm_common::{Instruction, SourceCommand, TranslateError};
use hvm_frontend::Frontend;
use log::info;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// One input file: its unit name (the file stem) and contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    pub name: String,
    pub text: String,
}

impl SourceUnit {
    pub fn new(name: &str, text: &str) -> Self {
        Self {
            name: name.to_string(),
            text: text.to_string(),
        }
    }

    pub fn read(path: &Path) -> Result<Self, TranslateError> {
        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_else(|| TranslateError::IoError {
                message: format!("invalid input file name: {}", path.display()),
            })?;
        let text = fs::read_to_string(path)?;
        Ok(Self::new(name, &text))
    }
}

fn is_vm_file(path: &Path) -> bool {
    path.is_file() && path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("vm"))
}

/// A single `.vm` file, or every `.vm` file of a directory sorted by name
pub fn collect_inputs(path: &Path) -> Result<Vec<PathBuf>, TranslateError> {
    if path.is_dir() {
        let mut inputs = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry_path = entry?.path();
            if is_vm_file(&entry_path) {
                inputs.push(entry_path);
            }
        }
        if inputs.is_empty() {
            return Err(TranslateError::IoError {
                message: format!("no .vm files in {}", path.display()),
            });
        }
        inputs.sort();
        Ok(inputs)
    } else if is_vm_file(path) {
        Ok(vec![path.to_path_buf()])
    } else {
        Err(TranslateError::IoError {
            message: format!("not a .vm file or directory: {}", path.display()),
        })
    }
}

/// `<dir>/<dirname>.asm` for a directory, `<stem>.asm` beside a file
pub fn output_path_for(input: &Path) -> PathBuf {
    if input.is_dir() {
        let name = input
            .file_name()
            .map(|n| n.to_os_string())
            .or_else(|| input.canonicalize().ok()?.file_name().map(|n| n.to_os_string()))
            .unwrap_or_else(|| "out".into());
        let mut file_name = name;
        file_name.push(".asm");
        input.join(file_name)
    } else {
        input.with_extension("asm")
    }
}

fn declares_function(commands: &[SourceCommand], name: &str) -> bool {
    commands
        .iter()
        .any(|c| matches!(&c.instruction, Instruction::Function(f, _) if f == name))
}

/// Translate all units as one program. Every unit is parsed before any
/// code is generated; nothing is returned unless the whole run succeeds.
pub fn translate_sources(units: &[SourceUnit], config: &TranslatorConfig) -> Result<String, TranslateError> {
    let mut parsed = Vec::with_capacity(units.len());
    for unit in units {
        let commands = Frontend::parse_source(&unit.text, &unit.name)?;
        parsed.push((unit.name.as_str(), commands));
    }

    let bootstrap = match config.bootstrap {
        BootstrapMode::Always => true,
        BootstrapMode::Never => false,
        BootstrapMode::Auto => parsed
            .iter()
            .any(|(_, commands)| declares_function(commands, &config.codegen.entry_point)),
    };

    let mut generator = CodeGenerator::new(config.codegen.clone());
    let mut program = Vec::new();
    if bootstrap {
        generator.write_bootstrap(&mut program);
    }
    for (name, commands) in &parsed {
        program.extend(translate_unit(&mut generator, name, commands)?);
    }

    Ok(emit_program(&program))
}

/// Replace `path` with `text` atomically
pub fn write_output(path: &Path, text: &str) -> Result<(), TranslateError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(text.as_bytes())?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Translate `input` (file or directory) and write the result. Returns the
/// path written.
pub fn run(input: &Path, output: Option<&Path>, config: &TranslatorConfig) -> Result<PathBuf, TranslateError> {
    let mut units = Vec::new();
    for path in collect_inputs(input)? {
        info!("Reading {}", path.display());
        units.push(SourceUnit::read(&path)?);
    }

    let text = translate_sources(&units, config)?;

    let output = output.map(Path::to_path_buf).unwrap_or_else(|| output_path_for(input));
    write_output(&output, &text)?;
    info!("Wrote {}", output.display());
    Ok(output)
}
