//! Hack VM Translator - Code Generation
//!
//! This crate turns parsed VM commands into Hack assembly. It includes:
//!
//! - The Hack assembly instruction model and its text form
//! - Segment address resolution
//! - Stack arithmetic, including overflow-safe comparisons
//! - The call/function/return protocol and program bootstrap

pub mod asm;
pub mod layout;
pub mod segment;
pub mod naming;
mod helpers;
mod arithmetic;
mod memory;
mod control;
pub mod generator;
pub mod unit;
pub mod emit;

pub use asm::{AsmInst, AsmParseError, Comp, Dest, Jump};
pub use generator::{CodeGenerator, CodegenError};
pub use naming::GeneratorState;
pub use unit::translate_unit;
pub use emit::emit_program;

use serde::{Deserialize, Serialize};

/// Options for code generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodegenOptions {
    /// Write each VM command as a comment ahead of its translation
    pub emit_comments: bool,
    /// Function the bootstrap calls
    pub entry_point: String,
}

impl Default for CodegenOptions {
    fn default() -> Self {
        Self {
            emit_comments: true,
            entry_point: layout::DEFAULT_ENTRY_POINT.to_string(),
        }
    }
}
