//! Hack CPU simulator
//!
//! Loads Hack assembly text, resolves its symbols and executes it on a
//! 32K-word machine. Used to check the translator's output by running it.

pub mod constants;
pub mod loader;
pub mod vm;

pub use loader::{load_program, Op, Program};
pub use vm::{Cpu, CpuState};

use hvm_codegen::AsmParseError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    #[error("line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: AsmParseError,
    },

    #[error("duplicate label '{0}'")]
    DuplicateLabel(String),

    #[error("program of {0} instructions does not fit in ROM")]
    RomOverflow(usize),

    #[error("access to RAM[{address}] out of range at pc {pc}")]
    MemoryOutOfBounds { address: u16, pc: u16 },

    #[error("no halt within {0} steps")]
    StepLimit(u64),
}
