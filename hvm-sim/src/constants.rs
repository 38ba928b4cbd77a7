//! Memory map and limits of the simulated Hack machine
//!
//! The RAM layout shared with the code generator (virtual registers, static
//! and stack bases) is re-exported from `hvm_codegen::layout`.

pub use hvm_codegen::layout::{
    ARG_ADDRESS, LCL_ADDRESS, SP_ADDRESS, STACK_BASE, STATIC_BASE, THAT_ADDRESS, THIS_ADDRESS,
    VIRTUAL_REGISTERS,
};

pub const RAM_SIZE: usize = 32768;
pub const ROM_SIZE: usize = 32768;

// Memory-mapped I/O
pub const SCREEN: u16 = 16384;
pub const KBD: u16 = 24576;

pub const DEFAULT_STEP_LIMIT: u64 = 1_000_000;
