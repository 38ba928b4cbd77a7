//! Hack VM Translator - Common Types and Errors
//! 
//! This crate contains the VM instruction model, error definitions and
//! source locations shared by the parser, the code generator and the driver.

pub mod command;
pub mod error;
pub mod source_loc;

pub use command::{ArithmeticOp, Instruction, Segment, SourceCommand};
pub use error::TranslateError;
pub use source_loc::SourceLocation;
