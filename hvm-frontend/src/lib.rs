//! Hack VM Translator - Frontend
//!
//! This crate scans `.vm` source units line by line and produces typed
//! `Instruction`s tagged with their source location.

pub mod parser;

pub use parser::{CommandType, Parser};

use hvm_common::{SourceCommand, TranslateError};

/// High-level frontend interface
pub struct Frontend;

impl Frontend {
    /// Parse a whole VM unit into located instructions
    pub fn parse_source(source: &str, unit: &str) -> Result<Vec<SourceCommand>, TranslateError> {
        let mut parser = Parser::new(source, unit);
        parser.parse_all()
    }
}
