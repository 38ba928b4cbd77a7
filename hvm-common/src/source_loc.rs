//! Source location tracking for error reporting
//!
//! VM code is strictly line oriented, so a location is a compilation unit
//! (the `.vm` file stem) and a 1-based line number.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A line in a VM source unit (line is 1-based)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    pub unit: String,
    pub line: u32,
}

impl SourceLocation {
    /// Create a location inside the given unit
    pub fn new(unit: &str, line: u32) -> Self {
        Self {
            unit: unit.to_string(),
            line,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.vm:{}", self.unit, self.line)
    }
}
