//! Error handling for the Hack VM translator
//!
//! Every error is fatal: a translation run aborts on the first one and no
//! output for the failing run is written.

use crate::command::Segment;
use crate::source_loc::SourceLocation;
use thiserror::Error;

/// Main translator error type that encompasses all phases of translation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TranslateError {
    #[error("Parse error at {location}: {message}")]
    ParseError {
        location: SourceLocation,
        message: String,
    },

    #[error("Unknown command at {location}: '{command}'")]
    UnknownCommand {
        location: SourceLocation,
        command: String,
    },

    #[error("Segment bounds error at {location}: {segment} {index} exceeds the maximum index {max}")]
    SegmentBoundsError {
        location: SourceLocation,
        segment: Segment,
        index: u16,
        max: u16,
    },

    #[error("IO error: {message}")]
    IoError { message: String },
}

impl TranslateError {
    /// Create a parse error
    pub fn parse_error(message: impl Into<String>, location: SourceLocation) -> Self {
        TranslateError::ParseError {
            location,
            message: message.into(),
        }
    }

    /// Create an unknown command error
    pub fn unknown_command(command: &str, location: SourceLocation) -> Self {
        TranslateError::UnknownCommand {
            location,
            command: command.to_string(),
        }
    }

    /// Create a segment bounds error
    pub fn segment_bounds(segment: Segment, index: u16, max: u16, location: SourceLocation) -> Self {
        TranslateError::SegmentBoundsError {
            location,
            segment,
            index,
            max,
        }
    }

    /// Source location of the failing line, if the error has one
    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            TranslateError::ParseError { location, .. }
            | TranslateError::UnknownCommand { location, .. }
            | TranslateError::SegmentBoundsError { location, .. } => Some(location),
            TranslateError::IoError { .. } => None,
        }
    }
}

/// Convert from std::io::Error
impl From<std::io::Error> for TranslateError {
    fn from(err: std::io::Error) -> Self {
        TranslateError::IoError {
            message: err.to_string(),
        }
    }
}
