//! Error types for the tagger and the size parser

use std::num::ParseIntError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while tagging a listing
#[derive(Error, Debug)]
pub enum TagError {
    #[error("Input listing not found or unreadable: {}", path.display())]
    InputNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read input listing {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write tag file {}", path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Line {line}: malformed syscall number operand {operand:?}")]
    MalformedOperand {
        line: usize,
        operand: String,
        #[source]
        source: ParseIntError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for tagging operations
pub type Result<T> = std::result::Result<T, TagError>;

/// Errors that can occur while parsing a size string
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SizeError {
    #[error("Empty size string")]
    Empty,

    #[error("Invalid size {input:?}: {source}")]
    InvalidNumber {
        input: String,
        #[source]
        source: ParseIntError,
    },

    #[error("Size {input:?} does not fit in 64 bits")]
    Overflow { input: String },
}
