use std::io;
use thiserror::Error;

/// Main error type for building and reading Huffman artifacts.
#[derive(Error, Debug)]
pub enum ArtifactError {
    /// Invalid caller-supplied parameters (symbol width, dictionary, options).
    #[error("Configuration error: {0}")]
    Config(String),
    /// An internal layout guarantee did not hold.
    #[error("Format invariant violation: {0}")]
    InvariantViolation(String),
    /// The sink or source failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// A malformed artifact was encountered while decoding.
    #[error("Format error: {0}")]
    Format(String),
    /// A chunk of the input has no code in the dictionary.
    #[error("No code for symbol {symbol} at offset {offset}")]
    UnknownSymbol { offset: usize, symbol: String },
}

impl ArtifactError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        ArtifactError::Config(msg.into())
    }

    pub(crate) fn invariant(msg: impl Into<String>) -> Self {
        ArtifactError::InvariantViolation(msg.into())
    }

    pub(crate) fn format(msg: impl Into<String>) -> Self {
        ArtifactError::Format(msg.into())
    }

    /// Maps an early EOF while reading `section` to a format error; other
    /// I/O failures stay I/O errors.
    pub(crate) fn truncated(section: &'static str) -> impl FnOnce(io::Error) -> Self {
        move |err| {
            if err.kind() == io::ErrorKind::UnexpectedEof {
                ArtifactError::Format(format!("truncated {}", section))
            } else {
                ArtifactError::Io(err)
            }
        }
    }
}

/// A specialized `Result` type for artifact operations.
pub type Result<T> = std::result::Result<T, ArtifactError>;
