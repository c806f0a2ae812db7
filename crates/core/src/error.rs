//! Error types for the BPE library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for BPE operations.
#[derive(Error, Debug)]
pub enum BpeError {
    /// I/O error with file context
    #[error("unable to open file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A model-file line violates the format grammar or the acyclicity invariant
    #[error("malformed bpe file at line {line}: {reason}")]
    MalformedModel { line: usize, reason: String },

    /// Load was invoked on a non-empty model without the overwrite flag
    #[error(
        "refusing to load into a non-empty model without overwrite; \
         save the current symbols first or pass overwrite = true"
    )]
    OverwriteRefused,

    /// A byte never seen during training was encountered while encoding
    #[error("byte {0} has no symbol in the trained vocabulary")]
    UnknownByte(u8),

    /// A symbol id outside the table was encountered while decoding
    #[error("unknown symbol id: {0}")]
    UnknownSymbolId(u32),

    /// Internal contract violation; denotes programmer error
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Assertion-grade index inconsistency; fatal
    #[error("invariant broken: {0}")]
    InvariantBroken(String),
}

/// Result type alias for BPE operations.
pub type Result<T> = std::result::Result<T, BpeError>;
