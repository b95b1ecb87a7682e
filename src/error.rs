use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures of the piece hashing pipeline. All of them are fatal to the run.
#[derive(Debug, Error)]
pub enum HashError {
    #[error("Cannot open source {path:?}: {source}")]
    IoUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Read failed after {offset} bytes: {source}")]
    IoRead {
        offset: u64,
        #[source]
        source: io::Error,
    },

    #[error("Hasher failure: {0}")]
    HasherInit(String),

    #[error("Invalid piece size {0}, must be positive")]
    InvalidPieceSize(u64),

    #[error("Chunk source reads {actual}-byte pieces, pipeline expects {expected}")]
    PieceSizeMismatch { expected: usize, actual: usize },

    #[error("Length {0} does not fit a bencode integer")]
    LengthOverflow(u64),

    #[error("Config error: {0}")]
    Config(String),
}
