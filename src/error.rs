use pathseq_core::IncompleteDimensionError;
use pathseq_parser::{FormatError, SequenceError};
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Sequence(#[from] SequenceError),

    #[error("'{}' has no file name to parse", .0.display())]
    NoFileName(PathBuf),

    #[error("file name of '{}' is not valid UTF-8", .0.display())]
    NotUtf8(PathBuf),

    #[error("failed to scan '{}': {source}", .path.display())]
    Scan {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("sequence pattern did not compile: {0}")]
    Pattern(#[from] regex::Error),
}

impl From<IncompleteDimensionError> for Error {
    fn from(err: IncompleteDimensionError) -> Self {
        Error::Sequence(err.into())
    }
}

impl From<FormatError> for Error {
    fn from(err: FormatError) -> Self {
        Error::Sequence(err.into())
    }
}
