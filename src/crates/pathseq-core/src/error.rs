use crate::file_num::FileNumber;
use thiserror::Error;

/// A UVTILE render or read was attempted outside the UDIM tile space,
/// or a set of observed files does not fill every dimension.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IncompleteDimensionError {
    #[error("{value} is not a UDIM tile number (expected an integer >= 1001)")]
    NotATile { value: FileNumber },

    #[error("cannot read a file number from '{text}'")]
    Unreadable { text: String },

    #[error("found {found} files but the dimensions describe {expected}")]
    Incomplete { found: usize, expected: usize },
}

/// A progression that could never be enumerated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ProgressionError {
    #[error("step must be greater than zero")]
    ZeroStep,

    #[error("step must not be negative")]
    NegativeStep,

    #[error("progression bounds are too large to enumerate")]
    Overflow,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid file number '{text}'")]
pub struct ParseFileNumberError {
    pub text: String,
}

impl ParseFileNumberError {
    pub fn new(text: impl Into<String>) -> Self {
        ParseFileNumberError { text: text.into() }
    }
}
