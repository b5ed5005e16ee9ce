use crate::span::Span;
use pathseq_core::IncompleteDimensionError;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SequenceError>;

/// The grammar rule a name violated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    Stem,
    StemBoundary,
    Suffixes,
    SuffixStart,
    EmptySuffix,
    NumericSuffix,
    TrailingDot,
    InterRange,
    InterRangeBoundary,
    RangeSyntax,
    ZeroStep,
    NumberOutOfRange,
    UvTile,
}

impl Rule {
    pub fn description(&self) -> &'static str {
        match self {
            Rule::Stem => "expected a stem before the ranges",
            Rule::StemBoundary => "the stem must not end in a digit or '-'",
            Rule::Suffixes => "expected file suffixes after the ranges",
            Rule::SuffixStart => "expected a '.' to begin the file suffixes",
            Rule::EmptySuffix => "file suffixes cannot be empty",
            Rule::NumericSuffix => "a file suffix cannot start with digits",
            Rule::TrailingDot => "a name cannot end with a '.'",
            Rule::InterRange => "an inter-range separator must be non-empty and not '.'",
            Rule::InterRangeBoundary => {
                "an inter-range separator must not start with digits or end in a digit or '-'"
            }
            Rule::RangeSyntax => "malformed range specifier",
            Rule::ZeroStep => "a range step must be greater than zero",
            Rule::NumberOutOfRange => "file number is too large",
            Rule::UvTile => "<UVTILE> ranges must stay within integer UDIM tiles (>= 1001)",
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// A name that breaks a rule of the selected grammar
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParseError {
    pub input: String,
    pub span: Span,
    pub rule: Rule,
}

impl ParseError {
    pub fn new(input: impl Into<String>, span: Span, rule: Rule) -> Self {
        ParseError {
            input: input.into(),
            span,
            rule,
        }
    }

    /// The substring that broke the rule
    pub fn offending(&self) -> &str {
        self.input.get(self.span.to_range()).unwrap_or("")
    }

    pub fn span(&self) -> Span {
        self.span
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.span.is_empty() {
            write!(f, "{} at {} in '{}'", self.rule, self.span.start, self.input)
        } else {
            write!(
                f,
                "{}: '{}' at {} in '{}'",
                self.rule,
                self.offending(),
                self.span,
                self.input
            )
        }
    }
}

impl std::error::Error for ParseError {}

/// A well-formed name that contains no ranges at all
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{input}' is not a file sequence: no ranges found")]
pub struct NotASequenceError {
    pub input: String,
}

impl NotASequenceError {
    pub fn new(input: impl Into<String>) -> Self {
        NotASequenceError { input: input.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("expected {expected} file numbers to format the sequence, got {given}")]
    WrongNumberCount { expected: usize, given: usize },

    #[error(transparent)]
    IncompleteDimension(#[from] IncompleteDimensionError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SequenceError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    NotASequence(#[from] NotASequenceError),

    #[error(transparent)]
    IncompleteDimension(#[from] IncompleteDimensionError),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("invalid suffix '{0}': suffixes start with '.'")]
    InvalidSuffix(String),

    #[error("a strict sequence must keep at least one suffix")]
    SuffixRequired,

    #[error("expected {expected} dimensions, got {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("the ranges describe more files than can be counted")]
    TooManyFiles,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offending_substring() {
        let err = ParseError::new("file-1.1-5#.ext", Span::new(4, 11), Rule::StemBoundary);
        assert_eq!(err.offending(), "-1.1-5#");
        assert!(err.to_string().contains("'-1.1-5#'"));
    }

    #[test]
    fn test_empty_span_display() {
        let err = ParseError::new("file.#", Span::at(6), Rule::Suffixes);
        assert_eq!(err.offending(), "");
        assert_eq!(
            err.to_string(),
            "expected file suffixes after the ranges at 6 in 'file.#'"
        );
    }

    #[test]
    fn test_umbrella_conversion() {
        fn not_a_sequence() -> std::result::Result<(), NotASequenceError> {
            Err(NotASequenceError::new("file.exr"))
        }
        fn fails() -> Result<()> {
            not_a_sequence()?;
            Ok(())
        }
        assert!(matches!(fails(), Err(SequenceError::NotASequence(_))));
    }
}
