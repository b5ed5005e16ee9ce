//! Parser, expander and formatters for file sequence strings
//!
//! A file sequence string such as `render.1-100#.exr` names a family of
//! numbered files. This crate turns such a name into a [`ParsedSequence`]
//! (stem, prefix, ranges, postfix and suffixes), expands it into the
//! concrete file names, and renders it back into text through a
//! [`Formatter`].
//!
//! # Examples
//!
//! ```
//! use pathseq_parser::{parse_loose, parse_strict, Shape};
//!
//! let parsed = parse_strict("render.1-3####_1001-1002<UDIM>.exr").unwrap();
//! let names: Vec<String> = parsed.expand().unwrap().iter().collect();
//! assert_eq!(names[0], "render.0001_1001.exr");
//! assert_eq!(names.len(), 6);
//!
//! // Loose names may put the ranges anywhere
//! let loose = parse_loose("1-5#_images.exr").unwrap();
//! assert_eq!(loose.shape(), Shape::RangesStartName);
//! assert_eq!(loose.stem(), "images");
//! ```
//!
//! # Sequence Syntax
//!
//! - Ranges-block: a range specifier followed by a pad, `1-10x2,20####`
//! - Pads: `#` per digit, `<UDIM>`, `<UVTILE>`
//! - Strict names: `stem[.|_]block(separator block)*.suffixes`
//! - Loose names: ranges at the start, middle or end of the name
//!
//! # Main Functions
//!
//! - [`parse_strict`]: the unambiguous grammar
//! - [`parse_loose`]: the positional grammar
//! - [`expand`]: every file name, restartable
//! - [`format()`]: render with any [`Formatter`]

pub mod ast;
pub mod error;
pub mod expand;
pub mod formatter;
pub mod lexer;
pub mod loose;
pub mod parser;
pub mod range_lexer;
pub mod range_parser;
pub mod span;
pub mod strict;


pub use ast::{
    split_suffixes, ParsedSequence, RangeDimension, Ranges, RangesEndName, RangesInName, RangesStartName,
    Shape, Strict,
};
pub use error::{FormatError, NotASequenceError, ParseError, Result, Rule, SequenceError};
pub use expand::{expand, Coordinates, Expansion, ExpansionIter};
pub use formatter::{
    format, walk, FileNumberFormatter, Formatter, GlobFormatter, IdentityFormatter, RegexFormatter,
};
pub use lexer::{tokenize, Token};
pub use parser::{parse, parse_loose, parse_strict, Mode};
pub use range_parser::parse_specifier;
pub use span::Span;
