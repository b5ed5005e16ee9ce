//! File sequences on the filesystem
//!
//! `pathseq` wraps the sequence parser in path types: a directory plus a
//! parsed file name such as `render.1-100####.exr`. A sequence expands into
//! the paths of its files, can be rebuilt from the files that exist on
//! disk, and compares structurally rather than by its literal text.
//!
//! # Examples
//!
//! ```
//! use pathseq::PathSequence;
//! use std::path::PathBuf;
//!
//! let seq = PathSequence::new("shots/render.1-3####.exr").unwrap();
//! let paths: Vec<PathBuf> = seq.paths().unwrap().collect();
//! assert_eq!(paths[0], PathBuf::from("shots/render.0001.exr"));
//!
//! // Same files, same order: equal
//! assert_eq!(seq, PathSequence::new("shots/render.1,2,3####.exr").unwrap());
//! ```
//!
//! # Main Components
//!
//! - [`PathSequence`] / [`LoosePathSequence`]: directory plus parsed name
//! - [`find_on_disk`]: rebuild ranges from the files present in a directory
//! - [`ParseCache`]: caller-owned cache of parse results
//! - [`pathseq_parser`] and [`pathseq_core`]: the parser and the arithmetic

pub mod cache;
pub mod error;
pub mod path_sequence;
pub mod scan;

pub use cache::ParseCache;
pub use error::{Error, Result};
pub use path_sequence::{
    Grammar, LooseGrammar, LoosePathSequence, PathSequence, Paths, SequencePath, StrictGrammar,
};
pub use scan::find_on_disk;

pub use pathseq_core::{FileNumber, IncompleteDimensionError, PadSpec, Progression};
pub use pathseq_parser::{
    expand, format, parse, parse_loose, parse_strict, FileNumberFormatter, Formatter, GlobFormatter,
    IdentityFormatter, Mode, ParseError, ParsedSequence, Ranges, RegexFormatter, SequenceError, Shape,
};

pub use pathseq_core;
pub use pathseq_parser;
