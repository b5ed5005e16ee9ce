//! Numeric building blocks for file sequences
//!
//! This crate holds the arithmetic half of `pathseq`: exact file numbers,
//! the progressions written in range specifiers, ordered sequences of
//! progressions, and the pad rules that render a number into a file name.
//! It knows nothing about name strings.
//!
//! # Examples
//!
//! ```
//! use pathseq_core::{FileNumber, PadSpec, Progression};
//!
//! let start: FileNumber = "1".parse().unwrap();
//! let end: FileNumber = "2".parse().unwrap();
//! let step: FileNumber = "0.5".parse().unwrap();
//! let frames = Progression::stepped(start, end, step).unwrap();
//!
//! let names: Vec<String> = frames
//!     .iter()
//!     .map(|n| PadSpec::FixedWidth(4).render(n).unwrap())
//!     .collect();
//! assert_eq!(names, vec!["0001", "0001.5", "0002"]);
//! ```
//!
//! # Main Components
//!
//! - **FileNumber**: integer or fixed-precision decimal, never floating point
//! - **Progression**: `start-endxstep`, with `end` as a ceiling
//! - **FileNumSeq**: comma-separated progressions as one ordered sequence
//! - **PadSpec**: `#` padding, `<UDIM>` and `<UVTILE>`

pub mod error;
pub mod file_num;
pub mod file_num_seq;
pub mod pad;
pub mod progression;

pub use error::{IncompleteDimensionError, ParseFileNumberError, ProgressionError};
pub use file_num::FileNumber;
pub use file_num_seq::{compress, fewest_progressions, FileNumSeq, FileNumSeqIter};
pub use pad::{read_uv_tile, uv_tile, zero_pad, PadSpec, UDIM_START};
pub use progression::{Progression, ProgressionIter};
