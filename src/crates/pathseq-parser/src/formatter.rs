//! Rendering a parsed sequence back into text.
//!
//! A [`Formatter`] has one method per component of a name. [`walk`] visits
//! the components in the order the shape writes them and concatenates the
//! results, so overriding a single method changes only that component's
//! text. Overriding [`Formatter::format`] replaces the traversal itself.
//!
//! ```
//! use pathseq_parser::{format, parse_strict, Formatter, FormatError, RangeDimension};
//!
//! struct Houdini;
//!
//! impl Formatter for Houdini {
//!     fn range(&mut self, _index: usize, _dimension: &RangeDimension) -> Result<String, FormatError> {
//!         Ok("$F".to_string())
//!     }
//! }
//!
//! let parsed = parse_strict("image.1-5#.exr").unwrap();
//! assert_eq!(format(&parsed, &mut Houdini).unwrap(), "image.$F.exr");
//! ```

use crate::ast::{ParsedSequence, RangeDimension, Ranges};
use crate::error::{FormatError, Result};
use pathseq_core::{FileNumber, PadSpec};
use std::fmt;

pub trait Formatter {
    fn stem(&mut self, stem: &str) -> std::result::Result<String, FormatError> {
        Ok(stem.to_string())
    }

    fn prefix(&mut self, prefix: &str) -> std::result::Result<String, FormatError> {
        Ok(prefix.to_string())
    }

    /// Render the `index`-th dimension, counting from the left
    fn range(&mut self, _index: usize, dimension: &RangeDimension) -> std::result::Result<String, FormatError> {
        Ok(dimension.to_string())
    }

    /// Render the separator that precedes dimension `index + 1`
    fn inter_range(&mut self, _index: usize, separator: &str) -> std::result::Result<String, FormatError> {
        Ok(separator.to_string())
    }

    /// Splice every dimension with the separators between them
    fn ranges(&mut self, ranges: &Ranges) -> std::result::Result<String, FormatError> {
        let mut out = String::new();
        for (i, dimension) in ranges.dimensions().iter().enumerate() {
            if i > 0 {
                let separator = ranges.separators().get(i - 1).map_or("", String::as_str);
                out.push_str(&self.inter_range(i - 1, separator)?);
            }
            out.push_str(&self.range(i, dimension)?);
        }
        Ok(out)
    }

    fn postfix(&mut self, postfix: &str) -> std::result::Result<String, FormatError> {
        Ok(postfix.to_string())
    }

    fn suffix(&mut self, suffix: &str) -> std::result::Result<String, FormatError> {
        Ok(suffix.to_string())
    }

    fn suffixes(&mut self, suffixes: &[String]) -> std::result::Result<String, FormatError> {
        let mut out = String::new();
        for suffix in suffixes {
            out.push_str(&self.suffix(suffix)?);
        }
        Ok(out)
    }

    fn format(&mut self, parsed: &ParsedSequence) -> std::result::Result<String, FormatError> {
        walk(self, parsed)
    }
}

/// Visit each component of `parsed` in written order
pub fn walk<F: Formatter + ?Sized>(
    formatter: &mut F,
    parsed: &ParsedSequence,
) -> std::result::Result<String, FormatError> {
    let parts = match parsed {
        ParsedSequence::Strict(p) => [
            formatter.stem(&p.stem)?,
            formatter.prefix(&p.prefix)?,
            formatter.ranges(&p.ranges)?,
            formatter.suffixes(&p.suffixes)?,
            String::new(),
        ],
        ParsedSequence::RangesStartName(p) => [
            formatter.ranges(&p.ranges)?,
            formatter.postfix(&p.postfix)?,
            formatter.stem(&p.stem)?,
            formatter.suffixes(&p.suffixes)?,
            String::new(),
        ],
        ParsedSequence::RangesInName(p) => [
            formatter.stem(&p.stem)?,
            formatter.prefix(&p.prefix)?,
            formatter.ranges(&p.ranges)?,
            formatter.postfix(&p.postfix)?,
            formatter.suffixes(&p.suffixes)?,
        ],
        ParsedSequence::RangesEndName(p) => [
            formatter.stem(&p.stem)?,
            formatter.suffixes(&p.suffixes)?,
            formatter.prefix(&p.prefix)?,
            formatter.ranges(&p.ranges)?,
            String::new(),
        ],
    };
    Ok(parts.concat())
}

/// Render `parsed` with `formatter`
pub fn format<F: Formatter + ?Sized>(
    parsed: &ParsedSequence,
    formatter: &mut F,
) -> std::result::Result<String, FormatError> {
    formatter.format(parsed)
}

/// Writes every component as it was parsed
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityFormatter;

impl Formatter for IdentityFormatter {}

/// Glob pattern matching every file of the sequence.
///
/// Each dimension becomes `*`; a dimension directly after an empty
/// separator folds into the previous `*`.
#[derive(Debug, Default, Clone, Copy)]
pub struct GlobFormatter;

impl Formatter for GlobFormatter {
    fn ranges(&mut self, ranges: &Ranges) -> std::result::Result<String, FormatError> {
        let mut out = String::from("*");
        for separator in ranges.separators() {
            out.push_str(separator);
            if !separator.is_empty() {
                out.push('*');
            }
        }
        Ok(out)
    }
}

/// Regular expression matching every file of the sequence.
///
/// Literal text is escaped. Dimension `i` is captured by the group
/// `range{i}`. The pattern is unanchored.
#[derive(Debug, Default, Clone, Copy)]
pub struct RegexFormatter;

impl RegexFormatter {
    /// Name of the capture group holding dimension `index`
    pub fn group_name(index: usize) -> String {
        format!("range{}", index)
    }

    fn dimension_pattern(dimension: &RangeDimension) -> String {
        let width = match dimension.pad() {
            PadSpec::UvTile => return "u[0-9]+_v[0-9]+".to_string(),
            PadSpec::Udim => 4,
            PadSpec::FixedWidth(width) => width,
        };
        let positive = format!("([1-9][0-9]*)?{}", "[0-9]".repeat(width));
        // The sign takes one column of the width, but at least one digit follows it
        let negative = format!("-([1-9][0-9]*)?{}", "[0-9]".repeat(width.saturating_sub(1).max(1)));
        let fraction = if dimension.has_subframes() { r"(\.[0-9]+)?" } else { "" };
        format!("({}|{}){}", positive, negative, fraction)
    }
}

impl Formatter for RegexFormatter {
    fn stem(&mut self, stem: &str) -> std::result::Result<String, FormatError> {
        Ok(regex::escape(stem))
    }

    fn prefix(&mut self, prefix: &str) -> std::result::Result<String, FormatError> {
        Ok(regex::escape(prefix))
    }

    fn range(&mut self, index: usize, dimension: &RangeDimension) -> std::result::Result<String, FormatError> {
        Ok(format!(
            "(?P<{}>{})",
            RegexFormatter::group_name(index),
            RegexFormatter::dimension_pattern(dimension)
        ))
    }

    fn inter_range(&mut self, _index: usize, separator: &str) -> std::result::Result<String, FormatError> {
        Ok(regex::escape(separator))
    }

    fn postfix(&mut self, postfix: &str) -> std::result::Result<String, FormatError> {
        Ok(regex::escape(postfix))
    }

    fn suffix(&mut self, suffix: &str) -> std::result::Result<String, FormatError> {
        Ok(regex::escape(suffix))
    }
}

/// Renders each dimension with one given file number: the name of a single file
#[derive(Debug, Clone, Copy)]
pub struct FileNumberFormatter<'a> {
    numbers: &'a [FileNumber],
}

impl<'a> FileNumberFormatter<'a> {
    pub fn new(numbers: &'a [FileNumber]) -> Self {
        FileNumberFormatter { numbers }
    }
}

impl Formatter for FileNumberFormatter<'_> {
    fn range(&mut self, index: usize, dimension: &RangeDimension) -> std::result::Result<String, FormatError> {
        let number = self.numbers.get(index).ok_or(FormatError::WrongNumberCount {
            expected: index + 1,
            given: self.numbers.len(),
        })?;
        Ok(dimension.pad().render(*number)?)
    }

    fn format(&mut self, parsed: &ParsedSequence) -> std::result::Result<String, FormatError> {
        let expected = parsed.ranges().dimension_count();
        if self.numbers.len() != expected {
            return Err(FormatError::WrongNumberCount {
                expected,
                given: self.numbers.len(),
            });
        }
        walk(self, parsed)
    }
}

impl ParsedSequence {
    /// Name of the single file at `numbers`, one number per dimension
    pub fn format_numbers(&self, numbers: &[FileNumber]) -> Result<String> {
        Ok(format(self, &mut FileNumberFormatter::new(numbers))?)
    }

    /// Glob pattern matching the files of this sequence
    pub fn as_glob(&self) -> Result<String> {
        Ok(format(self, &mut GlobFormatter)?)
    }

    /// Unanchored regex matching the files of this sequence
    pub fn as_regex(&self) -> Result<String> {
        Ok(format(self, &mut RegexFormatter)?)
    }
}

impl fmt::Display for ParsedSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = format(self, &mut IdentityFormatter).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SequenceError;
    use crate::{parse_loose, parse_strict};
    use regex::Regex;

    fn nums(values: &[i64]) -> Vec<FileNumber> {
        values.iter().copied().map(FileNumber::from_int).collect()
    }

    #[test]
    fn test_identity() {
        for name in ["file.1-10x2,20####.exr", "a_1#_v2-3<UDIM>.tar.gz"] {
            let parsed = parse_strict(name).unwrap();
            assert_eq!(format(&parsed, &mut IdentityFormatter).unwrap(), name);
            assert_eq!(parsed.to_string(), name);
        }
        for name in ["1-5#_images.exr", "images.exr.1-5#", "file.1#_beauty.exr"] {
            assert_eq!(parse_loose(name).unwrap().to_string(), name);
        }
    }

    #[test]
    fn test_override_one_component() {
        struct Upper;
        impl Formatter for Upper {
            fn stem(&mut self, stem: &str) -> std::result::Result<String, FormatError> {
                Ok(stem.to_uppercase())
            }
        }
        let parsed = parse_strict("file.1-3#.exr").unwrap();
        assert_eq!(format(&parsed, &mut Upper).unwrap(), "FILE.1-3#.exr");
    }

    #[test]
    fn test_override_traversal() {
        struct StrictShaped;
        impl Formatter for StrictShaped {
            fn format(&mut self, parsed: &ParsedSequence) -> std::result::Result<String, FormatError> {
                Ok(format!(
                    "{}{}{}{}",
                    self.stem(parsed.stem())?,
                    ".",
                    self.ranges(parsed.ranges())?,
                    self.suffixes(parsed.suffixes())?
                ))
            }
        }
        let parsed = parse_loose("1-5#_images.exr").unwrap();
        assert_eq!(format(&parsed, &mut StrictShaped).unwrap(), "images.1-5#.exr");
    }

    #[test]
    fn test_glob() {
        let parsed = parse_strict("file.1-3#_1001-1002<UDIM>.exr").unwrap();
        assert_eq!(parsed.as_glob().unwrap(), "file.*_*.exr");

        let parsed = parse_loose("file.1-3#1-2#.exr").unwrap();
        assert_eq!(parsed.as_glob().unwrap(), "file.*.exr");
    }

    #[test]
    fn test_regex_matches_rendered_names() {
        let parsed = parse_strict("tex.1-3#_1001-1012<UVTILE>.v1.tx").unwrap();
        let pattern = Regex::new(&format!("^(?:{})$", parsed.as_regex().unwrap())).unwrap();

        let caps = pattern.captures("tex.2_u3_v2.v1.tx").unwrap();
        assert_eq!(&caps["range0"], "2");
        assert_eq!(&caps["range1"], "u3_v2");
        assert!(!pattern.is_match("texX2_u3_v2.v1.tx"));
    }

    #[test]
    fn test_regex_widths() {
        let parsed = parse_strict("a.1-3####.exr").unwrap();
        let pattern = Regex::new(&format!("^(?:{})$", parsed.as_regex().unwrap())).unwrap();
        assert!(pattern.is_match("a.0001.exr"));
        assert!(pattern.is_match("a.-001.exr"));
        assert!(pattern.is_match("a.12345.exr"));
        assert!(!pattern.is_match("a.01.exr"));
        assert!(!pattern.is_match("a.0001.5.exr"));

        let parsed = parse_strict("a.1-2x0.5####.exr").unwrap();
        let pattern = Regex::new(&format!("^(?:{})$", parsed.as_regex().unwrap())).unwrap();
        assert!(pattern.is_match("a.0001.5.exr"));
    }

    #[test]
    fn test_regex_sign_needs_digits() {
        let parsed = parse_strict("a.-2-2x0.5#.exr").unwrap();
        let pattern = Regex::new(&format!("^(?:{})$", parsed.as_regex().unwrap())).unwrap();
        for name in parsed.expand().unwrap().iter() {
            assert!(pattern.is_match(&name), "{} should match", name);
        }
        assert!(pattern.is_match("a.-12.exr"));
        assert!(!pattern.is_match("a.-.exr"));
        assert!(!pattern.is_match("a.-.5.exr"));
        assert!(!pattern.is_match("a.-05.exr"));
    }

    #[test]
    fn test_file_numbers() {
        let parsed = parse_strict("tex.1-3##_1001-1012<UVTILE>.tx").unwrap();
        assert_eq!(parsed.format_numbers(&nums(&[1, 1012])).unwrap(), "tex.01_u2_v2.tx");

        let err = parsed.format_numbers(&nums(&[1])).unwrap_err();
        assert_eq!(
            err,
            SequenceError::Format(FormatError::WrongNumberCount { expected: 2, given: 1 })
        );
        assert!(parsed.format_numbers(&nums(&[1, 5])).is_err());
    }
}
