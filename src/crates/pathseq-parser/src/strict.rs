//! The strict grammar.
//!
//! ```text
//! name := stem ["." | "_"] block (inter-range block)* suffixes
//! ```
//!
//! Every name has exactly one reading. Anything that could be read two
//! ways is rejected with the rule it broke.

use crate::ast::{split_suffixes, ParsedSequence, Ranges, Strict};
use crate::error::{ParseError, Result, Rule};
use crate::lexer::NameLayout;
use crate::range_parser::parse_block;
use crate::span::Span;
use tracing::debug;

/// Parse `name` with the strict grammar
pub fn parse_strict(name: &str) -> Result<ParsedSequence> {
    let layout = NameLayout::scan(name)?;
    let error = |span: Span, rule: Rule| ParseError::new(name, span, rule);

    if name.ends_with('.') {
        return Err(error(Span::new(name.len() - 1, name.len()), Rule::TrailingDot).into());
    }
    if layout.head.is_empty() {
        return Err(error(layout.blocks[0].span(), Rule::Stem).into());
    }
    if layout.tail.is_empty() {
        return Err(error(layout.tail, Rule::Suffixes).into());
    }

    let (stem, prefix) = split_prefix(layout.head_text());
    let stem_span = Span::new(layout.head.start, layout.head.start + stem.len());
    if stem.is_empty() {
        return Err(error(layout.head, Rule::Stem).into());
    }
    if stem.ends_with(|c: char| c.is_ascii_digit() || c == '-') {
        return Err(error(stem_span.last_byte(), Rule::StemBoundary).into());
    }

    let first = layout.blocks[0];
    if prefix.is_empty() && layout.slice(first.spec).starts_with('-') {
        return Err(error(first.span(), Rule::StemBoundary).into());
    }
    let first_dimension = parse_block(name, first)?;
    let mut rest = Vec::with_capacity(layout.separators.len());
    for (separator, block) in layout.separators.iter().zip(&layout.blocks[1..]) {
        let text = layout.slice(*separator);
        check_separator(name, *separator, text)?;
        if !text.ends_with(['.', '_']) && layout.slice(block.spec).starts_with('-') {
            return Err(error(block.span(), Rule::InterRangeBoundary).into());
        }
        rest.push((text.to_string(), parse_block(name, *block)?));
    }
    let ranges = Ranges::new(first_dimension, rest);

    let suffixes = parse_suffixes(name, layout.tail)?;
    debug!(name, stem, dimensions = ranges.dimension_count(), "parsed strict sequence");

    Ok(ParsedSequence::Strict(Strict {
        stem: stem.to_string(),
        prefix: prefix.to_string(),
        ranges,
        suffixes,
    }))
}

/// Split a trailing `.` or `_` off the text before the ranges.
///
/// A lone `.` is a hidden-file stem and is left whole.
pub(crate) fn split_prefix(head: &str) -> (&str, &str) {
    if head != "." && head.ends_with(['.', '_']) {
        head.split_at(head.len() - 1)
    } else {
        (head, "")
    }
}

fn check_separator(name: &str, span: Span, text: &str) -> std::result::Result<(), ParseError> {
    if text.is_empty() || text == "." {
        return Err(ParseError::new(name, span, Rule::InterRange));
    }
    let after_dot = text.strip_prefix('.').unwrap_or(text);
    if text.starts_with(|c: char| c.is_ascii_digit())
        || (text.starts_with('.') && after_dot.starts_with(|c: char| c.is_ascii_digit()))
        || text.ends_with(|c: char| c.is_ascii_digit() || c == '-')
    {
        return Err(ParseError::new(name, span, Rule::InterRangeBoundary));
    }
    Ok(())
}

fn parse_suffixes(name: &str, tail: Span) -> std::result::Result<Vec<String>, ParseError> {
    let text = &name[tail.to_range()];
    if !text.starts_with('.') {
        return Err(ParseError::new(name, Span::new(tail.start, tail.start + 1), Rule::SuffixStart));
    }
    let suffixes = split_suffixes(text);
    let mut offset = tail.start;
    for suffix in &suffixes {
        let span = Span::new(offset, offset + suffix.len());
        if suffix == "." {
            return Err(ParseError::new(name, span, Rule::EmptySuffix));
        }
        if suffix[1..].starts_with(|c: char| c.is_ascii_digit()) {
            return Err(ParseError::new(name, span, Rule::NumericSuffix));
        }
        offset = span.end;
    }
    Ok(suffixes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SequenceError;

    fn rule_of(name: &str) -> Rule {
        match parse_strict(name) {
            Err(SequenceError::Parse(err)) => err.rule,
            other => panic!("Expected a parse error for '{}', got {:?}", name, other),
        }
    }

    #[test]
    fn test_simple() {
        let parsed = parse_strict("file.1-10#.exr").unwrap();
        assert_eq!(parsed.stem(), "file");
        assert_eq!(parsed.prefix(), ".");
        assert_eq!(parsed.ranges().to_string(), "1-10#");
        assert_eq!(parsed.suffixes(), &[".exr".to_string()]);
    }

    #[test]
    fn test_split_prefix() {
        assert_eq!(split_prefix("file."), ("file", "."));
        assert_eq!(split_prefix("file_"), ("file", "_"));
        assert_eq!(split_prefix("file"), ("file", ""));
        assert_eq!(split_prefix("."), (".", ""));
    }

    #[test]
    fn test_stem_rules() {
        assert_eq!(rule_of("#.exr"), Rule::Stem);
        assert_eq!(rule_of("1-10#_file.exr"), Rule::Stem);
        assert_eq!(rule_of("_1-10#.exr"), Rule::Stem);
        assert_eq!(rule_of("file-1.1-5#.ext"), Rule::StemBoundary);
        assert_eq!(rule_of("file-#.exr"), Rule::StemBoundary);
    }

    #[test]
    fn test_suffix_rules() {
        assert_eq!(rule_of("file.#"), Rule::Suffixes);
        assert_eq!(rule_of("file_#"), Rule::Suffixes);
        assert_eq!(rule_of("file.exr.1-10#"), Rule::Suffixes);
        assert_eq!(rule_of("file.#."), Rule::TrailingDot);
        assert_eq!(rule_of("file.#.exr."), Rule::TrailingDot);
        assert_eq!(rule_of("file.#_"), Rule::SuffixStart);
        assert_eq!(rule_of("file.#..exr"), Rule::EmptySuffix);
        assert_eq!(rule_of("file.1#.5.exr"), Rule::NumericSuffix);
    }

    #[test]
    fn test_inter_range_rules() {
        assert_eq!(rule_of("file.1#2#.exr"), Rule::InterRange);
        assert_eq!(rule_of("file.1#.2#.exr"), Rule::InterRange);
        assert_eq!(rule_of("file.1#2x_3#.exr"), Rule::InterRangeBoundary);
        assert_eq!(rule_of("file.1#_v-1-3#.exr"), Rule::InterRangeBoundary);
    }
}
