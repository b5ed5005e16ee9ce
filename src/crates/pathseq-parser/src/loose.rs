//! The loose grammar.
//!
//! Text may sit on both sides of the ranges, so a name can often be read
//! more than one way. The shape is picked from where the ranges sit:
//!
//! - nothing before them and a stem after: [`RangesStartName`]
//! - nothing after them: [`RangesEndName`]
//! - anything else: [`RangesInName`]
//!
//! When a name could take more than one shape the order of preference is
//! `RangesInName`, then `RangesStartName`, then `RangesEndName`. Only the
//! content of a ranges-block can make a loose parse fail.

use crate::ast::{split_suffixes, ParsedSequence, Ranges, RangesEndName, RangesInName, RangesStartName};
use crate::error::Result;
use crate::lexer::NameLayout;
use crate::range_parser::parse_block;
use crate::strict::split_prefix;
use tracing::debug;

/// Parse `name` with the loose grammar
pub fn parse_loose(name: &str) -> Result<ParsedSequence> {
    let layout = NameLayout::scan(name)?;

    let first = parse_block(name, layout.blocks[0])?;
    let mut rest = Vec::with_capacity(layout.separators.len());
    for (separator, block) in layout.separators.iter().zip(&layout.blocks[1..]) {
        rest.push((layout.slice(*separator).to_string(), parse_block(name, *block)?));
    }
    let ranges = Ranges::new(first, rest);

    let head = layout.head_text();
    let tail = layout.tail_text();

    let parsed = if head.is_empty() {
        match start_name(tail) {
            Some((postfix, stem, suffixes)) => ParsedSequence::RangesStartName(RangesStartName {
                ranges,
                postfix: postfix.to_string(),
                stem: stem.to_string(),
                suffixes,
            }),
            None => in_name(head, ranges, tail),
        }
    } else if tail.is_empty() {
        end_name(head, ranges)
    } else {
        in_name(head, ranges, tail)
    };

    debug!(name, shape = %parsed.shape(), "parsed loose sequence");
    Ok(parsed)
}

/// `postfix`, `stem` and suffixes from the text after leading ranges, if it
/// holds a stem
fn start_name(tail: &str) -> Option<(&str, &str, Vec<String>)> {
    if tail.is_empty() || (tail.starts_with('.') && !tail.ends_with('.')) {
        return None;
    }
    let (postfix, rest) = match tail.strip_prefix('_') {
        Some(rest) => ("_", rest),
        None => ("", tail),
    };
    let split = if rest.ends_with('.') {
        rest.len()
    } else if rest.starts_with('.') {
        0
    } else {
        rest.find('.').unwrap_or(rest.len())
    };
    let (stem, suffixes) = rest.split_at(split);
    if stem.is_empty() {
        return None;
    }
    Some((postfix, stem, split_suffixes(suffixes)))
}

fn in_name(head: &str, ranges: Ranges, tail: &str) -> ParsedSequence {
    let (stem, prefix) = split_prefix(head);
    let split = if tail.ends_with('.') {
        tail.len()
    } else if tail.starts_with('.') {
        0
    } else {
        tail.find('.').unwrap_or(tail.len())
    };
    let (postfix, suffixes) = tail.split_at(split);
    ParsedSequence::RangesInName(RangesInName {
        stem: stem.to_string(),
        prefix: prefix.to_string(),
        ranges,
        postfix: postfix.to_string(),
        suffixes: split_suffixes(suffixes),
    })
}

fn end_name(head: &str, ranges: Ranges) -> ParsedSequence {
    let (body, prefix) = if head.ends_with(['.', '_']) {
        head.split_at(head.len() - 1)
    } else {
        (head, "")
    };
    let search_from = usize::from(body.starts_with('.'));
    let split = body[search_from..]
        .find('.')
        .map_or(body.len(), |i| i + search_from);
    let (stem, suffixes) = body.split_at(split);
    ParsedSequence::RangesEndName(RangesEndName {
        stem: stem.to_string(),
        suffixes: split_suffixes(suffixes),
        prefix: prefix.to_string(),
        ranges,
    })
}
