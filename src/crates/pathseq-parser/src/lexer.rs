use crate::error::NotASequenceError;
use crate::span::Span;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use tracing::trace;

/// Permissive shape of one range; the range parser enforces the exact grammar.
const RANGE: &str = r"-?[0-9]+(?:\.[0-9]+)?(?:--?[0-9]+(?:\.[0-9]+)?(?:x[0-9]+(?:\.[0-9]+)?)?)?";

static RANGES_BLOCK: Lazy<Regex> = Lazy::new(|| {
    let pattern = format!(
        r"(?P<spec>{range}(?:,{range})*)?(?P<pad>#+|<UDIM>|<UVTILE>)",
        range = RANGE
    );
    Regex::new(&pattern).expect("ranges-block pattern is valid")
});

/// Tokens of a sequence name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    /// Literal text between ranges-blocks
    Text,
    /// A range specifier run, always followed by a [`Token::Pad`]
    RangeSpec,
    /// `#+`, `<UDIM>` or `<UVTILE>`
    Pad,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Text => write!(f, "text"),
            Token::RangeSpec => write!(f, "range specifier"),
            Token::Pad => write!(f, "pad"),
        }
    }
}

/// Split a name into text, range specifier and pad tokens.
///
/// Ranges-blocks are located leftmost-first. A range specifier only exists
/// in front of a pad; digits anywhere else are text.
pub fn tokenize(source: &str) -> Vec<(Token, Span)> {
    let mut tokens = Vec::new();
    let mut position = 0;
    for caps in RANGES_BLOCK.captures_iter(source) {
        let (pad, spec) = match (caps.name("pad"), caps.name("spec")) {
            (Some(pad), spec) => (pad, spec),
            (None, _) => continue,
        };
        let block_start = spec.map_or(pad.start(), |spec| spec.start());
        if block_start > position {
            tokens.push((Token::Text, Span::new(position, block_start)));
        }
        if let Some(spec) = spec {
            tokens.push((Token::RangeSpec, Span::from(spec.range())));
        }
        tokens.push((Token::Pad, Span::from(pad.range())));
        position = pad.end();
    }
    if position < source.len() {
        tokens.push((Token::Text, Span::new(position, source.len())));
    }
    trace!(source, count = tokens.len(), "tokenized name");
    tokens
}

/// Token stream with one token of lookahead
pub(crate) struct Lexer {
    tokens: std::vec::IntoIter<(Token, Span)>,
    peeked: Option<Option<(Token, Span)>>,
}

impl Lexer {
    pub(crate) fn new(source: &str) -> Self {
        Lexer {
            tokens: tokenize(source).into_iter(),
            peeked: None,
        }
    }

    pub(crate) fn next_token(&mut self) -> Option<(Token, Span)> {
        if let Some(peeked) = self.peeked.take() {
            return peeked;
        }
        self.tokens.next()
    }

    pub(crate) fn peek_token(&mut self) -> Option<(Token, Span)> {
        if self.peeked.is_none() {
            self.peeked = Some(self.tokens.next());
        }
        self.peeked.flatten()
    }
}

/// One ranges-block: an optional specifier and its pad
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockSpans {
    /// Empty (at the pad's start) when the block is a bare pad
    pub spec: Span,
    pub pad: Span,
}

impl BlockSpans {
    pub fn span(&self) -> Span {
        self.spec.merge(self.pad)
    }
}

/// A name cut at its ranges-blocks.
///
/// `separators` has one entry between each pair of consecutive blocks;
/// adjacent blocks get an empty separator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameLayout<'source> {
    pub source: &'source str,
    pub head: Span,
    pub blocks: Vec<BlockSpans>,
    pub separators: Vec<Span>,
    pub tail: Span,
}

impl<'source> NameLayout<'source> {
    /// Group the token stream into head text, blocks, separators and tail text
    pub fn scan(source: &'source str) -> Result<Self, NotASequenceError> {
        let mut lexer = Lexer::new(source);
        let mut head = Span::at(0);
        let mut blocks = Vec::new();
        let mut separators = Vec::new();
        let mut pending_text: Option<Span> = None;

        while let Some((token, span)) = lexer.next_token() {
            match token {
                Token::Text => pending_text = Some(span),
                Token::RangeSpec | Token::Pad => {
                    let spec = if token == Token::RangeSpec { span } else { Span::at(span.start) };
                    let pad = if token == Token::RangeSpec {
                        match lexer.peek_token() {
                            Some((Token::Pad, pad)) => {
                                lexer.next_token();
                                pad
                            }
                            _ => return Err(NotASequenceError::new(source)),
                        }
                    } else {
                        span
                    };
                    let text = pending_text.take().unwrap_or_else(|| Span::at(spec.start));
                    if blocks.is_empty() {
                        head = text;
                    } else {
                        separators.push(text);
                    }
                    blocks.push(BlockSpans { spec, pad });
                }
            }
        }

        if blocks.is_empty() {
            return Err(NotASequenceError::new(source));
        }
        let tail = pending_text.unwrap_or_else(|| Span::at(source.len()));
        Ok(NameLayout {
            source,
            head,
            blocks,
            separators,
            tail,
        })
    }

    pub fn slice(&self, span: Span) -> &'source str {
        &self.source[span.to_range()]
    }

    pub fn head_text(&self) -> &'source str {
        self.slice(self.head)
    }

    pub fn tail_text(&self) -> &'source str {
        self.slice(self.tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(source: &str) -> Vec<(Token, &str)> {
        tokenize(source)
            .into_iter()
            .map(|(token, span)| (token, &source[span.to_range()]))
            .collect()
    }

    #[test]
    fn test_simple_sequence() {
        assert_eq!(
            lex("file.1-10#.exr"),
            vec![
                (Token::Text, "file."),
                (Token::RangeSpec, "1-10"),
                (Token::Pad, "#"),
                (Token::Text, ".exr"),
            ]
        );
    }

    #[test]
    fn test_bare_pad() {
        assert_eq!(
            lex("file.####.exr"),
            vec![(Token::Text, "file."), (Token::Pad, "####"), (Token::Text, ".exr")]
        );
    }

    #[test]
    fn test_tokens_pads() {
        assert_eq!(
            lex("tex.1001-1005<UDIM>_<UVTILE>.tx"),
            vec![
                (Token::Text, "tex."),
                (Token::RangeSpec, "1001-1005"),
                (Token::Pad, "<UDIM>"),
                (Token::Text, "_"),
                (Token::Pad, "<UVTILE>"),
                (Token::Text, ".tx"),
            ]
        );
    }

    #[test]
    fn test_digits_without_pad_are_text() {
        assert_eq!(lex("file.1.exr"), vec![(Token::Text, "file.1.exr")]);
        assert_eq!(lex("frame@@@.exr"), vec![(Token::Text, "frame@@@.exr")]);
    }

    #[test]
    fn test_leftmost_block_takes_the_dash() {
        assert_eq!(
            lex("file-1.1-5#.ext"),
            vec![
                (Token::Text, "file"),
                (Token::RangeSpec, "-1.1-5"),
                (Token::Pad, "#"),
                (Token::Text, ".ext"),
            ]
        );
    }

    #[test]
    fn test_layout() {
        let layout = NameLayout::scan("a.1-2#_3-4##.exr").unwrap();
        assert_eq!(layout.head_text(), "a.");
        assert_eq!(layout.blocks.len(), 2);
        assert_eq!(layout.slice(layout.blocks[1].spec), "3-4");
        assert_eq!(layout.slice(layout.blocks[1].pad), "##");
        assert_eq!(layout.slice(layout.separators[0]), "_");
        assert_eq!(layout.tail_text(), ".exr");
    }

    #[test]
    fn test_layout_adjacent_blocks() {
        let layout = NameLayout::scan("1#2#").unwrap();
        assert_eq!(layout.head_text(), "");
        assert_eq!(layout.separators, vec![Span::at(2)]);
        assert_eq!(layout.tail_text(), "");
    }

    #[test]
    fn test_not_a_sequence() {
        for name in ["", "file", "file.exr", ".file", "file.1.exr"] {
            assert!(NameLayout::scan(name).is_err(), "{name} should not be a sequence");
        }
    }

    #[test]
    fn test_peek() {
        let mut lexer = Lexer::new("a#b");
        assert_eq!(lexer.peek_token(), Some((Token::Text, Span::new(0, 1))));
        assert_eq!(lexer.next_token(), Some((Token::Text, Span::new(0, 1))));
        assert_eq!(lexer.next_token(), Some((Token::Pad, Span::new(1, 2))));
        assert_eq!(lexer.peek_token(), Some((Token::Text, Span::new(2, 3))));
        assert_eq!(lexer.next_token(), Some((Token::Text, Span::new(2, 3))));
        assert_eq!(lexer.next_token(), None);
    }
}
