use crate::span::Span;
use logos::Logos;

/// Tokens of a range specifier such as `1-10x2,20`
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeToken {
    /// Unsigned number with no redundant zeros: `0`, `12`, `1.5`, `1.0`
    #[regex(r"(0|[1-9][0-9]*)(\.0|\.[0-9]*[1-9])?")]
    Number,

    #[token("-")]
    Dash,

    #[token(",")]
    Comma,

    #[token("x")]
    Step,

    Error,
}

impl std::fmt::Display for RangeToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RangeToken::Number => write!(f, "number"),
            RangeToken::Dash => write!(f, "-"),
            RangeToken::Comma => write!(f, ","),
            RangeToken::Step => write!(f, "x"),
            RangeToken::Error => write!(f, "error"),
        }
    }
}

/// Lexer over one range specifier, reporting spans relative to the whole name
pub struct RangeLexer<'source> {
    inner: logos::Lexer<'source, RangeToken>,
    offset: usize,
    peeked: Option<Option<(RangeToken, Span)>>,
}

impl<'source> RangeLexer<'source> {
    /// `offset` is where `source` starts within the name being parsed
    pub fn new(source: &'source str, offset: usize) -> Self {
        RangeLexer {
            inner: RangeToken::lexer(source),
            offset,
            peeked: None,
        }
    }

    pub fn next_token(&mut self) -> Option<(RangeToken, Span)> {
        if let Some(peeked) = self.peeked.take() {
            return peeked;
        }
        let token = self.inner.next()?;
        let span = Span::from(self.inner.span()).offset(self.offset);
        Some((token.unwrap_or(RangeToken::Error), span))
    }

    pub fn peek_token(&mut self) -> Option<(RangeToken, Span)> {
        if self.peeked.is_none() {
            self.peeked = Some(self.next_token());
        }
        self.peeked.flatten()
    }

    /// Text of a token, given its span within the whole name
    pub fn slice(&self, span: Span) -> &'source str {
        let local = Span::new(span.start - self.offset, span.end - self.offset);
        &self.inner.source()[local.to_range()]
    }
}
