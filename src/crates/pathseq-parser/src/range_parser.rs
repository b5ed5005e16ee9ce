use crate::ast::RangeDimension;
use crate::error::{ParseError, Rule};
use crate::lexer::BlockSpans;
use crate::range_lexer::{RangeLexer, RangeToken};
use crate::span::Span;
use pathseq_core::{FileNumber, PadSpec, Progression, ProgressionError};

/// Recursive descent parser for range specifiers:
///
/// ```text
/// ranges   := range ("," range)*
/// range    := FILE_NUM ("-" FILE_NUM ("x" NUM)?)?
/// FILE_NUM := "-"? NUM
/// ```
pub struct RangeParser<'source> {
    name: &'source str,
    lexer: RangeLexer<'source>,
    end: usize,
}

impl<'source> RangeParser<'source> {
    /// Parse the specifier at `span` within `name`
    pub fn new(name: &'source str, span: Span) -> Self {
        RangeParser {
            name,
            lexer: RangeLexer::new(&name[span.to_range()], span.start),
            end: span.end,
        }
    }

    /// Parse every comma-separated progression, keeping source order
    pub fn parse_ranges(&mut self) -> Result<Vec<Progression>, ParseError> {
        let mut progressions = Vec::new();
        if self.peek().is_none() {
            return Ok(progressions);
        }
        loop {
            progressions.push(self.parse_range()?);
            match self.next() {
                None => return Ok(progressions),
                Some((RangeToken::Comma, _)) => continue,
                Some((_, span)) => return Err(self.error(span, Rule::RangeSyntax)),
            }
        }
    }

    fn parse_range(&mut self) -> Result<Progression, ParseError> {
        let (start, start_span) = self.parse_file_num()?;
        if !matches!(self.peek(), Some((RangeToken::Dash, _))) {
            return Ok(Progression::single(start));
        }
        self.next();
        let (end, end_span) = self.parse_file_num()?;

        let mut span = start_span.merge(end_span);
        let step = if let Some((RangeToken::Step, _)) = self.peek() {
            self.next();
            let (step, step_span) = self.parse_number()?;
            span = span.merge(step_span);
            Some(step)
        } else {
            None
        };

        Progression::new(start, Some(end), step).map_err(|err| {
            let rule = match err {
                ProgressionError::ZeroStep | ProgressionError::NegativeStep => Rule::ZeroStep,
                ProgressionError::Overflow => Rule::NumberOutOfRange,
            };
            self.error(span, rule)
        })
    }

    fn parse_file_num(&mut self) -> Result<(FileNumber, Span), ParseError> {
        match self.peek() {
            Some((RangeToken::Dash, dash)) => {
                self.next();
                let (value, span) = self.parse_number()?;
                Ok((-value, dash.merge(span)))
            }
            _ => self.parse_number(),
        }
    }

    fn parse_number(&mut self) -> Result<(FileNumber, Span), ParseError> {
        match self.next() {
            Some((RangeToken::Number, span)) => {
                let value = self
                    .lexer
                    .slice(span)
                    .parse()
                    .map_err(|_| self.error(span, Rule::NumberOutOfRange))?;
                Ok((value, span))
            }
            Some((_, span)) => Err(self.error(span, Rule::RangeSyntax)),
            None => Err(self.error(Span::at(self.end), Rule::RangeSyntax)),
        }
    }

    fn peek(&mut self) -> Option<(RangeToken, Span)> {
        self.lexer.peek_token()
    }

    fn next(&mut self) -> Option<(RangeToken, Span)> {
        self.lexer.next_token()
    }

    fn error(&self, span: Span, rule: Rule) -> ParseError {
        ParseError::new(self.name, span, rule)
    }
}

/// Parse a range specifier on its own, e.g. `"1-10x2,20"`
pub fn parse_specifier(source: &str) -> Result<Vec<Progression>, ParseError> {
    RangeParser::new(source, Span::new(0, source.len())).parse_ranges()
}

/// Parse one ranges-block of `name` into a dimension
pub fn parse_block(name: &str, block: BlockSpans) -> Result<RangeDimension, ParseError> {
    let pad_text = &name[block.pad.to_range()];
    let pad = PadSpec::from_token(pad_text)
        .ok_or_else(|| ParseError::new(name, block.pad, Rule::RangeSyntax))?;
    let specifier = RangeParser::new(name, block.spec).parse_ranges()?;

    if pad == PadSpec::UvTile && !specifier.iter().all(is_tile_progression) {
        return Err(ParseError::new(name, block.span(), Rule::UvTile));
    }
    Ok(RangeDimension::new(specifier, pad))
}

/// Every term is an integer UDIM tile number
pub fn is_tile_progression(progression: &Progression) -> bool {
    let pad = PadSpec::UvTile;
    pad.accepts(progression.first())
        && pad.accepts(progression.last())
        && (progression.len() == 1 || progression.step().is_integer())
}
