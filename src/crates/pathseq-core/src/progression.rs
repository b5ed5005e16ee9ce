use crate::error::ProgressionError;
use crate::file_num::FileNumber;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A finite arithmetic progression of file numbers, as written in a range
/// specifier: `5`, `1-10` or `1-10x2`.
///
/// `end` is a ceiling rather than a guaranteed final term: `1-10x2` stops at
/// `9`. The step is stored as a magnitude and the direction comes from
/// comparing `start` with `end`, so `10-1` counts down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ProgressionRepr", into = "ProgressionRepr")]
pub struct Progression {
    start: FileNumber,
    end: Option<FileNumber>,
    step: Option<FileNumber>,
}

#[derive(Serialize, Deserialize)]
struct ProgressionRepr {
    start: FileNumber,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    end: Option<FileNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    step: Option<FileNumber>,
}

impl TryFrom<ProgressionRepr> for Progression {
    type Error = ProgressionError;

    fn try_from(repr: ProgressionRepr) -> Result<Self, Self::Error> {
        Progression::new(repr.start, repr.end, repr.step)
    }
}

impl From<Progression> for ProgressionRepr {
    fn from(p: Progression) -> Self {
        ProgressionRepr {
            start: p.start,
            end: p.end,
            step: p.step,
        }
    }
}

impl Progression {
    /// Create a progression, validating the step
    pub fn new(
        start: FileNumber,
        end: Option<FileNumber>,
        step: Option<FileNumber>,
    ) -> Result<Self, ProgressionError> {
        match end {
            None => Ok(Progression::single(start)),
            Some(end) => {
                if end.checked_sub(start).is_none() {
                    return Err(ProgressionError::Overflow);
                }
                let progression = match step {
                    Some(step) if step.is_zero() => return Err(ProgressionError::ZeroStep),
                    Some(step) if step.is_negative() => return Err(ProgressionError::NegativeStep),
                    _ => Progression {
                        start,
                        end: Some(end),
                        step,
                    },
                };
                match progression.term_count() {
                    Some(_) => Ok(progression),
                    None => Err(ProgressionError::Overflow),
                }
            }
        }
    }

    /// A bare value: a progression with one term
    pub fn single(value: FileNumber) -> Self {
        Progression {
            start: value,
            end: None,
            step: None,
        }
    }

    /// `start-end` with the default step of one
    pub fn range(start: FileNumber, end: FileNumber) -> Result<Self, ProgressionError> {
        Progression::new(start, Some(end), None)
    }

    /// `start-endxstep`
    pub fn stepped(start: FileNumber, end: FileNumber, step: FileNumber) -> Result<Self, ProgressionError> {
        Progression::new(start, Some(end), Some(step))
    }

    pub fn start(&self) -> FileNumber {
        self.start
    }

    pub fn end(&self) -> Option<FileNumber> {
        self.end
    }

    /// The step magnitude, defaulting to one
    pub fn step(&self) -> FileNumber {
        self.step.unwrap_or(FileNumber::ONE)
    }

    /// The step exactly as written, if it was
    pub fn explicit_step(&self) -> Option<FileNumber> {
        self.step
    }

    pub fn is_descending(&self) -> bool {
        matches!(self.end, Some(end) if end < self.start)
    }

    /// The difference between consecutive terms
    pub fn signed_step(&self) -> FileNumber {
        if self.is_descending() {
            -self.step()
        } else {
            self.step()
        }
    }

    /// Number of terms, computed without enumerating them.
    ///
    /// Always exact: construction rejects progressions whose term count
    /// does not fit in a `usize`.
    pub fn len(&self) -> usize {
        self.term_count().unwrap_or(usize::MAX)
    }

    fn term_count(&self) -> Option<usize> {
        let end = match self.end {
            Some(end) => end,
            None => return Some(1),
        };
        let span = end.checked_sub(self.start)?.abs();
        let step = self.step();
        let whole_steps = match span.aligned_mantissas(step) {
            Some((span, step)) => span / step,
            None => (span.value() / step.value()).floor().to_i128()?,
        };
        usize::try_from(whole_steps).ok()?.checked_add(1)
    }

    /// The k-th term
    pub fn get(&self, k: usize) -> Option<FileNumber> {
        if k >= self.len() {
            return None;
        }
        self.term(k)
    }

    fn term(&self, k: usize) -> Option<FileNumber> {
        if k == 0 {
            return Some(self.start);
        }
        let offset = self.step().checked_scale(k as u64)?;
        if self.is_descending() {
            self.start.checked_sub(offset)
        } else {
            self.start.checked_add(offset)
        }
    }

    pub fn first(&self) -> FileNumber {
        self.start
    }

    /// The final term, which may fall short of `end`
    pub fn last(&self) -> FileNumber {
        self.term(self.len() - 1).unwrap_or(self.start)
    }

    pub fn contains(&self, value: FileNumber) -> bool {
        let end = match self.end {
            Some(end) => end,
            None => return value == self.start,
        };
        let (low, high) = if self.is_descending() {
            (end, self.start)
        } else {
            (self.start, end)
        };
        if value < low || value > high {
            return false;
        }
        let offset = match value.checked_sub(self.start) {
            Some(offset) => offset.abs(),
            None => return false,
        };
        match offset.aligned_mantissas(self.step()) {
            Some((offset, step)) => offset % step == 0,
            None => false,
        }
    }

    /// True if any term is fractional
    pub fn has_subframes(&self) -> bool {
        if self.len() == 1 {
            return !self.start.is_integer();
        }
        !self.start.is_integer() || !self.step().is_integer()
    }

    /// The same terms with `end` landing exactly on the last one
    pub fn exact(&self) -> Progression {
        let len = self.len();
        if len == 1 {
            return Progression::single(self.start);
        }
        let step = self.step();
        Progression {
            start: self.start,
            end: Some(self.last()),
            step: if step == FileNumber::ONE { None } else { Some(step) },
        }
    }

    pub fn iter(&self) -> ProgressionIter {
        ProgressionIter {
            progression: *self,
            front: 0,
            back: self.len(),
        }
    }
}

impl IntoIterator for Progression {
    type Item = FileNumber;
    type IntoIter = ProgressionIter;

    fn into_iter(self) -> ProgressionIter {
        self.iter()
    }
}

impl fmt::Display for Progression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.start)?;
        if let Some(end) = self.end {
            write!(f, "-{}", end)?;
            if let Some(step) = self.step {
                write!(f, "x{}", step)?;
            }
        }
        Ok(())
    }
}

/// Iterator over the terms of a [`Progression`]
#[derive(Debug, Clone)]
pub struct ProgressionIter {
    progression: Progression,
    front: usize,
    back: usize,
}

impl Iterator for ProgressionIter {
    type Item = FileNumber;

    fn next(&mut self) -> Option<FileNumber> {
        if self.front >= self.back {
            return None;
        }
        let value = self.progression.term(self.front);
        self.front += 1;
        value
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }

    fn nth(&mut self, n: usize) -> Option<FileNumber> {
        self.front = self.front.saturating_add(n).min(self.back);
        self.next()
    }
}

impl DoubleEndedIterator for ProgressionIter {
    fn next_back(&mut self) -> Option<FileNumber> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        self.progression.term(self.back)
    }
}

impl ExactSizeIterator for ProgressionIter {}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(s: &str) -> FileNumber {
        s.parse().unwrap()
    }

    fn terms(p: &Progression) -> Vec<String> {
        p.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_single_value() {
        let p = Progression::single(num("7"));
        assert_eq!(p.len(), 1);
        assert_eq!(terms(&p), vec!["7"]);
        assert_eq!(p.to_string(), "7");
    }

    #[test]
    fn test_inclusive_range() {
        let p = Progression::range(num("1"), num("5")).unwrap();
        assert_eq!(terms(&p), vec!["1", "2", "3", "4", "5"]);
        assert_eq!(p.to_string(), "1-5");
    }

    #[test]
    fn test_half_step_subframes() {
        let p = Progression::stepped(num("1"), num("2"), num("0.5")).unwrap();
        assert_eq!(terms(&p), vec!["1", "1.5", "2"]);
        assert!(p.has_subframes());
    }

    #[test]
    fn test_end_is_a_ceiling() {
        let p = Progression::stepped(num("1"), num("3"), num("0.3")).unwrap();
        assert_eq!(terms(&p), vec!["1", "1.3", "1.6", "1.9", "2.2", "2.5", "2.8"]);
        assert_eq!(p.len(), 7);
        assert_eq!(p.last(), num("2.8"));

        let p = Progression::stepped(num("1"), num("10"), num("2")).unwrap();
        assert_eq!(p.last(), num("9"));
        assert_eq!(p.exact().to_string(), "1-9x2");
    }

    #[test]
    fn test_descending() {
        let p = Progression::range(num("10"), num("7")).unwrap();
        assert!(p.is_descending());
        assert_eq!(terms(&p), vec!["10", "9", "8", "7"]);

        let p = Progression::stepped(num("10"), num("1"), num("4")).unwrap();
        assert_eq!(terms(&p), vec!["10", "6", "2"]);
        assert_eq!(p.signed_step(), num("-4"));
    }

    #[test]
    fn test_negative_bounds() {
        let p = Progression::range(num("-3"), num("-1")).unwrap();
        assert_eq!(terms(&p), vec!["-3", "-2", "-1"]);
        assert_eq!(p.to_string(), "-3--1");
    }

    #[test]
    fn test_rejects_zero_step() {
        assert_eq!(
            Progression::stepped(num("1"), num("5"), num("0")),
            Err(ProgressionError::ZeroStep)
        );
        assert_eq!(
            Progression::stepped(num("1"), num("5"), num("-1")),
            Err(ProgressionError::NegativeStep)
        );
    }

    #[test]
    fn test_contains() {
        let p = Progression::stepped(num("1"), num("10"), num("3")).unwrap();
        assert!(p.contains(num("1")));
        assert!(p.contains(num("7")));
        assert!(!p.contains(num("8")));
        assert!(!p.contains(num("10")));

        let p = Progression::stepped(num("2"), num("0"), num("0.5")).unwrap();
        assert!(p.contains(num("0.5")));
        assert!(!p.contains(num("0.25")));
    }

    #[test]
    fn test_random_access_and_reverse() {
        let p = Progression::stepped(num("0"), num("100"), num("10")).unwrap();
        assert_eq!(p.get(3), Some(num("30")));
        assert_eq!(p.get(11), None);
        let reversed: Vec<_> = p.iter().rev().take(2).collect();
        assert_eq!(reversed, vec![num("100"), num("90")]);
        assert_eq!(p.iter().len(), 11);
    }

    #[test]
    fn test_exact_collapses_single_term() {
        let p = Progression::stepped(num("1"), num("2"), num("5")).unwrap();
        assert_eq!(p.len(), 1);
        assert_eq!(p.exact(), Progression::single(num("1")));
    }

    #[test]
    fn test_rejects_uncountable_length() {
        let huge = num("1000000000000000000000");
        assert_eq!(
            Progression::range(FileNumber::ZERO, huge),
            Err(ProgressionError::Overflow)
        );
        let p = Progression::stepped(FileNumber::ZERO, huge, huge).unwrap();
        assert_eq!(p.len(), 2);
    }

    #[test]
    fn test_serde_validates_step() {
        let json = r#"{"start":"1","end":"5","step":"0"}"#;
        assert!(serde_json::from_str::<Progression>(json).is_err());
        let p: Progression = serde_json::from_str(r#"{"start":"1","end":"5"}"#).unwrap();
        assert_eq!(p.len(), 5);
    }
}
