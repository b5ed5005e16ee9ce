use crate::error::{Result, SequenceError};
use pathseq_core::{compress, FileNumSeq, FileNumber, PadSpec, Progression};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// One ranges-block: the comma-separated progressions and their pad.
///
/// Equality compares the ordered sequence of file numbers, so `1-3#` and
/// `1,2,3#` are equal while `1-2,2-4#` and `1-4#` are not.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RangeDimension {
    specifier: Vec<Progression>,
    pad: PadSpec,
}

impl RangeDimension {
    pub fn new(specifier: Vec<Progression>, pad: PadSpec) -> Self {
        RangeDimension { specifier, pad }
    }

    pub fn specifier(&self) -> &[Progression] {
        &self.specifier
    }

    pub fn pad(&self) -> PadSpec {
        self.pad
    }

    pub fn file_nums(&self) -> FileNumSeq<'_> {
        FileNumSeq::new(&self.specifier)
    }

    /// Number of file numbers in this dimension
    pub fn len(&self) -> usize {
        self.file_nums().len()
    }

    pub fn is_empty(&self) -> bool {
        self.specifier.is_empty()
    }

    pub fn has_subframes(&self) -> bool {
        self.file_nums().has_subframes()
    }

    /// Same file numbers, fewest progressions
    pub fn normalized(&self) -> RangeDimension {
        RangeDimension::new(self.file_nums().normalized(), self.pad)
    }

    pub fn with_specifier(&self, specifier: Vec<Progression>) -> RangeDimension {
        RangeDimension::new(specifier, self.pad)
    }
}

impl PartialEq for RangeDimension {
    fn eq(&self, other: &Self) -> bool {
        self.pad == other.pad && self.file_nums() == other.file_nums()
    }
}

impl Eq for RangeDimension {}

impl Hash for RangeDimension {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.pad.hash(state);
        self.file_nums().hash(state);
    }
}

impl fmt::Display for RangeDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, progression) in self.specifier.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", progression)?;
        }
        write!(f, "{}", self.pad)
    }
}

/// Every ranges-block of a name with the literal text between them
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ranges {
    dimensions: Vec<RangeDimension>,
    separators: Vec<String>,
}

impl Ranges {
    pub fn single(dimension: RangeDimension) -> Self {
        Ranges {
            dimensions: vec![dimension],
            separators: Vec::new(),
        }
    }

    /// The first dimension, then each further dimension with the separator before it
    pub fn new(first: RangeDimension, rest: Vec<(String, RangeDimension)>) -> Self {
        let mut ranges = Ranges::single(first);
        for (separator, dimension) in rest {
            ranges.separators.push(separator);
            ranges.dimensions.push(dimension);
        }
        ranges
    }

    pub fn dimensions(&self) -> &[RangeDimension] {
        &self.dimensions
    }

    pub fn separators(&self) -> &[String] {
        &self.separators
    }

    pub fn dimension_count(&self) -> usize {
        self.dimensions.len()
    }

    /// Number of names the ranges expand to: the product of every dimension's length.
    ///
    /// `None` when the count does not fit in a `usize`.
    pub fn expanded_len(&self) -> Option<usize> {
        self.dimensions.iter().try_fold(1usize, |total, dimension| {
            total.checked_mul(dimension.file_nums().checked_len()?)
        })
    }

    pub fn has_subframes(&self) -> bool {
        self.dimensions.iter().any(RangeDimension::has_subframes)
    }

    /// Rewrite every dimension into its fewest exact-ended progressions
    pub fn normalized(&self) -> Ranges {
        Ranges {
            dimensions: self.dimensions.iter().map(RangeDimension::normalized).collect(),
            separators: self.separators.clone(),
        }
    }

    /// Build ranges from the values observed on disk for each dimension.
    ///
    /// Pads and separators come from `template`. Each dimension's values are
    /// sorted, deduplicated and compressed into the fewest progressions.
    pub fn from_observed_values<I, S>(template: &Ranges, observed: I) -> Result<Ranges>
    where
        I: IntoIterator<Item = S>,
        S: IntoIterator<Item = FileNumber>,
    {
        let specifiers: Vec<Vec<Progression>> = observed.into_iter().map(compress::<S>).collect();
        if specifiers.len() != template.dimensions.len() {
            return Err(SequenceError::DimensionMismatch {
                expected: template.dimensions.len(),
                found: specifiers.len(),
            });
        }
        Ok(Ranges {
            dimensions: template
                .dimensions
                .iter()
                .zip(specifiers)
                .map(|(dimension, specifier)| dimension.with_specifier(specifier))
                .collect(),
            separators: template.separators.clone(),
        })
    }
}

impl fmt::Display for Ranges {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, dimension) in self.dimensions.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", self.separators.get(i - 1).map_or("", String::as_str))?;
            }
            write!(f, "{}", dimension)?;
        }
        Ok(())
    }
}

/// `stem prefix ranges suffixes`, e.g. `file.1-10#.exr`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Strict {
    pub stem: String,
    /// `"."`, `"_"` or empty
    pub prefix: String,
    pub ranges: Ranges,
    pub suffixes: Vec<String>,
}

/// `ranges postfix stem suffixes`, e.g. `1-10#_file.exr`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RangesStartName {
    pub ranges: Ranges,
    /// `"_"` or empty
    pub postfix: String,
    pub stem: String,
    pub suffixes: Vec<String>,
}

/// `stem prefix ranges postfix suffixes`, e.g. `file.1-10#_beauty.exr`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RangesInName {
    pub stem: String,
    pub prefix: String,
    pub ranges: Ranges,
    pub postfix: String,
    pub suffixes: Vec<String>,
}

/// `stem suffixes prefix ranges`, e.g. `file.exr.1-10#`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RangesEndName {
    pub stem: String,
    pub suffixes: Vec<String>,
    pub prefix: String,
    pub ranges: Ranges,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    Strict,
    RangesStartName,
    RangesInName,
    RangesEndName,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Strict => write!(f, "strict"),
            Shape::RangesStartName => write!(f, "ranges start name"),
            Shape::RangesInName => write!(f, "ranges in name"),
            Shape::RangesEndName => write!(f, "ranges end name"),
        }
    }
}

/// A parsed sequence name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum ParsedSequence {
    Strict(Strict),
    RangesStartName(RangesStartName),
    RangesInName(RangesInName),
    RangesEndName(RangesEndName),
}

impl ParsedSequence {
    pub fn shape(&self) -> Shape {
        match self {
            ParsedSequence::Strict(_) => Shape::Strict,
            ParsedSequence::RangesStartName(_) => Shape::RangesStartName,
            ParsedSequence::RangesInName(_) => Shape::RangesInName,
            ParsedSequence::RangesEndName(_) => Shape::RangesEndName,
        }
    }

    pub fn is_strict(&self) -> bool {
        matches!(self, ParsedSequence::Strict(_))
    }

    pub fn stem(&self) -> &str {
        match self {
            ParsedSequence::Strict(p) => &p.stem,
            ParsedSequence::RangesStartName(p) => &p.stem,
            ParsedSequence::RangesInName(p) => &p.stem,
            ParsedSequence::RangesEndName(p) => &p.stem,
        }
    }

    /// Separator between the stem and the ranges; empty for [`RangesStartName`]
    pub fn prefix(&self) -> &str {
        match self {
            ParsedSequence::Strict(p) => &p.prefix,
            ParsedSequence::RangesStartName(_) => "",
            ParsedSequence::RangesInName(p) => &p.prefix,
            ParsedSequence::RangesEndName(p) => &p.prefix,
        }
    }

    /// Text right after the ranges; always empty for strict and end-name shapes
    pub fn postfix(&self) -> &str {
        match self {
            ParsedSequence::Strict(_) | ParsedSequence::RangesEndName(_) => "",
            ParsedSequence::RangesStartName(p) => &p.postfix,
            ParsedSequence::RangesInName(p) => &p.postfix,
        }
    }

    pub fn ranges(&self) -> &Ranges {
        match self {
            ParsedSequence::Strict(p) => &p.ranges,
            ParsedSequence::RangesStartName(p) => &p.ranges,
            ParsedSequence::RangesInName(p) => &p.ranges,
            ParsedSequence::RangesEndName(p) => &p.ranges,
        }
    }

    pub fn suffixes(&self) -> &[String] {
        match self {
            ParsedSequence::Strict(p) => &p.suffixes,
            ParsedSequence::RangesStartName(p) => &p.suffixes,
            ParsedSequence::RangesInName(p) => &p.suffixes,
            ParsedSequence::RangesEndName(p) => &p.suffixes,
        }
    }

    /// The final suffix, or an empty string
    pub fn suffix(&self) -> &str {
        self.suffixes().last().map_or("", String::as_str)
    }

    fn ranges_mut(&mut self) -> &mut Ranges {
        match self {
            ParsedSequence::Strict(p) => &mut p.ranges,
            ParsedSequence::RangesStartName(p) => &mut p.ranges,
            ParsedSequence::RangesInName(p) => &mut p.ranges,
            ParsedSequence::RangesEndName(p) => &mut p.ranges,
        }
    }

    fn suffixes_mut(&mut self) -> &mut Vec<String> {
        match self {
            ParsedSequence::Strict(p) => &mut p.suffixes,
            ParsedSequence::RangesStartName(p) => &mut p.suffixes,
            ParsedSequence::RangesInName(p) => &mut p.suffixes,
            ParsedSequence::RangesEndName(p) => &mut p.suffixes,
        }
    }

    /// Replace the stem.
    ///
    /// Removing the stem also removes the prefix that separated it from the
    /// ranges, and for [`RangesStartName`] the postfix when suffixes remain.
    pub fn with_stem(&self, stem: &str) -> ParsedSequence {
        let mut parsed = self.clone();
        let removing = stem.is_empty() && !self.stem().is_empty();
        match &mut parsed {
            ParsedSequence::Strict(p) => {
                p.stem = stem.to_string();
                if removing {
                    p.prefix.clear();
                }
            }
            ParsedSequence::RangesStartName(p) => {
                p.stem = stem.to_string();
                if removing && !p.suffixes.is_empty() {
                    p.postfix.clear();
                }
            }
            ParsedSequence::RangesInName(p) => {
                p.stem = stem.to_string();
                if removing {
                    p.prefix.clear();
                }
            }
            ParsedSequence::RangesEndName(p) => p.stem = stem.to_string(),
        }
        parsed
    }

    /// Replace the final suffix.
    ///
    /// `".tar.gz"` replaces it with two suffixes and the empty string drops it.
    pub fn with_suffix(&self, suffix: &str) -> Result<ParsedSequence> {
        let mut parsed = self.clone();
        if suffix.is_empty() {
            if self.is_strict() && self.suffixes().len() <= 1 {
                return Err(SequenceError::SuffixRequired);
            }
            parsed.suffixes_mut().pop();
            if let ParsedSequence::RangesInName(p) = &mut parsed {
                if p.suffixes.is_empty() {
                    p.postfix.clear();
                }
            }
            return Ok(parsed);
        }

        if !suffix.starts_with('.') || suffix == "." {
            return Err(SequenceError::InvalidSuffix(suffix.to_string()));
        }
        let added = split_suffixes(suffix);
        if added.iter().any(|s| s == ".") {
            return Err(SequenceError::InvalidSuffix(suffix.to_string()));
        }
        let suffixes = parsed.suffixes_mut();
        suffixes.pop();
        suffixes.extend(added);
        Ok(parsed)
    }

    /// Replace the ranges, keeping the same number of dimensions
    pub fn with_ranges(&self, ranges: Ranges) -> Result<ParsedSequence> {
        let expected = self.ranges().dimension_count();
        if ranges.dimension_count() != expected {
            return Err(SequenceError::DimensionMismatch {
                expected,
                found: ranges.dimension_count(),
            });
        }
        let mut parsed = self.clone();
        *parsed.ranges_mut() = ranges;
        Ok(parsed)
    }

    /// Same name with every dimension rewritten into its fewest progressions
    pub fn normalized(&self) -> ParsedSequence {
        let mut parsed = self.clone();
        *parsed.ranges_mut() = self.ranges().normalized();
        parsed
    }
}

/// Split suffix text before every `.`: `.tar.gz` becomes `[".tar", ".gz"]`
pub fn split_suffixes(text: &str) -> Vec<String> {
    let mut suffixes = Vec::new();
    let mut current = String::new();
    for c in text.chars() {
        if c == '.' && !current.is_empty() {
            suffixes.push(std::mem::take(&mut current));
        }
        current.push(c);
    }
    if !current.is_empty() {
        suffixes.push(current);
    }
    suffixes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(s: &str) -> FileNumber {
        s.parse().unwrap()
    }

    fn dim(specifier: &[(i64, i64)], pad: PadSpec) -> RangeDimension {
        RangeDimension::new(
            specifier
                .iter()
                .map(|&(a, b)| Progression::range(FileNumber::from_int(a), FileNumber::from_int(b)).unwrap())
                .collect(),
            pad,
        )
    }

    fn strict(stem: &str, ranges: Ranges, suffixes: &[&str]) -> ParsedSequence {
        ParsedSequence::Strict(Strict {
            stem: stem.to_string(),
            prefix: ".".to_string(),
            ranges,
            suffixes: suffixes.iter().map(|s| s.to_string()).collect(),
        })
    }

    #[test]
    fn test_split_suffixes() {
        assert_eq!(split_suffixes(".tar.gz"), vec![".tar", ".gz"]);
        assert_eq!(split_suffixes(".exr"), vec![".exr"]);
        assert_eq!(split_suffixes(".."), vec![".", "."]);
        assert!(split_suffixes("").is_empty());
    }

    #[test]
    fn test_dimension_equality_is_ordered() {
        let a = dim(&[(1, 3)], PadSpec::FixedWidth(4));
        let b = RangeDimension::new(
            vec![
                Progression::single(num("1")),
                Progression::single(num("2")),
                Progression::single(num("3")),
            ],
            PadSpec::FixedWidth(4),
        );
        assert_eq!(a, b);
        assert_ne!(a, dim(&[(1, 3)], PadSpec::FixedWidth(2)));
        assert_ne!(dim(&[(1, 2), (2, 4)], PadSpec::Udim), dim(&[(1, 4)], PadSpec::Udim));
    }

    #[test]
    fn test_ranges_display() {
        let ranges = Ranges::new(
            dim(&[(1, 3), (5, 5)], PadSpec::FixedWidth(4)),
            vec![("_".to_string(), dim(&[(1001, 1002)], PadSpec::UvTile))],
        );
        assert_eq!(ranges.to_string(), "1-3,5-5####_1001-1002<UVTILE>");
        assert_eq!(ranges.expanded_len(), Some(8));
    }

    #[test]
    fn test_from_observed_values() {
        let template = Ranges::new(
            dim(&[(1, 1)], PadSpec::FixedWidth(4)),
            vec![("_".to_string(), dim(&[(1, 1)], PadSpec::Udim))],
        );
        let observed = vec![
            vec![num("3"), num("1"), num("2"), num("2")],
            vec![num("1002"), num("1001")],
        ];
        let ranges = Ranges::from_observed_values(&template, observed).unwrap();
        assert_eq!(ranges.to_string(), "1-3####_1001-1002<UDIM>");

        let err = Ranges::from_observed_values(&template, vec![vec![num("1")]]);
        assert!(matches!(err, Err(SequenceError::DimensionMismatch { expected: 2, found: 1 })));
    }

    #[test]
    fn test_with_stem_drops_prefix() {
        let parsed = strict("file", Ranges::single(dim(&[(1, 5)], PadSpec::FixedWidth(1))), &[".exr"]);
        let renamed = parsed.with_stem("shot");
        assert_eq!(renamed.stem(), "shot");
        assert_eq!(renamed.prefix(), ".");
        let removed = parsed.with_stem("");
        assert_eq!(removed.prefix(), "");
    }

    #[test]
    fn test_with_suffix() {
        let parsed = strict("file", Ranges::single(dim(&[(1, 5)], PadSpec::FixedWidth(1))), &[".exr"]);
        let tarball = parsed.with_suffix(".tar.gz").unwrap();
        assert_eq!(tarball.suffixes(), &[".tar".to_string(), ".gz".to_string()]);
        assert_eq!(tarball.suffix(), ".gz");
        assert_eq!(tarball.with_suffix("").unwrap().suffixes(), &[".tar".to_string()]);

        assert!(matches!(parsed.with_suffix(""), Err(SequenceError::SuffixRequired)));
        assert!(matches!(parsed.with_suffix("exr"), Err(SequenceError::InvalidSuffix(_))));
        assert!(matches!(parsed.with_suffix("."), Err(SequenceError::InvalidSuffix(_))));
    }

    #[test]
    fn test_loose_with_suffix_drops_postfix() {
        let parsed = ParsedSequence::RangesInName(RangesInName {
            stem: "file".to_string(),
            prefix: ".".to_string(),
            ranges: Ranges::single(dim(&[(1, 5)], PadSpec::FixedWidth(1))),
            postfix: "_v1".to_string(),
            suffixes: vec![".exr".to_string()],
        });
        let stripped = parsed.with_suffix("").unwrap();
        assert!(stripped.suffixes().is_empty());
        assert_eq!(stripped.postfix(), "");
    }

    #[test]
    fn test_with_ranges_checks_dimensions() {
        let parsed = strict("file", Ranges::single(dim(&[(1, 5)], PadSpec::FixedWidth(1))), &[".exr"]);
        let replaced = parsed
            .with_ranges(Ranges::single(dim(&[(10, 20)], PadSpec::FixedWidth(1))))
            .unwrap();
        assert_eq!(replaced.ranges().expanded_len(), Some(11));

        let two = Ranges::new(
            dim(&[(1, 1)], PadSpec::FixedWidth(1)),
            vec![("_".to_string(), dim(&[(1, 1)], PadSpec::FixedWidth(1)))],
        );
        assert!(parsed.with_ranges(two).is_err());
    }

    #[test]
    fn test_serializes_with_shape_tag() {
        let parsed = strict("file", Ranges::single(dim(&[(1, 5)], PadSpec::FixedWidth(4))), &[".exr"]);
        let json = serde_json::to_value(&parsed).unwrap();
        assert_eq!(json["shape"], "strict");
        assert_eq!(json["stem"], "file");
        let back: ParsedSequence = serde_json::from_value(json).unwrap();
        assert_eq!(back, parsed);
    }
}
