use crate::error::{Error, Result};
use crate::scan::find_on_disk;
use pathseq_core::FileNumber;
use pathseq_parser::{parse, ExpansionIter, Mode, ParsedSequence};
use serde::Serialize;
use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// The grammar a path sequence type parses its file name with
pub trait Grammar: fmt::Debug + Clone + Copy + PartialEq + Eq + Hash {
    const MODE: Mode;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StrictGrammar;

impl Grammar for StrictGrammar {
    const MODE: Mode = Mode::Strict;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LooseGrammar;

impl Grammar for LooseGrammar {
    const MODE: Mode = Mode::Loose;
}

/// A directory plus a parsed sequence name.
///
/// Equality and hashing are structural: two values are equal when their
/// directories match and their names expand to the same files in the same
/// order, however the ranges were written.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SequencePath<G: Grammar> {
    parent: PathBuf,
    parsed: ParsedSequence,
    #[serde(skip)]
    grammar: PhantomData<G>,
}

/// Path sequence parsed with the strict grammar
pub type PathSequence = SequencePath<StrictGrammar>;

/// Path sequence parsed with the loose grammar
pub type LoosePathSequence = SequencePath<LooseGrammar>;

impl<G: Grammar> SequencePath<G> {
    /// Parse the final component of `path`; everything before it is kept as is
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .ok_or_else(|| Error::NoFileName(path.to_path_buf()))?
            .to_str()
            .ok_or_else(|| Error::NotUtf8(path.to_path_buf()))?;
        let parent = path.parent().unwrap_or_else(|| Path::new(""));
        Self::from_name(parent, name)
    }

    fn from_name(parent: &Path, name: &str) -> Result<Self> {
        Ok(SequencePath {
            parent: parent.to_path_buf(),
            parsed: parse(name, G::MODE)?,
            grammar: PhantomData,
        })
    }

    /// Re-read `parsed` through this type's grammar so edits cannot produce
    /// a name the grammar would reject
    fn reparsed(&self, parsed: &ParsedSequence) -> Result<Self> {
        Self::from_name(&self.parent, &parsed.to_string())
    }

    pub fn mode(&self) -> Mode {
        G::MODE
    }

    pub fn parent(&self) -> &Path {
        &self.parent
    }

    pub fn parsed(&self) -> &ParsedSequence {
        &self.parsed
    }

    /// The final component as written by the identity formatter
    pub fn name(&self) -> String {
        self.parsed.to_string()
    }

    pub fn stem(&self) -> &str {
        self.parsed.stem()
    }

    pub fn suffix(&self) -> &str {
        self.parsed.suffix()
    }

    pub fn suffixes(&self) -> &[String] {
        self.parsed.suffixes()
    }

    /// The sequence string itself as a path, e.g. `shots/render.1-10#.exr`
    pub fn as_path(&self) -> PathBuf {
        self.parent.join(self.name())
    }

    pub fn with_name(&self, name: &str) -> Result<Self> {
        Self::from_name(&self.parent, name)
    }

    pub fn with_stem(&self, stem: &str) -> Result<Self> {
        self.reparsed(&self.parsed.with_stem(stem))
    }

    pub fn with_suffix(&self, suffix: &str) -> Result<Self> {
        self.reparsed(&self.parsed.with_suffix(suffix)?)
    }

    /// Same name under `dir`, with this sequence's directory appended to it
    pub fn join_under(&self, dir: impl AsRef<Path>) -> Self {
        SequencePath {
            parent: dir.as_ref().join(&self.parent),
            parsed: self.parsed.clone(),
            grammar: PhantomData,
        }
    }

    /// Number of files in the sequence, or `None` if it does not fit in a `usize`
    pub fn len(&self) -> Option<usize> {
        self.parsed.ranges().expanded_len()
    }

    pub fn is_empty(&self) -> bool {
        self.parsed.ranges().dimensions().iter().any(|d| d.is_empty())
    }

    pub fn has_subframes(&self) -> bool {
        self.parsed.ranges().has_subframes()
    }

    /// Every file path of the sequence, in expansion order
    pub fn paths(&self) -> Result<Paths<'_>> {
        Ok(Paths {
            parent: &self.parent,
            names: self.parsed.expand()?.iter(),
        })
    }

    /// Path of the file at `numbers`, one file number per dimension
    pub fn path_for(&self, numbers: &[FileNumber]) -> Result<PathBuf> {
        Ok(self.parent.join(self.parsed.format_numbers(numbers)?))
    }

    /// Same name with its ranges replaced by the files found on disk
    pub fn with_existing_paths(&self) -> Result<Self> {
        let ranges = find_on_disk(&self.parent, &self.parsed)?;
        Ok(SequencePath {
            parent: self.parent.clone(),
            parsed: self.parsed.with_ranges(ranges)?,
            grammar: PhantomData,
        })
    }
}

impl LoosePathSequence {
    /// Convert to a strict sequence, if the name is strict-shaped
    pub fn to_strict(&self) -> Result<PathSequence> {
        PathSequence::from_name(&self.parent, &self.name())
    }
}

impl<G: Grammar> fmt::Display for SequencePath<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_path().display())
    }
}

impl<G: Grammar> FromStr for SequencePath<G> {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

/// Iterator over the file paths of a sequence
#[derive(Debug, Clone)]
pub struct Paths<'a> {
    parent: &'a Path,
    names: ExpansionIter<'a>,
}

impl Iterator for Paths<'_> {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        self.names.next().map(|name| self.parent.join(name))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.names.size_hint()
    }
}

impl ExactSizeIterator for Paths<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use pathseq_parser::{SequenceError, Shape};
    use std::collections::HashSet;

    fn nums(values: &[i64]) -> Vec<FileNumber> {
        values.iter().copied().map(FileNumber::from_int).collect()
    }

    #[test]
    fn test_new_splits_directory() {
        let seq = PathSequence::new("shots/sh010/render.1-3####.exr").unwrap();
        assert_eq!(seq.parent(), Path::new("shots/sh010"));
        assert_eq!(seq.name(), "render.1-3####.exr");
        assert_eq!(seq.stem(), "render");
        assert_eq!(seq.suffix(), ".exr");
        assert_eq!(seq.to_string(), "shots/sh010/render.1-3####.exr");
    }

    #[test]
    fn test_new_rejects() {
        assert!(matches!(PathSequence::new("/"), Err(Error::NoFileName(_))));
        assert!(matches!(
            PathSequence::new("dir/render.exr"),
            Err(Error::Sequence(SequenceError::NotASequence(_)))
        ));
        assert!(PathSequence::new("dir/1-3#_render.exr").is_err());
        assert!(LoosePathSequence::new("dir/1-3#_render.exr").is_ok());
    }

    #[test]
    fn test_paths() {
        let seq = PathSequence::new("out/a.1-2#_1001-1002<UDIM>.exr").unwrap();
        let paths: Vec<PathBuf> = seq.paths().unwrap().collect();
        assert_eq!(seq.len(), Some(4));
        assert_eq!(paths.len(), 4);
        assert_eq!(paths[0], PathBuf::from("out/a.1_1001.exr"));
        assert_eq!(paths[3], PathBuf::from("out/a.2_1002.exr"));
        assert_eq!(seq.path_for(&nums(&[2, 1001])).unwrap(), PathBuf::from("out/a.2_1001.exr"));
    }

    #[test]
    fn test_structural_equality() {
        let a = PathSequence::new("dir/a.1-3#.exr").unwrap();
        let b = PathSequence::new("dir/a.1,2,3#.exr").unwrap();
        let c = PathSequence::new("other/a.1-3#.exr").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<PathSequence> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_with_stem_and_suffix() {
        let seq = PathSequence::new("dir/a.1-3#.exr").unwrap();
        assert_eq!(seq.with_stem("b").unwrap().name(), "b.1-3#.exr");
        assert_eq!(seq.with_suffix(".tar.gz").unwrap().name(), "a.1-3#.tar.gz");
        assert!(seq.with_stem("").is_err());
        assert!(seq.with_suffix("").is_err());

        let loose = LoosePathSequence::new("dir/a.1-3#.exr").unwrap();
        let stripped = loose.with_suffix("").unwrap();
        assert_eq!(stripped.name(), "a.1-3#");
        assert_eq!(stripped.parsed().shape(), Shape::RangesEndName);
    }

    #[test]
    fn test_with_name_keeps_directory() {
        let seq = PathSequence::new("dir/a.1-3#.exr").unwrap();
        let renamed = seq.with_name("b.5-6##.png").unwrap();
        assert_eq!(renamed.parent(), Path::new("dir"));
        assert_eq!(renamed.len(), Some(2));
    }

    #[test]
    fn test_serializes_directory_and_name() {
        let seq = PathSequence::new("shots/render.1-3####.exr").unwrap();
        let json = serde_json::to_value(&seq).unwrap();
        assert_eq!(json["parent"], "shots");
        assert_eq!(json["parsed"]["shape"], "strict");
        assert_eq!(json["parsed"]["stem"], "render");
        assert!(json.get("grammar").is_none());
    }

    #[test]
    fn test_empty_dimension() {
        let seq = PathSequence::new("a.1-3#_#.exr").unwrap();
        assert!(seq.is_empty());
        assert_eq!(seq.len(), Some(0));
        assert!(!PathSequence::new("a.1#.exr").unwrap().is_empty());
    }

    #[test]
    fn test_join_under() {
        let seq = PathSequence::new("sh010/a.1#.exr").unwrap();
        let joined = seq.join_under("/projects/show");
        assert_eq!(joined.parent(), Path::new("/projects/show/sh010"));
    }

    #[test]
    fn test_loose_to_strict() {
        let loose = LoosePathSequence::new("a.1-3#.exr").unwrap();
        assert_eq!(loose.parsed().shape(), Shape::RangesInName);
        let strict = loose.to_strict().unwrap();
        assert_eq!(strict.parsed().shape(), Shape::Strict);
        assert!(LoosePathSequence::new("1-3#_a.exr").unwrap().to_strict().is_err());
    }

    #[test]
    fn test_subframes() {
        assert!(PathSequence::new("a.1-2x0.5#.exr").unwrap().has_subframes());
        assert!(!PathSequence::new("a.1-2#.exr").unwrap().has_subframes());
    }
}
