use crate::file_num::FileNumber;
use crate::progression::{Progression, ProgressionIter};
use std::collections::VecDeque;
use std::hash::{Hash, Hasher};

/// A comma-separated list of progressions viewed as one ordered sequence.
///
/// Terms come out in source order with duplicates kept, so `1-2,2-4`
/// yields `[1, 2, 2, 3, 4]`. Equality and hashing follow that ordered
/// sequence, never the way it was written.
#[derive(Debug, Clone, Copy)]
pub struct FileNumSeq<'a> {
    progressions: &'a [Progression],
}

impl<'a> FileNumSeq<'a> {
    pub fn new(progressions: &'a [Progression]) -> Self {
        FileNumSeq { progressions }
    }

    pub fn progressions(&self) -> &'a [Progression] {
        self.progressions
    }

    pub fn len(&self) -> usize {
        self.progressions
            .iter()
            .fold(0usize, |total, p| total.saturating_add(p.len()))
    }

    /// Total number of terms, or `None` if it does not fit in a `usize`
    pub fn checked_len(&self) -> Option<usize> {
        self.progressions
            .iter()
            .try_fold(0usize, |total, p| total.checked_add(p.len()))
    }

    pub fn is_empty(&self) -> bool {
        self.progressions.is_empty()
    }

    pub fn get(&self, mut index: usize) -> Option<FileNumber> {
        for progression in self.progressions {
            let len = progression.len();
            if index < len {
                return progression.get(index);
            }
            index -= len;
        }
        None
    }

    pub fn first(&self) -> Option<FileNumber> {
        self.progressions.first().map(Progression::first)
    }

    pub fn last(&self) -> Option<FileNumber> {
        self.progressions.last().map(Progression::last)
    }

    pub fn contains(&self, value: FileNumber) -> bool {
        self.progressions.iter().any(|p| p.contains(value))
    }

    pub fn has_subframes(&self) -> bool {
        self.progressions.iter().any(Progression::has_subframes)
    }

    pub fn iter(&self) -> FileNumSeqIter<'a> {
        FileNumSeqIter {
            progressions: self.progressions.iter(),
            current: None,
        }
    }

    /// The fewest progressions that enumerate the same ordered terms
    pub fn normalized(&self) -> Vec<Progression> {
        let values: Vec<FileNumber> = self.iter().collect();
        fewest_progressions(&values)
    }
}

impl<'a> IntoIterator for FileNumSeq<'a> {
    type Item = FileNumber;
    type IntoIter = FileNumSeqIter<'a>;

    fn into_iter(self) -> FileNumSeqIter<'a> {
        self.iter()
    }
}

impl PartialEq for FileNumSeq<'_> {
    fn eq(&self, other: &Self) -> bool {
        if let ([a], [b]) = (self.progressions, other.progressions) {
            let len = a.len();
            return len == b.len()
                && a.first() == b.first()
                && (len < 2 || a.signed_step() == b.signed_step());
        }
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl Eq for FileNumSeq<'_> {}

impl Hash for FileNumSeq<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        self.first().hash(state);
        self.last().hash(state);
    }
}

/// Iterator over every term of a [`FileNumSeq`]
#[derive(Debug, Clone)]
pub struct FileNumSeqIter<'a> {
    progressions: std::slice::Iter<'a, Progression>,
    current: Option<ProgressionIter>,
}

impl Iterator for FileNumSeqIter<'_> {
    type Item = FileNumber;

    fn next(&mut self) -> Option<FileNumber> {
        loop {
            if let Some(current) = self.current.as_mut() {
                if let Some(value) = current.next() {
                    return Some(value);
                }
            }
            self.current = Some(self.progressions.next()?.iter());
        }
    }
}

/// Compress an unordered collection of observed values into ascending,
/// deduplicated progressions, using as few as possible.
pub fn compress<I>(values: I) -> Vec<Progression>
where
    I: IntoIterator<Item = FileNumber>,
{
    let mut values: Vec<FileNumber> = values.into_iter().collect();
    values.sort();
    values.dedup();
    fewest_progressions(&values)
}

/// Split an ordered list of values into the fewest consecutive runs that
/// are each an arithmetic progression with a non-zero step.
///
/// Where several splits are equally short, the one with the longest
/// leading run wins.
pub fn fewest_progressions(values: &[FileNumber]) -> Vec<Progression> {
    let n = values.len();
    if n == 0 {
        return Vec::new();
    }

    let step_at = |i: usize| values[i + 1].checked_sub(values[i]);

    // reach[i]: last index of the longest progression starting at i
    let mut reach = vec![0usize; n];
    reach[n - 1] = n - 1;
    for i in (0..n - 1).rev() {
        let step = step_at(i);
        reach[i] = match step {
            Some(step) if !step.is_zero() => {
                if i + 2 < n && step_at(i + 1) == Some(step) {
                    reach[i + 1]
                } else {
                    i + 1
                }
            }
            _ => i,
        };
    }

    // runs[i]: fewest runs covering values[i..]; next[i]: where the first run ends
    let mut runs = vec![0usize; n + 1];
    let mut next = vec![n; n];
    let mut window: VecDeque<usize> = VecDeque::new();
    for i in (0..n).rev() {
        let candidate = i + 1;
        while window.back().map_or(false, |&b| runs[b] > runs[candidate]) {
            window.pop_back();
        }
        window.push_back(candidate);
        while window.front().map_or(false, |&f| f > reach[i] + 1) {
            window.pop_front();
        }
        let best = window.front().copied().unwrap_or(candidate);
        runs[i] = runs[best] + 1;
        next[i] = best;
    }

    let mut progressions = Vec::with_capacity(runs[0]);
    let mut i = 0;
    while i < n {
        let end = next[i];
        progressions.extend(run_to_progression(&values[i..end]));
        i = end;
    }
    progressions
}

fn run_to_progression(run: &[FileNumber]) -> Option<Progression> {
    let (&first, rest) = run.split_first()?;
    let (&last, _) = match rest.split_last() {
        Some(tail) => tail,
        None => return Some(Progression::single(first)),
    };
    let step = (rest[0] - first).abs();
    if step == FileNumber::ONE {
        Progression::range(first, last).ok()
    } else {
        Progression::stepped(first, last, step).ok()
    }
}
