//! Expansion of a parsed sequence into file names.
//!
//! Dimensions combine as an ordered Cartesian product with the rightmost
//! dimension varying fastest. Nothing is sorted or deduplicated.

use crate::ast::{ParsedSequence, RangeDimension};
use crate::error::{Result, SequenceError};
use crate::range_parser::is_tile_progression;
use pathseq_core::{FileNumSeqIter, FileNumber, IncompleteDimensionError, PadSpec};

/// Every name of `parsed`.
///
/// Everything that could stop a name from rendering is checked here: the
/// total count must fit in a `usize`, and every term of a `<UVTILE>`
/// dimension must be a tile. Fixed-width and `<UDIM>` pads render any file
/// number. Once this returns `Ok`, each of the `len()` coordinate tuples
/// renders, so [`Expansion::get`] and [`ExpansionIter`] yield exactly
/// `len()` names.
pub fn expand(parsed: &ParsedSequence) -> Result<Expansion<'_>> {
    let len = parsed.ranges().expanded_len().ok_or(SequenceError::TooManyFiles)?;
    for dimension in parsed.ranges().dimensions() {
        if dimension.pad() == PadSpec::UvTile {
            check_tiles(dimension)?;
        }
    }
    Ok(Expansion::new(parsed, len))
}

fn check_tiles(dimension: &RangeDimension) -> std::result::Result<(), IncompleteDimensionError> {
    let pad = PadSpec::UvTile;
    for progression in dimension.specifier() {
        if is_tile_progression(progression) {
            continue;
        }
        let value = [progression.first(), progression.last()]
            .into_iter()
            .chain(progression.get(1))
            .find(|value| !pad.accepts(*value))
            .unwrap_or(progression.first());
        return Err(IncompleteDimensionError::NotATile { value });
    }
    Ok(())
}

/// The names of a sequence, iterable any number of times
#[derive(Debug, Clone)]
pub struct Expansion<'a> {
    parsed: &'a ParsedSequence,
    lens: Vec<usize>,
    len: usize,
}

impl<'a> Expansion<'a> {
    fn new(parsed: &'a ParsedSequence, len: usize) -> Self {
        let lens: Vec<usize> = parsed
            .ranges()
            .dimensions()
            .iter()
            .map(RangeDimension::len)
            .collect();
        Expansion { parsed, lens, len }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Coordinates of the `index`-th name, one file number per dimension
    pub fn coordinates_at(&self, mut index: usize) -> Option<Vec<FileNumber>> {
        if index >= self.len {
            return None;
        }
        let dimensions = self.parsed.ranges().dimensions();
        let mut coordinates = vec![FileNumber::ZERO; dimensions.len()];
        for (d, dimension) in dimensions.iter().enumerate().rev() {
            let radix = self.lens[d];
            coordinates[d] = dimension.file_nums().get(index % radix)?;
            index /= radix;
        }
        Some(coordinates)
    }

    /// The `index`-th name
    pub fn get(&self, index: usize) -> Option<String> {
        let coordinates = self.coordinates_at(index)?;
        self.parsed.format_numbers(&coordinates).ok()
    }

    /// Every coordinate tuple in expansion order
    pub fn coordinates(&self) -> Coordinates<'a> {
        Coordinates::new(self.parsed.ranges().dimensions(), self.len)
    }

    pub fn iter(&self) -> ExpansionIter<'a> {
        ExpansionIter {
            parsed: self.parsed,
            coordinates: self.coordinates(),
        }
    }
}

impl<'a> IntoIterator for &Expansion<'a> {
    type Item = String;
    type IntoIter = ExpansionIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Odometer over the dimensions' file numbers, rightmost wheel fastest
#[derive(Debug, Clone)]
pub struct Coordinates<'a> {
    dimensions: &'a [RangeDimension],
    wheels: Vec<FileNumSeqIter<'a>>,
    current: Vec<FileNumber>,
    remaining: usize,
}

impl<'a> Coordinates<'a> {
    fn new(dimensions: &'a [RangeDimension], len: usize) -> Self {
        Coordinates {
            dimensions,
            wheels: Vec::with_capacity(dimensions.len()),
            current: Vec::with_capacity(dimensions.len()),
            remaining: len,
        }
    }

    fn advance(&mut self) -> Option<()> {
        if self.wheels.is_empty() {
            for dimension in self.dimensions {
                let mut wheel = dimension.file_nums().iter();
                self.current.push(wheel.next()?);
                self.wheels.push(wheel);
            }
            return Some(());
        }
        for d in (0..self.dimensions.len()).rev() {
            if let Some(value) = self.wheels[d].next() {
                self.current[d] = value;
                return Some(());
            }
            let mut wheel = self.dimensions[d].file_nums().iter();
            self.current[d] = wheel.next()?;
            self.wheels[d] = wheel;
        }
        None
    }
}

impl Iterator for Coordinates<'_> {
    type Item = Vec<FileNumber>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.advance()?;
        self.remaining -= 1;
        Some(self.current.clone())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Coordinates<'_> {}

#[derive(Debug, Clone)]
pub struct ExpansionIter<'a> {
    parsed: &'a ParsedSequence,
    coordinates: Coordinates<'a>,
}

impl Iterator for ExpansionIter<'_> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        let coordinates = self.coordinates.next()?;
        self.parsed.format_numbers(&coordinates).ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.coordinates.size_hint()
    }
}

impl ExactSizeIterator for ExpansionIter<'_> {}

impl ParsedSequence {
    /// See [`expand`]
    pub fn expand(&self) -> Result<Expansion<'_>> {
        expand(self)
    }
}
