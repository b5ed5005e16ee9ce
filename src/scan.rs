//! Finding the files of a sequence that exist on disk.

use crate::error::{Error, Result};
use pathseq_core::{FileNumber, IncompleteDimensionError};
use pathseq_parser::{ParsedSequence, Ranges, RegexFormatter};
use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::{debug, trace};

/// Ranges covering the files in `dir` that match `parsed`.
///
/// Each dimension's values come back ascending with duplicates removed.
/// The matched files must fill the Cartesian product of the values found
/// in every dimension.
pub fn find_on_disk(dir: &Path, parsed: &ParsedSequence) -> Result<Ranges> {
    let pattern = Regex::new(&format!("^(?:{})$", parsed.as_regex()?))?;
    let dimensions = parsed.ranges().dimensions();
    let groups: Vec<String> = (0..dimensions.len()).map(RegexFormatter::group_name).collect();

    let listed = if dir.as_os_str().is_empty() { Path::new(".") } else { dir };
    let scan_error = |source| Error::Scan {
        path: listed.to_path_buf(),
        source,
    };

    let mut seen: Vec<HashSet<String>> = vec![HashSet::new(); dimensions.len()];
    let mut matched = 0usize;
    for entry in fs::read_dir(listed).map_err(scan_error)? {
        let entry = entry.map_err(scan_error)?;
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };
        let Some(caps) = pattern.captures(name) else {
            continue;
        };
        let values: Option<Vec<&str>> = groups
            .iter()
            .map(|group| caps.name(group).map(|m| m.as_str()))
            .collect();
        let Some(values) = values else {
            continue;
        };
        trace!(name, "matched sequence file");
        matched += 1;
        for (set, value) in seen.iter_mut().zip(values) {
            set.insert(value.to_string());
        }
    }

    let expected = seen.iter().fold(1usize, |total, set| total.saturating_mul(set.len()));
    debug!(dir = %listed.display(), matched, expected, "scanned sequence directory");
    if matched != expected {
        return Err(IncompleteDimensionError::Incomplete {
            found: matched,
            expected,
        }
        .into());
    }

    let mut observed = Vec::with_capacity(dimensions.len());
    for (dimension, texts) in dimensions.iter().zip(&seen) {
        let values = texts
            .iter()
            .map(|text| dimension.pad().read(text))
            .collect::<std::result::Result<Vec<FileNumber>, _>>()?;
        observed.push(values);
    }
    Ok(Ranges::from_observed_values(parsed.ranges(), observed)?)
}
