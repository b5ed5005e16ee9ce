use pathseq_parser::{parse, Mode, ParsedSequence, Result};
use std::collections::hash_map::{Entry, HashMap};
use tracing::trace;

/// Parse results keyed by the literal name, owned by the caller.
///
/// Failed parses are not stored.
#[derive(Debug, Clone, Default)]
pub struct ParseCache {
    mode: Mode,
    entries: HashMap<String, ParsedSequence>,
}

impl ParseCache {
    pub fn new(mode: Mode) -> Self {
        ParseCache {
            mode,
            entries: HashMap::new(),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Parse `name`, or return the result of an earlier parse of the same text
    pub fn get_or_parse(&mut self, name: &str) -> Result<&ParsedSequence> {
        match self.entries.entry(name.to_string()) {
            Entry::Occupied(entry) => {
                trace!(name, "parse cache hit");
                Ok(entry.into_mut())
            }
            Entry::Vacant(entry) => Ok(entry.insert(parse(name, self.mode)?)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ParsedSequence> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
