use crate::ast::ParsedSequence;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use crate::loose::parse_loose;
pub use crate::strict::parse_strict;

/// Which grammar to parse names with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// One reading per name; ambiguous names are errors
    #[default]
    Strict,
    /// Text on both sides of the ranges, resolved by position
    Loose,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Strict => write!(f, "strict"),
            Mode::Loose => write!(f, "loose"),
        }
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "strict" => Ok(Mode::Strict),
            "loose" => Ok(Mode::Loose),
            other => Err(format!("unknown parse mode '{}'", other)),
        }
    }
}

/// Parse a name with the given grammar
pub fn parse(name: &str, mode: Mode) -> Result<ParsedSequence> {
    match mode {
        Mode::Strict => parse_strict(name),
        Mode::Loose => parse_loose(name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch() {
        assert!(parse("file.#", Mode::Strict).is_err());
        assert!(parse("file.#", Mode::Loose).is_ok());
    }

    #[test]
    fn test_mode_names() {
        assert_eq!("loose".parse::<Mode>().unwrap(), Mode::Loose);
        assert_eq!(Mode::Strict.to_string(), "strict");
        assert!("fuzzy".parse::<Mode>().is_err());
        assert_eq!(serde_json::to_string(&Mode::Loose).unwrap(), "\"loose\"");
    }
}
