use crate::error::IncompleteDimensionError;
use crate::file_num::FileNumber;
use serde::{Deserialize, Serialize};
use std::fmt;

/// First tile of the UDIM space (`u1_v1`)
pub const UDIM_START: i64 = 1001;

/// How a file number is rendered inside a name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PadSpec {
    /// `#` repeated `width` times: zero-pad the integral part
    FixedWidth(usize),
    /// `<UDIM>`: four digit tile number
    Udim,
    /// `<UVTILE>`: `u{U}_v{V}` tile coordinates
    UvTile,
}

impl PadSpec {
    /// Recognize a pad token: `#+`, `<UDIM>` or `<UVTILE>`
    pub fn from_token(token: &str) -> Option<PadSpec> {
        match token {
            "<UDIM>" => Some(PadSpec::Udim),
            "<UVTILE>" => Some(PadSpec::UvTile),
            _ if !token.is_empty() && token.bytes().all(|b| b == b'#') => {
                Some(PadSpec::FixedWidth(token.len()))
            }
            _ => None,
        }
    }

    /// The token this pad is written as
    pub fn token(&self) -> String {
        match self {
            PadSpec::FixedWidth(width) => "#".repeat(*width),
            PadSpec::Udim => "<UDIM>".to_string(),
            PadSpec::UvTile => "<UVTILE>".to_string(),
        }
    }

    /// True if `value` can be rendered with this pad
    pub fn accepts(&self, value: FileNumber) -> bool {
        match self {
            PadSpec::UvTile => uv_tile(value).is_ok(),
            _ => true,
        }
    }

    /// Render one file number
    pub fn render(&self, value: FileNumber) -> Result<String, IncompleteDimensionError> {
        match self {
            PadSpec::FixedWidth(width) => Ok(zero_pad(value, *width)),
            PadSpec::Udim => Ok(zero_pad(value, 4)),
            PadSpec::UvTile => {
                let (u, v) = uv_tile(value)?;
                Ok(format!("u{}_v{}", u, v))
            }
        }
    }

    /// Read a rendered file number back
    pub fn read(&self, text: &str) -> Result<FileNumber, IncompleteDimensionError> {
        match self {
            PadSpec::UvTile => read_uv_tile(text),
            _ => text
                .parse()
                .map_err(|_| IncompleteDimensionError::Unreadable { text: text.to_string() }),
        }
    }
}

impl fmt::Display for PadSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// Zero-pad the signed integral part of `value` to `width` characters.
///
/// A fractional part is appended verbatim and a wider natural rendering is
/// never truncated: `zero_pad(-1, 4) == "-001"`, `zero_pad(1001, 1) == "1001"`.
pub fn zero_pad(value: FileNumber, width: usize) -> String {
    let text = value.to_string();
    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (integral, fraction) = match unsigned.find('.') {
        Some(dot) => unsigned.split_at(dot),
        None => (unsigned, ""),
    };
    let digits = width.saturating_sub(sign.len());
    format!("{}{:0>digits$}{}", sign, integral, fraction, digits = digits)
}

/// UDIM tile number to one-based `(u, v)` coordinates
pub fn uv_tile(value: FileNumber) -> Result<(i64, i64), IncompleteDimensionError> {
    let index = value
        .to_i64()
        .and_then(|n| n.checked_sub(UDIM_START))
        .filter(|index| *index >= 0)
        .ok_or(IncompleteDimensionError::NotATile { value })?;
    Ok((index % 10 + 1, index / 10 + 1))
}

/// Parse `u{U}_v{V}` back into a UDIM tile number
pub fn read_uv_tile(text: &str) -> Result<FileNumber, IncompleteDimensionError> {
    let malformed = || IncompleteDimensionError::Unreadable { text: text.to_string() };
    let (u, v) = text
        .strip_prefix('u')
        .and_then(|rest| rest.split_once("_v"))
        .ok_or_else(malformed)?;
    let u: i64 = u.parse().map_err(|_| malformed())?;
    let v: i64 = v.parse().map_err(|_| malformed())?;
    if !(1..=10).contains(&u) || v < 1 {
        return Err(malformed());
    }
    (v - 1)
        .checked_mul(10)
        .and_then(|tile| tile.checked_add(UDIM_START + u - 1))
        .map(FileNumber::from_int)
        .ok_or_else(malformed)
}
