//! Wheel outcomes as reported by the game server.
//!
//! The server encodes a spin result either as a number (or numeric string)
//! for point sectors, or as one of the special sector names. Parsing is
//! lenient on the wire and strict in the type: anything that is not a known
//! tag is kept verbatim as [`SpinValue::Unrecognized`] so the caller can
//! decide how to land the wheel.

use std::fmt;

use serde::Deserialize;
use thiserror::Error;

/// Wire spelling of the bankrupt sector.
pub const BANKRUPT_WIRE: &str = "Bancarotta";
/// Wire spelling of the pass sector.
pub const PASS_WIRE: &str = "Passa";

/// Typed outcome of one wheel sector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutcomeTag {
    Numeric(u32),
    Bankrupt,
    Pass,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized wheel outcome: {raw:?}")]
pub struct OutcomeParseError {
    pub raw: String,
}

impl OutcomeTag {
    /// Parse a wire string. Accepts the server's spelling as well as the
    /// English names, case-insensitively, and plain non-negative integers.
    pub fn parse(raw: &str) -> Result<Self, OutcomeParseError> {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case(BANKRUPT_WIRE) || trimmed.eq_ignore_ascii_case("bankrupt")
        {
            return Ok(Self::Bankrupt);
        }
        if trimmed.eq_ignore_ascii_case(PASS_WIRE) || trimmed.eq_ignore_ascii_case("pass") {
            return Ok(Self::Pass);
        }
        trimmed
            .parse::<u32>()
            .map(Self::Numeric)
            .map_err(|_| OutcomeParseError {
                raw: raw.to_string(),
            })
    }

    #[must_use]
    pub const fn is_special(self) -> bool {
        matches!(self, Self::Bankrupt | Self::Pass)
    }

    #[must_use]
    pub const fn points(self) -> Option<u32> {
        match self {
            Self::Numeric(points) => Some(points),
            Self::Bankrupt | Self::Pass => None,
        }
    }

    /// Short label used on the wheel face.
    #[must_use]
    pub fn label(self) -> String {
        match self {
            Self::Numeric(points) => points.to_string(),
            Self::Bankrupt => "BANKRUPT".to_string(),
            Self::Pass => "PASS".to_string(),
        }
    }
}

impl fmt::Display for OutcomeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(points) => write!(f, "{points}"),
            Self::Bankrupt => f.write_str(BANKRUPT_WIRE),
            Self::Pass => f.write_str(PASS_WIRE),
        }
    }
}

/// A spin value exactly as the server sent it, classified.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "WireValue")]
pub enum SpinValue {
    Known(OutcomeTag),
    Unrecognized(String),
}

impl SpinValue {
    #[must_use]
    pub fn tag(&self) -> Option<OutcomeTag> {
        match self {
            Self::Known(tag) => Some(*tag),
            Self::Unrecognized(_) => None,
        }
    }

    #[must_use]
    pub fn is_bankrupt(&self) -> bool {
        matches!(self, Self::Known(OutcomeTag::Bankrupt))
    }
}

impl From<OutcomeTag> for SpinValue {
    fn from(tag: OutcomeTag) -> Self {
        Self::Known(tag)
    }
}

impl fmt::Display for SpinValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(tag) => write!(f, "{tag}"),
            Self::Unrecognized(raw) => f.write_str(raw),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl From<WireValue> for SpinValue {
    fn from(value: WireValue) -> Self {
        match value {
            WireValue::Integer(n) => u32::try_from(n)
                .map(|points| Self::Known(OutcomeTag::Numeric(points)))
                .unwrap_or_else(|_| Self::Unrecognized(n.to_string())),
            WireValue::Float(f) if f >= 0.0 && f.fract() == 0.0 && f <= f64::from(u32::MAX) => {
                Self::Known(OutcomeTag::Numeric(f as u32))
            }
            WireValue::Float(f) => Self::Unrecognized(f.to_string()),
            WireValue::Text(text) => match OutcomeTag::parse(&text) {
                Ok(tag) => Self::Known(tag),
                Err(err) => Self::Unrecognized(err.raw),
            },
        }
    }
}
