//! Input variants and their ternary encodings
//!
//! Raw strings are classified by an ordered list of parsers. Each parser
//! either recognizes its shape or passes; the first match wins and plain
//! text is the fallback:
//!
//! 1. coords  `X+Y` / `X,Y` with integer parts
//! 2. hex     `0x` prefix
//! 3. seed    exactly 55 lowercase letters
//! 4. address `1`, `3` or `bc1` prefix, 26..=62 alphanumerics
//! 5. array   JSON integer list `[1, -1, 0]`
//! 6. text

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::encoding;
use crate::error::AigarthError;

/// Qubic seed length
pub const SEED_LEN: usize = 55;

/// Input type tag
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Text,
    Hex,
    Coords,
    Seed,
    Address,
    Array,
}

impl InputKind {
    pub const ALL: [InputKind; 6] = [
        Self::Text,
        Self::Hex,
        Self::Coords,
        Self::Seed,
        Self::Address,
        Self::Array,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Hex => "hex",
            Self::Coords => "coords",
            Self::Seed => "seed",
            Self::Address => "address",
            Self::Array => "array",
        }
    }
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InputKind {
    type Err = AigarthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AigarthError::InvalidInput(format!("unknown input type: {}", s)))
    }
}

/// A classified input
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Input {
    Text(String),
    Hex(String),
    Coords { x: i64, y: i64 },
    Seed(String),
    Address(String),
    Array(Vec<i64>),
}

type Parser = fn(&str) -> Option<Input>;

/// Detection order
const PARSERS: [(InputKind, Parser); 5] = [
    (InputKind::Coords, parse_coords),
    (InputKind::Hex, parse_hex),
    (InputKind::Seed, parse_seed),
    (InputKind::Address, parse_address),
    (InputKind::Array, parse_array),
];

impl Input {
    /// Classify a raw string
    pub fn detect(raw: &str) -> Self {
        PARSERS
            .iter()
            .find_map(|(_, parse)| parse(raw))
            .unwrap_or_else(|| Self::Text(raw.to_string()))
    }

    /// Interpret `raw` as `kind`, falling back to text when it does not parse
    pub fn parse_as(raw: &str, kind: InputKind) -> Self {
        if kind == InputKind::Text {
            return Self::Text(raw.to_string());
        }
        let parsed = PARSERS
            .iter()
            .find(|(k, _)| *k == kind)
            .and_then(|(_, parse)| parse(raw));
        match parsed {
            Some(input) => input,
            None => {
                log::debug!("Input {:?} is not valid {}, treating as text", raw, kind);
                Self::Text(raw.to_string())
            }
        }
    }

    pub fn kind(&self) -> InputKind {
        match self {
            Self::Text(_) => InputKind::Text,
            Self::Hex(_) => InputKind::Hex,
            Self::Coords { .. } => InputKind::Coords,
            Self::Seed(_) => InputKind::Seed,
            Self::Address(_) => InputKind::Address,
            Self::Array(_) => InputKind::Array,
        }
    }

    /// Encode to exactly `len` ternary values
    pub fn to_ternary(&self, len: usize) -> Vec<i8> {
        match self {
            Self::Text(text) => {
                encoding::resize(encoding::text_to_ternary(text, len.div_ceil(8)), len, -1)
            }
            Self::Hex(hex) => encoding::hex_to_ternary(hex, len),
            Self::Coords { x, y } => encoding::coords_to_ternary(*x, *y, len),
            Self::Seed(seed) => encoding::seed_to_ternary(seed, len),
            Self::Address(address) => encoding::address_to_ternary(address, len),
            Self::Array(values) => encoding::array_to_ternary(values, len),
        }
    }
}

fn parse_coords(raw: &str) -> Option<Input> {
    let s = raw.trim();
    // Skip index 0 so a leading sign is not taken as the separator
    let split = s.find(',').or_else(|| s.get(1..)?.find('+').map(|i| i + 1))?;
    let x = s[..split].trim().parse().ok()?;
    let y = s[split + 1..].trim().parse().ok()?;
    Some(Input::Coords { x, y })
}

fn parse_hex(raw: &str) -> Option<Input> {
    let s = raw.trim();
    (s.starts_with("0x") || s.starts_with("0X")).then(|| Input::Hex(s.to_string()))
}

fn parse_seed(raw: &str) -> Option<Input> {
    let s = raw.trim();
    (s.len() == SEED_LEN && s.bytes().all(|b| b.is_ascii_lowercase())).then(|| Input::Seed(s.to_string()))
}

fn parse_address(raw: &str) -> Option<Input> {
    let s = raw.trim();
    let prefixed = s.starts_with("bc1") || s.starts_with('1') || s.starts_with('3');
    let shaped = (26..=62).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_alphanumeric());
    (prefixed && shaped).then(|| Input::Address(s.to_string()))
}

fn parse_array(raw: &str) -> Option<Input> {
    let s = raw.trim();
    if !(s.starts_with('[') && s.ends_with(']')) {
        return None;
    }
    serde_json::from_str::<Vec<i64>>(s).ok().map(Input::Array)
}
