//! Decoding of records the exchange sends as bare JSON arrays.
//!
//! A positional record has no field names: `["100.00","1.5"]` is a price and a
//! quantity purely by index. Each target type declares its layout through
//! [`PositionalRecord`]; this module owns tokenizing, arity checks and integer
//! parsing so the layouts stay declarative.

use crate::core::errors::ParseError;
use serde::de::{Deserializer, Error as _};
use serde::Deserialize;
use serde_json::value::RawValue;
use std::str::FromStr;

/// A record decoded from a fixed-position JSON array
pub trait PositionalRecord: Default + Sized {
    /// Record name used in error messages
    const NAME: &'static str;

    /// Minimum number of tokens the layout reads
    const ARITY: usize;

    /// Map tokens to fields; `tokens.len() >= ARITY` is guaranteed
    fn from_tokens(tokens: &Tokens<'_>) -> Result<Self, ParseError>;
}

/// Tokens of one positional array, quotes removed
#[derive(Debug)]
pub struct Tokens<'a> {
    record: &'static str,
    items: Vec<&'a str>,
}

impl<'a> Tokens<'a> {
    /// Split a raw array into tokens
    pub fn split(record: &'static str, raw: &'a str) -> Self {
        let body = raw.trim().trim_matches(|c| c == '[' || c == ']');
        let items = if body.trim().is_empty() {
            Vec::new()
        } else {
            body.split(',')
                .map(|token| token.trim().trim_matches('"'))
                .collect()
        };
        Self { record, items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Token at `index`, verbatim
    pub fn text(&self, index: usize) -> String {
        self.items.get(index).copied().unwrap_or_default().to_owned()
    }

    /// Token at `index` parsed as an integer
    pub fn integer<N: FromStr>(&self, index: usize) -> Result<N, ParseError> {
        let token = self.items.get(index).copied().unwrap_or_default();
        token.parse().map_err(|_| ParseError::InvalidInteger {
            record: self.record,
            index,
            token: token.to_owned(),
        })
    }

    fn require(&self, expected: usize) -> Result<(), ParseError> {
        if self.items.len() < expected {
            return Err(ParseError::FieldCount {
                record: self.record,
                expected,
                actual: self.items.len(),
            });
        }
        Ok(())
    }
}

/// Decode one positional record
///
/// A zero-byte payload decodes to the record's zero state.
pub fn decode<T: PositionalRecord>(raw: &[u8]) -> Result<T, ParseError> {
    if raw.is_empty() {
        return Ok(T::default());
    }

    let text = std::str::from_utf8(raw).map_err(|e| {
        ParseError::Json(serde_json::Error::custom(format!(
            "{} payload is not UTF-8: {}",
            T::NAME,
            e
        )))
    })?;

    let tokens = Tokens::split(T::NAME, text);
    tokens.require(T::ARITY)?;
    T::from_tokens(&tokens)
}

/// Decode a JSON array whose elements are positional records
///
/// A zero-byte payload decodes to an empty list.
pub fn decode_list<T: PositionalRecord>(raw: &[u8]) -> Result<Vec<T>, ParseError> {
    if raw.is_empty() {
        return Ok(Vec::new());
    }

    let elements: Vec<Box<RawValue>> = serde_json::from_slice(raw)?;
    elements
        .iter()
        .map(|element| decode(element.get().as_bytes()))
        .collect()
}

/// Serde adapter for fields holding a list of positional records
///
/// Use as `#[serde(deserialize_with = "positional::records")]`.
pub fn records<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: PositionalRecord,
{
    let elements = Vec::<Box<RawValue>>::deserialize(deserializer)?;
    elements
        .iter()
        .map(|element| decode(element.get().as_bytes()).map_err(D::Error::custom))
        .collect()
}
