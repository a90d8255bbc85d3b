//! Token identifiers.
//!
//! NFT token ids are non-negative integers. Callers hand them over as plain
//! `i64` values or as text; [`TokenId`] is the checked form used to build
//! document paths, so a negative or non-integer id is rejected before any
//! request is made.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// A validated, non-negative token id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenId(u64);

impl TokenId {
    /// Wrap a raw id.
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// The numeric value.
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for TokenId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl TryFrom<i64> for TokenId {
    type Error = Error;

    fn try_from(id: i64) -> Result<Self, Self::Error> {
        u64::try_from(id).map(Self).map_err(|_| {
            Error::invalid_input(format!("Token ID must be a non-negative integer, got {id}"))
        })
    }
}

impl FromStr for TokenId {
    type Err = Error;

    /// Parse a decimal token id. `"1.5"`, `"-1"` and `"abc"` are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.parse::<i64>() {
            Ok(id) => Self::try_from(id),
            Err(_) => Err(Error::invalid_input(format!(
                "Token ID must be a non-negative integer, got {trimmed:?}"
            ))),
        }
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
