use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Identifier of an item in the store.
///
/// An id is either an integer or a string, and the two kinds never compare
/// equal: `ItemId::Int(1)` and `ItemId::Str("1")` name different items and
/// may coexist in the same store. Serialized untagged, so JSON `1` becomes
/// [`ItemId::Int`] and JSON `"1"` becomes [`ItemId::Str`].
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Int(i64),
    Str(String),
}

impl ItemId {
    /// Returns `true` for integer ids.
    pub fn is_int(&self) -> bool {
        matches!(self, Self::Int(_))
    }

    /// Unambiguous string form used as a grid row key: `i:1` or `s:1`.
    pub fn row_key(&self) -> String {
        match self {
            Self::Int(n) => format!("i:{n}"),
            Self::Str(s) => format!("s:{s}"),
        }
    }

    /// Parse user input: integers become [`ItemId::Int`], anything else
    /// becomes [`ItemId::Str`]. With `force_string` the input is always a
    /// string id.
    pub fn parse_loose(input: &str, force_string: bool) -> Self {
        if !force_string {
            if let Ok(n) = input.parse::<i64>() {
                return Self::Int(n);
            }
        }
        Self::Str(input.to_string())
    }
}

/// Parses the [`row_key`](ItemId::row_key) form.
impl FromStr for ItemId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(rest) = s.strip_prefix("i:") {
            return rest
                .parse::<i64>()
                .map(Self::Int)
                .map_err(|_| TypeError::InvalidInteger(rest.to_string()));
        }
        if let Some(rest) = s.strip_prefix("s:") {
            return Ok(Self::Str(rest.to_string()));
        }
        Err(TypeError::InvalidRowKey(s.to_string()))
    }
}

impl fmt::Debug for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Str(s) => write!(f, "{s:?}"),
        }
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ItemId {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for ItemId {
    fn from(n: i32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}
