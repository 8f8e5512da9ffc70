use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;

pub mod error;
pub mod model;
pub mod presentation;
pub mod snapshot;

pub use error::{ModelError, SnapshotError};
pub use model::{Edge, InfluenceGraph, Node};
pub use presentation::{Color, EdgePresentation, EdgeStyle, NodePresentation, NodeShape};
pub use snapshot::{DocumentSnapshot, GraphSnapshot, ViewSnapshot};

/// Prefix used for every key handed out by [`InfluenceGraph::add_node`].
pub const NODE_KEY_PREFIX: &str = "F";

/// Stable identity of a factor. Keys are never reused or renamed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeKey(String);

impl NodeKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub(crate) fn from_counter(counter: u64) -> Self {
        Self(format!("{NODE_KEY_PREFIX}{counter}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric part following the alphabetic prefix, e.g. `7` for `F7`.
    pub fn numeric_suffix(&self) -> Option<u64> {
        let digits = self.0.trim_start_matches(|c: char| c.is_alphabetic());
        if digits.is_empty() {
            return None;
        }
        digits.parse().ok()
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Deref for NodeKey {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for NodeKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for NodeKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl PartialEq<str> for NodeKey {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for NodeKey {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_suffix() {
        assert_eq!(NodeKey::new("F12").numeric_suffix(), Some(12));
        assert_eq!(NodeKey::new("Factor3").numeric_suffix(), Some(3));
        assert_eq!(NodeKey::new("F").numeric_suffix(), None);
        assert_eq!(NodeKey::new("F1a").numeric_suffix(), None);
        assert_eq!(NodeKey::new("42").numeric_suffix(), Some(42));
    }

    #[test]
    fn test_key_serializes_as_plain_string() {
        let json = serde_json::to_string(&NodeKey::from_counter(4)).unwrap();
        assert_eq!(json, r#""F4""#);
    }
}
