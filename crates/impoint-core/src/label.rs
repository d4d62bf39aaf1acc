//! Label domain types.
//!
//! A category column carries labels from exactly one of two domains:
//! integers or text. The domain is inferred at construction time and
//! anything mixed is rejected at the ingestion boundary.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A categorical label value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Label {
    Int(i64),
    Text(String),
}

impl Label {
    /// The domain this label belongs to.
    pub fn domain(&self) -> LabelDomain {
        match self {
            Label::Int(_) => LabelDomain::Integer,
            Label::Text(_) => LabelDomain::Text,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Int(v) => write!(f, "{}", v),
            Label::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for Label {
    fn from(v: i64) -> Self {
        Label::Int(v)
    }
}

impl From<&str> for Label {
    fn from(s: &str) -> Self {
        Label::Text(s.to_string())
    }
}

impl From<String> for Label {
    fn from(s: String) -> Self {
        Label::Text(s)
    }
}

/// The value domain of a category column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LabelDomain {
    Integer,
    Text,
}
