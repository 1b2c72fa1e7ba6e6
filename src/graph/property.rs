//! Edge attribute values
//!
//! Interaction sources attach a handful of per-edge columns (`score` for
//! confidence networks, `interaction` for signed networks, `weight` on
//! extracted subgraphs). Values are kept in an ordered map so two graphs with
//! the same attributes compare and serialize identically.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

/// Name of the confidence score column (0..=1000)
pub const SCORE: &str = "score";
/// Name of the interaction sign column (+1 stimulation, -1 inhibition)
pub const INTERACTION: &str = "interaction";
/// Name of the correlation weight column on extracted subgraphs
pub const WEIGHT: &str = "weight";

/// Attribute value attached to an edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl AttributeValue {
    /// Get integer value if this is an integer
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            AttributeValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric value, integers widened to f64
    pub fn as_float(&self) -> Option<f64> {
        match self {
            AttributeValue::Integer(i) => Some(*i as f64),
            AttributeValue::Float(f) => Some(*f),
            AttributeValue::Text(_) => None,
        }
    }

    /// Get text value if this is text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get type name as string
    pub fn type_name(&self) -> &'static str {
        match self {
            AttributeValue::Integer(_) => "Integer",
            AttributeValue::Float(_) => "Float",
            AttributeValue::Text(_) => "Text",
        }
    }

    /// Total order used by the `max` combine rule.
    ///
    /// Numbers compare numerically (an integer and a float of equal value
    /// order the float last), every number orders before any text, and text
    /// compares lexicographically. The order is total so the combined value
    /// never depends on the order duplicates were seen in.
    pub fn combine_cmp(&self, other: &AttributeValue) -> Ordering {
        use AttributeValue::*;
        match (self, other) {
            (Text(a), Text(b)) => a.cmp(b),
            (Text(_), _) => Ordering::Greater,
            (_, Text(_)) => Ordering::Less,
            (Integer(a), Integer(b)) => a.cmp(b),
            (a, b) => {
                let (x, y) = (a.as_float().unwrap_or(0.0), b.as_float().unwrap_or(0.0));
                x.total_cmp(&y).then_with(|| a.type_rank().cmp(&b.type_rank()))
            }
        }
    }

    /// The larger of two values under [`AttributeValue::combine_cmp`]
    pub fn max_of(self, other: AttributeValue) -> AttributeValue {
        match self.combine_cmp(&other) {
            Ordering::Less => other,
            _ => self,
        }
    }

    fn type_rank(&self) -> u8 {
        match self {
            AttributeValue::Integer(_) => 0,
            AttributeValue::Float(_) => 1,
            AttributeValue::Text(_) => 2,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Integer(i) => write!(f, "{}", i),
            AttributeValue::Float(fl) => write!(f, "{}", fl),
            AttributeValue::Text(s) => write!(f, "\"{}\"", s),
        }
    }
}

// Convenience conversions
impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        AttributeValue::Text(s)
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        AttributeValue::Text(s.to_string())
    }
}

impl From<i64> for AttributeValue {
    fn from(i: i64) -> Self {
        AttributeValue::Integer(i)
    }
}

impl From<i32> for AttributeValue {
    fn from(i: i32) -> Self {
        AttributeValue::Integer(i as i64)
    }
}

impl From<f64> for AttributeValue {
    fn from(f: f64) -> Self {
        AttributeValue::Float(f)
    }
}

/// Attribute map for storing edge attributes
pub type AttributeMap = BTreeMap<String, AttributeValue>;
