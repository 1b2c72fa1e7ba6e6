//! Edge representations
//!
//! [`Edge`] is the raw record a source builder stages before simplification,
//! so several of them may describe the same endpoint pair. [`EdgeRef`] is the
//! borrowed, symbol-resolved view handed out by an assembled graph.

use super::property::AttributeMap;
use super::types::VertexId;
use serde::{Deserialize, Serialize};

/// A raw edge between two vertices of a staging edge list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Source vertex (the only meaningful orientation for directed graphs)
    pub source: VertexId,

    /// Target vertex
    pub target: VertexId,

    /// Attributes associated with this edge
    pub attributes: AttributeMap,
}

impl Edge {
    /// Create a new edge with attributes
    pub fn with_attributes(source: VertexId, target: VertexId, attributes: AttributeMap) -> Self {
        Edge {
            source,
            target,
            attributes,
        }
    }
}

/// Borrowed view of an assembled edge with endpoints resolved to symbols
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeRef<'a> {
    pub source: &'a str,
    pub target: &'a str,
    pub attributes: &'a AttributeMap,
}
