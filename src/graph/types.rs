//! Core type definitions for interaction graphs

use serde::{Deserialize, Serialize};
use std::fmt;

/// Dense identifier of a vertex (gene symbol) inside one graph.
///
/// Ids are only meaningful for the graph that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct VertexId(pub u32);

impl VertexId {
    pub fn new(id: u32) -> Self {
        VertexId(id)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VertexId({})", self.0)
    }
}

impl From<u32> for VertexId {
    fn from(id: u32) -> Self {
        VertexId(id)
    }
}

/// Endpoint pair identifying an edge.
///
/// For undirected graphs the pair is canonicalized so that `source <= target`,
/// which makes `(A, B)` and `(B, A)` the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct EdgeKey {
    pub source: VertexId,
    pub target: VertexId,
}

impl EdgeKey {
    pub fn new(source: VertexId, target: VertexId, directed: bool) -> Self {
        if directed || source <= target {
            EdgeKey { source, target }
        } else {
            EdgeKey { source: target, target: source }
        }
    }

    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.source.0, self.target.0)
    }
}
