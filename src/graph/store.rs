//! Assembled interaction graph
//!
//! An [`InteractionGraph`] is produced once by [`simplify`](super::simplify())
//! and is read-only afterwards. It is kept in canonical form:
//! - vertices are unique gene symbols in lexicographic order, the position of
//!   a symbol is its [`VertexId`]
//! - edges are unique per endpoint pair (canonicalized when undirected), never
//!   self-loops, and ordered by key
//!
//! Canonical form makes equality structural and makes the result independent
//! of the order in which raw records were read.

use super::edge::EdgeRef;
use super::property::AttributeMap;
use super::types::{EdgeKey, VertexId};
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

/// Errors that can occur during graph operations
#[derive(Error, Debug, PartialEq)]
pub enum GraphError {
    #[error("Vertex {0} not found")]
    VertexNotFound(VertexId),

    #[error("Invalid edge: source vertex {0} does not exist")]
    InvalidEdgeSource(VertexId),

    #[error("Invalid edge: target vertex {0} does not exist")]
    InvalidEdgeTarget(VertexId),

    #[error("Graph invariant violated: {0}")]
    InvariantViolation(String),
}

pub type GraphResult<T> = Result<T, GraphError>;

/// Simplified, read-only protein-protein interaction graph
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InteractionGraph {
    /// Directedness is a property of the whole graph
    directed: bool,

    /// Vertex registry: symbol <-> dense id
    vertices: IndexSet<String>,

    /// Edge set keyed by endpoint pair
    edges: IndexMap<EdgeKey, AttributeMap>,

    /// Attribute columns declared on this graph's edges
    attribute_columns: BTreeSet<String>,
}

impl InteractionGraph {
    /// Create an empty graph
    pub fn new(directed: bool) -> Self {
        InteractionGraph {
            directed,
            ..Default::default()
        }
    }

    /// Assemble a graph from parts that are already in canonical form.
    ///
    /// Every invariant is checked; nothing is repaired.
    pub fn from_parts(
        directed: bool,
        vertices: Vec<String>,
        edges: Vec<(EdgeKey, AttributeMap)>,
        attribute_columns: BTreeSet<String>,
    ) -> GraphResult<Self> {
        for pair in vertices.windows(2) {
            if pair[0] >= pair[1] {
                return Err(GraphError::InvariantViolation(format!(
                    "vertices not strictly ordered at '{}' / '{}'",
                    pair[0], pair[1]
                )));
            }
        }
        let n = vertices.len();
        for (key, attributes) in &edges {
            if key.source.index() >= n {
                return Err(GraphError::InvalidEdgeSource(key.source));
            }
            if key.target.index() >= n {
                return Err(GraphError::InvalidEdgeTarget(key.target));
            }
            if key.is_self_loop() {
                return Err(GraphError::InvariantViolation(format!("self-loop {}", key)));
            }
            if *key != EdgeKey::new(key.source, key.target, directed) {
                return Err(GraphError::InvariantViolation(format!(
                    "undirected edge {} is not canonical",
                    key
                )));
            }
            if let Some(column) = attributes.keys().find(|k| !attribute_columns.contains(*k)) {
                return Err(GraphError::InvariantViolation(format!(
                    "edge {} carries undeclared attribute '{}'",
                    key, column
                )));
            }
        }
        for pair in edges.windows(2) {
            if pair[0].0 >= pair[1].0 {
                return Err(GraphError::InvariantViolation(format!(
                    "edges not strictly ordered at {}",
                    pair[1].0
                )));
            }
        }

        Ok(Self::from_canonical_parts(
            directed,
            vertices,
            edges,
            attribute_columns,
        ))
    }

    /// Unchecked counterpart of [`InteractionGraph::from_parts`] for callers
    /// that produce canonical parts by construction.
    pub(crate) fn from_canonical_parts(
        directed: bool,
        vertices: Vec<String>,
        edges: Vec<(EdgeKey, AttributeMap)>,
        attribute_columns: BTreeSet<String>,
    ) -> Self {
        InteractionGraph {
            directed,
            vertices: vertices.into_iter().collect(),
            edges: edges.into_iter().collect(),
            attribute_columns,
        }
    }

    /// Whether edges are ordered pairs
    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// Get number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get number of edges
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// A graph without edges is a valid, degenerate result
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Resolve a gene symbol to its vertex id
    pub fn vertex_id(&self, symbol: &str) -> Option<VertexId> {
        self.vertices
            .get_index_of(symbol)
            .map(|idx| VertexId::new(idx as u32))
    }

    /// Resolve a vertex id back to its gene symbol
    pub fn symbol(&self, id: VertexId) -> Option<&str> {
        self.vertices.get_index(id.index()).map(String::as_str)
    }

    /// Check if a gene symbol is a vertex of this graph
    pub fn contains_vertex(&self, symbol: &str) -> bool {
        self.vertices.contains(symbol)
    }

    /// All vertex symbols in id order
    pub fn vertices(&self) -> impl Iterator<Item = &str> + '_ {
        self.vertices.iter().map(String::as_str)
    }

    /// Edge keys with their attributes, in canonical order
    pub fn edge_entries(&self) -> impl Iterator<Item = (&EdgeKey, &AttributeMap)> + '_ {
        self.edges.iter()
    }

    /// All edges with endpoints resolved to symbols
    pub fn edges(&self) -> impl Iterator<Item = EdgeRef<'_>> + '_ {
        self.edges.iter().map(move |(key, attributes)| EdgeRef {
            source: &self.vertices[key.source.index()],
            target: &self.vertices[key.target.index()],
            attributes,
        })
    }

    /// Attributes of the edge between two symbols.
    /// Orientation is ignored for undirected graphs.
    pub fn edge(&self, source: &str, target: &str) -> Option<&AttributeMap> {
        let key = EdgeKey::new(self.vertex_id(source)?, self.vertex_id(target)?, self.directed);
        self.edges.get(&key)
    }

    /// Check if an edge exists between two symbols
    pub fn has_edge(&self, source: &str, target: &str) -> bool {
        self.edge(source, target).is_some()
    }

    /// Symbols adjacent to `symbol`, ignoring direction, in id order.
    ///
    /// Scans the edge set; traversals should go through a
    /// [`GraphView`](interactome_graph_algorithms::GraphView) instead.
    pub fn neighbors(&self, symbol: &str) -> Vec<&str> {
        let Some(id) = self.vertex_id(symbol) else {
            return Vec::new();
        };
        let mut adjacent: BTreeSet<VertexId> = BTreeSet::new();
        for key in self.edges.keys() {
            if key.source == id {
                adjacent.insert(key.target);
            } else if key.target == id {
                adjacent.insert(key.source);
            }
        }
        adjacent
            .into_iter()
            .map(|v| self.vertices[v.index()].as_str())
            .collect()
    }

    /// Attribute columns declared on this graph's edges
    pub fn attribute_columns(&self) -> &BTreeSet<String> {
        &self.attribute_columns
    }

    /// Subgraph induced by the given symbols; unknown symbols are ignored.
    /// Attributes and directedness are preserved.
    pub fn induced_subgraph<'s, I>(&self, symbols: I) -> InteractionGraph
    where
        I: IntoIterator<Item = &'s str>,
    {
        let keep: BTreeSet<VertexId> = symbols
            .into_iter()
            .filter_map(|s| self.vertex_id(s))
            .collect();

        let mut list = super::simplify::EdgeList::new(self.directed);
        for column in &self.attribute_columns {
            list.declare_attribute(column.clone());
        }
        for id in &keep {
            list.add_vertex(&self.vertices[id.index()]);
        }
        for (key, attributes) in &self.edges {
            if keep.contains(&key.source) && keep.contains(&key.target) {
                list.add_edge(
                    &self.vertices[key.source.index()],
                    &self.vertices[key.target.index()],
                    attributes.clone(),
                );
            }
        }
        super::simplify::simplify(list, super::simplify::CombineRule::Max)
    }

    /// Re-simplify this graph; a no-op on attributes under `Max`
    pub fn simplify(&self, rule: super::simplify::CombineRule) -> InteractionGraph {
        super::simplify::simplify(super::simplify::EdgeList::from(self), rule)
    }

    /// Size and connectivity overview
    pub fn summary(&self) -> GraphSummary {
        let view = crate::algo::build_view(self);
        let wcc = crate::algo::weakly_connected_components(&view);
        GraphSummary {
            directed: self.directed,
            vertex_count: self.vertex_count(),
            edge_count: self.edge_count(),
            attribute_columns: self.attribute_columns.iter().cloned().collect(),
            component_count: wcc.component_count(),
            largest_component: wcc.largest_component_size(),
        }
    }
}

/// One-line overview of a graph, logged after every assembly
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphSummary {
    pub directed: bool,
    pub vertex_count: usize,
    pub edge_count: usize,
    pub attribute_columns: Vec<String>,
    pub component_count: usize,
    pub largest_component: usize,
}

impl fmt::Display for GraphSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} -- {} | {} components, largest {}",
            if self.directed { "D---" } else { "U---" },
            self.vertex_count,
            self.edge_count,
            if self.attribute_columns.is_empty() {
                "no attributes".to_string()
            } else {
                self.attribute_columns.join(", ")
            },
            self.component_count,
            self.largest_component
        )
    }
}
