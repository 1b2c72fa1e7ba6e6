//! Edge staging and simplification
//!
//! Source builders push raw records into an [`EdgeList`], which may hold any
//! number of parallel, anti-parallel or self-looping edges. [`simplify`]
//! collapses it into an [`InteractionGraph`] with at most one edge per
//! endpoint pair, merging attributes with an explicit [`CombineRule`].

use super::edge::Edge;
use super::property::AttributeMap;
use super::store::{GraphError, GraphResult, InteractionGraph};
use super::types::{EdgeKey, VertexId};
use indexmap::IndexSet;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::BTreeSet;
use tracing::debug;

/// How attributes of duplicate edges are merged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CombineRule {
    /// Presence only: duplicates collapse and every attribute is dropped
    None,
    /// Keep the maximum value of each attribute across duplicates
    Max,
}

/// Staging multigraph filled by source builders
#[derive(Debug, Clone, Default)]
pub struct EdgeList {
    directed: bool,
    vertices: IndexSet<String>,
    edges: Vec<Edge>,
    attribute_columns: BTreeSet<String>,
}

impl EdgeList {
    pub fn new(directed: bool) -> Self {
        EdgeList {
            directed,
            ..Default::default()
        }
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Declare an edge attribute column, even if no edge ends up carrying it
    pub fn declare_attribute(&mut self, name: impl Into<String>) {
        self.attribute_columns.insert(name.into());
    }

    /// Intern a symbol, returning its staging id
    pub fn add_vertex(&mut self, symbol: &str) -> VertexId {
        match self.vertices.get_index_of(symbol) {
            Some(idx) => VertexId::new(idx as u32),
            None => {
                let (idx, _) = self.vertices.insert_full(symbol.to_string());
                VertexId::new(idx as u32)
            }
        }
    }

    /// Add an edge between two symbols, interning both
    pub fn add_edge(&mut self, source: &str, target: &str, attributes: AttributeMap) {
        let s = self.add_vertex(source);
        let t = self.add_vertex(target);
        self.push(Edge::with_attributes(s, t, attributes));
    }

    /// Add an edge between already interned vertices
    pub fn add_edge_ids(
        &mut self,
        source: VertexId,
        target: VertexId,
        attributes: AttributeMap,
    ) -> GraphResult<()> {
        if source.index() >= self.vertices.len() {
            return Err(GraphError::InvalidEdgeSource(source));
        }
        if target.index() >= self.vertices.len() {
            return Err(GraphError::InvalidEdgeTarget(target));
        }
        self.push(Edge::with_attributes(source, target, attributes));
        Ok(())
    }

    fn push(&mut self, edge: Edge) {
        for key in edge.attributes.keys() {
            if !self.attribute_columns.contains(key) {
                self.attribute_columns.insert(key.clone());
            }
        }
        self.edges.push(edge);
    }
}

impl From<&InteractionGraph> for EdgeList {
    fn from(graph: &InteractionGraph) -> Self {
        let mut list = EdgeList::new(graph.is_directed());
        list.attribute_columns = graph.attribute_columns().clone();
        for symbol in graph.vertices() {
            list.add_vertex(symbol);
        }
        // Ids line up because vertices were interned in graph order
        for (key, attributes) in graph.edge_entries() {
            list.edges
                .push(Edge::with_attributes(key.source, key.target, attributes.clone()));
        }
        list
    }
}

/// Collapse duplicate edges of `list` into a canonical [`InteractionGraph`].
///
/// Self-loops are always dropped. Isolated vertices are kept. With
/// [`CombineRule::None`] the result carries no attributes at all. The output
/// does not depend on the order of vertices or edges in `list`.
pub fn simplify(list: EdgeList, rule: CombineRule) -> InteractionGraph {
    let EdgeList {
        directed,
        vertices,
        edges,
        attribute_columns,
    } = list;
    let raw_edges = edges.len();
    let mut self_loops = 0usize;
    let mut duplicates = 0usize;

    // Canonical vertex order first, so keys are built on final ids
    let mut order: Vec<usize> = (0..vertices.len()).collect();
    order.sort_unstable_by(|&a, &b| vertices[a].cmp(&vertices[b]));
    let mut remap = vec![VertexId::new(0); vertices.len()];
    for (new_idx, &old_idx) in order.iter().enumerate() {
        remap[old_idx] = VertexId::new(new_idx as u32);
    }

    let mut merged: FxHashMap<EdgeKey, AttributeMap> = FxHashMap::default();
    for edge in edges {
        let key = EdgeKey::new(
            remap[edge.source.index()],
            remap[edge.target.index()],
            directed,
        );
        if key.is_self_loop() {
            self_loops += 1;
            continue;
        }
        match merged.entry(key) {
            Entry::Occupied(mut slot) => {
                duplicates += 1;
                if rule == CombineRule::Max {
                    combine_max(slot.get_mut(), edge.attributes);
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(match rule {
                    CombineRule::None => AttributeMap::new(),
                    CombineRule::Max => edge.attributes,
                });
            }
        }
    }

    let mut sorted_edges: Vec<(EdgeKey, AttributeMap)> = merged.into_iter().collect();
    sorted_edges.sort_unstable_by(|a, b| a.0.cmp(&b.0));

    let mut sorted_vertices: Vec<String> = vertices.into_iter().collect();
    sorted_vertices.sort_unstable();

    let columns = match rule {
        CombineRule::None => BTreeSet::new(),
        CombineRule::Max => attribute_columns,
    };

    debug!(
        raw_edges,
        self_loops,
        duplicates,
        edges = sorted_edges.len(),
        ?rule,
        "Simplified edge list"
    );

    InteractionGraph::from_canonical_parts(directed, sorted_vertices, sorted_edges, columns)
}

fn combine_max(current: &mut AttributeMap, incoming: AttributeMap) {
    for (name, value) in incoming {
        match current.remove(&name) {
            Some(existing) => {
                current.insert(name, existing.max_of(value));
            }
            None => {
                current.insert(name, value);
            }
        }
    }
}
