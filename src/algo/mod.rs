//! Graph algorithms module
//!
//! Algorithms are implemented in the `interactome-graph-algorithms` crate.
//! This module provides the integration/adapter layer between symbol-keyed
//! interaction graphs and the dense topology view the algorithms run on.

use crate::graph::{InteractionGraph, VertexId};

// Re-export algorithms
pub use interactome_graph_algorithms::{
    bfs, bfs_distances, bfs_distances_batch, weakly_connected_components, BfsLimits, Direction,
    GraphView, PathResult, WccResult,
};

/// Build a GraphView from an interaction graph for algorithm execution.
///
/// Vertex ids are dense already, so view index `i` is vertex id `i`.
/// Undirected edges are stored in both orientations.
pub fn build_view(graph: &InteractionGraph) -> GraphView {
    let node_count = graph.vertex_count();
    let edges: Vec<(usize, usize)> = graph
        .edge_entries()
        .map(|(key, _)| (key.source.index(), key.target.index()))
        .collect();

    GraphView::from_edges(node_count, &edges, graph.is_directed())
}

/// Hop-count shortest path between two symbols, as the list of symbols along
/// the path (both endpoints included). `None` when either symbol is missing
/// or no path exists.
pub fn shortest_path(graph: &InteractionGraph, from: &str, to: &str) -> Option<Vec<String>> {
    let source = graph.vertex_id(from)?;
    let target = graph.vertex_id(to)?;
    let view = build_view(graph);

    // Undirected views are symmetric, so Outgoing follows edges either way
    let result = bfs(&view, source.as_u32(), target.as_u32(), Direction::Outgoing)?;

    result
        .path
        .into_iter()
        .map(|node| graph.symbol(VertexId::new(node)).map(str::to_string))
        .collect()
}
