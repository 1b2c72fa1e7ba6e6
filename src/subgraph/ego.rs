//! Ego subgraph extraction around a seed gene

use super::weights::CorrelationWeights;
use crate::algo::{bfs_distances, build_view, BfsLimits, Direction};
use crate::graph::{
    simplify, AttributeMap, AttributeValue, CombineRule, EdgeList, InteractionGraph, VertexId,
    WEIGHT,
};
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{info, warn};

/// Parameters of one extraction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EgoQuery {
    pub seed: String,
    /// Maximum hop distance from the seed
    pub hops: u32,
    /// Edges with `|weight|` below this are dropped
    pub weight_threshold: f64,
    /// Never part of the subgraph, nor traversed through
    pub exclude: BTreeSet<String>,
    /// Keep vertices left without edges after weight filtering
    pub keep_isolated: bool,
}

impl EgoQuery {
    pub fn new(seed: impl Into<String>) -> Self {
        EgoQuery {
            seed: seed.into(),
            hops: 1,
            weight_threshold: 0.0,
            exclude: BTreeSet::new(),
            keep_isolated: false,
        }
    }

    pub fn hops(mut self, hops: u32) -> Self {
        self.hops = hops;
        self
    }

    pub fn weight_threshold(mut self, threshold: f64) -> Self {
        self.weight_threshold = threshold;
        self
    }

    pub fn exclude<I, S>(mut self, genes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude.extend(genes.into_iter().map(Into::into));
        self
    }

    pub fn keep_isolated(mut self, keep: bool) -> Self {
        self.keep_isolated = keep;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EgoStatus {
    Extracted,
    SeedNotInGraph,
    SeedExcluded,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EgoVertex {
    pub symbol: String,
    pub hops: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EgoEdge {
    pub source: String,
    pub target: String,
    pub weight: f64,
    /// Attributes carried over from the interaction graph
    pub attributes: AttributeMap,
}

/// Weighted neighborhood of a seed, ready for rendering.
///
/// Vertices are ordered seed first, then by hop distance, then by symbol.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EgoSubgraph {
    pub seed: String,
    pub status: EgoStatus,
    pub directed: bool,
    pub vertices: Vec<EgoVertex>,
    pub edges: Vec<EgoEdge>,
}

impl EgoSubgraph {
    fn empty(seed: &str, status: EgoStatus, directed: bool) -> Self {
        EgoSubgraph {
            seed: seed.to_string(),
            status,
            directed,
            vertices: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn contains_vertex(&self, symbol: &str) -> bool {
        self.vertices.iter().any(|v| v.symbol == symbol)
    }

    pub fn hops_of(&self, symbol: &str) -> Option<u32> {
        self.vertices
            .iter()
            .find(|v| v.symbol == symbol)
            .map(|v| v.hops)
    }

    /// The subgraph as an interaction graph with a `weight` column
    pub fn to_graph(&self) -> InteractionGraph {
        let mut list = EdgeList::new(self.directed);
        list.declare_attribute(WEIGHT);
        for vertex in &self.vertices {
            list.add_vertex(&vertex.symbol);
        }
        for edge in &self.edges {
            let mut attributes = edge.attributes.clone();
            attributes.insert(WEIGHT.to_string(), AttributeValue::Float(edge.weight));
            list.add_edge(&edge.source, &edge.target, attributes);
        }
        simplify(list, CombineRule::Max)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Extract the weighted ego subgraph of `query.seed`.
///
/// Expansion ignores edge direction and never enters excluded vertices. Of
/// the edges induced on the visited vertices, those without a weight or with
/// `|weight| < weight_threshold` are dropped. A missing or excluded seed
/// yields an empty subgraph with the matching status.
pub fn extract_ego_subgraph(
    graph: &InteractionGraph,
    weights: &CorrelationWeights,
    query: &EgoQuery,
) -> EgoSubgraph {
    let directed = graph.is_directed();
    if query.exclude.contains(&query.seed) {
        warn!(seed = %query.seed, "Seed is excluded, nothing to extract");
        return EgoSubgraph::empty(&query.seed, EgoStatus::SeedExcluded, directed);
    }
    let Some(seed) = graph.vertex_id(&query.seed) else {
        warn!(seed = %query.seed, "Seed not in graph");
        return EgoSubgraph::empty(&query.seed, EgoStatus::SeedNotInGraph, directed);
    };

    let mut blocked = vec![false; graph.vertex_count()];
    for id in query.exclude.iter().filter_map(|s| graph.vertex_id(s)) {
        blocked[id.index()] = true;
    }

    let view = build_view(graph);
    let direction = if directed {
        Direction::Both
    } else {
        Direction::Outgoing
    };
    let limits = BfsLimits {
        max_depth: Some(query.hops),
        blocked: Some(&blocked),
    };
    let hops = bfs_distances(&view, &[seed.index()], direction, limits);

    let mut unweighted = 0usize;
    let mut weak = 0usize;
    let mut touched = vec![false; graph.vertex_count()];
    let mut edges = Vec::new();
    for (key, attributes) in graph.edge_entries() {
        let (s, t) = (key.source.index(), key.target.index());
        if hops[s].is_none() || hops[t].is_none() {
            continue;
        }
        let (Some(source), Some(target)) = (graph.symbol(key.source), graph.symbol(key.target))
        else {
            continue;
        };
        let Some(weight) = weights.get(source, target) else {
            unweighted += 1;
            continue;
        };
        if weight.abs() < query.weight_threshold {
            weak += 1;
            continue;
        }
        touched[s] = true;
        touched[t] = true;
        edges.push(EgoEdge {
            source: source.to_string(),
            target: target.to_string(),
            weight,
            attributes: attributes.clone(),
        });
    }

    let mut vertices: Vec<EgoVertex> = hops
        .iter()
        .enumerate()
        .filter_map(|(idx, h)| {
            let h = (*h)?;
            let keep = idx == seed.index() || query.keep_isolated || touched[idx];
            keep.then(|| (idx, h))
        })
        .filter_map(|(idx, h)| {
            graph.symbol(VertexId::new(idx as u32)).map(|symbol| EgoVertex {
                symbol: symbol.to_string(),
                hops: h,
            })
        })
        .collect();
    // seed is the only vertex at hop 0
    vertices.sort_by(|a, b| a.hops.cmp(&b.hops).then_with(|| a.symbol.cmp(&b.symbol)));

    info!(
        seed = %query.seed,
        hops = query.hops,
        vertices = vertices.len(),
        edges = edges.len(),
        unweighted,
        weak,
        "Extracted ego subgraph"
    );

    EgoSubgraph {
        seed: query.seed.clone(),
        status: EgoStatus::Extracted,
        directed,
        vertices,
        edges,
    }
}
