//! Pathfinding algorithms
//!
//! Unweighted (hop count) shortest paths and breadth-first distance maps.

use super::common::{Direction, GraphView, NodeId};
use rayon::prelude::*;
use std::collections::VecDeque;

/// Result of a pathfinding algorithm
#[derive(Debug, Clone)]
pub struct PathResult {
    pub source: NodeId,
    pub target: NodeId,
    pub path: Vec<NodeId>,
    pub cost: f64,
}

/// Limits applied to a breadth-first expansion.
#[derive(Debug, Clone, Copy, Default)]
pub struct BfsLimits<'a> {
    /// Stop expanding once this many hops have been reached
    pub max_depth: Option<u32>,
    /// Nodes (by index) that are never entered nor used as seeds
    pub blocked: Option<&'a [bool]>,
}

impl BfsLimits<'_> {
    fn is_blocked(&self, idx: usize) -> bool {
        self.blocked.map_or(false, |b| b.get(idx).copied().unwrap_or(false))
    }
}

/// Breadth-First Search (Unweighted Shortest Path)
pub fn bfs(
    view: &GraphView,
    source: NodeId,
    target: NodeId,
    direction: Direction,
) -> Option<PathResult> {
    let source_idx = view.index_of(source)?;
    let target_idx = view.index_of(target)?;

    let mut queue = VecDeque::new();
    // index -> parent index, usize::MAX marks the root
    let mut parent = vec![None; view.node_count];

    queue.push_back(source_idx);
    parent[source_idx] = Some(usize::MAX);

    while let Some(current_idx) = queue.pop_front() {
        if current_idx == target_idx {
            // Reconstruct path
            let mut path = Vec::new();
            let mut curr = target_idx;
            loop {
                path.push(view.index_to_node[curr]);
                match parent[curr] {
                    Some(p) if p != usize::MAX => curr = p,
                    _ => break,
                }
            }
            path.reverse();
            return Some(PathResult {
                source,
                target,
                cost: (path.len() - 1) as f64,
                path,
            });
        }

        for next_idx in view.neighbors(current_idx, direction) {
            if parent[next_idx].is_none() {
                parent[next_idx] = Some(current_idx);
                queue.push_back(next_idx);
            }
        }
    }

    None
}

/// Multi-source breadth-first distances.
///
/// Returns, for every node index, the hop count to the nearest of `sources`
/// (`Some(0)` for the sources themselves) or `None` when unreachable within
/// `limits`. Out-of-range and blocked sources are ignored.
pub fn bfs_distances(
    view: &GraphView,
    sources: &[usize],
    direction: Direction,
    limits: BfsLimits<'_>,
) -> Vec<Option<u32>> {
    let mut dist = vec![None; view.node_count];
    let mut queue = VecDeque::new();

    for &s in sources {
        if s < view.node_count && !limits.is_blocked(s) && dist[s].is_none() {
            dist[s] = Some(0);
            queue.push_back(s);
        }
    }

    while let Some(current) = queue.pop_front() {
        let d = dist[current].unwrap_or(0);
        if limits.max_depth.map_or(false, |max| d >= max) {
            continue;
        }
        for next in view.neighbors(current, direction) {
            if dist[next].is_none() && !limits.is_blocked(next) {
                dist[next] = Some(d + 1);
                queue.push_back(next);
            }
        }
    }

    dist
}

/// Run [`bfs_distances`] for many independent seed sets in parallel.
///
/// The view is only read, so every seed set is expanded on its own worker.
pub fn bfs_distances_batch(
    view: &GraphView,
    seed_sets: &[Vec<usize>],
    direction: Direction,
) -> Vec<Vec<Option<u32>>> {
    seed_sets
        .par_iter()
        .map(|seeds| bfs_distances(view, seeds, direction, BfsLimits::default()))
        .collect()
}
