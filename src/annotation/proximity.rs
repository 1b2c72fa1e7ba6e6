//! Drug target to gene proximity in the PPI graph

use super::association::AssociationRow;
use super::drug_targets::DrugTargets;
use crate::algo::{build_view, bfs_distances_batch, Direction};
use crate::graph::InteractionGraph;
use crate::sources::{build_biogrid_ppi, BiogridFilter, BiogridInteraction};
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::{debug, info};

/// Distances at or beyond this many hops share one category
pub const DEFAULT_TARGET_THRES: u32 = 3;

/// Drugs searched per parallel batch; bounds the distance vectors held at once
const DRUG_BATCH: usize = 64;

/// Hop distance between a drug's targets and a gene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GraphDistance {
    Hops(u32),
    NoPath,
}

impl GraphDistance {
    pub fn hops(&self) -> Option<u32> {
        match self {
            GraphDistance::Hops(h) => Some(*h),
            GraphDistance::NoPath => None,
        }
    }
}

impl fmt::Display for GraphDistance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphDistance::Hops(h) => write!(f, "{}", h),
            GraphDistance::NoPath => f.write_str("no-path"),
        }
    }
}

impl Serialize for GraphDistance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            GraphDistance::Hops(h) => serializer.serialize_u32(*h),
            GraphDistance::NoPath => serializer.serialize_none(),
        }
    }
}

/// Discretized proximity: `T`, `1`, `2`, ..., `{thres}+`, `-`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProximityCategory {
    Target,
    Hops(u32),
    /// At least this many hops
    Distal(u32),
    NoPath,
}

impl ProximityCategory {
    pub fn from_distance(distance: GraphDistance, target_thres: u32) -> Self {
        match distance {
            GraphDistance::Hops(0) => ProximityCategory::Target,
            GraphDistance::Hops(h) if h >= target_thres => ProximityCategory::Distal(target_thres),
            GraphDistance::Hops(h) => ProximityCategory::Hops(h),
            GraphDistance::NoPath => ProximityCategory::NoPath,
        }
    }
}

impl fmt::Display for ProximityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProximityCategory::Target => f.write_str("T"),
            ProximityCategory::Hops(h) => write!(f, "{}", h),
            ProximityCategory::Distal(thres) => write!(f, "{}+", thres),
            ProximityCategory::NoPath => f.write_str("-"),
        }
    }
}

impl Serialize for ProximityCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Fields appended to an association row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProximityAnnotation {
    pub distance: GraphDistance,
    pub category: ProximityCategory,
}

impl ProximityAnnotation {
    pub fn new(distance: GraphDistance, category: ProximityCategory) -> Self {
        ProximityAnnotation { distance, category }
    }

    fn classify(distance: GraphDistance, target_thres: u32) -> Self {
        Self::new(distance, ProximityCategory::from_distance(distance, target_thres))
    }
}

/// Annotate every row with its graph distance to the drug's targets.
///
/// A row whose gene is one of the drug's targets is `T` at distance 0. The
/// row's own `target` column is not consulted. Otherwise the distance is the minimum
/// hop count from any target present in the graph; directed graphs are
/// walked along edge direction. Missing genes, drugs without targets and
/// disconnected genes are `NoPath`.
///
/// One multi-source BFS runs per distinct drug, in parallel.
pub fn annotate(
    rows: &[AssociationRow],
    graph: &InteractionGraph,
    targets: &DrugTargets,
    target_thres: u32,
) -> Vec<ProximityAnnotation> {
    // drug -> rows needing a search
    let mut pending: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    let no_path = ProximityAnnotation::classify(GraphDistance::NoPath, target_thres);
    let mut annotations = vec![no_path; rows.len()];

    for (i, row) in rows.iter().enumerate() {
        if targets.is_target(&row.drug_id, &row.gene) {
            annotations[i] = ProximityAnnotation::classify(GraphDistance::Hops(0), target_thres);
        } else if graph.contains_vertex(&row.gene) {
            pending.entry(row.drug_id.as_str()).or_default().push(i);
        }
    }

    let mut drugs: Vec<(&str, Vec<usize>, Vec<usize>)> = Vec::with_capacity(pending.len());
    let mut without_seeds = 0usize;
    for (drug, row_ids) in pending {
        let seeds: Vec<usize> = targets
            .targets(drug)
            .filter_map(|gene| graph.vertex_id(gene))
            .map(|id| id.index())
            .collect();
        if seeds.is_empty() {
            without_seeds += 1;
            continue;
        }
        drugs.push((drug, seeds, row_ids));
    }

    if !drugs.is_empty() {
        let view = build_view(graph);
        for batch in drugs.chunks(DRUG_BATCH) {
            let seed_sets: Vec<Vec<usize>> =
                batch.iter().map(|(_, seeds, _)| seeds.clone()).collect();
            let distances = bfs_distances_batch(&view, &seed_sets, Direction::Outgoing);

            for ((drug, _, row_ids), dist) in batch.iter().zip(&distances) {
                for &i in row_ids {
                    let hops = graph
                        .vertex_id(&rows[i].gene)
                        .and_then(|id| dist.get(id.index()).copied().flatten());
                    let distance = hops.map_or(GraphDistance::NoPath, GraphDistance::Hops);
                    annotations[i] = ProximityAnnotation::classify(distance, target_thres);
                }
                debug!(drug = *drug, rows = row_ids.len(), "Annotated drug");
            }
        }
    }

    let summary = ProximitySummary::from_annotations(rows, &annotations, f64::NEG_INFINITY);
    info!(
        rows = rows.len(),
        drugs_searched = drugs.len(),
        drugs_without_targets = without_seeds,
        categories = %summary,
        "Annotated associations"
    );
    annotations
}

/// Build the BioGRID graph with the given filters and annotate against it
pub fn annotate_biogrid(
    rows: &[AssociationRow],
    interactions: &[BiogridInteraction],
    targets: &DrugTargets,
    exp_type: Option<BTreeSet<String>>,
    int_type: Option<BTreeSet<String>>,
    target_thres: u32,
) -> Vec<ProximityAnnotation> {
    let filter = BiogridFilter {
        exp_type,
        int_type,
        ..BiogridFilter::default()
    };
    let graph = build_biogrid_ppi(interactions, &filter);
    annotate(rows, &graph, targets, target_thres)
}

/// Category counts over all rows and over significant rows
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProximitySummary {
    pub fdr_thres: f64,
    pub all: BTreeMap<ProximityCategory, usize>,
    pub significant: BTreeMap<ProximityCategory, usize>,
}

impl ProximitySummary {
    /// Count categories; a row is significant when `fdr < fdr_thres`
    pub fn from_annotations(
        rows: &[AssociationRow],
        annotations: &[ProximityAnnotation],
        fdr_thres: f64,
    ) -> Self {
        let mut summary = ProximitySummary {
            fdr_thres,
            ..Default::default()
        };
        for (row, annotation) in rows.iter().zip(annotations) {
            *summary.all.entry(annotation.category).or_default() += 1;
            if row.is_significant(fdr_thres) {
                *summary.significant.entry(annotation.category).or_default() += 1;
            }
        }
        summary
    }

    pub fn count(&self, category: ProximityCategory) -> usize {
        self.all.get(&category).copied().unwrap_or(0)
    }

    pub fn significant_count(&self, category: ProximityCategory) -> usize {
        self.significant.get(&category).copied().unwrap_or(0)
    }
}

impl fmt::Display for ProximitySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .all
            .iter()
            .map(|(category, n)| format!("{}={}", category, n))
            .collect();
        f.write_str(&parts.join(" "))
    }
}
