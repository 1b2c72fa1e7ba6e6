//! STRING confidence network

use super::alias::{IdentifierMap, DEFAULT_SYMBOL_MARKER};
use super::table::{self, TableSpec};
use super::{log_summary, InteractionSource, SourceKind, SourceResult};
use crate::graph::{
    simplify, AttributeMap, AttributeValue, CombineRule, EdgeList, InteractionGraph, SCORE,
};
use serde::Deserialize;
use std::path::PathBuf;
use tracing::info;

/// Default confidence cutoff on the 0-1000 scale
pub const DEFAULT_SCORE_THRES: u32 = 900;

const LINKS_TABLE: TableSpec = TableSpec {
    source: "string",
    delimiter: b' ',
    required: &["protein1", "protein2", "combined_score"],
};

/// One row of the STRING links file
#[derive(Debug, Clone, Deserialize)]
pub struct StringLink {
    pub protein1: String,
    pub protein2: String,
    pub combined_score: u32,
}

/// Build the undirected, score-weighted STRING graph.
///
/// Links with `combined_score <= score_thres` and links with an endpoint
/// missing from `ids` are dropped. Duplicates created by remapping keep the
/// highest score.
pub fn build_string_ppi(
    links: &[StringLink],
    ids: &IdentifierMap,
    score_thres: u32,
) -> InteractionGraph {
    let mut list = EdgeList::new(false);
    list.declare_attribute(SCORE);

    let mut below_threshold = 0usize;
    let mut unmapped = 0usize;

    for link in links {
        if link.combined_score <= score_thres {
            below_threshold += 1;
            continue;
        }
        let (Some(a), Some(b)) = (ids.get(&link.protein1), ids.get(&link.protein2)) else {
            unmapped += 1;
            continue;
        };
        let mut attributes = AttributeMap::new();
        attributes.insert(
            SCORE.to_string(),
            AttributeValue::Integer(i64::from(link.combined_score)),
        );
        list.add_edge(a, b, attributes);
    }

    info!(
        rows = links.len(),
        below_threshold,
        unmapped,
        kept = list.edge_count(),
        score_thres,
        "Filtered STRING links"
    );

    let graph = simplify(list, CombineRule::Max);
    log_summary(SourceKind::String, &graph);
    graph
}

/// STRING links and alias files plus filters
#[derive(Debug, Clone)]
pub struct StringSource {
    pub links_path: PathBuf,
    pub aliases_path: PathBuf,
    pub score_thres: u32,
    pub alias_source_marker: String,
}

impl StringSource {
    pub fn new(links_path: impl Into<PathBuf>, aliases_path: impl Into<PathBuf>) -> Self {
        StringSource {
            links_path: links_path.into(),
            aliases_path: aliases_path.into(),
            score_thres: DEFAULT_SCORE_THRES,
            alias_source_marker: DEFAULT_SYMBOL_MARKER.to_string(),
        }
    }
}

impl InteractionSource for StringSource {
    fn kind(&self) -> SourceKind {
        SourceKind::String
    }

    fn build(&self) -> SourceResult<InteractionGraph> {
        info!(
            links = %self.links_path.display(),
            aliases = %self.aliases_path.display(),
            "Reading STRING"
        );
        let ids = IdentifierMap::from_file(&self.aliases_path, &self.alias_source_marker)?;
        let links: Vec<StringLink> = table::read_file(&self.links_path, &LINKS_TABLE)?;
        Ok(build_string_ppi(&links, &ids, self.score_thres))
    }
}
