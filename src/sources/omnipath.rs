//! Omnipath curated signed interactions

use super::table::{self, deserialize_flag, TableSpec};
use super::{log_summary, InteractionSource, SourceKind, SourceResult};
use crate::graph::{
    simplify, AttributeMap, AttributeValue, CombineRule, EdgeList, InteractionGraph, INTERACTION,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

const OMNIPATH_TABLE: TableSpec = TableSpec {
    source: "omnipath",
    delimiter: b'\t',
    required: &[
        "source_genesymbol",
        "target_genesymbol",
        "is_directed",
        "is_stimulation",
        "is_inhibition",
    ],
};

/// One row of the Omnipath interactions export
#[derive(Debug, Clone, Deserialize)]
pub struct OmnipathInteraction {
    pub source_genesymbol: String,
    pub target_genesymbol: String,
    #[serde(deserialize_with = "deserialize_flag")]
    pub is_directed: bool,
    #[serde(deserialize_with = "deserialize_flag")]
    pub is_stimulation: bool,
    #[serde(deserialize_with = "deserialize_flag")]
    pub is_inhibition: bool,
}

impl OmnipathInteraction {
    /// Exactly one of stimulation / inhibition is set
    pub fn is_signed(&self) -> bool {
        self.is_stimulation != self.is_inhibition
    }

    /// +1 for stimulation, -1 otherwise
    pub fn sign(&self) -> i64 {
        if self.is_stimulation {
            1
        } else {
            -1
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OmnipathFilter {
    /// Keep only directed rows, and build a directed graph
    pub is_directed: bool,
    /// Keep only rows with an unambiguous sign
    pub is_signed: bool,
}

impl Default for OmnipathFilter {
    fn default() -> Self {
        OmnipathFilter {
            is_directed: true,
            is_signed: true,
        }
    }
}

/// Build the Omnipath graph with an `interaction` sign on every edge.
///
/// When duplicates collide the higher sign wins, so stimulation beats
/// inhibition.
pub fn build_omnipath_ppi(
    rows: &[OmnipathInteraction],
    filter: OmnipathFilter,
) -> InteractionGraph {
    let mut list = EdgeList::new(filter.is_directed);
    list.declare_attribute(INTERACTION);

    let mut undirected = 0usize;
    let mut unsigned = 0usize;

    for row in rows {
        if filter.is_directed && !row.is_directed {
            undirected += 1;
            continue;
        }
        if filter.is_signed && !row.is_signed() {
            unsigned += 1;
            continue;
        }
        let mut attributes = AttributeMap::new();
        attributes.insert(INTERACTION.to_string(), AttributeValue::Integer(row.sign()));
        list.add_edge(&row.source_genesymbol, &row.target_genesymbol, attributes);
    }

    info!(
        rows = rows.len(),
        undirected,
        unsigned,
        kept = list.edge_count(),
        is_directed = filter.is_directed,
        is_signed = filter.is_signed,
        "Filtered Omnipath rows"
    );

    let graph = simplify(list, CombineRule::Max);
    log_summary(SourceKind::Omnipath, &graph);
    graph
}

/// Omnipath export file plus filters
#[derive(Debug, Clone)]
pub struct OmnipathSource {
    pub path: PathBuf,
    pub filter: OmnipathFilter,
}

impl OmnipathSource {
    pub fn new(path: impl Into<PathBuf>, filter: OmnipathFilter) -> Self {
        OmnipathSource {
            path: path.into(),
            filter,
        }
    }
}

impl InteractionSource for OmnipathSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Omnipath
    }

    fn build(&self) -> SourceResult<InteractionGraph> {
        info!(path = %self.path.display(), "Reading Omnipath");
        let rows: Vec<OmnipathInteraction> = table::read_file(&self.path, &OMNIPATH_TABLE)?;
        Ok(build_omnipath_ppi(&rows, self.filter))
    }
}
