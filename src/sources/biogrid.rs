//! BioGRID physical interaction evidence

use super::table::{self, TableSpec};
use super::{log_summary, InteractionSource, SourceKind, SourceResult};
use crate::graph::{simplify, AttributeMap, CombineRule, EdgeList, InteractionGraph};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;
use tracing::{info, warn};

/// Human taxonomy id
pub const DEFAULT_ORGANISM: u32 = 9606;

/// Symbol BioGRID uses for an unknown interactor
pub const UNKNOWN_SYMBOL: &str = "-";

const BIOGRID_TABLE: TableSpec = TableSpec {
    source: "biogrid",
    delimiter: b'\t',
    required: &[
        "Organism Interactor A",
        "Organism Interactor B",
        "Official Symbol Interactor A",
        "Official Symbol Interactor B",
        "Experimental System",
        "Experimental System Type",
    ],
};

/// One row of a BioGRID tab2 release
#[derive(Debug, Clone, Deserialize)]
pub struct BiogridInteraction {
    #[serde(rename = "Organism Interactor A")]
    pub organism_a: u32,
    #[serde(rename = "Organism Interactor B")]
    pub organism_b: u32,
    #[serde(rename = "Official Symbol Interactor A")]
    pub symbol_a: String,
    #[serde(rename = "Official Symbol Interactor B")]
    pub symbol_b: String,
    #[serde(rename = "Experimental System")]
    pub experimental_system: String,
    #[serde(rename = "Experimental System Type")]
    pub experimental_system_type: String,
}

/// Row filters for BioGRID.
///
/// An absent or empty set accepts every value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BiogridFilter {
    pub organism: u32,
    /// Accepted `Experimental System` labels
    pub exp_type: Option<BTreeSet<String>>,
    /// Accepted `Experimental System Type` values
    pub int_type: Option<BTreeSet<String>>,
}

impl Default for BiogridFilter {
    fn default() -> Self {
        BiogridFilter {
            organism: DEFAULT_ORGANISM,
            exp_type: None,
            int_type: None,
        }
    }
}

impl BiogridFilter {
    /// The filter the annotation pipeline uses: affinity-capture physical
    /// interactions only
    pub fn affinity_capture() -> Self {
        BiogridFilter {
            organism: DEFAULT_ORGANISM,
            exp_type: Some(
                ["Affinity Capture-MS", "Affinity Capture-Western"]
                    .into_iter()
                    .map(String::from)
                    .collect(),
            ),
            int_type: Some(["physical".to_string()].into_iter().collect()),
        }
    }
}

fn active(set: &Option<BTreeSet<String>>) -> Option<&BTreeSet<String>> {
    set.as_ref().filter(|s| !s.is_empty())
}

/// Rows that passed the BioGRID filters, with drop counts per reason
#[derive(Debug, Default)]
pub struct FilteredRows<'a> {
    /// Canonical (lexicographically ordered) symbol pairs
    pub pairs: BTreeSet<(&'a str, &'a str)>,
    /// `Experimental System Type` values among retained rows
    pub int_types: BTreeSet<&'a str>,
    /// `Experimental System` labels among retained rows
    pub exp_systems: BTreeSet<&'a str>,
    pub other_organism: usize,
    pub unknown_symbol: usize,
    pub wrong_int_type: usize,
    pub wrong_exp_type: usize,
    pub self_pairs: usize,
}

/// Apply organism, unknown-symbol, type and system filters, then drop self-pairs
pub fn filter_rows<'a>(rows: &'a [BiogridInteraction], filter: &BiogridFilter) -> FilteredRows<'a> {
    let int_type = active(&filter.int_type);
    let exp_type = active(&filter.exp_type);
    let mut kept = FilteredRows::default();

    for row in rows {
        if row.organism_a != filter.organism || row.organism_b != filter.organism {
            kept.other_organism += 1;
            continue;
        }
        if row.symbol_a == UNKNOWN_SYMBOL || row.symbol_b == UNKNOWN_SYMBOL {
            kept.unknown_symbol += 1;
            continue;
        }
        if int_type.map_or(false, |accepted| !accepted.contains(&row.experimental_system_type)) {
            kept.wrong_int_type += 1;
            continue;
        }
        if exp_type.map_or(false, |accepted| !accepted.contains(&row.experimental_system)) {
            kept.wrong_exp_type += 1;
            continue;
        }
        if row.symbol_a == row.symbol_b {
            kept.self_pairs += 1;
            continue;
        }
        kept.int_types.insert(row.experimental_system_type.as_str());
        kept.exp_systems.insert(row.experimental_system.as_str());

        let (a, b) = (row.symbol_a.as_str(), row.symbol_b.as_str());
        kept.pairs.insert(if a < b { (a, b) } else { (b, a) });
    }
    kept
}

/// Build the undirected, attribute-free BioGRID graph.
///
/// Both orientations of a pair fold into one edge; self-pairs are dropped.
pub fn build_biogrid_ppi(rows: &[BiogridInteraction], filter: &BiogridFilter) -> InteractionGraph {
    let int_type = active(&filter.int_type);
    let exp_type = active(&filter.exp_type);
    info!(organism = filter.organism, ?int_type, ?exp_type, "BioGRID filters applied");

    let kept = filter_rows(rows, filter);
    info!(types = ?kept.int_types, "Experimental System Type considered");
    info!(systems = ?kept.exp_systems, "Experimental System considered");
    info!(
        rows = rows.len(),
        other_organism = kept.other_organism,
        unknown_symbol = kept.unknown_symbol,
        wrong_int_type = kept.wrong_int_type,
        wrong_exp_type = kept.wrong_exp_type,
        self_pairs = kept.self_pairs,
        pairs = kept.pairs.len(),
        "Filtered BioGRID rows"
    );
    if kept.pairs.is_empty() && !rows.is_empty() {
        warn!("No BioGRID interaction passed the filters");
    }

    let mut list = EdgeList::new(false);
    for (a, b) in kept.pairs {
        list.add_edge(a, b, AttributeMap::new());
    }

    let graph = simplify(list, CombineRule::None);
    log_summary(SourceKind::Biogrid, &graph);
    graph
}

/// BioGRID release file plus filters
#[derive(Debug, Clone)]
pub struct BiogridSource {
    pub path: PathBuf,
    pub filter: BiogridFilter,
}

impl BiogridSource {
    pub fn new(path: impl Into<PathBuf>, filter: BiogridFilter) -> Self {
        BiogridSource {
            path: path.into(),
            filter,
        }
    }
}

impl InteractionSource for BiogridSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Biogrid
    }

    fn build(&self) -> SourceResult<InteractionGraph> {
        info!(path = %self.path.display(), "Reading BioGRID");
        let rows: Vec<BiogridInteraction> = table::read_file(&self.path, &BIOGRID_TABLE)?;
        Ok(build_biogrid_ppi(&rows, &self.filter))
    }
}
