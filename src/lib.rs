//! Interactome
//!
//! Assembly and querying of protein-protein interaction (PPI) networks for
//! drug-gene association analysis.
//!
//! # Architecture
//!
//! - [`sources`]: STRING, BioGRID and Omnipath builders; raw tables in, one
//!   simplified [`InteractionGraph`] out
//! - [`graph`]: the common graph model and the simplifier with its explicit
//!   [`CombineRule`]
//! - [`persistence`]: checksummed snapshot artifacts, one per source
//! - [`annotation`]: hop distance from drug targets to associated genes
//! - [`subgraph`]: correlation-weighted ego subgraphs for rendering
//! - [`algo`]: adapter onto the `interactome-graph-algorithms` crate
//!
//! ## Example Usage
//!
//! ```rust
//! use interactome::annotation::{annotate, AssociationRow, DrugTargets, ProximityCategory};
//! use interactome::graph::{simplify, AttributeMap, CombineRule, EdgeList};
//!
//! let mut list = EdgeList::new(false);
//! list.add_edge("MDM2", "TP53", AttributeMap::new());
//! list.add_edge("TP53", "CDKN1A", AttributeMap::new());
//! let graph = simplify(list, CombineRule::None);
//!
//! let targets: DrugTargets = [("1047", vec!["MDM2"])].into_iter().collect();
//! let rows = vec![AssociationRow::new("1047", "CDKN1A")];
//!
//! let annotations = annotate(&rows, &graph, &targets, 3);
//! assert_eq!(annotations[0].category, ProximityCategory::Hops(2));
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod annotation;
pub mod assembly;
pub mod config;
pub mod graph;
pub mod persistence;
pub mod sources;
pub mod subgraph;

// Re-export main types for convenience
pub use graph::{
    simplify, AttributeMap, AttributeValue, CombineRule, EdgeList, GraphError, GraphResult,
    GraphSummary, InteractionGraph, VertexId,
};

pub use sources::{
    assemble_all, IdentifierMap, InteractionSource, SourceError, SourceKind, SourceResult,
};

pub use persistence::{PersistenceError, PersistenceResult};

pub use annotation::{
    annotate, AnnotationError, AnnotationResult, AssociationTable, DrugTargets, GraphDistance,
    ProximityCategory, ProximitySummary,
};

pub use subgraph::{extract_ego_subgraph, CorrelationWeights, EgoQuery, EgoSubgraph};

pub use assembly::{assemble, AssemblyError, AssemblyReport};
pub use config::{AssemblyConfig, ConfigError, ConfigResult};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
