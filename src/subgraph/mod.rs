//! Correlation-weighted ego subgraphs
//!
//! A bounded-hop neighborhood around a seed gene, with every edge weighted
//! by an external correlation and weak edges removed. The result is handed
//! to the rendering layer as-is.

pub mod ego;
pub mod weights;

pub use ego::{extract_ego_subgraph, EgoEdge, EgoQuery, EgoStatus, EgoSubgraph, EgoVertex};
pub use weights::{pearson, CorrelationWeights, GeneProfiles, MIN_SHARED_SAMPLES};

use thiserror::Error;

/// Errors reading weight and profile tables
#[derive(Error, Debug)]
pub enum SubgraphError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("{table}: missing required column '{column}'")]
    MissingColumn { table: &'static str, column: String },

    #[error("{table}: invalid value '{value}' at line {line}")]
    InvalidValue {
        table: &'static str,
        value: String,
        line: u64,
    },
}

pub type SubgraphResult<T> = Result<T, SubgraphError>;
