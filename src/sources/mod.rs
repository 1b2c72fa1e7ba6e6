//! Raw interaction sources
//!
//! Each source reads one raw table, applies its own filters and produces an
//! [`InteractionGraph`] in the common model:
//! - STRING: confidence-scored undirected network, remapped to gene symbols
//! - BioGRID: physical-interaction evidence, folded to undirected pairs
//! - Omnipath: curated directed/signed interactions
//!
//! Builders share no state, so [`assemble_all`] runs them in parallel.

pub mod alias;
pub mod biogrid;
pub mod omnipath;
pub mod string;
pub mod table;

pub use alias::{IdentifierMap, StringAlias};
pub use biogrid::{build_biogrid_ppi, BiogridFilter, BiogridInteraction, BiogridSource};
pub use omnipath::{build_omnipath_ppi, OmnipathFilter, OmnipathInteraction, OmnipathSource};
pub use string::{build_string_ppi, StringLink, StringSource};

use crate::graph::InteractionGraph;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::info;

/// Errors raised while reading a raw source
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("{source_name}: missing required column '{column}'")]
    MissingColumn {
        source_name: &'static str,
        column: String,
    },

    #[error("{source_name}: malformed row at line {line}: {message}")]
    Malformed {
        source_name: &'static str,
        line: u64,
        message: String,
    },
}

pub type SourceResult<T> = Result<T, SourceError>;

/// A raw source that can be assembled into a graph
pub trait InteractionSource: Send + Sync {
    /// Which source this is
    fn kind(&self) -> SourceKind;

    /// Read the raw file(s) and build the simplified graph.
    ///
    /// Fails only on configuration errors; an empty graph is a valid result.
    fn build(&self) -> SourceResult<InteractionGraph>;
}

/// The supported raw sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    String,
    Biogrid,
    Omnipath,
}

impl SourceKind {
    pub const ALL: [SourceKind; 3] = [
        SourceKind::String,
        SourceKind::Biogrid,
        SourceKind::Omnipath,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SourceKind::String => "string",
            SourceKind::Biogrid => "biogrid",
            SourceKind::Omnipath => "omnipath",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "string" => Ok(SourceKind::String),
            "biogrid" => Ok(SourceKind::Biogrid),
            "omnipath" => Ok(SourceKind::Omnipath),
            other => Err(format!("unknown source '{}'", other)),
        }
    }
}

/// Build every given source in parallel.
///
/// Results come back in input order; one failing source does not stop the
/// others.
pub fn assemble_all(
    sources: &[Box<dyn InteractionSource>],
) -> Vec<(SourceKind, SourceResult<InteractionGraph>)> {
    info!(sources = sources.len(), "Assembling sources");
    sources
        .par_iter()
        .map(|source| (source.kind(), source.build()))
        .collect()
}

/// Log the one-line summary every builder ends with
pub(crate) fn log_summary(kind: SourceKind, graph: &InteractionGraph) {
    info!(source = %kind, "{}", graph.summary());
}
