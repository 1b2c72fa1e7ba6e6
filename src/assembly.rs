//! Build and persist source graphs

use crate::config::AssemblyConfig;
use crate::graph::GraphSummary;
use crate::persistence::{self, PersistenceError};
use crate::sources::{assemble_all, InteractionSource, SourceError, SourceKind};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{error, info};

#[derive(Error, Debug)]
pub enum AssemblyError {
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),
}

/// Outcome of assembling one source
#[derive(Debug)]
pub struct AssemblyReport {
    pub kind: SourceKind,
    pub output: PathBuf,
    pub result: Result<GraphSummary, AssemblyError>,
}

/// Build the requested sources in parallel and save each graph to its
/// configured artifact. A failing source does not stop the others.
pub fn assemble(config: &AssemblyConfig, kinds: &[SourceKind]) -> Vec<AssemblyReport> {
    let sources: Vec<Box<dyn InteractionSource>> =
        kinds.iter().map(|&kind| config.source(kind)).collect();

    assemble_all(&sources)
        .into_iter()
        .map(|(kind, built)| {
            let output = config.output_path(kind);
            let result = built.map_err(AssemblyError::from).and_then(|graph| {
                persistence::save(&graph, &output)?;
                Ok(graph.summary())
            });
            match &result {
                Ok(summary) => info!(source = %kind, output = %output.display(), "{}", summary),
                Err(e) => error!(source = %kind, "Assembly failed: {}", e),
            }
            AssemblyReport {
                kind,
                output,
                result,
            }
        })
        .collect()
}
