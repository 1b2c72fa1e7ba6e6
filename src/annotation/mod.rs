//! Graph-distance annotation of drug-gene associations
//!
//! For every association row, the hop distance from the drug's target genes
//! to the associated gene is computed and discretized into a proximity
//! category. Lookup misses are data (`NoPath`), never errors.

pub mod association;
pub mod drug_targets;
pub mod proximity;

pub use association::{AssociationRow, AssociationTable};
pub use drug_targets::DrugTargets;
pub use proximity::{
    annotate, annotate_biogrid, GraphDistance, ProximityAnnotation, ProximityCategory,
    ProximitySummary, DEFAULT_TARGET_THRES,
};

use std::path::Path;
use thiserror::Error;

/// Errors reading or writing annotation tables
#[derive(Error, Debug)]
pub enum AnnotationError {
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

    #[error("{table}: invalid value '{value}' in column '{column}' at line {line}")]
    InvalidValue {
        table: &'static str,
        column: String,
        value: String,
        line: u64,
    },

    #[error("Annotation count {annotations} does not match row count {rows}")]
    LengthMismatch { rows: usize, annotations: usize },
}

pub type AnnotationResult<T> = Result<T, AnnotationError>;

/// Tab for `.tsv`/`.txt`, comma otherwise
pub(crate) fn delimiter_for(path: &Path) -> u8 {
    match path.extension().and_then(|e| e.to_str()) {
        Some("tsv") | Some("txt") | Some("tab") => b'\t',
        _ => b',',
    }
}

pub(crate) fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> AnnotationError + '_ {
    move |source| AnnotationError::Io {
        path: path.display().to_string(),
        source,
    }
}
