//! Persistence of assembled graphs
//!
//! One snapshot file per source network. A snapshot either loads into the
//! exact graph that was saved or fails; there is no partial load.

pub mod snapshot;

pub use snapshot::{decode, encode, load, save, FORMAT_VERSION, MAGIC};

use crate::graph::GraphError;
use thiserror::Error;

/// Persistence errors
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Not a graph snapshot
    #[error("Not a graph snapshot (bad magic)")]
    BadMagic,

    #[error("Unsupported snapshot version {0}")]
    UnsupportedVersion(u32),

    /// Payload does not match the stored digest
    #[error("Snapshot checksum mismatch")]
    ChecksumMismatch,

    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("Decode error: {0}")]
    Decode(String),

    /// Decoded graph breaks an invariant
    #[error("Invalid graph in snapshot: {0}")]
    Invariant(#[from] GraphError),
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;
