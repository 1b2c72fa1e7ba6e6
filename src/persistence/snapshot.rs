//! Graph snapshot file format
//!
//! Layout:
//! ```text
//! magic "PPIG" | version u32 LE | sha256(payload) 32 bytes | gzip(payload)
//! ```
//! where `payload` is the bincode encoding of [`StoredGraph`].

use super::{PersistenceError, PersistenceResult};
use crate::graph::{AttributeMap, EdgeKey, InteractionGraph};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const MAGIC: &[u8; 4] = b"PPIG";
pub const FORMAT_VERSION: u32 = 1;

const HEADER_LEN: usize = 4 + 4 + 32;

/// On-disk representation of a graph
#[derive(Debug, Serialize, Deserialize)]
struct StoredGraph {
    directed: bool,
    vertices: Vec<String>,
    edges: Vec<(EdgeKey, AttributeMap)>,
    attribute_columns: Vec<String>,
}

impl From<&InteractionGraph> for StoredGraph {
    fn from(graph: &InteractionGraph) -> Self {
        StoredGraph {
            directed: graph.is_directed(),
            vertices: graph.vertices().map(str::to_string).collect(),
            edges: graph
                .edge_entries()
                .map(|(key, attributes)| (*key, attributes.clone()))
                .collect(),
            attribute_columns: graph.attribute_columns().iter().cloned().collect(),
        }
    }
}

/// Encode a graph into snapshot bytes
pub fn encode(graph: &InteractionGraph) -> PersistenceResult<Vec<u8>> {
    let payload = bincode::serialize(&StoredGraph::from(graph))?;
    let digest = Sha256::digest(&payload);

    let mut out = Vec::with_capacity(HEADER_LEN + payload.len() / 2);
    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    out.extend_from_slice(&digest);

    let mut encoder = GzEncoder::new(out, Compression::default());
    encoder.write_all(&payload)?;
    Ok(encoder.finish()?)
}

/// Decode snapshot bytes, checking every graph invariant
pub fn decode(bytes: &[u8]) -> PersistenceResult<InteractionGraph> {
    if bytes.len() < HEADER_LEN || &bytes[..4] != MAGIC {
        return Err(PersistenceError::BadMagic);
    }
    let mut version = [0u8; 4];
    version.copy_from_slice(&bytes[4..8]);
    let version = u32::from_le_bytes(version);
    if version != FORMAT_VERSION {
        return Err(PersistenceError::UnsupportedVersion(version));
    }
    let expected = &bytes[8..HEADER_LEN];

    let mut payload = Vec::new();
    GzDecoder::new(&bytes[HEADER_LEN..])
        .read_to_end(&mut payload)
        .map_err(|e| PersistenceError::Decode(format!("gzip: {}", e)))?;

    if Sha256::digest(&payload).as_slice() != expected {
        return Err(PersistenceError::ChecksumMismatch);
    }

    let stored: StoredGraph = bincode::deserialize(&payload)?;
    let graph = InteractionGraph::from_parts(
        stored.directed,
        stored.vertices,
        stored.edges,
        stored.attribute_columns.into_iter().collect(),
    )?;
    Ok(graph)
}

/// Persist a graph to `path`.
///
/// The file is written next to the target and renamed into place, so a
/// crash never leaves a truncated artifact behind.
pub fn save(graph: &InteractionGraph, path: impl AsRef<Path>) -> PersistenceResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let bytes = encode(graph)?;
    let tmp = temp_path(path);
    {
        let mut writer = BufWriter::new(File::create(&tmp)?);
        writer.write_all(&bytes)?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
    }
    fs::rename(&tmp, path)?;

    info!(
        path = %path.display(),
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        bytes = bytes.len(),
        "Saved graph"
    );
    Ok(())
}

/// Load a graph saved with [`save`]
pub fn load(path: impl AsRef<Path>) -> PersistenceResult<InteractionGraph> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    let graph = decode(&bytes)?;
    debug!(
        path = %path.display(),
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        "Loaded graph"
    );
    Ok(graph)
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
