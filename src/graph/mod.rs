//! Interaction graph data model
//!
//! This module implements the common graph model every source is assembled into:
//! - Vertices are gene symbols interned in a registry
//! - Edges are unordered or ordered pairs (directedness is per graph)
//! - Optional per-edge attribute columns (`score`, `interaction`, `weight`)
//! - Simplification with an explicit combine rule

pub mod edge;
pub mod property;
pub mod simplify;
pub mod store;
pub mod types;

// Re-export main types
pub use edge::{Edge, EdgeRef};
pub use property::{AttributeMap, AttributeValue, INTERACTION, SCORE, WEIGHT};
pub use simplify::{simplify, CombineRule, EdgeList};
pub use store::{GraphError, GraphResult, GraphSummary, InteractionGraph};
pub use types::{EdgeKey, VertexId};
