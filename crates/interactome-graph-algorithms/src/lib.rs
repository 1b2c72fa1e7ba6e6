pub mod common;
pub mod community;
pub mod pathfinding;

pub use common::{Direction, GraphView, NodeId};
pub use community::{weakly_connected_components, WccResult};
pub use pathfinding::{bfs, bfs_distances, bfs_distances_batch, BfsLimits, PathResult};
