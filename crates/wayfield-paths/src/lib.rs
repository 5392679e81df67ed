//! Pathfinding precomputation for grid-based games.
//!
//! This crate builds reusable routing structures over any [`TileGrid`]:
//!
//! - **Direction maps** full-grid step directions toward one target
//!   ([`DirectionMap`])
//! - **Direction fields** the same, bounded by hop distance
//!   ([`DirectionField`])
//! - **Dijkstra maps / fields** weighted variants carrying travel cost
//!   ([`DijkstraMap`], [`DijkstraField`])
//! - **Atlases** one map per reachable tile, for any-to-any routing
//!   ([`DirectionAtlas`], [`DijkstraAtlas`])
//! - **Unique paths** a single start-to-target route ([`unique_path`])
//!
//! Every generator has a synchronous form and a cancellable form that takes
//! a [`CancelToken`] and reports fractional [`Progress`]; the `spawn_*`
//! helpers in [`task`] run the cancellable forms on background threads. The
//! precomputed structures persist through a byte-exact binary codec.
//!
//! [`TileGrid`]: wayfield_core::TileGrid

mod atlas;
mod codec;
mod dijkstra_field;
mod dijkstra_map;
mod direction_field;
mod direction_map;
mod error;
mod neighbors;
mod node;
pub mod task;
mod unique_path;

pub use atlas::{DijkstraAtlas, DirectionAtlas};
pub use codec::CodecError;
pub use dijkstra_field::DijkstraField;
pub use dijkstra_map::{DijkstraMap, DEFAULT_DIAGONAL_COST};
pub use direction_field::DirectionField;
pub use direction_map::DirectionMap;
pub use error::PathError;
pub use neighbors::walkable_neighbors;
pub use task::{CancelToken, Progress};
pub use unique_path::{manhattan, unique_path, unique_path_with, PathStep};
