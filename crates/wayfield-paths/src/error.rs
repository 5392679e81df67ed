//! Error types for the pathfinding engine.

use wayfield_core::Point;

use crate::codec::CodecError;

/// Errors surfaced by generation routines and map/field queries.
///
/// Invalid-argument variants are returned before any work begins and are
/// never silently clamped. `Inaccessible` is a distinct precondition
/// violation so callers can pre-check with `is_accessible` instead of
/// matching on errors.
#[derive(Debug, thiserror::Error)]
pub enum PathError {
    /// Target or start tile is out of bounds or not walkable.
    #[error("invalid target or start tile {pos}: out of bounds or not walkable")]
    InvalidTarget { pos: Point },

    /// Hop-distance bound below the minimum of 1.
    #[error("max distance must be >= 1, got {got}")]
    InvalidMaxDistance { got: u32 },

    /// Weighted-cost bound below the minimum of 1.0.
    #[error("max cost must be >= 1.0, got {got}")]
    InvalidMaxCost { got: f32 },

    /// Query on a tile the structure never reached.
    #[error("tile {pos} is not accessible from the target")]
    Inaccessible { pos: Point },

    /// Serialization failure while persisting or loading a structure.
    #[error(transparent)]
    Codec(#[from] CodecError),
}
