//! **wayfield-core** — Grid-query engine for 2D tile worlds (core types).
//!
//! This crate provides the foundational types shared across the *wayfield*
//! workspace: geometry primitives, the flat-index coordinate model, the
//! [`Direction`] enum used by direction grids, and the consumer-facing
//! [`TileGrid`] trait with its [`DiagonalPolicy`] movement rule.

pub mod direction;
pub mod geom;
pub mod grid;

pub use direction::{Direction, MOVE_DIRECTIONS};
pub use geom::{Point, Size, SizeIter};
pub use grid::{BoolGrid, DiagonalPolicy, TileGrid};
