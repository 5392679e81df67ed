//! Visibility and shape queries for grid-based games.
//!
//! Everything builds on two integer primitives:
//!
//! - a Bresenham-style **line walker** ([`line_walk`]) with configurable
//!   diagonal handling and wall behavior;
//! - a **midpoint-circle** rasterizer ([`midpoint_circle`]) with 8-way
//!   mirroring and an angular membership test ([`in_angle`]).
//!
//! On top of those, [`shapes`] extracts full tile sets (rectangles,
//! circles, cones, lines) regardless of obstruction, while [`raycast`]
//! answers line-of-sight and cone-of-vision queries that stop each ray at
//! the first wall and report overall clearness.

mod circle;
mod line;
pub mod raycast;
pub mod shapes;

pub use circle::{in_angle, midpoint_circle, mirror_octant};
pub use line::{line_walk, LineOptions, LineResult};
pub use raycast::{cone_of_vision, line_of_sight, Visibility};
pub use shapes::{
    circle_outline_tiles, circle_tiles, cone_tiles, effective_radius, line_tiles, neighbor_tiles,
    point_in_circle, point_in_cone, point_in_rect, point_on_rect_outline, rect_outline_tiles,
    rect_tiles,
};
