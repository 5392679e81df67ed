//! Shape extraction.
//!
//! These queries collect every tile geometrically inside a shape, clamped
//! to the grid, regardless of obstruction. Pass `include_unwalkable =
//! false` to filter blocked tiles out. Results are sets: mirrored arc
//! points and overlapping spans deduplicate naturally, and order is
//! unspecified.

use std::collections::HashSet;

use wayfield_core::{Point, TileGrid};

use crate::circle::{in_angle, midpoint_circle, mirror_octant};
use crate::line::{line_walk, LineOptions};

/// The radius actually used for circle and cone queries.
///
/// A radius below 1 or beyond the grid diagonal is replaced by the
/// diagonal, which guarantees full-grid coverage.
pub fn effective_radius<G: TileGrid>(grid: &G, radius: i32) -> i32 {
    let max = grid.size().diagonal().ceil() as i32;
    if radius < 1 || radius > max {
        max
    } else {
        radius
    }
}

fn keep<G: TileGrid>(grid: &G, p: Point, include_unwalkable: bool) -> bool {
    grid.size().contains(p) && (include_unwalkable || grid.is_walkable(p))
}

fn bounds(a: Point, b: Point) -> (Point, Point) {
    (
        Point::new(a.x.min(b.x), a.y.min(b.y)),
        Point::new(a.x.max(b.x), a.y.max(b.y)),
    )
}

/// Tiles inside the rectangle spanned by `a` and `b`, inclusive.
pub fn rect_tiles<G: TileGrid>(
    grid: &G,
    a: Point,
    b: Point,
    include_unwalkable: bool,
) -> HashSet<Point> {
    let size = grid.size();
    let (min, max) = bounds(size.clamp(a), size.clamp(b));
    let mut tiles = HashSet::new();
    for y in min.y..=max.y {
        for x in min.x..=max.x {
            let p = Point::new(x, y);
            if keep(grid, p, include_unwalkable) {
                tiles.insert(p);
            }
        }
    }
    tiles
}

/// Tiles on the rectangle's four boundary lines, exactly.
pub fn rect_outline_tiles<G: TileGrid>(
    grid: &G,
    a: Point,
    b: Point,
    include_unwalkable: bool,
) -> HashSet<Point> {
    let size = grid.size();
    let (min, max) = bounds(size.clamp(a), size.clamp(b));
    let mut tiles = HashSet::new();
    for x in min.x..=max.x {
        for y in [min.y, max.y] {
            let p = Point::new(x, y);
            if keep(grid, p, include_unwalkable) {
                tiles.insert(p);
            }
        }
    }
    for y in min.y..=max.y {
        for x in [min.x, max.x] {
            let p = Point::new(x, y);
            if keep(grid, p, include_unwalkable) {
                tiles.insert(p);
            }
        }
    }
    tiles
}

/// Filled circle tiles around `center`, built from mirrored horizontal
/// spans of the midpoint arc.
pub fn circle_tiles<G: TileGrid>(
    grid: &G,
    center: Point,
    radius: i32,
    include_unwalkable: bool,
) -> HashSet<Point> {
    let radius = effective_radius(grid, radius);
    let mut tiles = HashSet::new();
    for arc in midpoint_circle(radius) {
        for (half_width, dy) in [(arc.x, arc.y), (arc.y, arc.x)] {
            for y in [center.y - dy, center.y + dy] {
                for x in (center.x - half_width)..=(center.x + half_width) {
                    let p = Point::new(x, y);
                    if keep(grid, p, include_unwalkable) {
                        tiles.insert(p);
                    }
                }
            }
        }
    }
    tiles
}

/// Tiles on the circle's boundary arc.
pub fn circle_outline_tiles<G: TileGrid>(
    grid: &G,
    center: Point,
    radius: i32,
    include_unwalkable: bool,
) -> HashSet<Point> {
    let radius = effective_radius(grid, radius);
    let mut tiles = HashSet::new();
    for arc in midpoint_circle(radius) {
        for p in mirror_octant(center, arc) {
            if keep(grid, p, include_unwalkable) {
                tiles.insert(p);
            }
        }
    }
    tiles
}

/// Filled circle tiles restricted to the angular sector around `facing`.
pub fn cone_tiles<G: TileGrid>(
    grid: &G,
    center: Point,
    radius: i32,
    facing: Point,
    opening_deg: f32,
    include_unwalkable: bool,
) -> HashSet<Point> {
    circle_tiles(grid, center, radius, include_unwalkable)
        .into_iter()
        .filter(|&p| in_angle(center, p, facing, opening_deg))
        .collect()
}

/// Tiles on the line from `start` toward `toward`, ignoring obstruction.
pub fn line_tiles<G: TileGrid>(
    grid: &G,
    start: Point,
    toward: Point,
    include_unwalkable: bool,
) -> HashSet<Point> {
    line_walk(grid, start, toward, LineOptions::default())
        .points
        .into_iter()
        .filter(|&p| keep(grid, p, include_unwalkable))
        .collect()
}

/// The in-grid neighbors of `p`.
pub fn neighbor_tiles<G: TileGrid>(
    grid: &G,
    p: Point,
    include_diagonals: bool,
    include_unwalkable: bool,
) -> HashSet<Point> {
    let candidates: Vec<Point> = if include_diagonals {
        p.neighbors_8().to_vec()
    } else {
        p.neighbors_4().to_vec()
    };
    candidates
        .into_iter()
        .filter(|&n| keep(grid, n, include_unwalkable))
        .collect()
}

/// Whether `p` lies inside the rectangle spanned by `a` and `b`, inclusive.
pub fn point_in_rect(a: Point, b: Point, p: Point) -> bool {
    let (min, max) = bounds(a, b);
    p.x >= min.x && p.x <= max.x && p.y >= min.y && p.y <= max.y
}

/// Whether `p` lies on one of the rectangle's four boundary lines.
pub fn point_on_rect_outline(a: Point, b: Point, p: Point) -> bool {
    let (min, max) = bounds(a, b);
    point_in_rect(a, b, p) && (p.x == min.x || p.x == max.x || p.y == min.y || p.y == max.y)
}

/// Whether `p` lies on or inside the circle around `center`.
pub fn point_in_circle(center: Point, radius: i32, p: Point) -> bool {
    let dx = i64::from(p.x - center.x);
    let dy = i64::from(p.y - center.y);
    let r = i64::from(radius);
    dx * dx + dy * dy <= r * r
}

/// Whether `p` lies inside the cone: within the circle and the angular
/// sector both.
pub fn point_in_cone(center: Point, radius: i32, facing: Point, opening_deg: f32, p: Point) -> bool {
    point_in_circle(center, radius, p) && in_angle(center, p, facing, opening_deg)
}
