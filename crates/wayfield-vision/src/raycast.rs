//! Obstruction-aware visibility queries.
//!
//! Unlike shape extraction, these stop each ray at the first non-walkable
//! tile and report whether the whole query was unobstructed.

use std::collections::HashSet;

use wayfield_core::{Point, TileGrid};

use crate::circle::{in_angle, midpoint_circle, mirror_octant};
use crate::line::{line_walk, LineOptions};
use crate::shapes::effective_radius;

/// The outcome of a visibility query.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Visibility {
    /// Every tile any ray passed through (including blockers when the
    /// query asked for them).
    pub tiles: HashSet<Point>,
    /// True when no ray hit an obstruction.
    pub is_clear: bool,
}

/// Trace a single sight line from `from` toward `to`.
///
/// The ray stops at the first wall; the blocker appears in `tiles` iff
/// `opts.include_walls` is set. `break_on_walls` is implied.
pub fn line_of_sight<G: TileGrid>(
    grid: &G,
    from: Point,
    to: Point,
    opts: LineOptions,
) -> Visibility {
    let opts = LineOptions {
        break_on_walls: true,
        ..opts
    };
    let walk = line_walk(grid, from, to, opts);
    Visibility {
        is_clear: !walk.blocked,
        tiles: walk.points.into_iter().collect(),
    }
}

/// Cast a cone of vision from `center` out to `radius`.
///
/// One ray is cast per mirrored midpoint-circle boundary point inside the
/// angular sector; `is_clear` is true only when every ray reached its
/// boundary point unobstructed.
pub fn cone_of_vision<G: TileGrid>(
    grid: &G,
    center: Point,
    radius: i32,
    facing: Point,
    opening_deg: f32,
    opts: LineOptions,
) -> Visibility {
    let radius = effective_radius(grid, radius);
    let mut seen_targets = HashSet::new();
    let mut result = Visibility {
        tiles: HashSet::new(),
        is_clear: true,
    };
    if grid.size().contains(center) {
        result.tiles.insert(center);
    }
    for arc in midpoint_circle(radius) {
        for boundary in mirror_octant(center, arc) {
            if !seen_targets.insert(boundary) {
                continue;
            }
            if !in_angle(center, boundary, facing, opening_deg) {
                continue;
            }
            let ray = line_of_sight(grid, center, boundary, opts);
            result.is_clear &= ray.is_clear;
            result.tiles.extend(ray.tiles);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfield_core::BoolGrid;

    /// A vertical 1-tile wall splitting the grid at x = 4.
    fn walled_grid() -> BoolGrid {
        let mut g = BoolGrid::open(9, 9);
        g.block_column(4, 0, 8);
        g
    }

    #[test]
    fn clear_sight_line_is_clear() {
        let g = BoolGrid::open(9, 9);
        let v = line_of_sight(&g, Point::new(1, 1), Point::new(7, 7), LineOptions::default());
        assert!(v.is_clear);
        assert!(v.tiles.contains(&Point::new(4, 4)));
    }

    #[test]
    fn wall_blocks_sight_and_tiles_stop_at_it() {
        let g = walled_grid();
        let opts = LineOptions {
            include_walls: true,
            ..LineOptions::default()
        };
        let v = line_of_sight(&g, Point::new(1, 4), Point::new(7, 4), opts);
        assert!(!v.is_clear);
        assert!(v.tiles.contains(&Point::new(4, 4)));
        assert!(!v.tiles.contains(&Point::new(5, 4)));

        let v = line_of_sight(&g, Point::new(1, 4), Point::new(7, 4), LineOptions::default());
        assert!(!v.is_clear);
        assert!(!v.tiles.contains(&Point::new(4, 4)));
        assert!(v.tiles.contains(&Point::new(3, 4)));
    }

    #[test]
    fn open_cone_is_clear_and_contains_its_axis() {
        let g = BoolGrid::open(11, 11);
        let c = Point::new(5, 5);
        let v = cone_of_vision(&g, c, 3, Point::new(1, 0), 90.0, LineOptions::default());
        assert!(v.is_clear);
        assert!(v.tiles.contains(&c));
        assert!(v.tiles.contains(&Point::new(8, 5)));
        assert!(!v.tiles.contains(&Point::new(2, 5)));
    }

    #[test]
    fn cone_behind_a_wall_is_not_clear() {
        let g = walled_grid();
        let v = cone_of_vision(
            &g,
            Point::new(2, 4),
            4,
            Point::new(1, 0),
            90.0,
            LineOptions::default(),
        );
        assert!(!v.is_clear);
        assert!(!v.tiles.contains(&Point::new(5, 4)));
    }

    #[test]
    fn full_opening_cone_sees_all_directions() {
        let g = BoolGrid::open(11, 11);
        let c = Point::new(5, 5);
        let v = cone_of_vision(&g, c, 3, Point::new(0, 1), 360.0, LineOptions::default());
        assert!(v.is_clear);
        for p in [
            Point::new(8, 5),
            Point::new(2, 5),
            Point::new(5, 8),
            Point::new(5, 2),
        ] {
            assert!(v.tiles.contains(&p), "{p} not seen");
        }
    }

    #[test]
    fn facing_away_from_wall_stays_clear() {
        let g = walled_grid();
        let v = cone_of_vision(
            &g,
            Point::new(2, 4),
            2,
            Point::new(-1, 0),
            60.0,
            LineOptions::default(),
        );
        assert!(v.is_clear);
    }
}
