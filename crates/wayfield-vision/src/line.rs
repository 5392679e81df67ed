//! Integer line walking.
//!
//! The walker steps from a start tile toward a second point, emitting the
//! grid tiles it crosses in order. The second point is a direction, not a
//! destination: it may lie outside the grid, and the walk stops at the grid
//! boundary either way.

use wayfield_core::{Point, TileGrid};

/// Options controlling a line walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineOptions {
    /// Permit diagonal steps. When disallowed, an exactly-diagonal ideal
    /// step is split into two axis steps.
    pub allow_diagonals: bool,
    /// With diagonals disallowed, take the vertical step first on an
    /// exactly-diagonal tie instead of the horizontal one.
    pub favor_vertical: bool,
    /// Stop the walk at the first non-walkable tile.
    pub break_on_walls: bool,
    /// When stopping at a wall, include the blocking tile in the result.
    pub include_walls: bool,
    /// Upper bound on emitted tiles after the start; `None` is unlimited.
    pub max_steps: Option<usize>,
}

impl Default for LineOptions {
    fn default() -> Self {
        Self {
            allow_diagonals: true,
            favor_vertical: false,
            break_on_walls: false,
            include_walls: false,
            max_steps: None,
        }
    }
}

/// The tiles crossed by a line walk, in walk order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineResult {
    /// Visited tiles, starting with the start tile when it is in the grid.
    pub points: Vec<Point>,
    /// Whether the walk stopped at a non-walkable tile.
    pub blocked: bool,
}

/// Walk the grid tiles from `start` toward `toward`.
///
/// The walk ends when `toward` is reached, the grid boundary is exited,
/// a wall is hit (with `break_on_walls`), or `max_steps` tiles have been
/// emitted past the start.
pub fn line_walk<G: TileGrid>(
    grid: &G,
    start: Point,
    toward: Point,
    opts: LineOptions,
) -> LineResult {
    let size = grid.size();
    let mut result = LineResult::default();

    if size.contains(start) {
        result.points.push(start);
    }

    let dx = toward.x - start.x;
    let dy = toward.y - start.y;
    let nx = dx.abs();
    let ny = dy.abs();
    let sign_x = dx.signum();
    let sign_y = dy.signum();

    let mut p = start;
    let mut ix = 0;
    let mut iy = 0;
    let mut steps = 0usize;

    while ix < nx || iy < ny {
        if let Some(max) = opts.max_steps {
            if steps >= max {
                break;
            }
        }

        // The half-grid comparison deciding whether the ideal next step is
        // horizontal (negative), vertical (positive), or exactly diagonal.
        let decision = (1 + 2 * ix) * ny - (1 + 2 * iy) * nx;
        if decision == 0 {
            if opts.allow_diagonals {
                p.x += sign_x;
                p.y += sign_y;
                ix += 1;
                iy += 1;
            } else if opts.favor_vertical {
                p.y += sign_y;
                iy += 1;
            } else {
                p.x += sign_x;
                ix += 1;
            }
        } else if decision < 0 {
            p.x += sign_x;
            ix += 1;
        } else {
            p.y += sign_y;
            iy += 1;
        }

        if !size.contains(p) {
            break;
        }
        if opts.break_on_walls && !grid.is_walkable(p) {
            result.blocked = true;
            if opts.include_walls {
                result.points.push(p);
            }
            break;
        }
        result.points.push(p);
        steps += 1;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfield_core::BoolGrid;

    fn open_grid() -> BoolGrid {
        BoolGrid::open(8, 8)
    }

    #[test]
    fn horizontal_line_visits_every_column() {
        let g = open_grid();
        let r = line_walk(&g, Point::new(1, 3), Point::new(5, 3), LineOptions::default());
        let expected: Vec<Point> = (1..=5).map(|x| Point::new(x, 3)).collect();
        assert_eq!(r.points, expected);
        assert!(!r.blocked);
    }

    #[test]
    fn diagonal_line_steps_diagonally() {
        let g = open_grid();
        let r = line_walk(&g, Point::new(0, 0), Point::new(3, 3), LineOptions::default());
        let expected: Vec<Point> = (0..=3).map(|i| Point::new(i, i)).collect();
        assert_eq!(r.points, expected);
    }

    #[test]
    fn tie_break_prefers_horizontal_by_default() {
        let g = open_grid();
        let opts = LineOptions {
            allow_diagonals: false,
            ..LineOptions::default()
        };
        let r = line_walk(&g, Point::new(0, 0), Point::new(2, 2), opts);
        assert_eq!(r.points[1], Point::new(1, 0));
        assert_eq!(*r.points.last().unwrap(), Point::new(2, 2));
    }

    #[test]
    fn tie_break_favor_vertical_steps_down_first() {
        let g = open_grid();
        let opts = LineOptions {
            allow_diagonals: false,
            favor_vertical: true,
            ..LineOptions::default()
        };
        let r = line_walk(&g, Point::new(0, 0), Point::new(2, 2), opts);
        assert_eq!(r.points[1], Point::new(0, 1));
        assert_eq!(*r.points.last().unwrap(), Point::new(2, 2));
    }

    #[test]
    fn walk_stops_at_grid_boundary() {
        let g = open_grid();
        let r = line_walk(&g, Point::new(6, 3), Point::new(20, 3), LineOptions::default());
        assert_eq!(*r.points.last().unwrap(), Point::new(7, 3));
        assert!(!r.blocked);
    }

    #[test]
    fn wall_blocks_and_is_included_on_request() {
        let mut g = open_grid();
        g.set_walkable(Point::new(4, 3), false);
        let opts = LineOptions {
            break_on_walls: true,
            ..LineOptions::default()
        };
        let r = line_walk(&g, Point::new(1, 3), Point::new(7, 3), opts);
        assert!(r.blocked);
        assert_eq!(*r.points.last().unwrap(), Point::new(3, 3));

        let opts = LineOptions {
            include_walls: true,
            ..opts
        };
        let r = line_walk(&g, Point::new(1, 3), Point::new(7, 3), opts);
        assert!(r.blocked);
        assert_eq!(*r.points.last().unwrap(), Point::new(4, 3));
    }

    #[test]
    fn max_steps_truncates_the_walk() {
        let g = open_grid();
        let opts = LineOptions {
            max_steps: Some(2),
            ..LineOptions::default()
        };
        let r = line_walk(&g, Point::new(0, 0), Point::new(7, 0), opts);
        assert_eq!(
            r.points,
            vec![Point::new(0, 0), Point::new(1, 0), Point::new(2, 0)]
        );
    }

    #[test]
    fn start_equals_toward_yields_just_the_start() {
        let g = open_grid();
        let r = line_walk(&g, Point::new(2, 2), Point::new(2, 2), LineOptions::default());
        assert_eq!(r.points, vec![Point::new(2, 2)]);
        assert!(!r.blocked);
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;
    use wayfield_core::BoolGrid;

    #[test]
    fn line_result_round_trip() {
        let g = BoolGrid::open(5, 5);
        let r = line_walk(&g, Point::new(0, 0), Point::new(4, 2), LineOptions::default());
        let json = serde_json::to_string(&r).unwrap();
        let back: LineResult = serde_json::from_str(&json).unwrap();
        assert_eq!(r, back);
    }
}
