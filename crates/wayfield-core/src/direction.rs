//! The [`Direction`] enum and its coordinate mappings.
//!
//! Direction grids store one `Direction` per tile: the single next step
//! toward the target. `None` marks an unreachable tile, `Here` marks the
//! target itself.

use std::fmt;

use crate::geom::Point;

/// A step between adjacent tiles, or one of the two sentinels.
///
/// The discriminants are the codes used by the binary serialization format
/// and must stay stable.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Direction {
    /// No path recorded / unreachable.
    #[default]
    None = 0,
    /// This tile is the target or origin.
    Here = 1,
    Left = 2,
    Right = 3,
    Up = 4,
    Down = 5,
    UpLeft = 6,
    UpRight = 7,
    DownLeft = 8,
    DownRight = 9,
}

/// The eight movement directions, cardinals first.
pub const MOVE_DIRECTIONS: [Direction; 8] = [
    Direction::Left,
    Direction::Right,
    Direction::Up,
    Direction::Down,
    Direction::UpLeft,
    Direction::UpRight,
    Direction::DownLeft,
    Direction::DownRight,
];

impl Direction {
    /// The (dx, dy) offset of one step in this direction.
    ///
    /// `None` and `Here` map to (0, 0).
    #[inline]
    pub const fn offset(self) -> Point {
        match self {
            Direction::None | Direction::Here => Point::new(0, 0),
            Direction::Left => Point::new(-1, 0),
            Direction::Right => Point::new(1, 0),
            Direction::Up => Point::new(0, -1),
            Direction::Down => Point::new(0, 1),
            Direction::UpLeft => Point::new(-1, -1),
            Direction::UpRight => Point::new(1, -1),
            Direction::DownLeft => Point::new(-1, 1),
            Direction::DownRight => Point::new(1, 1),
        }
    }

    /// The direction of the step from `a` to `b`.
    ///
    /// Defined only when `b` is one of the nine positions adjacent to `a`
    /// (including `a` itself, which yields `Here`). Any other `b` yields
    /// `None`, so callers must guarantee adjacency.
    #[inline]
    pub const fn between(a: Point, b: Point) -> Direction {
        match (b.x - a.x, b.y - a.y) {
            (0, 0) => Direction::Here,
            (-1, 0) => Direction::Left,
            (1, 0) => Direction::Right,
            (0, -1) => Direction::Up,
            (0, 1) => Direction::Down,
            (-1, -1) => Direction::UpLeft,
            (1, -1) => Direction::UpRight,
            (-1, 1) => Direction::DownLeft,
            (1, 1) => Direction::DownRight,
            _ => Direction::None,
        }
    }

    /// Whether this is one of the four diagonal movement directions.
    #[inline]
    pub const fn is_diagonal(self) -> bool {
        matches!(
            self,
            Direction::UpLeft | Direction::UpRight | Direction::DownLeft | Direction::DownRight
        )
    }

    /// The stable single-byte code of this direction (serialization format).
    #[inline]
    pub const fn to_code(self) -> u8 {
        self as u8
    }

    /// Decode a serialization byte back to a direction.
    #[inline]
    pub const fn from_code(code: u8) -> Option<Direction> {
        Some(match code {
            0 => Direction::None,
            1 => Direction::Here,
            2 => Direction::Left,
            3 => Direction::Right,
            4 => Direction::Up,
            5 => Direction::Down,
            6 => Direction::UpLeft,
            7 => Direction::UpRight,
            8 => Direction::DownLeft,
            9 => Direction::DownRight,
            _ => return None,
        })
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::None => "none",
            Direction::Here => "here",
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::UpLeft => "up-left",
            Direction::UpRight => "up-right",
            Direction::DownLeft => "down-left",
            Direction::DownRight => "down-right",
        };
        f.write_str(name)
    }
}
