//! The consumer-facing grid seam: [`TileGrid`], [`DiagonalPolicy`] and the
//! owned [`BoolGrid`] implementation.

use crate::geom::{Point, Size};

/// A rectangular world of tiles, supplied by the consumer.
///
/// The engine only ever reads through this trait; tiles are never mutated.
/// Any structure generated from a grid is valid only as long as the grid's
/// dimensions and walkability/weight values stay unchanged — the engine does
/// not observe mutation.
pub trait TileGrid {
    /// The grid dimensions. Fixed for the lifetime of derived structures.
    fn size(&self) -> Size;

    /// Whether the tile at `p` can be entered. Out-of-bounds positions must
    /// report `false`.
    fn is_walkable(&self, p: Point) -> bool;

    /// Movement weight of the tile at `p`, for weighted queries.
    ///
    /// Non-negative; 1 is neutral cost. Only consulted for walkable tiles.
    fn weight(&self, _p: Point) -> f32 {
        1.0
    }
}

impl<G: TileGrid + ?Sized> TileGrid for &G {
    fn size(&self) -> Size {
        (**self).size()
    }
    fn is_walkable(&self, p: Point) -> bool {
        (**self).is_walkable(p)
    }
    fn weight(&self, p: Point) -> f32 {
        (**self).weight(p)
    }
}

impl<G: TileGrid + ?Sized> TileGrid for std::sync::Arc<G> {
    fn size(&self) -> Size {
        (**self).size()
    }
    fn is_walkable(&self, p: Point) -> bool {
        (**self).is_walkable(p)
    }
    fn weight(&self, p: Point) -> f32 {
        (**self).weight(p)
    }
}

/// Rule governing when a diagonal step between tiles is permitted, based on
/// the walkability of the two orthogonal tiles it cuts across.
///
/// The policy is baked into every generated structure and cannot be changed
/// without regenerating.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DiagonalPolicy {
    /// Orthogonal movement only.
    None,
    /// Diagonal allowed only if both shared orthogonal neighbours are walkable.
    #[default]
    TwoFree,
    /// Diagonal allowed if at least one shared orthogonal neighbour is walkable.
    OneFree,
    /// Diagonal always allowed when the diagonal tile itself is walkable.
    All,
}

impl DiagonalPolicy {
    /// Whether a diagonal step is permitted given the walkability of the two
    /// orthogonal tiles it cuts across.
    ///
    /// This predicate is the single rule shared by every propagation routine.
    #[inline]
    pub fn allows(self, orth_a: bool, orth_b: bool) -> bool {
        match self {
            DiagonalPolicy::None => false,
            DiagonalPolicy::TwoFree => orth_a && orth_b,
            DiagonalPolicy::OneFree => orth_a || orth_b,
            DiagonalPolicy::All => true,
        }
    }
}

/// An owned grid of walkability flags and movement weights.
///
/// The reference [`TileGrid`] implementation, used by the tests throughout
/// the workspace and convenient as a starting point for consumers that do
/// not already have a tile type of their own.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoolGrid {
    size: Size,
    walkable: Vec<bool>,
    weights: Vec<f32>,
}

impl BoolGrid {
    /// Create a fully walkable grid with neutral weights.
    pub fn open(width: i32, height: i32) -> Self {
        let size = Size::new(width.max(0), height.max(0));
        let len = size.len();
        Self {
            size,
            walkable: vec![true; len],
            weights: vec![1.0; len],
        }
    }

    /// Mark a tile walkable or blocked. Out-of-bounds positions are ignored.
    pub fn set_walkable(&mut self, p: Point, walkable: bool) {
        if let Some(i) = self.size.index(p) {
            self.walkable[i] = walkable;
        }
    }

    /// Set the movement weight of a tile. Out-of-bounds positions are ignored.
    pub fn set_weight(&mut self, p: Point, weight: f32) {
        if let Some(i) = self.size.index(p) {
            self.weights[i] = weight;
        }
    }

    /// Block every tile of the column `x` between `y0` and `y1` inclusive.
    pub fn block_column(&mut self, x: i32, y0: i32, y1: i32) {
        for y in y0.min(y1)..=y0.max(y1) {
            self.set_walkable(Point::new(x, y), false);
        }
    }

    /// Block every tile of the row `y` between `x0` and `x1` inclusive.
    pub fn block_row(&mut self, y: i32, x0: i32, x1: i32) {
        for x in x0.min(x1)..=x0.max(x1) {
            self.set_walkable(Point::new(x, y), false);
        }
    }
}

impl TileGrid for BoolGrid {
    fn size(&self) -> Size {
        self.size
    }

    fn is_walkable(&self, p: Point) -> bool {
        match self.size.index(p) {
            Some(i) => self.walkable[i],
            None => false,
        }
    }

    fn weight(&self, p: Point) -> f32 {
        match self.size.index(p) {
            Some(i) => self.weights[i],
            None => 1.0,
        }
    }
}
