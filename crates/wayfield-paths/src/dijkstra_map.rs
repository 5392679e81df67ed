//! Weighted propagation: Dijkstra's algorithm producing direction and
//! distance grids.

use std::collections::BinaryHeap;

use log::debug;

use wayfield_core::{DiagonalPolicy, Direction, Point, Size, TileGrid};

use crate::direction_map::walk_to_target;
use crate::error::PathError;
use crate::neighbors::walkable_neighbors;
use crate::node::OpenNode;
use crate::task::{CancelToken, Progress};

/// Default cost multiplier for diagonal steps (√2).
pub const DEFAULT_DIAGONAL_COST: f32 = std::f32::consts::SQRT_2;

/// A precomputed weighted direction grid with accumulated distances.
///
/// Like [`DirectionMap`](crate::DirectionMap), but propagation is ordered by
/// accumulated weighted cost, and every reached tile additionally records
/// its distance from the target. Unreached tiles hold `f32::INFINITY`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DijkstraMap {
    pub(crate) size: Size,
    pub(crate) target: usize,
    pub(crate) dirs: Vec<Direction>,
    pub(crate) dists: Vec<f32>,
}

impl DijkstraMap {
    /// Generate a weighted map toward `target`.
    ///
    /// `diagonal_cost` multiplies the neighbour weight for diagonal steps;
    /// use [`DEFAULT_DIAGONAL_COST`] for Euclidean-style movement.
    pub fn generate<G: TileGrid>(
        grid: &G,
        target: Point,
        policy: DiagonalPolicy,
        diagonal_cost: f32,
    ) -> Result<Self, PathError> {
        match Self::generate_with(
            grid,
            target,
            policy,
            diagonal_cost,
            &CancelToken::new(),
            &Progress::sink(),
        )? {
            Some(map) => Ok(map),
            None => unreachable!("generation cancelled without a cancel request"),
        }
    }

    /// Cancellable variant of [`generate`](Self::generate).
    pub fn generate_with<G: TileGrid>(
        grid: &G,
        target: Point,
        policy: DiagonalPolicy,
        diagonal_cost: f32,
        cancel: &CancelToken,
        progress: &Progress,
    ) -> Result<Option<Self>, PathError> {
        let size = grid.size();
        let target_idx = size
            .index(target)
            .filter(|_| grid.is_walkable(target))
            .ok_or(PathError::InvalidTarget { pos: target })?;

        let len = size.len();
        let mut dirs = vec![Direction::None; len];
        let mut dists = vec![f32::INFINITY; len];
        dirs[target_idx] = Direction::Here;
        dists[target_idx] = 0.0;

        let mut open: BinaryHeap<OpenNode> = BinaryHeap::new();
        open.push(OpenNode {
            idx: target_idx,
            key: 0.0,
        });

        let mut settled = 0usize;
        let mut nbuf: Vec<Point> = Vec::with_capacity(8);

        while let Some(OpenNode { idx: ci, key }) = open.pop() {
            if cancel.is_cancelled() {
                return Ok(None);
            }
            // Stale re-inserted entry: a better distance was already settled.
            if key > dists[ci] {
                continue;
            }
            settled += 1;
            progress.report(settled as f32 / len as f32);

            let cp = size.point(ci);
            nbuf.clear();
            walkable_neighbors(grid, cp, policy, &mut nbuf);

            for &np in nbuf.iter() {
                let ni = size.index_unchecked(np);
                let step = Direction::between(np, cp);
                let mult = if step.is_diagonal() { diagonal_cost } else { 1.0 };
                let nd = dists[ci] + grid.weight(np) * mult;
                if nd < dists[ni] {
                    dists[ni] = nd;
                    dirs[ni] = step;
                    open.push(OpenNode { idx: ni, key: nd });
                }
            }
        }

        debug!("dijkstra map toward {target}: {settled}/{len} tiles settled");
        progress.report(1.0);
        Ok(Some(Self {
            size,
            target: target_idx,
            dirs,
            dists,
        }))
    }

    /// The grid dimensions this map was generated for.
    #[inline]
    pub fn size(&self) -> Size {
        self.size
    }

    /// Flat index of the target tile.
    #[inline]
    pub fn target(&self) -> usize {
        self.target
    }

    /// Position of the target tile.
    #[inline]
    pub fn target_point(&self) -> Point {
        self.size.point(self.target)
    }

    /// Whether a path from `p` to the target was recorded.
    #[inline]
    pub fn is_accessible(&self, p: Point) -> bool {
        match self.size.index(p) {
            Some(i) => self.dirs[i] != Direction::None,
            None => false,
        }
    }

    /// Accumulated weighted distance from `p` to the target.
    pub fn distance(&self, p: Point) -> Result<f32, PathError> {
        self.size
            .index(p)
            .filter(|&i| self.dirs[i] != Direction::None)
            .map(|i| self.dists[i])
            .ok_or(PathError::Inaccessible { pos: p })
    }

    /// The recorded next-step direction at `p`.
    pub fn next_direction(&self, p: Point) -> Result<Direction, PathError> {
        self.size
            .index(p)
            .map(|i| self.dirs[i])
            .filter(|&d| d != Direction::None)
            .ok_or(PathError::Inaccessible { pos: p })
    }

    /// The next tile on the path from `p` toward the target.
    pub fn next_point(&self, p: Point) -> Result<Point, PathError> {
        Ok(p + self.next_direction(p)?.offset())
    }

    /// The full path from `p` to the target, following next-step links.
    pub fn path_to_target(
        &self,
        from: Point,
        include_start: bool,
        include_target: bool,
    ) -> Result<Vec<Point>, PathError> {
        walk_to_target(
            from,
            self.target_point(),
            include_start,
            include_target,
            |p| self.next_point(p),
        )
    }

    /// The same path ordered from the target outward.
    pub fn path_from_target(
        &self,
        to: Point,
        include_target: bool,
        include_start: bool,
    ) -> Result<Vec<Point>, PathError> {
        let mut path = self.path_to_target(to, include_start, include_target)?;
        path.reverse();
        Ok(path)
    }
}
