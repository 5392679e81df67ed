//! Bounded weighted propagation: a Dijkstra grid cut at a maximum
//! accumulated cost, with a reached-tile list.

use std::collections::BinaryHeap;

use log::debug;

use wayfield_core::{DiagonalPolicy, Direction, Point, Size, TileGrid};

use crate::direction_map::walk_to_target;
use crate::error::PathError;
use crate::neighbors::walkable_neighbors;
use crate::node::OpenNode;
use crate::task::{CancelToken, Progress};

/// A [`DijkstraMap`](crate::DijkstraMap) restricted to tiles whose
/// accumulated cost from the target does not exceed `max_cost`.
///
/// Owns the list of reached flat indexes; an index is added the first time a
/// distance is recorded for it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DijkstraField {
    size: Size,
    target: usize,
    max_cost: f32,
    dirs: Vec<Direction>,
    dists: Vec<f32>,
    reached: Vec<u32>,
}

impl DijkstraField {
    /// Generate a bounded weighted field toward `target`.
    ///
    /// Preconditions: target in bounds and walkable, `max_cost >= 1.0`.
    pub fn generate<G: TileGrid>(
        grid: &G,
        target: Point,
        policy: DiagonalPolicy,
        diagonal_cost: f32,
        max_cost: f32,
    ) -> Result<Self, PathError> {
        match Self::generate_with(
            grid,
            target,
            policy,
            diagonal_cost,
            max_cost,
            &CancelToken::new(),
            &Progress::sink(),
        )? {
            Some(field) => Ok(field),
            None => unreachable!("generation cancelled without a cancel request"),
        }
    }

    /// Cancellable variant of [`generate`](Self::generate).
    #[allow(clippy::too_many_arguments)]
    pub fn generate_with<G: TileGrid>(
        grid: &G,
        target: Point,
        policy: DiagonalPolicy,
        diagonal_cost: f32,
        max_cost: f32,
        cancel: &CancelToken,
        progress: &Progress,
    ) -> Result<Option<Self>, PathError> {
        if max_cost.is_nan() || max_cost < 1.0 {
            return Err(PathError::InvalidMaxCost { got: max_cost });
        }
        let size = grid.size();
        let target_idx = size
            .index(target)
            .filter(|_| grid.is_walkable(target))
            .ok_or(PathError::InvalidTarget { pos: target })?;

        let len = size.len();
        let mut dirs = vec![Direction::None; len];
        let mut dists = vec![f32::INFINITY; len];
        let mut reached: Vec<u32> = Vec::new();
        dirs[target_idx] = Direction::Here;
        dists[target_idx] = 0.0;
        reached.push(target_idx as u32);

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
                if nd > max_cost {
                    continue;
                }
                if nd < dists[ni] {
                    if dists[ni].is_infinite() {
                        reached.push(ni as u32);
                    }
                    dists[ni] = nd;
                    dirs[ni] = step;
                    open.push(OpenNode { idx: ni, key: nd });
                }
            }
        }

        debug!(
            "dijkstra field toward {target} (max {max_cost}): {} tiles in range",
            reached.len()
        );
        progress.report(1.0);
        Ok(Some(Self {
            size,
            target: target_idx,
            max_cost,
            dirs,
            dists,
            reached,
        }))
    }

    /// The grid dimensions this field was generated for.
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

    /// The cost bound this field was generated with.
    #[inline]
    pub fn max_cost(&self) -> f32 {
        self.max_cost
    }

    /// Number of tiles within the cost bound (target included).
    #[inline]
    pub fn reached_count(&self) -> usize {
        self.reached.len()
    }

    /// The `i`-th reached tile, in first-recorded order.
    #[inline]
    pub fn reached_point(&self, i: usize) -> Option<Point> {
        self.reached.get(i).map(|&idx| self.size.point(idx as usize))
    }

    /// Iterate over all reached tiles.
    pub fn iter_reached(&self) -> impl Iterator<Item = Point> + '_ {
        self.reached.iter().map(|&idx| self.size.point(idx as usize))
    }

    /// Whether `p` lies within the cost bound of the target.
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

    /// The full path from `p` to the target.
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DijkstraMap;
    use crate::dijkstra_map::DEFAULT_DIAGONAL_COST;
    use wayfield_core::BoolGrid;

    #[test]
    fn max_cost_below_one_is_invalid() {
        let g = BoolGrid::open(4, 4);
        let err =
            DijkstraField::generate(&g, Point::new(0, 0), DiagonalPolicy::None, 1.0, 0.5);
        assert!(matches!(err, Err(PathError::InvalidMaxCost { .. })));
        let err =
            DijkstraField::generate(&g, Point::new(0, 0), DiagonalPolicy::None, 1.0, f32::NAN);
        assert!(matches!(err, Err(PathError::InvalidMaxCost { .. })));
    }

    #[test]
    fn bound_is_exact_on_uniform_grid() {
        // max_cost = 2.0 on a uniform weight-1 grid: the field must contain
        // exactly the tiles whose true shortest distance is <= 2.0.
        let g = BoolGrid::open(9, 9);
        let target = Point::new(4, 4);
        let field =
            DijkstraField::generate(&g, target, DiagonalPolicy::None, 1.0, 2.0).unwrap();
        let reference = DijkstraMap::generate(&g, target, DiagonalPolicy::None, 1.0).unwrap();

        for p in g.size().iter() {
            let true_dist = reference.distance(p).unwrap();
            assert_eq!(
                field.is_accessible(p),
                true_dist <= 2.0,
                "bound mismatch at {p} (true distance {true_dist})"
            );
        }
    }

    #[test]
    fn reached_indexes_are_unique() {
        let g = BoolGrid::open(7, 7);
        let field = DijkstraField::generate(
            &g,
            Point::new(3, 3),
            DiagonalPolicy::All,
            DEFAULT_DIAGONAL_COST,
            3.0,
        )
        .unwrap();
        let mut seen = std::collections::HashSet::new();
        for p in field.iter_reached() {
            assert!(seen.insert(p), "{p} listed twice");
            assert!(field.is_accessible(p));
        }
        assert_eq!(seen.len(), field.reached_count());
    }

    #[test]
    fn distances_respect_bound() {
        let mut g = BoolGrid::open(8, 8);
        g.set_weight(Point::new(1, 0), 1.5);
        let field =
            DijkstraField::generate(&g, Point::new(0, 0), DiagonalPolicy::TwoFree, 1.5, 4.0)
                .unwrap();
        for p in field.iter_reached() {
            assert!(field.distance(p).unwrap() <= 4.0);
        }
    }
}
