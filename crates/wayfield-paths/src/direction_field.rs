//! Bounded direction grid: breadth-first propagation cut at a maximum hop
//! distance, with a reached-tile list for range enumeration.

use std::collections::VecDeque;

use log::debug;

use wayfield_core::{DiagonalPolicy, Direction, Point, Size, TileGrid};

use crate::direction_map::walk_to_target;
use crate::error::PathError;
use crate::neighbors::walkable_neighbors;
use crate::task::{CancelToken, Progress};

/// A [`DirectionMap`](crate::DirectionMap) restricted to tiles within
/// `max_distance` hops of the target.
///
/// Also owns the list of flat indexes actually reached, in discovery order,
/// so "enumerate tiles in range" needs no full-grid scan.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DirectionField {
    size: Size,
    target: usize,
    max_distance: u32,
    dirs: Vec<Direction>,
    reached: Vec<u32>,
}

impl DirectionField {
    /// Generate a bounded direction field toward `target`.
    ///
    /// Preconditions: target in bounds and walkable, `max_distance >= 1`.
    pub fn generate<G: TileGrid>(
        grid: &G,
        target: Point,
        policy: DiagonalPolicy,
        max_distance: u32,
    ) -> Result<Self, PathError> {
        match Self::generate_with(
            grid,
            target,
            policy,
            max_distance,
            &CancelToken::new(),
            &Progress::sink(),
        )? {
            Some(field) => Ok(field),
            None => unreachable!("generation cancelled without a cancel request"),
        }
    }

    /// Cancellable variant of [`generate`](Self::generate).
    pub fn generate_with<G: TileGrid>(
        grid: &G,
        target: Point,
        policy: DiagonalPolicy,
        max_distance: u32,
        cancel: &CancelToken,
        progress: &Progress,
    ) -> Result<Option<Self>, PathError> {
        if max_distance < 1 {
            return Err(PathError::InvalidMaxDistance { got: max_distance });
        }
        let size = grid.size();
        let target_idx = size
            .index(target)
            .filter(|_| grid.is_walkable(target))
            .ok_or(PathError::InvalidTarget { pos: target })?;

        let len = size.len();
        let mut dirs = vec![Direction::None; len];
        let mut dists = vec![0u32; len];
        let mut visited = vec![false; len];
        let mut reached: Vec<u32> = Vec::new();

        dirs[target_idx] = Direction::Here;
        visited[target_idx] = true;
        reached.push(target_idx as u32);

        let mut queue: VecDeque<usize> = VecDeque::new();
        queue.push_back(target_idx);

        let mut nbuf: Vec<Point> = Vec::with_capacity(8);

        while let Some(ci) = queue.pop_front() {
            if cancel.is_cancelled() {
                return Ok(None);
            }
            progress.report(reached.len() as f32 / len as f32);

            let next_dist = dists[ci] + 1;
            if next_dist > max_distance {
                continue;
            }
            let cp = size.point(ci);
            nbuf.clear();
            walkable_neighbors(grid, cp, policy, &mut nbuf);

            for &np in nbuf.iter() {
                let ni = size.index_unchecked(np);
                if visited[ni] {
                    continue;
                }
                visited[ni] = true;
                dirs[ni] = Direction::between(np, cp);
                dists[ni] = next_dist;
                reached.push(ni as u32);
                queue.push_back(ni);
            }
        }

        debug!(
            "direction field toward {target} (max {max_distance}): {} tiles in range",
            reached.len()
        );
        progress.report(1.0);
        Ok(Some(Self {
            size,
            target: target_idx,
            max_distance,
            dirs,
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

    /// The hop bound this field was generated with.
    #[inline]
    pub fn max_distance(&self) -> u32 {
        self.max_distance
    }

    /// Number of tiles within range of the target (target included).
    #[inline]
    pub fn reached_count(&self) -> usize {
        self.reached.len()
    }

    /// The `i`-th reached tile, in discovery order.
    #[inline]
    pub fn reached_point(&self, i: usize) -> Option<Point> {
        self.reached.get(i).map(|&idx| self.size.point(idx as usize))
    }

    /// Iterate over all reached tiles in discovery order.
    pub fn iter_reached(&self) -> impl Iterator<Item = Point> + '_ {
        self.reached.iter().map(|&idx| self.size.point(idx as usize))
    }

    /// Whether `p` lies within `max_distance` hops of the target.
    #[inline]
    pub fn is_accessible(&self, p: Point) -> bool {
        match self.size.index(p) {
            Some(i) => self.dirs[i] != Direction::None,
            None => false,
        }
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
