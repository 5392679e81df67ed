//! Full-grid "next step toward target" lookup built by breadth-first
//! propagation.

use std::collections::VecDeque;

use log::debug;

use wayfield_core::{DiagonalPolicy, Direction, Point, Size, TileGrid};

use crate::error::PathError;
use crate::neighbors::walkable_neighbors;
use crate::task::{CancelToken, Progress};

/// A precomputed direction grid: for every tile, the single next step toward
/// the target along a hop-count-optimal path.
///
/// Built backwards from the target: when tile B is discovered from
/// already-visited tile A, B records the direction B→A. The target records
/// [`Direction::Here`]; unreachable tiles keep [`Direction::None`].
/// Immutable after creation; all queries are pure reads.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DirectionMap {
    pub(crate) size: Size,
    pub(crate) target: usize,
    pub(crate) dirs: Vec<Direction>,
}

impl DirectionMap {
    /// Generate a direction map toward `target`.
    ///
    /// The target must be in bounds and walkable, otherwise
    /// [`PathError::InvalidTarget`] is returned before any work begins.
    pub fn generate<G: TileGrid>(
        grid: &G,
        target: Point,
        policy: DiagonalPolicy,
    ) -> Result<Self, PathError> {
        match Self::generate_with(grid, target, policy, &CancelToken::new(), &Progress::sink())? {
            Some(map) => Ok(map),
            // A freshly created token is never cancelled.
            None => unreachable!("generation cancelled without a cancel request"),
        }
    }

    /// Cancellable variant of [`generate`](Self::generate); `Ok(None)` means
    /// the token was cancelled mid-propagation.
    pub fn generate_with<G: TileGrid>(
        grid: &G,
        target: Point,
        policy: DiagonalPolicy,
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
        let mut visited = vec![false; len];
        dirs[target_idx] = Direction::Here;
        visited[target_idx] = true;

        let mut queue: VecDeque<usize> = VecDeque::new();
        queue.push_back(target_idx);
        let mut discovered = 1usize;

        let mut nbuf: Vec<Point> = Vec::with_capacity(8);

        while let Some(ci) = queue.pop_front() {
            if cancel.is_cancelled() {
                return Ok(None);
            }
            progress.report(discovered as f32 / len as f32);

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
                discovered += 1;
                queue.push_back(ni);
            }
        }

        debug!("direction map toward {target}: {discovered}/{len} tiles reached");
        progress.report(1.0);
        Ok(Some(Self {
            size,
            target: target_idx,
            dirs,
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

    /// The recorded next-step direction at `p`.
    ///
    /// Fails with [`PathError::Inaccessible`] if the tile was never reached.
    pub fn next_direction(&self, p: Point) -> Result<Direction, PathError> {
        self.size
            .index(p)
            .map(|i| self.dirs[i])
            .filter(|&d| d != Direction::None)
            .ok_or(PathError::Inaccessible { pos: p })
    }

    /// The next tile on the path from `p` toward the target.
    ///
    /// The target itself steps to itself.
    pub fn next_point(&self, p: Point) -> Result<Point, PathError> {
        Ok(p + self.next_direction(p)?.offset())
    }

    /// The full path from `p` to the target, following next-step links.
    ///
    /// `include_start` / `include_target` control whether the endpoints are
    /// part of the returned sequence. Repeated calls on an unchanged map
    /// return identical paths.
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

    /// The same path as [`path_to_target`](Self::path_to_target), ordered
    /// from the target to `to`.
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

/// Follow next-step links from `from` until `target`, shared by all four
/// map/field types.
pub(crate) fn walk_to_target(
    from: Point,
    target: Point,
    include_start: bool,
    include_target: bool,
    next: impl Fn(Point) -> Result<Point, PathError>,
) -> Result<Vec<Point>, PathError> {
    // Probe accessibility up front so the error fires even for an empty
    // result.
    next(from)?;
    let mut path = Vec::new();
    let mut cur = from;
    loop {
        let at_start = cur == from;
        let at_target = cur == target;
        if (!at_start || include_start) && (!at_target || include_target) {
            path.push(cur);
        }
        if at_target {
            return Ok(path);
        }
        cur = next(cur)?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfield_core::BoolGrid;

    #[test]
    fn target_must_be_walkable() {
        let mut g = BoolGrid::open(4, 4);
        g.set_walkable(Point::new(1, 1), false);
        let err = DirectionMap::generate(&g, Point::new(1, 1), DiagonalPolicy::None);
        assert!(matches!(err, Err(PathError::InvalidTarget { .. })));
        let err = DirectionMap::generate(&g, Point::new(9, 9), DiagonalPolicy::None);
        assert!(matches!(err, Err(PathError::InvalidTarget { .. })));
    }

    #[test]
    fn open_grid_fully_accessible() {
        let g = BoolGrid::open(5, 5);
        let target = Point::new(2, 2);
        let map = DirectionMap::generate(&g, target, DiagonalPolicy::None).unwrap();

        assert_eq!(map.next_direction(target).unwrap(), Direction::Here);
        for p in g.size().iter() {
            assert!(map.is_accessible(p), "{p} should be accessible");
        }
        // Manhattan hop distance from the corner is 4 with orthogonal moves.
        let path = map.path_to_target(Point::new(0, 0), false, true).unwrap();
        assert_eq!(path.len(), 4);
        assert_eq!(*path.last().unwrap(), target);
    }

    #[test]
    fn following_links_terminates_at_target() {
        let mut g = BoolGrid::open(6, 6);
        g.block_column(3, 0, 4);
        let target = Point::new(5, 0);
        let map = DirectionMap::generate(&g, target, DiagonalPolicy::TwoFree).unwrap();

        let mut cur = Point::new(0, 0);
        let mut hops = 0;
        while cur != target {
            cur = map.next_point(cur).unwrap();
            hops += 1;
            assert!(hops <= g.size().len(), "next-step walk must terminate");
        }
        // The wall forces the path around (3,5).
        assert!(hops > 5);
    }

    #[test]
    fn unreachable_pocket_stays_none() {
        let mut g = BoolGrid::open(5, 5);
        // Seal off the top-left corner.
        g.set_walkable(Point::new(1, 0), false);
        g.set_walkable(Point::new(1, 1), false);
        g.set_walkable(Point::new(0, 1), false);
        let map = DirectionMap::generate(&g, Point::new(4, 4), DiagonalPolicy::None).unwrap();

        assert!(!map.is_accessible(Point::new(0, 0)));
        assert!(matches!(
            map.next_point(Point::new(0, 0)),
            Err(PathError::Inaccessible { .. })
        ));
        assert!(matches!(
            map.path_to_target(Point::new(0, 0), true, true),
            Err(PathError::Inaccessible { .. })
        ));
    }

    #[test]
    fn diagonal_policy_monotonicity() {
        let mut g = BoolGrid::open(8, 8);
        // Scatter walls so the policies actually differ.
        g.block_column(2, 1, 6);
        g.block_row(4, 3, 6);
        g.set_walkable(Point::new(5, 5), false);
        let target = Point::new(0, 0);

        let count = |policy| {
            let map = DirectionMap::generate(&g, target, policy).unwrap();
            g.size().iter().filter(|&p| map.is_accessible(p)).count()
        };

        let none = count(DiagonalPolicy::None);
        let two_free = count(DiagonalPolicy::TwoFree);
        let one_free = count(DiagonalPolicy::OneFree);
        let all = count(DiagonalPolicy::All);
        assert!(all >= one_free);
        assert!(one_free >= two_free);
        assert!(two_free >= none);
    }

    #[test]
    fn path_endpoint_flags() {
        let g = BoolGrid::open(4, 1);
        let target = Point::new(3, 0);
        let map = DirectionMap::generate(&g, target, DiagonalPolicy::None).unwrap();
        let from = Point::new(0, 0);

        let full = map.path_to_target(from, true, true).unwrap();
        assert_eq!(
            full,
            vec![from, Point::new(1, 0), Point::new(2, 0), target]
        );
        let inner = map.path_to_target(from, false, false).unwrap();
        assert_eq!(inner, vec![Point::new(1, 0), Point::new(2, 0)]);

        let reversed = map.path_from_target(from, true, true).unwrap();
        assert_eq!(reversed, vec![target, Point::new(2, 0), Point::new(1, 0), from]);
    }

    #[test]
    fn query_idempotence() {
        let mut g = BoolGrid::open(6, 6);
        g.block_row(3, 0, 3);
        let map = DirectionMap::generate(&g, Point::new(5, 5), DiagonalPolicy::TwoFree).unwrap();
        let a = map.path_to_target(Point::new(0, 0), true, true).unwrap();
        let b = map.path_to_target(Point::new(0, 0), true, true).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn path_at_target_respects_flags() {
        let g = BoolGrid::open(3, 3);
        let target = Point::new(1, 1);
        let map = DirectionMap::generate(&g, target, DiagonalPolicy::None).unwrap();
        assert_eq!(map.path_to_target(target, false, true).unwrap(), Vec::<Point>::new());
        assert_eq!(map.path_to_target(target, true, true).unwrap(), vec![target]);
    }
}
