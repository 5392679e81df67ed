//! Single start→target search with an admissible-style heuristic.

use std::collections::BinaryHeap;

use wayfield_core::{DiagonalPolicy, Direction, Point, TileGrid};

use crate::error::PathError;
use crate::neighbors::walkable_neighbors;
use crate::node::OpenNode;
use crate::task::{CancelToken, Progress};

/// One step of a concrete path: a position and its accumulated weighted
/// cost from the start.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathStep {
    pub pos: Point,
    pub cost: f32,
}

/// Manhattan (L1) distance between two points.
#[inline]
pub fn manhattan(a: Point, b: Point) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

/// Search a single weighted path between `start` and `target`.
///
/// The search expands from the target outward with the Dijkstra relaxation,
/// ordered by `distance + manhattan(candidate, start)`, and terminates the
/// moment the start tile is popped — no full-grid coverage is produced.
///
/// An unreachable start yields an empty path (not an error). Both endpoints
/// must be in bounds and walkable.
///
/// Manhattan distance can overestimate the remaining cost when diagonal
/// movement is enabled with `diagonal_cost < 2`, so the result is
/// hop-optimal for orthogonal policies but only near-optimal past that.
pub fn unique_path<G: TileGrid>(
    grid: &G,
    start: Point,
    target: Point,
    policy: DiagonalPolicy,
    diagonal_cost: f32,
) -> Result<Vec<PathStep>, PathError> {
    match unique_path_with(
        grid,
        start,
        target,
        policy,
        diagonal_cost,
        &CancelToken::new(),
        &Progress::sink(),
    )? {
        Some(path) => Ok(path),
        None => unreachable!("search cancelled without a cancel request"),
    }
}

/// Cancellable variant of [`unique_path`]; `Ok(None)` means cancelled,
/// `Ok(Some(vec![]))` means no route exists.
pub fn unique_path_with<G: TileGrid>(
    grid: &G,
    start: Point,
    target: Point,
    policy: DiagonalPolicy,
    diagonal_cost: f32,
    cancel: &CancelToken,
    progress: &Progress,
) -> Result<Option<Vec<PathStep>>, PathError> {
    let size = grid.size();
    let start_idx = size
        .index(start)
        .filter(|_| grid.is_walkable(start))
        .ok_or(PathError::InvalidTarget { pos: start })?;
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
        key: manhattan(target, start) as f32,
    });

    let mut expanded = 0usize;
    let mut nbuf: Vec<Point> = Vec::with_capacity(8);
    let mut found = false;

    while let Some(OpenNode { idx: ci, key }) = open.pop() {
        if cancel.is_cancelled() {
            return Ok(None);
        }
        let cp = size.point(ci);
        // Stale entry: re-validate the priority against the authoritative
        // distance before expanding.
        if key > dists[ci] + manhattan(cp, start) as f32 {
            continue;
        }
        // A cheaper entry into the start may still be queued, so the
        // search only stops once the start itself pops.
        if ci == start_idx {
            found = true;
            break;
        }
        expanded += 1;
        progress.report(expanded as f32 / len as f32);

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
                open.push(OpenNode {
                    idx: ni,
                    key: nd + manhattan(np, start) as f32,
                });
            }
        }
    }

    progress.report(1.0);
    if !found {
        return Ok(Some(Vec::new()));
    }

    // Reconstruct by walking the partially-built direction grid from the
    // start back to the target. Costs are re-based so the start is 0.
    let total = dists[start_idx];
    let mut path = Vec::new();
    let mut cur = start;
    loop {
        let i = size.index_unchecked(cur);
        path.push(PathStep {
            pos: cur,
            cost: total - dists[i],
        });
        if i == target_idx {
            break;
        }
        cur = cur + dirs[i].offset();
    }
    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfield_core::BoolGrid;

    #[test]
    fn trivial_path_is_single_step() {
        let g = BoolGrid::open(3, 3);
        let p = Point::new(1, 1);
        let path = unique_path(&g, p, p, DiagonalPolicy::None, 1.0).unwrap();
        assert_eq!(path.len(), 1);
        assert_eq!(path[0].pos, p);
        assert_eq!(path[0].cost, 0.0);
    }

    #[test]
    fn straight_line_on_open_grid() {
        let g = BoolGrid::open(6, 1);
        let path = unique_path(
            &g,
            Point::new(0, 0),
            Point::new(5, 0),
            DiagonalPolicy::None,
            1.0,
        )
        .unwrap();
        assert_eq!(path.len(), 6);
        assert_eq!(path[0].pos, Point::new(0, 0));
        assert_eq!(path[5].pos, Point::new(5, 0));
        // Costs accumulate from the start.
        for (i, step) in path.iter().enumerate() {
            assert!((step.cost - i as f32).abs() < 1e-6);
        }
    }

    #[test]
    fn matches_dijkstra_optimum_orthogonally() {
        let mut g = BoolGrid::open(8, 8);
        g.block_column(4, 0, 5);
        g.set_weight(Point::new(2, 3), 3.0);
        let start = Point::new(1, 1);
        let target = Point::new(7, 7);

        let path = unique_path(&g, start, target, DiagonalPolicy::None, 1.0).unwrap();
        let map = crate::DijkstraMap::generate(&g, target, DiagonalPolicy::None, 1.0).unwrap();
        let optimal = map.distance(start).unwrap();
        let found = path.last().unwrap().cost;
        assert!((found - optimal).abs() < 1e-4, "found {found}, optimal {optimal}");
    }

    #[test]
    fn late_diagonal_entry_still_wins() {
        // The straight row reaches the start first, but a diagonal entry
        // through (2, 1) is cheaper and only pops afterwards.
        let mut g = BoolGrid::open(4, 2);
        g.set_weight(Point::new(3, 0), 2.0);
        g.set_weight(Point::new(2, 0), 1.8);
        let start = Point::new(3, 0);
        let target = Point::new(0, 0);

        let path = unique_path(&g, start, target, DiagonalPolicy::All, 1.2).unwrap();
        let map = crate::DijkstraMap::generate(&g, target, DiagonalPolicy::All, 1.2).unwrap();
        let optimal = map.distance(start).unwrap();
        let found = path.last().unwrap().cost;
        assert!((found - optimal).abs() < 1e-4, "found {found}, optimal {optimal}");
        assert!((optimal - 4.6).abs() < 1e-4);
    }

    #[test]
    fn disconnected_start_yields_empty_path() {
        let mut g = BoolGrid::open(5, 5);
        g.block_column(2, 0, 4);
        let path = unique_path(
            &g,
            Point::new(0, 0),
            Point::new(4, 4),
            DiagonalPolicy::All,
            1.0,
        )
        .unwrap();
        assert!(path.is_empty());
    }

    #[test]
    fn endpoints_must_be_walkable() {
        let mut g = BoolGrid::open(4, 4);
        g.set_walkable(Point::new(0, 0), false);
        let err = unique_path(&g, Point::new(0, 0), Point::new(3, 3), DiagonalPolicy::None, 1.0);
        assert!(matches!(err, Err(PathError::InvalidTarget { .. })));
        let err = unique_path(&g, Point::new(3, 3), Point::new(0, 0), DiagonalPolicy::None, 1.0);
        assert!(matches!(err, Err(PathError::InvalidTarget { .. })));
    }

    #[test]
    fn cancelled_search_is_absent() {
        let g = BoolGrid::open(10, 10);
        let token = CancelToken::new();
        token.cancel();
        let out = unique_path_with(
            &g,
            Point::new(0, 0),
            Point::new(9, 9),
            DiagonalPolicy::None,
            1.0,
            &token,
            &Progress::sink(),
        )
        .unwrap();
        assert!(out.is_none());
    }
}
