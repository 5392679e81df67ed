//! Policy-aware neighbour enumeration shared by every propagation routine.

use wayfield_core::{DiagonalPolicy, Point, TileGrid};

/// Append the walkable neighbours of `p` into `buf`, orthogonals first.
///
/// A diagonal neighbour is offered only if the diagonal tile itself is
/// walkable *and* [`DiagonalPolicy::allows`] holds for the two orthogonal
/// tiles the step cuts across. The caller clears `buf` before calling.
pub fn walkable_neighbors<G: TileGrid>(
    grid: &G,
    p: Point,
    policy: DiagonalPolicy,
    buf: &mut Vec<Point>,
) {
    for n in p.neighbors_4() {
        if grid.is_walkable(n) {
            buf.push(n);
        }
    }
    if policy == DiagonalPolicy::None {
        return;
    }
    const DIAGONALS: [(i32, i32); 4] = [(-1, -1), (1, -1), (-1, 1), (1, 1)];
    for (dx, dy) in DIAGONALS {
        let n = p.shift(dx, dy);
        if !grid.is_walkable(n) {
            continue;
        }
        let orth_a = grid.is_walkable(p.shift(dx, 0));
        let orth_b = grid.is_walkable(p.shift(0, dy));
        if policy.allows(orth_a, orth_b) {
            buf.push(n);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfield_core::BoolGrid;

    fn neighbors_of(grid: &BoolGrid, p: Point, policy: DiagonalPolicy) -> Vec<Point> {
        let mut buf = Vec::with_capacity(8);
        walkable_neighbors(grid, p, policy, &mut buf);
        buf
    }

    #[test]
    fn open_grid_counts() {
        let g = BoolGrid::open(3, 3);
        let c = Point::new(1, 1);
        assert_eq!(neighbors_of(&g, c, DiagonalPolicy::None).len(), 4);
        assert_eq!(neighbors_of(&g, c, DiagonalPolicy::All).len(), 8);
    }

    #[test]
    fn corner_is_cut() {
        // Block the two orthogonals around the up-left diagonal.
        let mut g = BoolGrid::open(3, 3);
        let c = Point::new(1, 1);
        g.set_walkable(Point::new(0, 1), false);
        g.set_walkable(Point::new(1, 0), false);

        let two_free = neighbors_of(&g, c, DiagonalPolicy::TwoFree);
        assert!(!two_free.contains(&Point::new(0, 0)));

        let one_free = neighbors_of(&g, c, DiagonalPolicy::OneFree);
        assert!(!one_free.contains(&Point::new(0, 0)));

        let all = neighbors_of(&g, c, DiagonalPolicy::All);
        assert!(all.contains(&Point::new(0, 0)));
    }

    #[test]
    fn one_free_needs_a_single_orthogonal() {
        let mut g = BoolGrid::open(3, 3);
        let c = Point::new(1, 1);
        g.set_walkable(Point::new(1, 0), false);

        let two_free = neighbors_of(&g, c, DiagonalPolicy::TwoFree);
        assert!(!two_free.contains(&Point::new(0, 0)));
        assert!(!two_free.contains(&Point::new(2, 0)));

        let one_free = neighbors_of(&g, c, DiagonalPolicy::OneFree);
        assert!(one_free.contains(&Point::new(0, 0)));
        assert!(one_free.contains(&Point::new(2, 0)));
    }

    #[test]
    fn blocked_diagonal_tile_never_offered() {
        let mut g = BoolGrid::open(3, 3);
        g.set_walkable(Point::new(0, 0), false);
        let all = neighbors_of(&g, Point::new(1, 1), DiagonalPolicy::All);
        assert!(!all.contains(&Point::new(0, 0)));
        assert_eq!(all.len(), 7);
    }
}
