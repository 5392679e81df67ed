//! Atlases: one precomputed map per possible target tile, for O(1)
//! any-to-any queries.

use log::debug;

use wayfield_core::{DiagonalPolicy, Direction, Point, Size, TileGrid};

use crate::dijkstra_map::DijkstraMap;
use crate::direction_map::DirectionMap;
use crate::error::PathError;
use crate::task::{CancelToken, Progress};

/// A dense collection of [`DirectionMap`]s, one per walkable target tile.
///
/// Entries for non-walkable tiles are absent. Memory cost scales with
/// (walkable tile count)² — on large grids this gets big fast, so prefer
/// generating individual maps unless the all-pairs lookup is genuinely
/// needed.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DirectionAtlas {
    pub(crate) size: Size,
    pub(crate) maps: Vec<Option<DirectionMap>>,
}

impl DirectionAtlas {
    /// Generate a direction map for every walkable tile of the grid.
    pub fn generate<G: TileGrid>(grid: &G, policy: DiagonalPolicy) -> Result<Self, PathError> {
        match Self::generate_with(grid, policy, &CancelToken::new(), &Progress::sink())? {
            Some(atlas) => Ok(atlas),
            None => unreachable!("generation cancelled without a cancel request"),
        }
    }

    /// Cancellable variant of [`generate`](Self::generate); checks the token
    /// once per target tile.
    pub fn generate_with<G: TileGrid>(
        grid: &G,
        policy: DiagonalPolicy,
        cancel: &CancelToken,
        progress: &Progress,
    ) -> Result<Option<Self>, PathError> {
        let size = grid.size();
        let len = size.len();
        let mut maps: Vec<Option<DirectionMap>> = Vec::with_capacity(len);

        for (done, target) in size.iter().enumerate() {
            if cancel.is_cancelled() {
                return Ok(None);
            }
            progress.report(done as f32 / len as f32);
            if grid.is_walkable(target) {
                maps.push(Some(DirectionMap::generate(grid, target, policy)?));
            } else {
                maps.push(None);
            }
        }

        debug!(
            "direction atlas over {size}: {} entries",
            maps.iter().filter(|m| m.is_some()).count()
        );
        progress.report(1.0);
        Ok(Some(Self { size, maps }))
    }

    /// The grid dimensions this atlas was generated for.
    #[inline]
    pub fn size(&self) -> Size {
        self.size
    }

    /// Number of present entries (walkable targets).
    pub fn entry_count(&self) -> usize {
        self.maps.iter().filter(|m| m.is_some()).count()
    }

    /// The precomputed map toward `target`, if the target is walkable.
    pub fn map_for(&self, target: Point) -> Option<&DirectionMap> {
        self.size.index(target).and_then(|i| self.maps[i].as_ref())
    }

    /// The next step on the path from `from` toward `to`.
    pub fn next_point(&self, from: Point, to: Point) -> Result<Point, PathError> {
        self.map_for(to)
            .ok_or(PathError::InvalidTarget { pos: to })?
            .next_point(from)
    }

    /// The recorded next-step direction at `from` toward `to`.
    pub fn next_direction(&self, from: Point, to: Point) -> Result<Direction, PathError> {
        self.map_for(to)
            .ok_or(PathError::InvalidTarget { pos: to })?
            .next_direction(from)
    }

    /// The full path from `from` to `to`.
    pub fn path(
        &self,
        from: Point,
        to: Point,
        include_start: bool,
        include_target: bool,
    ) -> Result<Vec<Point>, PathError> {
        self.map_for(to)
            .ok_or(PathError::InvalidTarget { pos: to })?
            .path_to_target(from, include_start, include_target)
    }
}

/// A dense collection of [`DijkstraMap`]s, one per walkable target tile.
///
/// Same layout and memory caveat as [`DirectionAtlas`], with weighted
/// distances available per pair.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DijkstraAtlas {
    pub(crate) size: Size,
    pub(crate) maps: Vec<Option<DijkstraMap>>,
}

impl DijkstraAtlas {
    /// Generate a Dijkstra map for every walkable tile of the grid.
    pub fn generate<G: TileGrid>(
        grid: &G,
        policy: DiagonalPolicy,
        diagonal_cost: f32,
    ) -> Result<Self, PathError> {
        match Self::generate_with(
            grid,
            policy,
            diagonal_cost,
            &CancelToken::new(),
            &Progress::sink(),
        )? {
            Some(atlas) => Ok(atlas),
            None => unreachable!("generation cancelled without a cancel request"),
        }
    }

    /// Cancellable variant of [`generate`](Self::generate).
    pub fn generate_with<G: TileGrid>(
        grid: &G,
        policy: DiagonalPolicy,
        diagonal_cost: f32,
        cancel: &CancelToken,
        progress: &Progress,
    ) -> Result<Option<Self>, PathError> {
        let size = grid.size();
        let len = size.len();
        let mut maps: Vec<Option<DijkstraMap>> = Vec::with_capacity(len);

        for (done, target) in size.iter().enumerate() {
            if cancel.is_cancelled() {
                return Ok(None);
            }
            progress.report(done as f32 / len as f32);
            if grid.is_walkable(target) {
                maps.push(Some(DijkstraMap::generate(grid, target, policy, diagonal_cost)?));
            } else {
                maps.push(None);
            }
        }

        debug!(
            "dijkstra atlas over {size}: {} entries",
            maps.iter().filter(|m| m.is_some()).count()
        );
        progress.report(1.0);
        Ok(Some(Self { size, maps }))
    }

    /// The grid dimensions this atlas was generated for.
    #[inline]
    pub fn size(&self) -> Size {
        self.size
    }

    /// Number of present entries (walkable targets).
    pub fn entry_count(&self) -> usize {
        self.maps.iter().filter(|m| m.is_some()).count()
    }

    /// The precomputed map toward `target`, if the target is walkable.
    pub fn map_for(&self, target: Point) -> Option<&DijkstraMap> {
        self.size.index(target).and_then(|i| self.maps[i].as_ref())
    }

    /// The next step on the path from `from` toward `to`.
    pub fn next_point(&self, from: Point, to: Point) -> Result<Point, PathError> {
        self.map_for(to)
            .ok_or(PathError::InvalidTarget { pos: to })?
            .next_point(from)
    }

    /// The accumulated weighted distance from `from` to `to`.
    pub fn distance(&self, from: Point, to: Point) -> Result<f32, PathError> {
        self.map_for(to)
            .ok_or(PathError::InvalidTarget { pos: to })?
            .distance(from)
    }

    /// The full path from `from` to `to`.
    pub fn path(
        &self,
        from: Point,
        to: Point,
        include_start: bool,
        include_target: bool,
    ) -> Result<Vec<Point>, PathError> {
        self.map_for(to)
            .ok_or(PathError::InvalidTarget { pos: to })?
            .path_to_target(from, include_start, include_target)
    }
}
