//! Background generation: cooperative cancellation, progress reporting and
//! thread spawning.
//!
//! Every wrapper runs the identical synchronous algorithm on a
//! `thread::spawn` worker. Progress is a monotonically non-decreasing
//! fraction in `[0, 1]`, reported roughly once per visited tile — safe to
//! sample for display, never load-bearing for correctness. Cancellation is
//! checked once per dequeued tile; a cancelled worker returns `None` and
//! publishes no partial structure.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender, unbounded};

use wayfield_core::{DiagonalPolicy, Point, TileGrid};

use crate::dijkstra_field::DijkstraField;
use crate::dijkstra_map::DijkstraMap;
use crate::direction_field::DirectionField;
use crate::direction_map::DirectionMap;
use crate::error::PathError;
use crate::unique_path::{PathStep, unique_path_with};

/// Cloneable cooperative cancellation flag.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a token in the not-cancelled state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Workers observe the flag at their next
    /// per-tile check.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// Sender side of a progress channel.
///
/// Fractions are in `[0, 1]` and non-decreasing. A [`Progress::sink`]
/// discards all reports, for callers that do not care.
#[derive(Clone, Debug)]
pub struct Progress {
    tx: Option<Sender<f32>>,
}

impl Progress {
    /// Create a progress reporter paired with a receiver to sample from.
    pub fn channel() -> (Self, Receiver<f32>) {
        let (tx, rx) = unbounded();
        (Self { tx: Some(tx) }, rx)
    }

    /// A reporter that discards everything.
    pub fn sink() -> Self {
        Self { tx: None }
    }

    /// Report a progress fraction. A disconnected receiver is ignored.
    pub fn report(&self, fraction: f32) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(fraction.clamp(0.0, 1.0));
        }
    }
}

/// Generate a [`DirectionMap`] on a background thread.
///
/// The handle yields `Ok(None)` if the token was cancelled before the
/// propagation finished.
pub fn spawn_direction_map<G>(
    grid: G,
    target: Point,
    policy: DiagonalPolicy,
    cancel: CancelToken,
    progress: Progress,
) -> JoinHandle<Result<Option<DirectionMap>, PathError>>
where
    G: TileGrid + Send + 'static,
{
    thread::spawn(move || DirectionMap::generate_with(&grid, target, policy, &cancel, &progress))
}

/// Generate a [`DirectionField`] on a background thread.
pub fn spawn_direction_field<G>(
    grid: G,
    target: Point,
    policy: DiagonalPolicy,
    max_distance: u32,
    cancel: CancelToken,
    progress: Progress,
) -> JoinHandle<Result<Option<DirectionField>, PathError>>
where
    G: TileGrid + Send + 'static,
{
    thread::spawn(move || {
        DirectionField::generate_with(&grid, target, policy, max_distance, &cancel, &progress)
    })
}

/// Generate a [`DijkstraMap`] on a background thread.
pub fn spawn_dijkstra_map<G>(
    grid: G,
    target: Point,
    policy: DiagonalPolicy,
    diagonal_cost: f32,
    cancel: CancelToken,
    progress: Progress,
) -> JoinHandle<Result<Option<DijkstraMap>, PathError>>
where
    G: TileGrid + Send + 'static,
{
    thread::spawn(move || {
        DijkstraMap::generate_with(&grid, target, policy, diagonal_cost, &cancel, &progress)
    })
}

/// Generate a [`DijkstraField`] on a background thread.
pub fn spawn_dijkstra_field<G>(
    grid: G,
    target: Point,
    policy: DiagonalPolicy,
    diagonal_cost: f32,
    max_cost: f32,
    cancel: CancelToken,
    progress: Progress,
) -> JoinHandle<Result<Option<DijkstraField>, PathError>>
where
    G: TileGrid + Send + 'static,
{
    thread::spawn(move || {
        DijkstraField::generate_with(
            &grid,
            target,
            policy,
            diagonal_cost,
            max_cost,
            &cancel,
            &progress,
        )
    })
}

/// Search a single start→target path on a background thread.
///
/// `Ok(None)` means cancelled; an unreachable start yields
/// `Ok(Some(vec![]))` — callers distinguish the two through the token.
pub fn spawn_unique_path<G>(
    grid: G,
    start: Point,
    target: Point,
    policy: DiagonalPolicy,
    diagonal_cost: f32,
    cancel: CancelToken,
    progress: Progress,
) -> JoinHandle<Result<Option<Vec<PathStep>>, PathError>>
where
    G: TileGrid + Send + 'static,
{
    thread::spawn(move || {
        unique_path_with(&grid, start, target, policy, diagonal_cost, &cancel, &progress)
    })
}
