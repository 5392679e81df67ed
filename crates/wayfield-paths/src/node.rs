//! Priority-queue node shared by the weighted searches.

use std::cmp::Ordering;

/// Reference into the distance array, ordered by `key` for use in
/// `BinaryHeap`.
///
/// Decrease-key is implemented by blind re-insertion; popped entries are
/// re-validated against the authoritative distance array and stale ones are
/// skipped, so duplicates are harmless.
#[derive(Clone, Copy, PartialEq)]
pub(crate) struct OpenNode {
    pub(crate) idx: usize,
    pub(crate) key: f32,
}

impl Eq for OpenNode {}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse so BinaryHeap (max-heap) pops smallest key first; break
        // ties by index for deterministic pop order.
        other
            .key
            .total_cmp(&self.key)
            .then_with(|| other.idx.cmp(&self.idx))
    }
}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
