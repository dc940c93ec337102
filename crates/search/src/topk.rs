//! Bounded top-k selection
//!
//! Keeps the `k` candidates with the smallest `(distance, position)` key in a
//! max-heap, so the worst retained candidate is evicted in O(log k). Equal
//! distances fall back to position, which makes the earlier insertion win.

use projdex_core::Neighbor;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

#[derive(Debug, Clone, Copy)]
struct Candidate(Neighbor);

impl Candidate {
    fn key_cmp(&self, other: &Self) -> Ordering {
        self.0
            .distance
            .total_cmp(&other.0.distance)
            .then_with(|| self.0.position.cmp(&other.0.position))
    }
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.key_cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key_cmp(other)
    }
}

/// Collects the `k` nearest candidates seen so far
#[derive(Debug)]
pub struct TopK {
    k: usize,
    heap: BinaryHeap<Candidate>,
}

impl TopK {
    /// Create a selector for `k` results
    pub fn new(k: usize) -> Self {
        Self {
            k,
            heap: BinaryHeap::with_capacity(k),
        }
    }

    /// Offer a candidate
    #[inline]
    pub fn push(&mut self, position: usize, distance: f32) {
        if self.k == 0 {
            return;
        }
        let candidate = Candidate(Neighbor::new(position, distance));
        if self.heap.len() < self.k {
            self.heap.push(candidate);
        } else if let Some(mut worst) = self.heap.peek_mut() {
            if candidate < *worst {
                *worst = candidate;
            }
        }
    }

    /// Number of retained candidates
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Check if nothing has been retained
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Retained candidates, ascending by distance then position
    pub fn into_sorted_vec(self) -> Vec<Neighbor> {
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|c| c.0)
            .collect()
    }
}
