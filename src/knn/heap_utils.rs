//! This module contains utility structures for managing k-best elements using a binary heap.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use ordered_float::OrderedFloat; // For using f64 in BinaryHeap

/// Represents an element in the KBestNeighbors heap, pairing a distance with data.
///
/// `rank` is the insertion position; it orders elements with equal distance.
#[derive(Debug)]
pub struct HeapElement<P> {
    pub distance: OrderedFloat<f64>,
    pub rank: usize,
    pub data: P,
}

impl<P> HeapElement<P> {
    fn key(&self) -> (OrderedFloat<f64>, usize) {
        (self.distance, self.rank)
    }
}

impl<P> PartialEq for HeapElement<P> {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}
impl<P> Eq for HeapElement<P> {}

impl<P> PartialOrd for HeapElement<P> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<P> Ord for HeapElement<P> {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap, so the worst kept element sits on top:
        // the farthest one, and among equally far ones the latest inserted.
        self.key().cmp(&other.key())
    }
}

/// Manages a collection of the K "best" (smallest distance, then earliest rank) items seen so far.
///
/// The kept set equals the first K entries of a stable ascending sort by distance.
#[derive(Debug)]
pub struct KBestNeighbors<P> {
    capacity: usize,
    next_rank: usize,
    heap: BinaryHeap<HeapElement<P>>,
}

impl<P> KBestNeighbors<P> {
    pub fn new(capacity: usize) -> Self {
        KBestNeighbors {
            capacity,
            next_rank: 0,
            heap: BinaryHeap::with_capacity(capacity),
        }
    }

    /// Offers an item. Items must be added in their tie-break order.
    pub fn add(&mut self, distance: f64, point_data: P) {
        let rank = self.next_rank;
        self.next_rank += 1;
        if self.capacity == 0 {
            return;
        }
        let item = HeapElement { distance: OrderedFloat(distance), rank, data: point_data };
        if self.heap.len() < self.capacity {
            self.heap.push(item);
            return;
        }
        let replaces_worst = self.heap.peek().is_some_and(|worst| item < *worst);
        if replaces_worst {
            self.heap.pop();
            self.heap.push(item);
        }
    }

    /// Consumes the heap, returning `(distance, data)` pairs in ascending key order.
    pub fn into_sorted_points(self) -> Vec<(f64, P)> {
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|elem| (elem.distance.0, elem.data))
            .collect()
    }

    /// Returns the current number of neighbors stored.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
