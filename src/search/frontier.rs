use std::cmp::Ordering;
use std::collections::BinaryHeap;

use ordered_float::OrderedFloat;

use crate::search::partial::PartialColoring;

/// heap entry: the "greatest" entry is the most promising node
#[derive(Debug)]
struct Entry {
    bound: OrderedFloat<f64>,
    node: PartialColoring,
}

impl Entry {
    fn new(node:PartialColoring) -> Self {
        Self { bound: OrderedFloat(node.optimistic_bound()), node }
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        // lowest optimistic bound first, then oldest node first
        other.bound.cmp(&self.bound)
            .then_with(|| other.node.sequence_id().cmp(&self.node.sequence_id()))
    }
}

// `PartialOrd` needs to be implemented as well.
impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool { self.cmp(other) == Ordering::Equal }
}

impl Eq for Entry {}


/**
Best-first frontier of the branch & bound.
Pops the node with the lowest optimistic bound (ties: lowest sequence id).
When it grows over its capacity, it can be compacted: only the best
capacity*keep_fraction nodes are kept. Compaction loses nodes, thus the
search is not exact anymore once it happened.
*/
#[derive(Debug)]
pub struct Frontier {
    /// nodes, ordered by bound
    heap: BinaryHeap<Entry>,
    /// size over which the frontier should be compacted
    capacity: usize,
    /// fraction of the capacity kept by a compaction
    keep_fraction: f64,
}

impl Frontier {

    /// creates an empty frontier
    pub fn new(capacity:usize, keep_fraction:f64) -> Self {
        Self { heap: BinaryHeap::new(), capacity, keep_fraction }
    }

    /// number of resident nodes
    pub fn len(&self) -> usize { self.heap.len() }

    /// true if no node is resident
    pub fn is_empty(&self) -> bool { self.heap.is_empty() }

    /// size over which the frontier should be compacted
    pub fn capacity(&self) -> usize { self.capacity }

    /// inserts a node. O(log M)
    pub fn push(&mut self, node:PartialColoring) {
        self.heap.push(Entry::new(node));
    }

    /// removes the best node. O(log M)
    pub fn pop(&mut self) -> Option<PartialColoring> {
        self.heap.pop().map(|e| e.node)
    }

    /// optimistic bound of the best node
    pub fn best_bound(&self) -> Option<f64> {
        self.heap.peek().map(|e| e.bound.into_inner())
    }

    /// true if the frontier holds more nodes than its capacity
    pub fn over_capacity(&self) -> bool { self.heap.len() > self.capacity }

    /// number of nodes kept by a compaction (at least one)
    pub fn nb_kept(&self) -> usize {
        let kept = (self.capacity as f64 * self.keep_fraction).floor() as usize;
        kept.max(1)
    }

    /** keeps the nb_kept() best nodes, drops the others and rebuilds the heap.
    returns the number of dropped nodes.
    */
    pub fn compact(&mut self) -> usize {
        let kept = self.nb_kept();
        if self.heap.len() <= kept { return 0; }
        let mut nodes = std::mem::take(&mut self.heap).into_vec();
        // best nodes first
        nodes.sort_unstable_by(|a,b| b.cmp(a));
        let dropped = nodes.len() - kept;
        nodes.truncate(kept);
        self.heap = BinaryHeap::from(nodes);
        dropped
    }
}
