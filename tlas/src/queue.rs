use crate::bvh::NodeId;

/// Initial number of slots of a priority queue.
pub const INITIAL_QUEUE_SIZE: usize = 256;

#[derive(Debug, Clone, Copy)]
struct QueueEntry {
    depth: f64,
    node: NodeId,
}

/// Binary min-heap of tree nodes keyed by their entry depth along a ray.
///
/// One queue is created per tracing thread and reused for every ray: `clear()` only resets the
/// logical size, so the slots stay allocated across the whole render. The heap is 1-indexed,
/// with slot 0 unused, so that the parent of slot `i` is `i / 2`.
pub struct PriorityQueue {
    slots: Vec<QueueEntry>,
    size: usize,
}

impl Default for PriorityQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl PriorityQueue {
    pub fn new() -> Self {
        Self::with_capacity(INITIAL_QUEUE_SIZE)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let placeholder = QueueEntry {
            depth: 0.0,
            node: NodeId(0),
        };
        PriorityQueue {
            slots: vec![placeholder; capacity.max(2)],
            size: 0,
        }
    }

    pub fn clear(&mut self) {
        self.size = 0;
    }
    pub fn len(&self) -> usize {
        self.size
    }
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }
    /// Number of entries the queue can hold before it grows.
    pub fn capacity(&self) -> usize {
        self.slots.len() - 1
    }

    pub fn insert(&mut self, depth: f64, node: NodeId) {
        self.size += 1;
        if self.size >= self.slots.len() {
            let doubled = self.slots.len() * 2;
            let placeholder = self.slots[0];
            self.slots.resize(doubled, placeholder);
        }
        // Sifts up: moves parents down until the new entry's slot is found.
        let mut i = self.size;
        while i > 1 && depth < self.slots[i / 2].depth {
            self.slots[i] = self.slots[i / 2];
            i /= 2;
        }
        self.slots[i] = QueueEntry { depth, node };
    }

    /// Removes and returns the entry with the smallest depth.
    ///
    /// Panics if the queue is empty: callers must check `is_empty()` or `peek_depth()` first.
    pub fn extract_min(&mut self) -> (f64, NodeId) {
        assert!(self.size > 0, "extract_min() on an empty priority queue");
        let min = self.slots[1];
        let last = self.slots[self.size];
        self.size -= 1;

        // Sifts the former last entry down from the root.
        let size = self.size;
        let mut i = 1;
        loop {
            let left = 2 * i;
            if left > size {
                break;
            }
            let right = left + 1;
            let smaller = if right <= size && self.slots[right].depth < self.slots[left].depth {
                right
            } else {
                left
            };
            if last.depth <= self.slots[smaller].depth {
                break;
            }
            self.slots[i] = self.slots[smaller];
            i = smaller;
        }
        self.slots[i] = last;
        (min.depth, min.node)
    }

    /// Returns the smallest depth without removing it.
    pub fn peek_depth(&self) -> Option<f64> {
        (self.size > 0).then(|| self.slots[1].depth)
    }

    #[cfg(test)]
    fn is_heap(&self) -> bool {
        (2..=self.size).all(|i| self.slots[i / 2].depth <= self.slots[i].depth)
    }
}
