/// Fixed-capacity ring buffer of recently picked indices.
///
/// Pushing into a full ring evicts the oldest entry. A ring with capacity 0
/// ignores pushes, which disables no-repeat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRing {
    slots: Vec<usize>,
    start: usize,
    len: usize,
}

impl HistoryRing {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![0; capacity],
            start: 0,
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn push(&mut self, index: usize) {
        let capacity = self.capacity();
        if capacity == 0 {
            return;
        }
        if self.len < capacity {
            self.slots[(self.start + self.len) % capacity] = index;
            self.len += 1;
        } else {
            self.slots[self.start] = index;
            self.start = (self.start + 1) % capacity;
        }
    }

    pub fn contains(&self, index: usize) -> bool {
        self.iter().any(|i| i == index)
    }

    pub fn clear(&mut self) {
        self.start = 0;
        self.len = 0;
    }

    /// Entries from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        let capacity = self.capacity();
        (0..self.len).map(move |offset| self.slots[(self.start + offset) % capacity])
    }
}
