//! Selection engine: turns a pool of `len` items into a stream of picks.
//!
//! Two modes are supported:
//!
//! - **Queue**: walks a traversal order with a cursor that wraps around. The
//!   order starts as `0..len`; [`Selector::shuffle`] re-randomizes it
//!   (Fisher–Yates) and restarts the walk.
//! - **Random**: draws uniformly among the indices that are not in the
//!   no-repeat history. The history is a [`HistoryRing`] holding the last
//!   `no_repeat` picks. When every index is blocked (only possible when
//!   `no_repeat >= len`) the history is cleared first, so a pick is always
//!   possible on a non-empty pool.
//!
//! The selector only deals in indices. It never sees the items, and an empty
//! pool (`len == 0`) yields `None` without touching any state.

mod history;

pub use history::HistoryRing;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::models::SelectionMode;

/// Stateful picker over `0..len`.
#[derive(Debug, Clone)]
pub struct Selector {
    mode: SelectionMode,
    len: usize,
    /// Queue traversal order, a permutation of `0..len`.
    order: Vec<usize>,
    cursor: usize,
    history: HistoryRing,
    last_index: Option<usize>,
    rng: StdRng,
}

impl Selector {
    /// Create a selector seeded from the operating system.
    pub fn new(mode: SelectionMode, no_repeat: usize, len: usize) -> Self {
        Self::with_rng(mode, no_repeat, len, StdRng::from_os_rng())
    }

    /// Create a selector with a fixed seed, for reproducible sequences.
    pub fn with_seed(mode: SelectionMode, no_repeat: usize, len: usize, seed: u64) -> Self {
        Self::with_rng(mode, no_repeat, len, StdRng::seed_from_u64(seed))
    }

    fn with_rng(mode: SelectionMode, no_repeat: usize, len: usize, rng: StdRng) -> Self {
        Self {
            mode,
            len,
            order: (0..len).collect(),
            cursor: 0,
            history: HistoryRing::with_capacity(no_repeat),
            last_index: None,
            rng,
        }
    }

    /// Advance and return the next index, or `None` for an empty pool.
    pub fn pick(&mut self) -> Option<usize> {
        if self.len == 0 {
            return None;
        }

        let index = match self.mode {
            SelectionMode::Queue => {
                let index = self.order[self.cursor];
                self.cursor = (self.cursor + 1) % self.len;
                index
            }
            SelectionMode::Random => {
                let index = self.draw();
                self.history.push(index);
                index
            }
        };

        self.last_index = Some(index);
        Some(index)
    }

    /// Shuffle and pick.
    ///
    /// In queue mode the traversal order is reshuffled and the cursor restarts
    /// before picking. In random mode this is a plain [`pick`](Self::pick).
    pub fn shuffle(&mut self) -> Option<usize> {
        if self.len == 0 {
            return None;
        }
        if self.mode == SelectionMode::Queue {
            self.order.shuffle(&mut self.rng);
            self.cursor = 0;
        }
        self.pick()
    }

    /// Clear history and restart the queue walk. The traversal order and the
    /// last picked index are kept.
    pub fn reset(&mut self) {
        self.history.clear();
        self.cursor = 0;
    }

    /// Switch mode, reinitializing cursor, order, and history.
    ///
    /// Controllers never call this; a configured mode change rebuilds the
    /// registry. It is kept for embedders driving a [`Selector`] directly.
    pub fn set_mode(&mut self, mode: SelectionMode) {
        self.mode = mode;
        self.order = (0..self.len).collect();
        self.cursor = 0;
        self.history.clear();
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn no_repeat(&self) -> usize {
        self.history.capacity()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn last_index(&self) -> Option<usize> {
        self.last_index
    }

    pub fn history(&self) -> &HistoryRing {
        &self.history
    }

    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Uniform draw among indices not in history.
    fn draw(&mut self) -> usize {
        let mut blocked = vec![false; self.len];
        let mut blocked_count = 0;
        for index in self.history.iter() {
            if index < self.len && !blocked[index] {
                blocked[index] = true;
                blocked_count += 1;
            }
        }

        if blocked_count == self.len {
            self.history.clear();
            return self.rng.random_range(0..self.len);
        }

        let target = self.rng.random_range(0..self.len - blocked_count);
        blocked
            .iter()
            .enumerate()
            .filter(|(_, is_blocked)| !**is_blocked)
            .nth(target)
            .map(|(index, _)| index)
            .unwrap_or(0)
    }
}
