//! Undo/redo history of stroke-list snapshots.

use crate::stroke::Stroke;
use std::collections::VecDeque;

/// Default maximum number of undo states to keep.
pub const DEFAULT_HISTORY_CAPACITY: usize = 200;

/// Bounded undo/redo stacks.
///
/// Each entry is a full copy of the stroke list taken before an edit.
#[derive(Debug, Clone)]
pub struct History {
    undo_stack: VecDeque<Vec<Stroke>>,
    redo_stack: Vec<Vec<Stroke>>,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl History {
    /// Create an empty history keeping at most `capacity` undo states.
    pub fn new(capacity: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    /// Push the current state to the undo stack (call before making changes).
    pub fn record(&mut self, current: &[Stroke]) {
        self.push_snapshot(current.to_vec());
    }

    /// Push a state captured earlier, e.g. at the start of a drag.
    pub fn push_snapshot(&mut self, snapshot: Vec<Stroke>) {
        self.push_undo_entry(snapshot);
        // New changes invalidate anything that was undone.
        self.redo_stack.clear();
    }

    fn push_undo_entry(&mut self, snapshot: Vec<Stroke>) {
        self.undo_stack.push_back(snapshot);
        if self.undo_stack.len() > self.capacity {
            self.undo_stack.pop_front();
            log::debug!("Undo history full, dropped oldest state");
        }
    }

    /// Undo the last change.
    /// Returns true if undo was performed, false if nothing to undo.
    pub fn undo(&mut self, live: &mut Vec<Stroke>) -> bool {
        let Some(snapshot) = self.undo_stack.pop_back() else {
            return false;
        };
        let current = std::mem::replace(live, snapshot);
        self.redo_stack.push(current);
        true
    }

    /// Redo the last undone change.
    /// Returns true if redo was performed, false if nothing to redo.
    pub fn redo(&mut self, live: &mut Vec<Stroke>) -> bool {
        let Some(snapshot) = self.redo_stack.pop() else {
            return false;
        };
        let current = std::mem::replace(live, snapshot);
        self.push_undo_entry(current);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Forget all states.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;

    fn stroke(x: f64) -> Stroke {
        Stroke::new(Point::new(x, 0.0), Point::new(x, 10.0), 8.0)
    }

    #[test]
    fn test_undo_redo_roundtrip() {
        let mut history = History::default();
        let mut live = Vec::new();
        let mut states = vec![live.clone()];

        for i in 0..5 {
            history.record(&live);
            live.push(stroke(i as f64));
            states.push(live.clone());
        }

        for expected in states.iter().rev().skip(1) {
            assert!(history.undo(&mut live));
            assert_eq!(&live, expected);
        }
        assert!(!history.undo(&mut live));
        assert!(live.is_empty());

        assert!(history.redo(&mut live));
        assert_eq!(live, states[1]);
    }

    #[test]
    fn test_redo_after_undo_restores() {
        let mut history = History::default();
        let mut live = vec![stroke(1.0)];
        history.record(&live);
        live[0].set_width(20.0);
        let edited = live.clone();

        assert!(history.undo(&mut live));
        assert_eq!(live[0].width, 8.0);
        assert!(history.redo(&mut live));
        assert_eq!(live, edited);
    }

    #[test]
    fn test_new_edit_clears_redo() {
        let mut history = History::default();
        let mut live = Vec::new();
        history.record(&live);
        live.push(stroke(0.0));
        history.undo(&mut live);
        assert!(history.can_redo());

        history.record(&live);
        live.push(stroke(1.0));
        assert!(!history.can_redo());
        assert!(!history.redo(&mut live));
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let mut history = History::new(3);
        let mut live = Vec::new();
        for i in 0..5 {
            history.record(&live);
            live.push(stroke(i as f64));
        }
        assert_eq!(history.undo_len(), 3);
        while history.undo(&mut live) {}
        // The two oldest states are gone.
        assert_eq!(live.len(), 2);
    }

    #[test]
    fn test_clear() {
        let mut history = History::new(10);
        history.record(&[stroke(0.0)]);
        history.clear();
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert_eq!(history.capacity(), 10);
    }
}
