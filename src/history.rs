//! Bounded undo/redo over full canvas snapshots.

use std::collections::VecDeque;

use log::debug;

use crate::canvas::Canvas;
use crate::error::HistoryError;

/// Undo depth used when no capacity is configured.
pub const DEFAULT_CAPACITY: usize = 20;

/// Manages the undo and redo stacks for a single canvas.
///
/// The history keeps a private copy of the last committed state, the
/// baseline. [`History::snapshot`] moves the baseline onto the undo stack
/// and adopts the new canvas as baseline, so one undo always returns to the
/// state before the most recent committed mutation. Both stacks hold at most
/// `capacity` entries and evict their oldest entry first.
#[derive(Debug, Clone)]
pub struct History {
    undo_stack: VecDeque<Canvas>,
    redo_stack: VecDeque<Canvas>,
    baseline: Option<Canvas>,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl History {
    /// Creates an empty history. A zero capacity is raised to one.
    pub fn new(capacity: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            baseline: None,
            capacity: capacity.max(1),
        }
    }

    /// Forgets every entry and records `canvas` as the committed state.
    pub fn reset(&mut self, canvas: &Canvas) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.baseline = Some(canvas.clone());
    }

    /// Records `canvas` as the new committed state after a mutation.
    ///
    /// Clears the redo stack unconditionally.
    pub fn snapshot(&mut self, canvas: &Canvas) {
        if let Some(previous) = self.baseline.replace(canvas.clone()) {
            push_bounded(&mut self.undo_stack, previous, self.capacity);
        }
        if !self.redo_stack.is_empty() {
            debug!("Discarding {} redo entries", self.redo_stack.len());
            self.redo_stack.clear();
        }
    }

    /// Restores the state before the last committed mutation.
    pub fn undo(&mut self, canvas: &mut Canvas) -> Result<(), HistoryError> {
        let mut restored = self.undo_stack.pop_back().ok_or(HistoryError::Empty)?;
        std::mem::swap(canvas, &mut restored);
        push_bounded(&mut self.redo_stack, restored, self.capacity);
        self.baseline = Some(canvas.clone());
        Ok(())
    }

    /// Re-applies the most recently undone state.
    pub fn redo(&mut self, canvas: &mut Canvas) -> Result<(), HistoryError> {
        let mut restored = self.redo_stack.pop_back().ok_or(HistoryError::Empty)?;
        std::mem::swap(canvas, &mut restored);
        push_bounded(&mut self.undo_stack, restored, self.capacity);
        self.baseline = Some(canvas.clone());
        Ok(())
    }

    /// The last committed state, if one has been recorded.
    pub fn baseline(&self) -> Option<&Canvas> {
        self.baseline.as_ref()
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

    /// Changes the capacity, dropping the oldest entries that no longer fit.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        truncate_oldest(&mut self.undo_stack, self.capacity);
        truncate_oldest(&mut self.redo_stack, self.capacity);
    }
}

fn push_bounded(stack: &mut VecDeque<Canvas>, canvas: Canvas, capacity: usize) {
    stack.push_back(canvas);
    truncate_oldest(stack, capacity);
}

fn truncate_oldest(stack: &mut VecDeque<Canvas>, capacity: usize) {
    while stack.len() > capacity {
        stack.pop_front();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::color::BLACK;

    fn mark(canvas: &mut Canvas, history: &mut History, x: i32) {
        canvas.set_pixel(x, 0, BLACK).unwrap();
        history.snapshot(canvas);
    }

    #[test]
    fn test_undo_then_redo_is_exact() {
        let mut canvas = Canvas::new(4, 1).unwrap();
        let mut history = History::default();
        history.reset(&canvas);
        mark(&mut canvas, &mut history, 0);
        mark(&mut canvas, &mut history, 1);

        let before_undo = canvas.clone();
        history.undo(&mut canvas).unwrap();
        assert_ne!(canvas, before_undo);
        history.redo(&mut canvas).unwrap();
        assert_eq!(canvas, before_undo);
    }

    #[test]
    fn test_empty_history_errors() {
        let mut canvas = Canvas::new(2, 2).unwrap();
        let mut history = History::default();
        history.reset(&canvas);
        assert_eq!(history.undo(&mut canvas), Err(HistoryError::Empty));
        assert_eq!(history.redo(&mut canvas), Err(HistoryError::Empty));
    }

    #[test]
    fn test_new_mutation_clears_redo() {
        let mut canvas = Canvas::new(4, 1).unwrap();
        let mut history = History::default();
        history.reset(&canvas);
        mark(&mut canvas, &mut history, 0);
        history.undo(&mut canvas).unwrap();
        assert!(history.can_redo());

        mark(&mut canvas, &mut history, 2);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut canvas = Canvas::new(4, 1).unwrap();
        let mut history = History::new(2);
        history.reset(&canvas);
        mark(&mut canvas, &mut history, 0);
        mark(&mut canvas, &mut history, 1);
        mark(&mut canvas, &mut history, 2);
        assert_eq!(history.undo_len(), 2);

        history.undo(&mut canvas).unwrap();
        let after_first_undo = canvas.clone();
        history.undo(&mut canvas).unwrap();
        assert_eq!(history.undo(&mut canvas), Err(HistoryError::Empty));
        // Pixel 0 was marked before the evicted state.
        assert_eq!(canvas.get_pixel(0, 0).unwrap(), BLACK);
        assert_ne!(canvas, after_first_undo);
    }

    #[test]
    fn test_shrinking_capacity_truncates() {
        let mut canvas = Canvas::new(8, 1).unwrap();
        let mut history = History::default();
        history.reset(&canvas);
        for x in 0..5 {
            mark(&mut canvas, &mut history, x);
        }
        history.set_capacity(3);
        assert_eq!(history.undo_len(), 3);
        assert_eq!(history.capacity(), 3);
    }
}
