//! Snapshot-based undo/redo.
//!
//! Every committed action stores a full copy of the state as it was *before*
//! the action. Undo swaps the live state with the newest entry, redo swaps it
//! back.

use influence_events::{Event, EventBus};
use std::collections::VecDeque;

#[derive(Debug, Clone)]
struct HistoryEntry<S> {
    description: String,
    state: S,
}

pub struct History<S> {
    undo_stack: VecDeque<HistoryEntry<S>>,
    redo_stack: Vec<HistoryEntry<S>>,
    /// 0 means unbounded.
    max_size: usize,
    event_bus: EventBus,
}

impl<S> History<S> {
    pub fn new(max_size: usize, event_bus: EventBus) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            max_size,
            event_bus,
        }
    }

    /// Record the pre-mutation `state` for the action `description` and drop
    /// any redo entries.
    pub fn checkpoint(&mut self, description: impl Into<String>, state: S) {
        let description = description.into();
        tracing::debug!("Checkpoint: {}", description);
        self.undo_stack.push_back(HistoryEntry { description, state });
        self.redo_stack.clear();

        if self.max_size > 0 {
            while self.undo_stack.len() > self.max_size {
                self.undo_stack.pop_front();
            }
        }
        self.notify_change();
    }

    /// Undo the last action. `current` is the live state, which becomes the
    /// redo entry. Returns the state to restore, or `None` if there is nothing
    /// to undo (in which case `current` is dropped unchanged).
    pub fn undo(&mut self, current: S) -> Option<S> {
        let entry = self.undo_stack.pop_back()?;
        tracing::debug!("Undo: {}", entry.description);
        self.redo_stack.push(HistoryEntry {
            description: entry.description,
            state: current,
        });
        self.notify_change();
        Some(entry.state)
    }

    pub fn redo(&mut self, current: S) -> Option<S> {
        let entry = self.redo_stack.pop()?;
        tracing::debug!("Redo: {}", entry.description);
        self.undo_stack.push_back(HistoryEntry {
            description: entry.description,
            state: current,
        });
        self.notify_change();
        Some(entry.state)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_description(&self) -> Option<String> {
        self.undo_stack.back().map(|e| e.description.clone())
    }

    pub fn redo_description(&self) -> Option<String> {
        self.redo_stack.last().map(|e| e.description.clone())
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.notify_change();
    }

    fn notify_change(&self) {
        self.event_bus.publish(Event::UndoStackChanged {
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
            undo_description: self.undo_description(),
            redo_description: self.redo_description(),
        });
    }
}
