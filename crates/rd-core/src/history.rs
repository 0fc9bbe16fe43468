//! Undo/redo history.
//!
//! A linear log of snapshot-based entries with a cursor. Each entry holds
//! full shape snapshots, so undo/redo never has to compute inverses from
//! live state. Recording truncates everything past the cursor; the log is
//! capped and drops its oldest entry when full.

use crate::model::Shape;

#[derive(Debug, Clone, PartialEq)]
pub enum HistoryAction {
    Create {
        shapes: Vec<Shape>,
    },
    /// `positions[i]` is the z-index `shapes[i]` had before deletion.
    Delete {
        shapes: Vec<Shape>,
        positions: Vec<usize>,
    },
    Update {
        before: Vec<Shape>,
        after: Vec<Shape>,
    },
}

impl HistoryAction {
    pub fn label(&self) -> &'static str {
        match self {
            HistoryAction::Create { .. } => "create",
            HistoryAction::Delete { .. } => "delete",
            HistoryAction::Update { .. } => "update",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub id: u64,
    /// Host milliseconds at record time.
    pub timestamp: f64,
    pub action: HistoryAction,
}

#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<HistoryEntry>,
    /// Number of entries currently applied; `entries[cursor - 1]` is the
    /// next to undo.
    cursor: usize,
    max_entries: usize,
    next_id: u64,
}

impl History {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Vec::new(),
            cursor: 0,
            max_entries: max_entries.max(1),
            next_id: 1,
        }
    }

    /// Append an entry, discarding the redo tail. Returns the entry id.
    pub fn record(&mut self, action: HistoryAction, timestamp: f64) -> u64 {
        self.entries.truncate(self.cursor);
        let id = self.next_id;
        self.next_id += 1;
        log::debug!("history: record #{id} {}", action.label());
        self.entries.push(HistoryEntry { id, timestamp, action });
        if self.entries.len() > self.max_entries {
            self.entries.remove(0);
        }
        self.cursor = self.entries.len();
        id
    }

    /// Step the cursor back and return the entry to invert.
    pub fn step_back(&mut self) -> Option<&HistoryEntry> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        self.entries.get(self.cursor)
    }

    /// Step the cursor forward and return the entry to re-apply.
    pub fn step_forward(&mut self) -> Option<&HistoryEntry> {
        if self.cursor >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        self.entries.get(self.cursor - 1)
    }

    /// Index of the most recently applied entry, `None` before the first.
    pub fn index(&self) -> Option<usize> {
        self.cursor.checked_sub(1)
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor < self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::ShapeId;
    use pretty_assertions::assert_eq;

    fn create(name: &str) -> HistoryAction {
        HistoryAction::Create {
            shapes: vec![Shape::rectangle(ShapeId::intern(name), 0.0, 0.0, 1.0, 1.0)],
        }
    }

    #[test]
    fn undo_redo_walk_the_cursor() {
        let mut h = History::new(10);
        h.record(create("h_a"), 0.0);
        h.record(create("h_b"), 1.0);
        assert_eq!(h.index(), Some(1));

        assert_eq!(h.step_back().map(|e| e.timestamp), Some(1.0));
        assert_eq!(h.step_back().map(|e| e.timestamp), Some(0.0));
        assert!(h.step_back().is_none());
        assert_eq!(h.index(), None);

        assert_eq!(h.step_forward().map(|e| e.timestamp), Some(0.0));
        assert_eq!(h.index(), Some(0));
    }

    #[test]
    fn record_truncates_redo_tail() {
        let mut h = History::new(10);
        h.record(create("h_c"), 0.0);
        h.record(create("h_d"), 1.0);
        h.step_back();
        h.record(create("h_e"), 2.0);
        assert_eq!(h.len(), 2);
        assert!(!h.can_redo());
        assert_eq!(h.entries()[1].timestamp, 2.0);
    }

    #[test]
    fn cap_drops_oldest() {
        let mut h = History::new(3);
        for i in 0..5 {
            h.record(create("h_cap"), i as f64);
        }
        assert_eq!(h.len(), 3);
        assert_eq!(h.index(), Some(2));
        assert_eq!(h.entries()[0].timestamp, 2.0);
    }
}
