use crate::types::Timeline;

/// Number of snapshots kept unless configured otherwise.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// One committed state of all three tracks.
#[derive(Debug, Clone, PartialEq)]
struct Snapshot {
    label: String,
    timeline: Timeline,
}

/// Linear undo/redo log of full timeline snapshots.
///
/// The entry at `index` is the current state. Recording a new state drops
/// everything after `index`; once more than `max_size` entries exist the
/// oldest is evicted.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<Snapshot>,
    index: usize,
    max_size: usize,
}

impl History {
    pub fn new(initial: Timeline, max_size: usize) -> Self {
        Self {
            entries: vec![Snapshot {
                label: "Initial state".to_string(),
                timeline: initial,
            }],
            index: 0,
            max_size: max_size.max(1),
        }
    }

    /// Commit `timeline` as the new current state. Clears the redo branch.
    pub fn record(&mut self, label: impl Into<String>, timeline: &Timeline) {
        self.entries.truncate(self.index + 1);
        self.entries.push(Snapshot {
            label: label.into(),
            timeline: timeline.clone(),
        });
        if self.entries.len() > self.max_size {
            let excess = self.entries.len() - self.max_size;
            self.entries.drain(..excess);
        }
        self.index = self.entries.len() - 1;
    }

    /// Step back one snapshot. `None` when already at the oldest entry.
    pub fn undo(&mut self) -> Option<&Timeline> {
        if !self.can_undo() {
            return None;
        }
        self.index -= 1;
        Some(&self.entries[self.index].timeline)
    }

    /// Step forward one snapshot. `None` when already at the newest entry.
    pub fn redo(&mut self) -> Option<&Timeline> {
        if !self.can_redo() {
            return None;
        }
        self.index += 1;
        Some(&self.entries[self.index].timeline)
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    pub fn current(&self) -> &Timeline {
        &self.entries[self.index].timeline
    }

    /// Label of the edit an undo would revert.
    pub fn undo_description(&self) -> Option<&str> {
        self.can_undo()
            .then(|| self.entries[self.index].label.as_str())
    }

    /// Label of the edit a redo would reapply.
    pub fn redo_description(&self) -> Option<&str> {
        self.can_redo()
            .then(|| self.entries[self.index + 1].label.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
