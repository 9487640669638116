//! Bounded snapshot stack for undo.
//!
//! Snapshots are whole-model deep copies (two flat sequences); the mesh is
//! small enough that full copies stay cheap and simple to reason about.
//! The stack keeps the initial state plus up to `capacity` edits; the
//! oldest edit is evicted beyond that. The bottom snapshot is the floor:
//! undo never discards it.

use tracing::debug;

use crate::types::MaskMesh;

/// Default number of undoable edits kept on top of the initial state.
pub const DEFAULT_UNDO_CAPACITY: usize = 256;

/// Bounded LIFO of whole-model snapshots.
#[derive(Debug)]
pub struct HistoryStack {
    snapshots: Vec<MaskMesh>,
    capacity: usize,
}

impl Default for HistoryStack {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryStack {
    /// Create an empty stack with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_UNDO_CAPACITY)
    }

    /// Create an empty stack holding up to `capacity` edits plus the
    /// initial state.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            snapshots: Vec::new(),
            capacity,
        }
    }

    /// Push the current model state. Called after every mutating edit
    /// (and once for the initial state).
    pub fn push(&mut self, mesh: &MaskMesh) {
        self.snapshots.push(mesh.clone());
        // capacity edits + the initial state
        if self.snapshots.len() > self.capacity + 1 {
            self.snapshots.remove(0);
        }
        debug!("History: {} snapshot(s)", self.snapshots.len());
    }

    /// Discard the current snapshot and restore the previous one into
    /// `mesh`. A no-op returning `false` when only the floor remains.
    pub fn undo(&mut self, mesh: &mut MaskMesh) -> bool {
        if self.snapshots.len() < 2 {
            return false;
        }
        self.snapshots.pop();
        let previous = self
            .snapshots
            .last()
            .expect("floor snapshot always present");
        *mesh = previous.clone();
        debug!("History: undo, {} snapshot(s) left", self.snapshots.len());
        true
    }

    /// Drop everything and record `mesh` as the new initial state.
    pub fn reset(&mut self, mesh: &MaskMesh) {
        self.snapshots.clear();
        self.push(mesh);
    }

    /// Number of snapshots currently held.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Whether the stack holds no snapshots at all.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Whether any edit beyond the initial state has been recorded.
    pub fn is_modified(&self) -> bool {
        self.snapshots.len() > 1
    }
}
