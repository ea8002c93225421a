//! Round state and core data types
//!
//! Plain data plus the transitions that don't need randomness or feedback.

use serde::{Deserialize, Serialize};

use super::shape::Shape;

/// Current phase of a round (derived from the counters, never stored)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// No round has been started yet
    Empty,
    /// Shapes remain to be popped
    Active,
    /// Every shape of the round has been popped
    Complete,
}

/// A shape waiting for its exit animation before leaving the round
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PendingRemoval {
    pub shape_id: u32,
    /// Time (ms) at which the shape may be removed
    pub due_ms: f64,
}

/// All state of the current round
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoundState {
    /// Shapes to pop this round
    pub target: u32,
    /// Shapes popped so far
    pub cleared: u32,
    /// Shapes still on screen (ordered by id)
    pub shapes: Vec<Shape>,
    /// Removals scheduled by clicks, in click order
    pending: Vec<PendingRemoval>,
    /// Next shape ID
    next_id: u32,
}

impl RoundState {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Default::default()
        }
    }

    pub fn phase(&self) -> RoundPhase {
        if self.target == 0 {
            RoundPhase::Empty
        } else if self.cleared >= self.target {
            RoundPhase::Complete
        } else {
            RoundPhase::Active
        }
    }

    pub fn is_complete(&self) -> bool {
        self.phase() == RoundPhase::Complete
    }

    /// Allocate a new shape ID (never reused within this state)
    pub fn next_shape_id(&mut self) -> u32 {
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        id
    }

    /// Replace the round's contents with freshly generated shapes
    pub fn populate(&mut self, target: u32, shapes: Vec<Shape>) {
        debug_assert_eq!(shapes.len(), target as usize);
        self.target = target;
        self.cleared = 0;
        self.shapes = shapes;
        self.pending.clear();
    }

    pub fn shape(&self, id: u32) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id == id)
    }

    /// IDs of shapes that can still be popped
    pub fn live_ids(&self) -> Vec<u32> {
        self.shapes
            .iter()
            .filter(|s| s.is_live())
            .map(|s| s.id)
            .collect()
    }

    pub fn pending_removals(&self) -> &[PendingRemoval] {
        &self.pending
    }

    /// Mark a live shape exploded and schedule its removal.
    ///
    /// Returns the new cleared count, or `None` if `id` is unknown or the
    /// shape was already exploded.
    pub fn explode(&mut self, id: u32, remove_at_ms: f64) -> Option<u32> {
        let shape = self.shapes.iter_mut().find(|s| s.id == id && s.is_live())?;
        shape.exploded = true;
        self.cleared = (self.cleared + 1).min(self.target);
        self.pending.push(PendingRemoval {
            shape_id: id,
            due_ms: remove_at_ms,
        });
        Some(self.cleared)
    }

    /// Drop every shape whose removal is due at `now_ms`.
    ///
    /// Returns how many shapes actually left the round; removals for shapes
    /// that are already gone are discarded.
    pub fn remove_due(&mut self, now_ms: f64) -> usize {
        let (due, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|r| r.due_ms <= now_ms);
        self.pending = waiting;

        let before = self.shapes.len();
        self.shapes.retain(|s| !due.iter().any(|r| r.shape_id == s.id));
        before - self.shapes.len()
    }
}
