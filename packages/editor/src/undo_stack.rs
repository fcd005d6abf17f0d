//! # Undo/Redo Stack
//!
//! Tracks committed steps and enables undo/redo.
//!
//! ## Design
//!
//! - Each committed transaction records its steps and their inverses
//! - Undo stages the inverses into a new transaction and moves the batch to redo
//! - Redo stages the original steps again
//! - New entries clear the redo stack
//! - Transient edits are not entries of their own: their inverses wait in a
//!   pending list and are folded into the next recorded entry, so a gesture made
//!   of many transient edits plus one final commit undoes in a single step
//! - Corrective edits from the safety net are appended to the entry that caused
//!   them
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut stack = UndoStack::new();
//! stack.record(tr.steps(), tr.inverses(), HistoryMode::Record, None);
//!
//! let mut undo = Transaction::new(&doc, version);
//! stack.undo(&mut undo)?;
//! ```

use quire_document::{DocumentResult, HistoryMode, Step, Transaction};

/// A group of steps that are undone/redone together
#[derive(Debug, Clone)]
pub struct HistoryBatch {
    /// Steps in application order
    pub steps: Vec<Step>,

    /// Inverse steps in undo order (most recent step first)
    pub inverses: Vec<Step>,

    /// Optional description of this batch
    pub description: Option<String>,
}

impl HistoryBatch {
    /// Create a batch from a transaction's steps and inverses
    pub fn from_steps(steps: &[Step], inverses: &[Step]) -> Self {
        Self {
            steps: steps.to_vec(),
            inverses: undo_order(inverses),
            description: None,
        }
    }

    /// Add a description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

fn undo_order(inverses: &[Step]) -> Vec<Step> {
    inverses.iter().rev().cloned().collect()
}

/// Undo/redo stack for document editing
#[derive(Debug)]
pub struct UndoStack {
    /// Stack of applied batches (most recent last)
    undo_stack: Vec<HistoryBatch>,

    /// Stack of undone batches (most recent last)
    redo_stack: Vec<HistoryBatch>,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,

    /// Inverses of transient edits since the last recorded entry, in undo order
    pending_transient: Vec<Step>,
}

impl UndoStack {
    /// Create a new undo stack with default max levels (100)
    pub fn new() -> Self {
        Self::with_max_levels(100)
    }

    /// Create an undo stack with custom max levels
    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_levels,
            pending_transient: Vec::new(),
        }
    }

    /// Record a committed transaction according to its history mode
    pub fn record(
        &mut self,
        steps: &[Step],
        inverses: &[Step],
        mode: HistoryMode,
        description: Option<&str>,
    ) {
        match mode {
            HistoryMode::Record => {
                if steps.is_empty() {
                    return;
                }
                let mut batch = HistoryBatch::from_steps(steps, inverses);
                batch.inverses.append(&mut self.pending_transient);
                if let Some(description) = description {
                    batch = batch.with_description(description);
                }
                self.push_batch(batch);
            }
            HistoryMode::Transient => {
                let mut pending = undo_order(inverses);
                pending.append(&mut self.pending_transient);
                self.pending_transient = pending;
            }
            HistoryMode::Skip => {
                self.pending_transient.clear();
            }
        }
    }

    /// Fold a follow-up edit into whatever `mode` last recorded to
    pub fn append_to_last(&mut self, steps: &[Step], inverses: &[Step], mode: HistoryMode) {
        if steps.is_empty() {
            return;
        }
        match mode {
            HistoryMode::Record => match self.undo_stack.last_mut() {
                Some(last) => {
                    last.steps.extend_from_slice(steps);
                    let mut combined = undo_order(inverses);
                    combined.append(&mut last.inverses);
                    last.inverses = combined;
                }
                None => self.push_batch(HistoryBatch::from_steps(steps, inverses)),
            },
            HistoryMode::Transient => {
                let mut pending = undo_order(inverses);
                pending.append(&mut self.pending_transient);
                self.pending_transient = pending;
            }
            HistoryMode::Skip => {}
        }
    }

    /// Push a batch to the undo stack
    fn push_batch(&mut self, batch: HistoryBatch) {
        self.undo_stack.push(batch);

        // Trim if exceeded max levels
        if self.max_levels > 0 && self.undo_stack.len() > self.max_levels {
            self.undo_stack.remove(0);
        }

        // Clear redo stack (new action invalidates future)
        self.redo_stack.clear();
    }

    /// Stage the most recent batch's inverses into `tr`
    pub fn undo(&mut self, tr: &mut Transaction) -> DocumentResult<bool> {
        let Some(batch) = self.undo_stack.last() else {
            return Ok(false); // Nothing to undo
        };
        for inverse in &batch.inverses {
            tr.step(inverse.clone())?;
        }
        if let Some(batch) = self.undo_stack.pop() {
            tr.set_description(format!(
                "Undo {}",
                batch.description.as_deref().unwrap_or("edit")
            ));
            self.redo_stack.push(batch);
        }
        Ok(true)
    }

    /// Stage the most recently undone batch's steps into `tr`
    pub fn redo(&mut self, tr: &mut Transaction) -> DocumentResult<bool> {
        let Some(batch) = self.redo_stack.last() else {
            return Ok(false); // Nothing to redo
        };
        for step in &batch.steps {
            tr.step(step.clone())?;
        }
        if let Some(batch) = self.redo_stack.pop() {
            self.undo_stack.push(batch);
        }
        Ok(true)
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Get the number of undo levels available
    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    /// Get the number of redo levels available
    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn has_pending_transient(&self) -> bool {
        !self.pending_transient.is_empty()
    }

    /// Forget transient inverses without recording them, leaving their edits
    /// in place as if they had always been there
    pub fn discard_pending(&mut self) {
        self.pending_transient.clear();
    }

    /// Clear all undo/redo history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.pending_transient.clear();
    }

    /// Get description of the next undo operation
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack
            .last()
            .and_then(|batch| batch.description.as_deref())
    }

    /// Get description of the next redo operation
    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack
            .last()
            .and_then(|batch| batch.description.as_deref())
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}
