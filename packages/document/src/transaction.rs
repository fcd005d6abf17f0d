//! # Transactions
//!
//! A transaction stages steps against a working copy of the document. Each
//! staged step updates the working tree, records its inverse, and extends the
//! transaction's [`Mapping`], so later sub-edits are computed against the
//! tree as it is *after* earlier ones.
//!
//! Nothing reaches the live document until the editor commits the
//! transaction. A step that fails validation leaves the working copy
//! untouched; callers propagate the error and drop the transaction, so no
//! partial edit is ever committed.

use crate::error::DocumentResult;
use crate::mapping::Mapping;
use crate::node::{Document, Node};
use crate::path::Path;
use crate::selection::Selection;
use crate::step::Step;
use serde::{Deserialize, Serialize};

/// How a committed transaction is treated by undo history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryMode {
    /// New undoable step
    #[default]
    Record,
    /// Not undoable on its own; folded into the next recorded step
    Transient,
    /// Not recorded at all
    Skip,
}

/// Who produced an edit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditOrigin {
    /// Column layout operations (movement, drag and drop, resize)
    Columns,
    /// Generic editing surface: typing, deletion, paste
    #[default]
    External,
    /// Undo and redo
    History,
    /// Corrective edits from the post-commit safety net
    SafetyNet,
}

#[derive(Debug, Clone)]
pub struct Transaction {
    base_version: u64,
    doc: Document,
    steps: Vec<Step>,
    inverses: Vec<Step>,
    mapping: Mapping,
    selection: Option<Selection>,
    history: HistoryMode,
    origin: EditOrigin,
    structure_checked: bool,
    description: Option<String>,
}

impl Transaction {
    /// Start a transaction against `doc`, which is at `base_version`
    pub fn new(doc: &Document, base_version: u64) -> Self {
        Self {
            base_version,
            doc: doc.clone(),
            steps: Vec::new(),
            inverses: Vec::new(),
            mapping: Mapping::new(),
            selection: None,
            history: HistoryMode::default(),
            origin: EditOrigin::default(),
            structure_checked: false,
            description: None,
        }
    }

    /// Working tree, with every staged step applied
    pub fn doc(&self) -> &Document {
        &self.doc
    }

    pub fn base_version(&self) -> u64 {
        self.base_version
    }

    pub fn step(&mut self, step: Step) -> DocumentResult<&mut Self> {
        let applied = step.apply(&mut self.doc)?;
        self.mapping.push(applied.map);
        self.inverses.push(applied.inverse);
        self.steps.push(step);
        Ok(self)
    }

    pub fn insert(&mut self, parent: &Path, index: usize, nodes: Vec<Node>) -> DocumentResult<&mut Self> {
        self.step(Step::insert(parent, index, nodes))
    }

    pub fn delete(&mut self, parent: &Path, start: usize, end: usize) -> DocumentResult<&mut Self> {
        self.step(Step::delete(parent, start, end))
    }

    pub fn delete_node(&mut self, at: &Path) -> DocumentResult<&mut Self> {
        self.step(Step::replace_node(at, Vec::new())?)
    }

    pub fn replace_node(&mut self, at: &Path, nodes: Vec<Node>) -> DocumentResult<&mut Self> {
        self.step(Step::replace_node(at, nodes)?)
    }

    pub fn dissolve(&mut self, group: &Path) -> DocumentResult<&mut Self> {
        self.step(Step::Dissolve {
            group: group.clone(),
        })
    }

    pub fn set_width(&mut self, column: &Path, width: Option<f64>) -> DocumentResult<&mut Self> {
        self.step(Step::SetWidth {
            column: column.clone(),
            width,
        })
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Inverses in application order; undo applies them reversed
    pub fn inverses(&self) -> &[Step] {
        &self.inverses
    }

    pub fn mapping(&self) -> &Mapping {
        &self.mapping
    }

    pub fn doc_changed(&self) -> bool {
        !self.steps.is_empty()
    }

    pub fn set_selection(&mut self, selection: Selection) -> &mut Self {
        self.selection = Some(selection);
        self
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn set_history(&mut self, mode: HistoryMode) -> &mut Self {
        self.history = mode;
        self
    }

    pub fn history(&self) -> HistoryMode {
        self.history
    }

    pub fn set_origin(&mut self, origin: EditOrigin) -> &mut Self {
        self.origin = origin;
        self
    }

    pub fn origin(&self) -> EditOrigin {
        self.origin
    }

    /// The structural maintainer already ran inline for this edit
    pub fn mark_structure_checked(&mut self) -> &mut Self {
        self.structure_checked = true;
        self
    }

    pub fn is_structure_checked(&self) -> bool {
        self.structure_checked
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = Some(description.into());
        self
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Hand the staged edit over for commit
    pub fn finish(self) -> CommittedTransaction {
        CommittedTransaction {
            base_version: self.base_version,
            doc: self.doc,
            steps: self.steps,
            inverses: self.inverses,
            mapping: self.mapping,
            selection: self.selection,
            history: self.history,
            origin: self.origin,
            structure_checked: self.structure_checked,
            description: self.description,
        }
    }
}

/// A finished transaction, ready to replace the live document
#[derive(Debug, Clone)]
pub struct CommittedTransaction {
    pub base_version: u64,
    pub doc: Document,
    pub steps: Vec<Step>,
    pub inverses: Vec<Step>,
    pub mapping: Mapping,
    pub selection: Option<Selection>,
    pub history: HistoryMode,
    pub origin: EditOrigin,
    pub structure_checked: bool,
    pub description: Option<String>,
}

impl CommittedTransaction {
    pub fn doc_changed(&self) -> bool {
        !self.steps.is_empty()
    }
}
