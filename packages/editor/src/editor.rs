//! # Editor State and Dispatch
//!
//! Owns the live document, the cursor, undo history and the post-commit
//! safety net. Every change goes through [`Editor::dispatch`]:
//!
//! 1. reject transactions built against an older version
//! 2. swap in the transaction's working tree
//! 3. take the transaction's selection, or map the old one through the edit
//! 4. record history according to the transaction's [`HistoryMode`]
//! 5. run the safety net; apply its correction and fold it into the same
//!    history entry
//!
//! All of it happens inside one call, so no caller ever observes the tree
//! between steps 2 and 5.
//!
//! The position mapping of each recent commit is journaled by version, so
//! anything holding a path from an older version can carry it forward with
//! [`Editor::mapping_since`].

use crate::config::EditorConfig;
use crate::errors::{EditorError, EditorResult};
use crate::post_effects::{CommitInfo, SafetyNet};
use crate::undo_stack::UndoStack;
use quire_document::{Document, EditOrigin, HistoryMode, Mapping, Selection, Transaction};
use std::collections::VecDeque;
use tracing::{debug, info, instrument, warn};

/// Commits whose mappings stay available to [`Editor::mapping_since`]
const JOURNAL_LEN: usize = 64;

#[derive(Debug)]
pub struct Editor {
    doc: Document,
    selection: Selection,
    version: u64,
    history: UndoStack,
    safety_net: SafetyNet,
    config: EditorConfig,
    journal: VecDeque<(u64, Mapping)>,
}

impl Editor {
    pub fn new(doc: Document) -> Self {
        Self::with_config(doc, EditorConfig::default())
    }

    pub fn with_config(doc: Document, config: EditorConfig) -> Self {
        Self {
            selection: Selection::at_document_start(&doc),
            doc,
            version: 0,
            history: UndoStack::with_max_levels(config.history.max_levels),
            safety_net: SafetyNet::new(&config),
            config,
            journal: VecDeque::with_capacity(JOURNAL_LEN),
        }
    }

    pub fn doc(&self) -> &Document {
        &self.doc
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = selection.clamped(&self.doc);
    }

    /// Number of commits so far, corrections included
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn history(&self) -> &UndoStack {
        &self.history
    }

    pub fn safety_net(&self) -> &SafetyNet {
        &self.safety_net
    }

    pub fn safety_net_mut(&mut self) -> &mut SafetyNet {
        &mut self.safety_net
    }

    /// Mapping from the tree at `version` to the current one, or `None` when
    /// the journal no longer reaches back that far
    pub fn mapping_since(&self, version: u64) -> Option<Mapping> {
        if version > self.version {
            return None;
        }
        let mut mapping = Mapping::new();
        let mut expected = version + 1;
        for (at, step) in self.journal.iter().filter(|(at, _)| *at > version) {
            if *at != expected {
                return None;
            }
            mapping.append(step);
            expected += 1;
        }
        (expected == self.version + 1).then_some(mapping)
    }

    fn remember_mapping(&mut self, mapping: Mapping) {
        if self.journal.len() == JOURNAL_LEN {
            self.journal.pop_front();
        }
        self.journal.push_back((self.version, mapping));
    }

    /// Start a transaction against the current document
    pub fn transaction(&self) -> Transaction {
        Transaction::new(&self.doc, self.version)
    }

    /// Commit a transaction and run the safety net
    #[instrument(skip(self, tr), fields(version = self.version, origin = ?tr.origin(), history = ?tr.history(), steps = tr.step_count()))]
    pub fn dispatch(&mut self, tr: Transaction) -> EditorResult<()> {
        if tr.base_version() != self.version {
            return Err(EditorError::StaleTransaction {
                built: tr.base_version(),
                current: self.version,
            });
        }

        let committed = tr.finish();
        let info = CommitInfo {
            origin: committed.origin,
            history: committed.history,
            structure_checked: committed.structure_checked,
            doc_changed: committed.doc_changed(),
            version: self.version + 1,
        };

        self.selection = match committed.selection {
            Some(selection) => selection.clamped(&committed.doc),
            None => self.selection.map(&committed.mapping, &committed.doc),
        };
        if committed.history != HistoryMode::Transient
            && committed.origin != EditOrigin::Columns
            && self.history.has_pending_transient()
        {
            // Widths from an unfinished drag belong to the drag, not to this edit
            debug!("Settling transient edits ahead of an unrelated commit");
            self.history.discard_pending();
        }
        self.history.record(
            &committed.steps,
            &committed.inverses,
            committed.history,
            committed.description.as_deref(),
        );
        self.doc = committed.doc;
        self.version += 1;
        self.remember_mapping(committed.mapping);
        debug!(
            version = self.version,
            description = committed.description.as_deref().unwrap_or_default(),
            "Committed edit"
        );

        if let Some(correction) = self.safety_net.run(&self.doc, info) {
            let fixed = correction.finish();
            self.selection = self.selection.map(&fixed.mapping, &fixed.doc);
            self.history
                .append_to_last(&fixed.steps, &fixed.inverses, fixed.history);
            self.doc = fixed.doc;
            self.version += 1;
            self.remember_mapping(fixed.mapping);
            info!(
                steps = fixed.steps.len(),
                version = self.version,
                "Applied safety-net correction"
            );
        }

        Ok(())
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Undo the most recent history entry. Returns false when there is none
    /// or it no longer applies.
    pub fn undo(&mut self) -> bool {
        let mut tr = self.transaction();
        match self.history.undo(&mut tr) {
            Ok(true) => self.dispatch_history(tr),
            Ok(false) => false,
            Err(error) => {
                warn!(%error, "Undo failed");
                false
            }
        }
    }

    pub fn redo(&mut self) -> bool {
        let mut tr = self.transaction();
        match self.history.redo(&mut tr) {
            Ok(true) => self.dispatch_history(tr),
            Ok(false) => false,
            Err(error) => {
                warn!(%error, "Redo failed");
                false
            }
        }
    }

    fn dispatch_history(&mut self, mut tr: Transaction) -> bool {
        tr.set_origin(EditOrigin::History)
            .set_history(HistoryMode::Skip);
        match self.dispatch(tr) {
            Ok(()) => true,
            Err(error) => {
                warn!(%error, "History edit rejected");
                false
            }
        }
    }
}
