//! # Post-Commit Safety Net
//!
//! Edits from outside the column engine (typing, deletion, paste, undo, a
//! misbehaving host) can leave the tree with degenerate groups. The safety
//! net repairs that after the fact.
//!
//! ## Design
//!
//! The net is one explicit, ordered hook list that the editor runs
//! synchronously right after swapping in a committed document, on the same
//! call stack as the dispatch:
//!
//! 1. [`OrphanedGroupCleanup`] stages corrective steps (the maintainer pass)
//! 2. [`StructureValidator`] reports whatever is still wrong (observational)
//!
//! Hooks share one lazily created correction transaction. The editor applies
//! it before anyone else sees the committed tree and folds it into the same
//! history entry as the edit that caused it. A hook that fails loses only
//! what it staged itself; earlier hooks' repairs are kept.

use crate::config::EditorConfig;
use crate::errors::EditorResult;
use crate::maintainer::dissolve_orphaned_groups;
use crate::validator::{StructureValidator, ValidationOutcome};
use quire_document::{Document, EditOrigin, HistoryMode, Transaction};
use tracing::warn;

/// Metadata of the commit a hook reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitInfo {
    pub origin: EditOrigin,
    pub history: HistoryMode,
    pub structure_checked: bool,
    pub doc_changed: bool,
    /// Editor version after the commit
    pub version: u64,
}

/// What hooks see and write to during one safety-net run
#[derive(Debug)]
pub struct HookContext<'a> {
    committed: &'a Document,
    info: CommitInfo,
    correction: Option<Transaction>,
    validation: Option<ValidationOutcome>,
}

impl<'a> HookContext<'a> {
    pub fn new(committed: &'a Document, info: CommitInfo) -> Self {
        Self {
            committed,
            info,
            correction: None,
            validation: None,
        }
    }

    pub fn info(&self) -> &CommitInfo {
        &self.info
    }

    /// The tree as it will look once staged corrections are applied
    pub fn doc(&self) -> &Document {
        match &self.correction {
            Some(tr) => tr.doc(),
            None => self.committed,
        }
    }

    /// Correction transaction, created on first use
    pub fn correction_mut(&mut self) -> &mut Transaction {
        let committed = self.committed;
        let info = self.info;
        self.correction.get_or_insert_with(|| {
            let mut tr = Transaction::new(committed, info.version);
            tr.set_origin(EditOrigin::SafetyNet)
                .set_history(info.history)
                .set_description("Repair column structure");
            tr
        })
    }

    pub fn record_validation(&mut self, outcome: ValidationOutcome) {
        self.validation = Some(outcome);
    }

    fn checkpoint(&self) -> Option<Transaction> {
        self.correction.clone()
    }

    fn roll_back(&mut self, checkpoint: Option<Transaction>) {
        self.correction = checkpoint;
    }
}

/// Hook run after every commit
pub trait PostCommitHook: std::fmt::Debug {
    fn name(&self) -> &'static str;

    fn after_commit(&mut self, cx: &mut HookContext<'_>) -> EditorResult<()>;
}

/// Runs the structural maintainer on edits that did not already run it
#[derive(Debug, Default)]
pub struct OrphanedGroupCleanup;

impl PostCommitHook for OrphanedGroupCleanup {
    fn name(&self) -> &'static str {
        "orphaned-group-cleanup"
    }

    fn after_commit(&mut self, cx: &mut HookContext<'_>) -> EditorResult<()> {
        let info = cx.info();
        if info.structure_checked || !info.doc_changed {
            return Ok(());
        }
        dissolve_orphaned_groups(cx.correction_mut())?;
        Ok(())
    }
}

/// Ordered post-commit hook pipeline
#[derive(Debug)]
pub struct SafetyNet {
    hooks: Vec<Box<dyn PostCommitHook>>,
    last_validation: Option<ValidationOutcome>,
}

impl SafetyNet {
    /// Maintainer first, then the validator when enabled
    pub fn new(config: &EditorConfig) -> Self {
        let mut net = Self::empty();
        net.push(Box::new(OrphanedGroupCleanup));
        if config.validator.is_enabled() {
            net.push(Box::new(StructureValidator::new()));
        }
        net
    }

    pub fn empty() -> Self {
        Self {
            hooks: Vec::new(),
            last_validation: None,
        }
    }

    /// Append a hook; it runs after every hook already registered
    pub fn push(&mut self, hook: Box<dyn PostCommitHook>) {
        self.hooks.push(hook);
    }

    pub fn hook_names(&self) -> Vec<&'static str> {
        self.hooks.iter().map(|hook| hook.name()).collect()
    }

    pub fn last_validation(&self) -> Option<&ValidationOutcome> {
        self.last_validation.as_ref()
    }

    /// Run every hook against `doc`. Returns the correction to apply, if any.
    pub fn run(&mut self, doc: &Document, info: CommitInfo) -> Option<Transaction> {
        let mut cx = HookContext::new(doc, info);
        for hook in &mut self.hooks {
            let checkpoint = cx.checkpoint();
            if let Err(error) = hook.after_commit(&mut cx) {
                warn!(hook = hook.name(), %error, "Post-commit hook failed, rolling back its steps");
                cx.roll_back(checkpoint);
            }
        }
        if let Some(outcome) = cx.validation.take() {
            self.last_validation = Some(outcome);
        }
        cx.correction.filter(Transaction::doc_changed)
    }
}

impl Default for SafetyNet {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ValidatorConfig;
    use quire_document::builder::{column, doc, group, paragraph};

    fn info(structure_checked: bool) -> CommitInfo {
        CommitInfo {
            origin: EditOrigin::External,
            history: HistoryMode::Record,
            structure_checked,
            doc_changed: true,
            version: 1,
        }
    }

    fn degenerate() -> Document {
        doc(vec![group(vec![column(vec![]), column(vec![paragraph("B")])])])
    }

    #[test]
    fn test_hook_order() {
        let config = EditorConfig {
            validator: ValidatorConfig { enabled: Some(true) },
            ..EditorConfig::default()
        };
        let net = SafetyNet::new(&config);
        assert_eq!(
            net.hook_names(),
            vec!["orphaned-group-cleanup", "structure-validator"]
        );
    }

    #[test]
    fn test_validator_can_be_disabled() {
        let config = EditorConfig {
            validator: ValidatorConfig {
                enabled: Some(false),
            },
            ..EditorConfig::default()
        };
        assert_eq!(SafetyNet::new(&config).hook_names(), vec!["orphaned-group-cleanup"]);
    }

    #[test]
    fn test_correction_for_external_edit() {
        let mut net = SafetyNet::empty();
        net.push(Box::new(OrphanedGroupCleanup));
        let correction = net.run(&degenerate(), info(false)).unwrap();
        assert_eq!(correction.doc().outline(), "B");
        assert_eq!(correction.origin(), EditOrigin::SafetyNet);
        assert_eq!(correction.base_version(), 1);
    }

    #[test]
    fn test_structure_checked_edit_is_trusted() {
        let mut net = SafetyNet::empty();
        net.push(Box::new(OrphanedGroupCleanup));
        assert!(net.run(&degenerate(), info(true)).is_none());
    }

    #[test]
    fn test_healthy_tree_needs_no_correction() {
        let mut net = SafetyNet::empty();
        net.push(Box::new(OrphanedGroupCleanup));
        let healthy = doc(vec![group(vec![
            column(vec![paragraph("A")]),
            column(vec![paragraph("B")]),
        ])]);
        assert!(net.run(&healthy, info(false)).is_none());
    }

    #[test]
    fn test_validator_sees_corrected_tree() {
        let mut net = SafetyNet::empty();
        net.push(Box::new(OrphanedGroupCleanup));
        net.push(Box::new(StructureValidator::new()));
        net.run(&degenerate(), info(false));
        assert_eq!(net.last_validation(), Some(&ValidationOutcome::Clean));
    }

    /// Stages a stray paragraph, then gives up
    #[derive(Debug)]
    struct HalfDone;

    impl PostCommitHook for HalfDone {
        fn name(&self) -> &'static str {
            "half-done"
        }

        fn after_commit(&mut self, cx: &mut HookContext<'_>) -> EditorResult<()> {
            cx.correction_mut()
                .insert(&quire_document::Path::root(), 0, vec![paragraph("stray")])?;
            Err(crate::errors::EditorError::resolution("gave up halfway"))
        }
    }

    #[test]
    fn test_failed_hook_keeps_earlier_repairs() {
        let mut net = SafetyNet::empty();
        net.push(Box::new(OrphanedGroupCleanup));
        net.push(Box::new(HalfDone));
        let correction = net.run(&degenerate(), info(false)).unwrap();
        assert_eq!(correction.doc().outline(), "B");
    }

    #[test]
    fn test_failed_first_hook_leaves_nothing_staged() {
        let mut net = SafetyNet::empty();
        net.push(Box::new(HalfDone));
        let healthy = doc(vec![paragraph("A")]);
        assert!(net.run(&healthy, info(false)).is_none());
    }
}
