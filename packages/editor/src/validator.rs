//! # Safety-Net Validator
//!
//! Diagnostic pass over the committed tree. It never repairs anything; it
//! reports violations and leaves correction to the maintainer.
//!
//! ## State Machine
//!
//! ```text
//! Clean ──(violations)──→ Violating ──(none)──→ Clean
//!                          │    ↑
//!                          └────┘ same fingerprint: suppressed
//!                                 new fingerprint: reported again
//! ```
//!
//! A violation set is identified by a CRC32 fingerprint of its sorted form,
//! so repeated commits of the same bad tree log once.

use crate::errors::EditorResult;
use crate::post_effects::{HookContext, PostCommitHook};
use crc32fast::Hasher;
use quire_document::visitor::{walk_children, walk_node, Visitor};
use quire_document::{validate_width, Column, ColumnGroup, Document, Node, Path, MIN_GROUP_COLUMNS};
use serde::Serialize;
use std::hash::Hash;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum Violation {
    TooFewColumns { group: Path, count: usize },
    EmptyColumn { column: Path },
    ColumnOutsideGroup { column: Path },
    NonColumnInGroup { group: Path, index: usize },
    InvalidWidth { column: Path },
}

struct ViolationFinder {
    violations: Vec<Violation>,
}

impl ViolationFinder {
    fn check_member(&mut self, path: &Path, column: &Column) {
        if column.children.is_empty() {
            self.violations.push(Violation::EmptyColumn {
                column: path.clone(),
            });
        }
        if validate_width(column.width).is_err() {
            self.violations.push(Violation::InvalidWidth {
                column: path.clone(),
            });
        }
    }
}

impl Visitor for ViolationFinder {
    fn visit_column_group(&mut self, path: &Path, group: &ColumnGroup) {
        let count = group
            .children
            .iter()
            .filter(|child| matches!(child, Node::Column(_)))
            .count();
        if count < MIN_GROUP_COLUMNS {
            self.violations.push(Violation::TooFewColumns {
                group: path.clone(),
                count,
            });
        }
        for (index, child) in group.children.iter().enumerate() {
            let child_path = path.child(index);
            match child {
                Node::Column(column) => {
                    self.check_member(&child_path, column);
                    walk_children(self, &child_path, &column.children);
                }
                other => {
                    self.violations.push(Violation::NonColumnInGroup {
                        group: path.clone(),
                        index,
                    });
                    walk_node(self, &child_path, other);
                }
            }
        }
    }

    // Group members are handled above; reaching this means a stray column
    fn visit_column(&mut self, path: &Path, column: &Column) {
        self.violations.push(Violation::ColumnOutsideGroup {
            column: path.clone(),
        });
        self.check_member(path, column);
        walk_children(self, path, &column.children);
    }
}

/// Every invariant violation in `doc`, sorted
pub fn find_violations(doc: &Document) -> Vec<Violation> {
    let mut finder = ViolationFinder {
        violations: Vec::new(),
    };
    finder.visit_document(doc);
    finder.violations.sort();
    finder.violations
}

/// Stable fingerprint of a violation set
pub fn fingerprint(violations: &[Violation]) -> u32 {
    let mut sorted = violations.to_vec();
    sorted.sort();
    let mut hasher = Hasher::new();
    sorted.hash(&mut hasher);
    hasher.finalize()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Clean,
    /// New violation set, logged
    Reported {
        fingerprint: u32,
        violations: Vec<Violation>,
    },
    /// Same violation set as the last report, not logged again
    Suppressed { fingerprint: u32 },
}

#[derive(Debug, Default)]
pub struct StructureValidator {
    last_fingerprint: Option<u32>,
    reports: usize,
}

impl StructureValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_violating(&self) -> bool {
        self.last_fingerprint.is_some()
    }

    /// Number of distinct reports logged so far
    pub fn reports(&self) -> usize {
        self.reports
    }

    pub fn check(&mut self, doc: &Document) -> ValidationOutcome {
        let violations = find_violations(doc);
        if violations.is_empty() {
            if self.last_fingerprint.take().is_some() {
                debug!("Column structure valid again");
            }
            return ValidationOutcome::Clean;
        }

        let fingerprint = fingerprint(&violations);
        if self.last_fingerprint == Some(fingerprint) {
            return ValidationOutcome::Suppressed { fingerprint };
        }

        self.last_fingerprint = Some(fingerprint);
        self.reports += 1;
        warn!(
            fingerprint = %format!("{:08x}", fingerprint),
            count = violations.len(),
            violations = ?violations,
            "Column structure invariant violated"
        );
        ValidationOutcome::Reported {
            fingerprint,
            violations,
        }
    }
}

impl PostCommitHook for StructureValidator {
    fn name(&self) -> &'static str {
        "structure-validator"
    }

    fn after_commit(&mut self, cx: &mut HookContext<'_>) -> EditorResult<()> {
        if !cx.info().doc_changed {
            return Ok(());
        }
        let outcome = self.check(cx.doc());
        cx.record_validation(outcome);
        Ok(())
    }
}
