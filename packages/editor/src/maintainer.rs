//! # Structural Invariant Maintainer
//!
//! Repairs column groups that fell below two columns.
//!
//! ## Rules
//!
//! For every group, deepest first:
//! - empty columns are removed
//! - 0 columns left → the group is deleted
//! - 1 column left → the group is replaced by that column's content (spliced, never nested)
//! - ≥2 columns left → the group stays; if columns were removed here, its
//!   widths reset to equal share
//!
//! Manually set widths on groups this pass did not touch are left alone.
//!
//! Every group path is captured before the pass and re-resolved through the
//! steps the pass has staged so far, so earlier repairs never leave a later
//! one pointing at a shifted node.

use quire_document::builder::placeholder;
use quire_document::visitor::{collect_group_paths, Order};
use quire_document::{DocumentError, DocumentResult, Node, Path, Transaction};
use tracing::{debug, info};

/// What one maintenance pass changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupReport {
    pub groups_deleted: usize,
    pub groups_dissolved: usize,
    pub columns_removed: usize,
    pub widths_reset: usize,
    pub placeholder_inserted: bool,
}

impl CleanupReport {
    pub fn is_clean(&self) -> bool {
        *self == Self::default()
    }
}

/// Stage repairs for every degenerate group into `tr`
pub fn dissolve_orphaned_groups(tr: &mut Transaction) -> DocumentResult<CleanupReport> {
    let start = tr.mapping().len();
    let mut report = CleanupReport::default();

    for captured in collect_group_paths(tr.doc(), Order::PostOrder) {
        let Some(path) = tr.mapping().map_from(start, &captured) else {
            continue; // removed together with an enclosing node
        };
        let Some(Node::ColumnGroup(group)) = tr.doc().node_at(&path) else {
            continue;
        };

        let column_count = group.children.len();
        let empty_columns: Vec<usize> = group
            .children
            .iter()
            .enumerate()
            .filter(|(_, column)| column.children().is_some_and(<[Node]>::is_empty))
            .map(|(index, _)| index)
            .collect();

        for index in empty_columns.iter().rev() {
            tr.delete_node(&path.child(*index))?;
            report.columns_removed += 1;
        }

        match column_count - empty_columns.len() {
            0 => {
                debug!(group = %path, "Deleting group without columns");
                tr.delete_node(&path)?;
                report.groups_deleted += 1;
            }
            1 => {
                debug!(group = %path, "Dissolving single-column group");
                tr.dissolve(&path)?;
                report.groups_dissolved += 1;
            }
            _ if !empty_columns.is_empty() => {
                report.widths_reset += reset_widths(tr, &path)?;
            }
            _ => {}
        }
    }

    if tr.doc().children.is_empty() {
        tr.insert(&Path::root(), 0, vec![placeholder()])?;
        report.placeholder_inserted = true;
    }

    if !report.is_clean() {
        info!(
            deleted = report.groups_deleted,
            dissolved = report.groups_dissolved,
            columns_removed = report.columns_removed,
            widths_reset = report.widths_reset,
            "Repaired column structure"
        );
    }

    Ok(report)
}

/// Reset every locked column of `group` to equal share. Returns how many
/// columns changed.
pub fn reset_widths(tr: &mut Transaction, group: &Path) -> DocumentResult<usize> {
    let locked: Vec<usize> = match tr.doc().node_at(group) {
        Some(Node::ColumnGroup(node)) => node
            .children
            .iter()
            .enumerate()
            .filter(|(_, child)| child.as_column().is_some_and(|column| column.width.is_some()))
            .map(|(index, _)| index)
            .collect(),
        _ => return Err(DocumentError::NotAColumnGroup(group.clone())),
    };

    for index in &locked {
        tr.set_width(&group.child(*index), None)?;
    }
    Ok(locked.len())
}
