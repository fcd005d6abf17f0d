//! # Block Movement Engine
//!
//! Keyboard-driven block moves.
//!
//! ## Operations
//!
//! - [`move_block_up`] / [`move_block_down`]: swap the block at the cursor
//!   with its neighbour inside the same flow (root or column)
//! - [`move_block_across_column_boundary`]: move a block sitting at the edge
//!   of its column out of the group, before or after it
//! - [`duplicate_block`]: insert a copy right after the block
//!
//! Each operation is one atomic edit and one undo step. Positions captured
//! before a sub-edit are re-resolved through the transaction's mapping before
//! they are used again, and the maintainer runs inline whenever a move can
//! leave a group degenerate, so the safety net never has to step in.
//!
//! Failures are silent: a move that cannot resolve its positions reports
//! `handled: false` and commits nothing.

use crate::editor::Editor;
use crate::errors::{EditorError, EditorResult};
use crate::maintainer::{dissolve_orphaned_groups, reset_widths};
use quire_document::{EditOrigin, Movable, Node, NodeType, Path, Selection, Transaction};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    fn label(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}

/// Result reported to the keyboard layer. `handled: false` lets the caller
/// fall through to default behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MoveOutcome {
    pub handled: bool,
    pub moved: bool,
}

impl MoveOutcome {
    pub const fn moved() -> Self {
        Self {
            handled: true,
            moved: true,
        }
    }

    /// Already first/last in its container
    pub const fn at_boundary() -> Self {
        Self {
            handled: true,
            moved: false,
        }
    }

    pub const fn unhandled() -> Self {
        Self {
            handled: false,
            moved: false,
        }
    }
}

/// The movable node under the cursor and the flow it sits in
pub fn movable_at_cursor(editor: &Editor) -> Option<Movable> {
    editor
        .doc()
        .resolve(&editor.selection().block)?
        .movable()
}

/// Cursor translated from the moved node's old path to its new one
fn follow_cursor(editor: &Editor, movable: &Movable, new_node: &Path) -> Selection {
    let cursor = editor.selection();
    let inner = cursor.block.suffix_from(movable.node.depth());
    Selection::cursor(new_node.join(inner), cursor.offset)
}

fn commit(editor: &mut Editor, staged: EditorResult<Transaction>, operation: &str) -> MoveOutcome {
    match staged.and_then(|tr| editor.dispatch(tr)) {
        Ok(()) => MoveOutcome::moved(),
        Err(error) => {
            debug!(operation, %error, "Block move aborted");
            MoveOutcome::unhandled()
        }
    }
}

pub fn move_block_up(editor: &mut Editor) -> MoveOutcome {
    move_block_within(editor, Direction::Up)
}

pub fn move_block_down(editor: &mut Editor) -> MoveOutcome {
    move_block_within(editor, Direction::Down)
}

/// Swap the block at the cursor with its neighbour in the same container
pub fn move_block_within(editor: &mut Editor, direction: Direction) -> MoveOutcome {
    let Some(movable) = movable_at_cursor(editor) else {
        return MoveOutcome::unhandled();
    };
    let Some(siblings) = editor.doc().children_at(&movable.container) else {
        return MoveOutcome::unhandled();
    };

    let index = movable.index();
    let neighbour = match direction {
        Direction::Up if index > 0 => index - 1,
        Direction::Down if index + 1 < siblings.len() => index + 1,
        _ => return MoveOutcome::at_boundary(),
    };

    let staged = stage_swap(editor, &movable, neighbour, direction);
    commit(editor, staged, "move_within")
}

fn stage_swap(
    editor: &Editor,
    movable: &Movable,
    neighbour: usize,
    direction: Direction,
) -> EditorResult<Transaction> {
    let node = editor
        .doc()
        .node_at(&movable.node)
        .cloned()
        .ok_or_else(|| EditorError::resolution("block under cursor not found"))?;

    let mut tr = editor.transaction();
    tr.delete_node(&movable.node)?;

    let neighbour_now = tr
        .mapping()
        .map(&movable.container.child(neighbour))
        .and_then(|path| path.last_index())
        .ok_or_else(|| EditorError::resolution("neighbour block vanished"))?;
    let insert_at = match direction {
        Direction::Up => neighbour_now,
        Direction::Down => neighbour_now + 1,
    };
    tr.insert(&movable.container, insert_at, vec![node])?;

    let selection = follow_cursor(editor, movable, &movable.container.child(insert_at));
    tr.set_selection(selection)
        .set_origin(EditOrigin::Columns)
        .mark_structure_checked()
        .set_description(format!("Move block {}", direction.label()));
    Ok(tr)
}

/// Move the block at the edge of its column out of the column group
pub fn move_block_across_column_boundary(editor: &mut Editor, direction: Direction) -> MoveOutcome {
    let staged = stage_across_boundary(editor, direction);
    commit(editor, staged, "move_across_boundary")
}

/// A column counts as empty when nothing or only a blank paragraph is left
fn effectively_empty(remaining: &[&Node]) -> bool {
    match remaining {
        [] => true,
        [only] => only.is_placeholder(),
        _ => false,
    }
}

fn stage_across_boundary(editor: &Editor, direction: Direction) -> EditorResult<Transaction> {
    let doc = editor.doc();
    let movable = movable_at_cursor(editor)
        .ok_or_else(|| EditorError::resolution("no block under cursor"))?;
    if movable.container_type != NodeType::Column {
        return Err(EditorError::resolution("block is not inside a column"));
    }

    let column_path = movable.container.clone();
    let column_index = column_path
        .last_index()
        .ok_or_else(|| EditorError::resolution("column without index"))?;
    let group_path = column_path
        .parent()
        .ok_or_else(|| EditorError::resolution("column without parent"))?;
    let group = doc
        .node_at(&group_path)
        .and_then(Node::as_group)
        .ok_or_else(|| EditorError::resolution("column outside a group"))?;
    let siblings = doc
        .children_at(&column_path)
        .ok_or_else(|| EditorError::resolution("column has no content"))?;

    let index = movable.index();
    let at_edge = match direction {
        Direction::Up => index == 0,
        Direction::Down => index + 1 == siblings.len(),
    };
    if !at_edge {
        return Err(EditorError::resolution("block is not at the column edge"));
    }

    let moved = siblings[index].clone();
    let remaining: Vec<&Node> = siblings
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .map(|(_, node)| node)
        .collect();
    let column_empties = effectively_empty(&remaining);

    let mut tr = editor.transaction();
    let moved_path = if column_empties && group.column_count() == 2 {
        // Replace the whole group with flat content in a single step
        let other = group
            .column(1 - column_index)
            .ok_or_else(|| EditorError::resolution("sibling column not found"))?
            .children
            .clone();
        let other_len = other.len();
        let flat: Vec<Node> = match direction {
            Direction::Up => std::iter::once(moved).chain(other).collect(),
            Direction::Down => other.into_iter().chain(std::iter::once(moved)).collect(),
        };
        tr.replace_node(&group_path, flat)?;

        let group_index = group_path
            .last_index()
            .ok_or_else(|| EditorError::resolution("group without index"))?;
        let offset = match direction {
            Direction::Up => 0,
            Direction::Down => other_len,
        };
        group_path
            .sibling(group_index + offset)
            .ok_or_else(|| EditorError::resolution("group without parent"))?
    } else {
        tr.delete_node(&movable.node)?;
        if column_empties {
            tr.delete_node(&column_path)?;
            reset_widths(&mut tr, &group_path)?;
        }

        let group_now = tr
            .mapping()
            .map(&group_path)
            .ok_or_else(|| EditorError::resolution("group vanished"))?;
        let parent = group_now
            .parent()
            .ok_or_else(|| EditorError::resolution("group without parent"))?;
        let group_index = group_now
            .last_index()
            .ok_or_else(|| EditorError::resolution("group without index"))?;
        let insert_at = match direction {
            Direction::Up => group_index,
            Direction::Down => group_index + 1,
        };
        tr.insert(&parent, insert_at, vec![moved])?;

        let placed = parent.child(insert_at);
        let mark = tr.mapping().len();
        dissolve_orphaned_groups(&mut tr)?;
        tr.mapping()
            .map_from(mark, &placed)
            .ok_or_else(|| EditorError::resolution("moved block lost during cleanup"))?
    };

    let selection = follow_cursor(editor, &movable, &moved_path);
    tr.set_selection(selection)
        .set_origin(EditOrigin::Columns)
        .mark_structure_checked()
        .set_description(format!("Move block {} out of column", direction.label()));
    Ok(tr)
}

/// Insert a copy of the block right after it; the cursor moves into the copy
pub fn duplicate_block(editor: &mut Editor) -> MoveOutcome {
    let Some(movable) = movable_at_cursor(editor) else {
        return MoveOutcome::unhandled();
    };
    let staged = stage_duplicate(editor, &movable);
    commit(editor, staged, "duplicate")
}

fn stage_duplicate(editor: &Editor, movable: &Movable) -> EditorResult<Transaction> {
    let node = editor
        .doc()
        .node_at(&movable.node)
        .cloned()
        .ok_or_else(|| EditorError::resolution("block under cursor not found"))?;
    let copy_at = movable.index() + 1;

    let mut tr = editor.transaction();
    tr.insert(&movable.container, copy_at, vec![node])?;

    let selection = follow_cursor(editor, movable, &movable.container.child(copy_at));
    tr.set_selection(selection)
        .set_origin(EditOrigin::Columns)
        .mark_structure_checked()
        .set_description("Duplicate block");
    Ok(tr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire_document::builder::{column, doc, group, paragraph, placeholder};
    use quire_document::Document;

    fn editor_at(document: Document, cursor: Vec<usize>) -> Editor {
        let mut editor = Editor::new(document);
        editor.set_selection(Selection::at_start(Path::new(cursor)));
        editor
    }

    #[test]
    fn test_move_up_in_root() {
        let mut editor = editor_at(doc(vec![paragraph("A"), paragraph("B")]), vec![1]);
        assert_eq!(move_block_up(&mut editor), MoveOutcome::moved());
        assert_eq!(editor.doc().outline(), "B, A");
        assert_eq!(editor.selection().block, Path::new(vec![0]));
    }

    #[test]
    fn test_move_down_in_column() {
        let mut editor = editor_at(
            doc(vec![group(vec![
                column(vec![paragraph("A"), paragraph("B"), paragraph("C")]),
                column(vec![paragraph("D")]),
            ])]),
            vec![0, 0, 0],
        );
        assert_eq!(move_block_down(&mut editor), MoveOutcome::moved());
        assert_eq!(editor.doc().outline(), "cols(col[B, A, C] col[D])");
        assert_eq!(editor.selection().block, Path::new(vec![0, 0, 1]));
    }

    #[test]
    fn test_edge_of_container_is_not_moved() {
        let mut editor = editor_at(doc(vec![paragraph("A"), paragraph("B")]), vec![0]);
        assert_eq!(move_block_up(&mut editor), MoveOutcome::at_boundary());
        assert_eq!(editor.doc().outline(), "A, B");
        assert_eq!(editor.version(), 0);
    }

    #[test]
    fn test_unresolvable_cursor_is_unhandled() {
        let mut editor = Editor::new(Document::default());
        assert_eq!(move_block_down(&mut editor), MoveOutcome::unhandled());
        assert_eq!(duplicate_block(&mut editor), MoveOutcome::unhandled());
    }

    #[test]
    fn test_across_boundary_requires_column() {
        let mut editor = editor_at(doc(vec![paragraph("A")]), vec![0]);
        assert_eq!(
            move_block_across_column_boundary(&mut editor, Direction::Up),
            MoveOutcome::unhandled()
        );
    }

    #[test]
    fn test_across_boundary_requires_edge() {
        let mut editor = editor_at(
            doc(vec![group(vec![
                column(vec![paragraph("A"), paragraph("B")]),
                column(vec![paragraph("C")]),
            ])]),
            vec![0, 0, 1],
        );
        assert_eq!(
            move_block_across_column_boundary(&mut editor, Direction::Up),
            MoveOutcome::unhandled()
        );
    }

    #[test]
    fn test_placeholder_left_behind_counts_as_empty() {
        let mut editor = editor_at(
            doc(vec![group(vec![
                column(vec![paragraph("A"), placeholder()]),
                column(vec![paragraph("B")]),
            ])]),
            vec![0, 0, 0],
        );
        assert_eq!(
            move_block_across_column_boundary(&mut editor, Direction::Up),
            MoveOutcome::moved()
        );
        assert_eq!(editor.doc().outline(), "A, B");
        assert_eq!(editor.selection().block, Path::new(vec![0]));
    }

    #[test]
    fn test_duplicate_in_root() {
        let mut editor = editor_at(doc(vec![paragraph("A"), paragraph("B")]), vec![0]);
        assert_eq!(duplicate_block(&mut editor), MoveOutcome::moved());
        assert_eq!(editor.doc().outline(), "A, A, B");
        assert_eq!(editor.selection().block, Path::new(vec![1]));
    }
}
