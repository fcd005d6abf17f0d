//! # Drag-and-Drop Primitives
//!
//! The drop-zone layer resolves pointer geometry to one of two primitives:
//!
//! - [`move_block_above_below`]: insert dragged content at a flow position
//!   and, unless duplicating, delete the source range in the same edit
//! - [`create_columns`]: the "split into columns" zones, which wrap a block
//!   into a new two-column group or add a column beside an existing one
//!
//! Same-column, cross-column and cross-flow drops, moved or duplicated, all
//! reduce to these two. The maintainer runs inline, so a drop that empties a
//! column dissolves or shrinks its group within the same undo step.

use crate::editor::Editor;
use crate::errors::{EditorError, EditorResult};
use crate::maintainer::{dissolve_orphaned_groups, reset_widths};
use quire_document::{Column, ColumnGroup, EditOrigin, Node, NodeType, Path, Selection, Transaction};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Before child `index` of `parent`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertPoint {
    pub parent: Path,
    pub index: usize,
}

impl InsertPoint {
    pub fn new(parent: Path, index: usize) -> Self {
        Self { parent, index }
    }

    /// Directly before the node at `path`
    pub fn before(path: &Path) -> Option<Self> {
        Some(Self::new(path.parent()?, path.last_index()?))
    }

    /// Directly after the node at `path`
    pub fn after(path: &Path) -> Option<Self> {
        Some(Self::new(path.parent()?, path.last_index()? + 1))
    }
}

/// Children `start..end` of `parent`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRange {
    pub parent: Path,
    pub start: usize,
    pub end: usize,
}

impl NodeRange {
    pub fn new(parent: Path, start: usize, end: usize) -> Self {
        Self { parent, start, end }
    }

    /// The single node at `path`
    pub fn single(path: &Path) -> Option<Self> {
        let index = path.last_index()?;
        Some(Self::new(path.parent()?, index, index + 1))
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `path` is one of the range's nodes or lies inside one
    pub fn covers(&self, path: &Path) -> bool {
        let depth = self.parent.depth();
        path.depth() > depth
            && path.starts_with(&self.parent)
            && (self.start..self.end).contains(&path.indices()[depth])
    }

    /// Dropping here would put the content back inside or next to itself
    fn swallows(&self, point: &InsertPoint) -> bool {
        let own_gap = point.parent == self.parent && (self.start..=self.end).contains(&point.index);
        own_gap || self.covers(&point.parent)
    }
}

/// Which side of the target the dropped content lands on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropSide {
    Left,
    Right,
}

/// What a column drop zone is attached to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnDropTarget {
    /// A block in a flow: wrap it into a new two-column group
    Block(Path),
    /// A column: add a new column beside it
    Column(Path),
}

/// Insert `content` at `target`; delete `source` in the same edit unless
/// duplicating. Returns false when nothing was committed.
pub fn move_block_above_below(
    editor: &mut Editor,
    target: &InsertPoint,
    content: Vec<Node>,
    source: &NodeRange,
    is_duplicate: bool,
) -> bool {
    let staged = stage_drop(editor, target, content, source, is_duplicate);
    commit(editor, staged, "move_above_below")
}

fn commit(editor: &mut Editor, staged: EditorResult<Transaction>, operation: &str) -> bool {
    match staged.and_then(|tr| editor.dispatch(tr)) {
        Ok(()) => true,
        Err(error) => {
            debug!(operation, %error, "Drop aborted");
            false
        }
    }
}

fn stage_drop(
    editor: &Editor,
    target: &InsertPoint,
    content: Vec<Node>,
    source: &NodeRange,
    is_duplicate: bool,
) -> EditorResult<Transaction> {
    if content.is_empty() {
        return Err(EditorError::EmptyDrop);
    }
    if !is_duplicate && source.swallows(target) {
        return Err(EditorError::resolution("drop target lies within the dragged range"));
    }

    let mut tr = editor.transaction();
    tr.insert(&target.parent, target.index, content)?;
    let mut dropped = target.parent.child(target.index);

    if !is_duplicate {
        let mark = tr.mapping().len();
        delete_source(&mut tr, source)?;
        dropped = tr
            .mapping()
            .map_from(mark, &dropped)
            .ok_or_else(|| EditorError::resolution("dropped content lost"))?;
    }

    finish(
        tr,
        dropped,
        if is_duplicate { "Duplicate blocks" } else { "Move blocks" },
    )
}

/// Delete a range captured before the transaction started
fn delete_source(tr: &mut Transaction, source: &NodeRange) -> EditorResult<()> {
    if source.is_empty() {
        return Ok(());
    }
    let first = tr
        .mapping()
        .map(&source.parent.child(source.start))
        .ok_or_else(|| EditorError::resolution("drag source vanished"))?;
    let parent = first
        .parent()
        .ok_or_else(|| EditorError::resolution("drag source without parent"))?;
    let start = first
        .last_index()
        .ok_or_else(|| EditorError::resolution("drag source without index"))?;
    tr.delete(&parent, start, start + source.len())?;
    Ok(())
}

/// Run the maintainer inline and put the cursor at the start of the dropped content
fn finish(mut tr: Transaction, dropped: Path, description: &str) -> EditorResult<Transaction> {
    // Track the first block rather than its container, which cleanup may dissolve
    let first_block = tr.doc().first_block_within(&dropped);
    let mark = tr.mapping().len();
    dissolve_orphaned_groups(&mut tr)?;

    let cursor = first_block.and_then(|block| tr.mapping().map_from(mark, &block));
    if let Some(block) = cursor {
        tr.set_selection(Selection::at_start(block));
    }
    tr.set_origin(EditOrigin::Columns)
        .mark_structure_checked()
        .set_description(description);
    Ok(tr)
}

/// Drop `content` into a new column beside `target`
pub fn create_columns(
    editor: &mut Editor,
    target: &ColumnDropTarget,
    side: DropSide,
    content: Vec<Node>,
    source: Option<&NodeRange>,
    is_duplicate: bool,
) -> bool {
    let staged = stage_columns(editor, target, side, content, source, is_duplicate);
    commit(editor, staged, "create_columns")
}

fn stage_columns(
    editor: &Editor,
    target: &ColumnDropTarget,
    side: DropSide,
    content: Vec<Node>,
    source: Option<&NodeRange>,
    is_duplicate: bool,
) -> EditorResult<Transaction> {
    if content.is_empty() {
        return Err(EditorError::EmptyDrop);
    }
    let doc = editor.doc();
    let mut tr = editor.transaction();
    let new_column = Node::Column(Column::new(content));

    let mut dropped = match target {
        ColumnDropTarget::Block(block_path) => {
            if let Some(source) = source.filter(|_| !is_duplicate) {
                if source.covers(block_path) {
                    return Err(EditorError::resolution("cannot split a block beside itself"));
                }
            }
            let block = doc
                .node_at(block_path)
                .filter(|node| node.is_block())
                .cloned()
                .ok_or_else(|| EditorError::resolution("drop target is not a block"))?;
            let parent_type = block_path
                .parent()
                .and_then(|parent| doc.node_type_at(&parent))
                .ok_or_else(|| EditorError::resolution("drop target without parent"))?;
            if !parent_type.is_flow() {
                return Err(EditorError::resolution("drop target is not in a flow"));
            }

            let wrapped = Node::Column(Column::new(vec![block]));
            let (columns, dropped_index) = match side {
                DropSide::Left => (vec![new_column, wrapped], 0),
                DropSide::Right => (vec![wrapped, new_column], 1),
            };
            tr.replace_node(block_path, vec![Node::ColumnGroup(ColumnGroup::new(columns))])?;
            block_path.child(dropped_index)
        }

        ColumnDropTarget::Column(column_path) => {
            if doc.node_type_at(column_path) != Some(NodeType::Column) {
                return Err(EditorError::resolution("drop target is not a column"));
            }
            let group_path = column_path
                .parent()
                .ok_or_else(|| EditorError::resolution("column without parent"))?;
            let column_index = column_path
                .last_index()
                .ok_or_else(|| EditorError::resolution("column without index"))?;
            let insert_at = match side {
                DropSide::Left => column_index,
                DropSide::Right => column_index + 1,
            };
            tr.insert(&group_path, insert_at, vec![new_column])?;
            reset_widths(&mut tr, &group_path)?;
            group_path.child(insert_at)
        }
    };

    if let Some(source) = source.filter(|_| !is_duplicate) {
        let mark = tr.mapping().len();
        delete_source(&mut tr, source)?;
        dropped = tr
            .mapping()
            .map_from(mark, &dropped)
            .ok_or_else(|| EditorError::resolution("new column lost"))?;
    }

    finish(tr, dropped, "Create columns")
}
