//! Minimal text-editing surface
//!
//! Plain typing and deletion, dispatched as external edits. They are not
//! column-aware, so the safety net repairs whatever structure they break.
//! Joining blocks never crosses a column or group boundary.

use crate::editor::Editor;
use crate::errors::{EditorError, EditorResult};
use quire_document::{Block, Node, Path, Selection, Step, Transaction};
use tracing::debug;

fn byte_index(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map(|(index, _)| index)
        .unwrap_or(text.len())
}

fn commit(editor: &mut Editor, staged: EditorResult<Option<Transaction>>, operation: &str) -> bool {
    match staged {
        Ok(Some(tr)) => match editor.dispatch(tr) {
            Ok(()) => true,
            Err(error) => {
                debug!(operation, %error, "Text edit rejected");
                false
            }
        },
        Ok(None) => false,
        Err(error) => {
            debug!(operation, %error, "Text edit aborted");
            false
        }
    }
}

fn cursor_block(editor: &Editor) -> EditorResult<(Path, usize, Block)> {
    let Selection { block, offset } = editor.selection().clone();
    let found = editor
        .doc()
        .block_at(&block)
        .cloned()
        .ok_or_else(|| EditorError::resolution("cursor is not in a block"))?;
    Ok((block, offset, found))
}

/// Insert `text` at the cursor
pub fn insert_text(editor: &mut Editor, text: &str) -> bool {
    let staged = stage_insert(editor, text);
    commit(editor, staged, "insert_text")
}

fn stage_insert(editor: &Editor, text: &str) -> EditorResult<Option<Transaction>> {
    if text.is_empty() {
        return Ok(None);
    }
    let (path, offset, mut block) = cursor_block(editor)?;
    block.text.insert_str(byte_index(&block.text, offset), text);

    let mut tr = editor.transaction();
    tr.replace_node(&path, vec![Node::Block(block)])?;
    tr.set_selection(Selection::cursor(path, offset + text.chars().count()))
        .set_description("Typing");
    Ok(Some(tr))
}

/// Delete the whole block under the cursor
pub fn delete_block(editor: &mut Editor) -> bool {
    let staged = cursor_block(editor).and_then(|(path, _, _)| {
        let mut tr = editor.transaction();
        tr.delete_node(&path)?;
        tr.set_description("Delete block");
        Ok(Some(tr))
    });
    commit(editor, staged, "delete_block")
}

/// Delete the character before the cursor, or join with the previous block
pub fn delete_backward(editor: &mut Editor) -> bool {
    let staged = stage_backward(editor);
    commit(editor, staged, "delete_backward")
}

fn stage_backward(editor: &Editor) -> EditorResult<Option<Transaction>> {
    let (path, offset, mut block) = cursor_block(editor)?;
    let mut tr = editor.transaction();

    if offset > 0 {
        let start = byte_index(&block.text, offset - 1);
        let end = byte_index(&block.text, offset);
        block.text.replace_range(start..end, "");
        tr.replace_node(&path, vec![Node::Block(block)])?;
        tr.set_selection(Selection::cursor(path, offset - 1));
        return Ok(Some(tr));
    }

    // Join into the previous sibling; a column edge or a group stops it
    let Some(index) = path.last_index().filter(|index| *index > 0) else {
        return Ok(None);
    };
    let Some(previous_path) = path.sibling(index - 1) else {
        return Ok(None);
    };
    let Some(previous) = editor.doc().block_at(&previous_path) else {
        return Ok(None);
    };

    let mut joined = previous.clone();
    let join_at = joined.len_chars();
    joined.text.push_str(&block.text);
    let parent = path
        .parent()
        .ok_or_else(|| EditorError::resolution("block without parent"))?;
    tr.step(Step::Replace {
        parent,
        start: index - 1,
        end: index + 1,
        nodes: vec![Node::Block(joined)],
    })?;
    tr.set_selection(Selection::cursor(previous_path, join_at))
        .set_description("Join blocks");
    Ok(Some(tr))
}

/// Delete the character after the cursor, or join the next block into this one
pub fn delete_forward(editor: &mut Editor) -> bool {
    let staged = stage_forward(editor);
    commit(editor, staged, "delete_forward")
}

fn stage_forward(editor: &Editor) -> EditorResult<Option<Transaction>> {
    let (path, offset, mut block) = cursor_block(editor)?;
    let mut tr = editor.transaction();

    if offset < block.len_chars() {
        let start = byte_index(&block.text, offset);
        let end = byte_index(&block.text, offset + 1);
        block.text.replace_range(start..end, "");
        tr.replace_node(&path, vec![Node::Block(block)])?;
        tr.set_selection(Selection::cursor(path, offset));
        return Ok(Some(tr));
    }

    let Some(index) = path.last_index() else {
        return Ok(None);
    };
    let Some(next_path) = path.sibling(index + 1) else {
        return Ok(None);
    };
    let Some(next) = editor.doc().block_at(&next_path) else {
        return Ok(None); // end of column, or a group follows
    };

    block.text.push_str(&next.text);
    let parent = path
        .parent()
        .ok_or_else(|| EditorError::resolution("block without parent"))?;
    tr.step(Step::Replace {
        parent,
        start: index,
        end: index + 2,
        nodes: vec![Node::Block(block)],
    })?;
    tr.set_selection(Selection::cursor(path, offset))
        .set_description("Join blocks");
    Ok(Some(tr))
}
