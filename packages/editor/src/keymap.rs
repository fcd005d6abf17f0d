//! Keyboard bindings for block commands
//!
//! | Key                   | Command         |
//! |-----------------------|-----------------|
//! | `Mod-Shift-ArrowUp`   | move block up   |
//! | `Mod-Shift-ArrowDown` | move block down |
//! | `Mod-d`               | duplicate block |

use crate::editor::Editor;
use crate::movement::{
    duplicate_block, move_block_across_column_boundary, move_block_within, movable_at_cursor,
    Direction, MoveOutcome,
};
use quire_document::NodeType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyCommand {
    MoveBlockUp,
    MoveBlockDown,
    DuplicateBlock,
}

#[derive(Debug, Clone)]
pub struct Keymap {
    bindings: HashMap<String, KeyCommand>,
}

impl Keymap {
    pub fn empty() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    pub fn bind(&mut self, key: impl Into<String>, command: KeyCommand) -> &mut Self {
        self.bindings.insert(key.into(), command);
        self
    }

    pub fn resolve(&self, key: &str) -> Option<KeyCommand> {
        self.bindings.get(key).copied()
    }

    /// Run the command bound to `key`. Unbound keys are unhandled.
    pub fn handle_key(&self, editor: &mut Editor, key: &str) -> MoveOutcome {
        match self.resolve(key) {
            Some(command) => {
                debug!(key, ?command, "Running block command");
                run_command(editor, command)
            }
            None => MoveOutcome::unhandled(),
        }
    }
}

impl Default for Keymap {
    fn default() -> Self {
        let mut keymap = Self::empty();
        keymap
            .bind("Mod-Shift-ArrowUp", KeyCommand::MoveBlockUp)
            .bind("Mod-Shift-ArrowDown", KeyCommand::MoveBlockDown)
            .bind("Mod-d", KeyCommand::DuplicateBlock);
        keymap
    }
}

pub fn run_command(editor: &mut Editor, command: KeyCommand) -> MoveOutcome {
    match command {
        KeyCommand::MoveBlockUp => move_block(editor, Direction::Up),
        KeyCommand::MoveBlockDown => move_block(editor, Direction::Down),
        KeyCommand::DuplicateBlock => duplicate_block(editor),
    }
}

/// Move within the current container; at the edge of a column, move out of
/// the column group instead. At the edge of the document nothing moves but
/// the key is still consumed.
pub fn move_block(editor: &mut Editor, direction: Direction) -> MoveOutcome {
    let outcome = move_block_within(editor, direction);
    if outcome != MoveOutcome::at_boundary() {
        return outcome;
    }
    match movable_at_cursor(editor) {
        Some(movable) if movable.container_type == NodeType::Column => {
            move_block_across_column_boundary(editor, direction)
        }
        _ => outcome,
    }
}
