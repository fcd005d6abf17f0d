//! # Quire Editor
//!
//! Column layout engine for the Quire block editor.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ document: tree, steps, transactions         │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ commands: staged as one transaction each    │
//! │  - movement (keyboard block moves)          │
//! │  - drag_drop (drops, column creation)       │
//! │  - resize (boundary drag, width reset)      │
//! │  - text (generic typing and deletion)       │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: dispatch                            │
//! │  - commit + selection mapping               │
//! │  - undo history (transient edits folded)    │
//! │  - safety net: maintainer, then validator   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Groups hold at least two columns**: anything less is repaired before
//!    the commit returns
//! 2. **One gesture, one edit**: every command stages a single transaction and
//!    produces a single undo step
//! 3. **Silent failure**: commands report `bool` / [`MoveOutcome`] and commit
//!    nothing when positions no longer resolve
//! 4. **Explicit state**: resize gestures live in a per-view controller
//!
//! ## Usage
//!
//! ```rust
//! use quire_document::builder::{column, doc, group, paragraph};
//! use quire_document::{Path, Selection};
//! use quire_editor::{Editor, Keymap};
//!
//! let mut editor = Editor::new(doc(vec![group(vec![
//!     column(vec![paragraph("P1")]),
//!     column(vec![paragraph("P2"), paragraph("P3")]),
//! ])]));
//! editor.set_selection(Selection::at_start(Path::new(vec![0, 0, 0])));
//!
//! let outcome = Keymap::default().handle_key(&mut editor, "Mod-Shift-ArrowDown");
//! assert!(outcome.moved);
//! assert_eq!(editor.doc().outline(), "P2, P3, P1");
//! ```

mod config;
mod drag_drop;
mod editor;
mod errors;
mod geometry;
mod keymap;
mod maintainer;
mod movement;
mod post_effects;
mod resize;
mod text;
mod undo_stack;
mod validator;

pub use config::{EditorConfig, HistoryConfig, ResizeConfig, ValidatorConfig};
pub use drag_drop::{
    create_columns, move_block_above_below, ColumnDropTarget, DropSide, InsertPoint, NodeRange,
};
pub use editor::Editor;
pub use errors::{EditorError, EditorResult};
pub use geometry::{find_boundary, BoundaryHit, ColumnGroupLayout, LayoutSource, Point, Rect};
pub use keymap::{move_block, run_command, KeyCommand, Keymap};
pub use maintainer::{dissolve_orphaned_groups, reset_widths, CleanupReport};
pub use movement::{
    duplicate_block, movable_at_cursor, move_block_across_column_boundary, move_block_down,
    move_block_up, move_block_within, Direction, MoveOutcome,
};
pub use post_effects::{CommitInfo, HookContext, OrphanedGroupCleanup, PostCommitHook, SafetyNet};
pub use resize::{DragGesture, ResizeController, ResizeEffect, ResizeState};
pub use text::{delete_backward, delete_block, delete_forward, insert_text};
pub use undo_stack::{HistoryBatch, UndoStack};
pub use validator::{find_violations, fingerprint, StructureValidator, ValidationOutcome, Violation};
