//! # Column Resize Controller
//!
//! Pointer-driven resizing of the two columns on either side of a boundary.
//!
//! ## State Machine
//!
//! ```text
//! Idle ──pointer_down (near a boundary)──→ Dragging
//! Dragging ──pointer_move──→ Dragging   (frame requested, widths recomputed)
//! Dragging ──animation_frame──→ Dragging (one transient edit)
//! Dragging ──pointer_up──→ Idle          (one recorded edit)
//! Dragging ──cancel──→ Idle              (original widths restored, unrecorded)
//! Dragging ──document changed──→ Idle    (original widths restored, unrecorded)
//! ```
//!
//! Transient edits stay out of undo history; the history folds them into the
//! final recorded edit, so a whole drag undoes in one step. A double-click
//! on a boundary resets both columns to equal share, whatever the state.
//!
//! Each controller belongs to one document view and owns its gesture state.
//! A gesture remembers the document version it last wrote. If anything else
//! commits in between, the next frame or the release abandons the gesture,
//! carrying its column paths through [`Editor::mapping_since`] to put the
//! original widths back.

use crate::config::ResizeConfig;
use crate::editor::Editor;
use crate::errors::{EditorError, EditorResult};
use crate::geometry::{find_boundary, LayoutSource, Point};
use quire_document::{EditOrigin, HistoryMode, Node, NodeType, Path, Transaction};
use tracing::{debug, info};

/// One drag gesture on a column boundary
#[derive(Debug, Clone, PartialEq)]
pub struct DragGesture {
    pub group: Path,
    /// Index of the column left of the boundary
    pub left: usize,
    pub start_x: f64,
    pub group_width: f64,
    /// Widths in percent when the gesture started
    pub baseline: (f64, f64),
    /// Width attributes before the gesture, restored on cancel
    pub original: (Option<f64>, Option<f64>),
    pub current: (f64, f64),
    pending_frame: bool,
    transient_updates: usize,
    seen_version: u64,
}

impl DragGesture {
    /// Widths for a pointer at `x`, clamped so neither drops below the floor
    /// and their sum stays at the baseline sum
    fn widths_at(&self, x: f64, min_width_pct: f64) -> (f64, f64) {
        let (base_left, base_right) = self.baseline;
        let total = base_left + base_right;
        let floor = min_width_pct.min(total / 2.0);
        let delta = (x - self.start_x) * 100.0 / self.group_width;
        let left = (base_left + delta).clamp(floor, total - floor);
        (left, total - left)
    }

    pub fn transient_updates(&self) -> usize {
        self.transient_updates
    }

    fn column_paths(&self) -> (Path, Path) {
        (self.group.child(self.left), self.group.child(self.left + 1))
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ResizeState {
    #[default]
    Idle,
    Dragging(DragGesture),
}

/// What a pointer move asks of the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeEffect {
    /// No gesture, or widths unchanged
    Ignored,
    /// Schedule [`ResizeController::animation_frame`]
    FrameRequested,
    /// A frame is already scheduled; it will pick up the new widths
    Coalesced,
}

#[derive(Debug, Clone)]
pub struct ResizeController {
    config: ResizeConfig,
    state: ResizeState,
}

impl ResizeController {
    pub fn new(config: ResizeConfig) -> Self {
        Self {
            config,
            state: ResizeState::Idle,
        }
    }

    pub fn for_editor(editor: &Editor) -> Self {
        Self::new(editor.config().resize.clone())
    }

    pub fn state(&self) -> &ResizeState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, ResizeState::Dragging(_))
    }

    pub fn current_widths(&self) -> Option<(f64, f64)> {
        match &self.state {
            ResizeState::Dragging(gesture) => Some(gesture.current),
            ResizeState::Idle => None,
        }
    }

    /// Start a gesture if `point` is within tolerance of a column boundary
    pub fn pointer_down<L>(&mut self, editor: &Editor, layouts: &L, point: Point) -> bool
    where
        L: LayoutSource + ?Sized,
    {
        if self.is_dragging() {
            debug!("Resize already in progress");
            return false;
        }
        let Some(hit) = find_boundary(layouts, point, self.config.hit_tolerance_px) else {
            return false;
        };
        if !(hit.group_width.is_finite() && hit.group_width > 0.0) {
            debug!(group = %hit.group, width = hit.group_width, "Ignoring resize on degenerate group");
            return false;
        }
        let Some(group) = editor.doc().node_at(&hit.group).and_then(Node::as_group) else {
            debug!(group = %hit.group, "Layout does not match document");
            return false;
        };
        let (Some(left), Some(right)) = (group.column(hit.left), group.column(hit.left + 1)) else {
            return false;
        };

        let rendered = |width: f64| width * 100.0 / hit.group_width;
        let baseline = (
            left.width.unwrap_or_else(|| rendered(hit.left_rect.width)),
            right.width.unwrap_or_else(|| rendered(hit.right_rect.width)),
        );
        if !(baseline.0 > 0.0 && baseline.1 > 0.0 && (baseline.0 + baseline.1).is_finite()) {
            debug!(?baseline, "Ignoring resize with degenerate column widths");
            return false;
        }

        info!(group = %hit.group, left = hit.left, ?baseline, "Column resize started");
        self.state = ResizeState::Dragging(DragGesture {
            group: hit.group,
            left: hit.left,
            start_x: point.x,
            group_width: hit.group_width,
            baseline,
            original: (left.width, right.width),
            current: baseline,
            pending_frame: false,
            transient_updates: 0,
            seen_version: editor.version(),
        });
        true
    }

    pub fn pointer_move(&mut self, point: Point) -> ResizeEffect {
        let ResizeState::Dragging(gesture) = &mut self.state else {
            return ResizeEffect::Ignored;
        };
        let widths = gesture.widths_at(point.x, self.config.min_column_width_pct);
        if widths == gesture.current {
            return ResizeEffect::Ignored;
        }
        gesture.current = widths;
        if gesture.pending_frame {
            ResizeEffect::Coalesced
        } else {
            gesture.pending_frame = true;
            ResizeEffect::FrameRequested
        }
    }

    /// Apply the latest widths as a transient edit, at most once per frame
    pub fn animation_frame(&mut self, editor: &mut Editor) -> bool {
        let ResizeState::Dragging(gesture) = &mut self.state else {
            return false;
        };
        if editor.version() != gesture.seen_version {
            if let ResizeState::Dragging(stale) = std::mem::take(&mut self.state) {
                abandon(editor, stale);
            }
            return false;
        }
        if !gesture.pending_frame {
            return false;
        }
        gesture.pending_frame = false;

        let (left, right) = gesture.current;
        let staged = stage_widths(
            editor,
            &gesture.column_paths(),
            (Some(left), Some(right)),
            HistoryMode::Transient,
            "Resize columns",
        );
        match staged.and_then(|tr| editor.dispatch(tr)) {
            Ok(()) => {
                gesture.transient_updates += 1;
                gesture.seen_version = editor.version();
                true
            }
            Err(error) => {
                debug!(%error, "Skipping resize frame");
                false
            }
        }
    }

    /// End the gesture with one recorded edit
    pub fn pointer_up(&mut self, editor: &mut Editor) -> bool {
        let ResizeState::Dragging(gesture) = std::mem::take(&mut self.state) else {
            return false;
        };
        if editor.version() != gesture.seen_version {
            abandon(editor, gesture);
            return false;
        }

        if gesture.current == gesture.baseline {
            // Plain click, or dragged back to the start
            if gesture.transient_updates > 0 {
                restore(editor, &gesture);
            }
            return false;
        }

        let (left, right) = gesture.current;
        let staged = stage_widths(
            editor,
            &gesture.column_paths(),
            (Some(left), Some(right)),
            HistoryMode::Record,
            "Resize columns",
        );
        match staged.and_then(|tr| editor.dispatch(tr)) {
            Ok(()) => {
                info!(group = %gesture.group, left, right, frames = gesture.transient_updates, "Column resize committed");
                true
            }
            Err(error) => {
                debug!(%error, "Resize commit failed");
                if gesture.transient_updates > 0 {
                    restore(editor, &gesture);
                }
                false
            }
        }
    }

    /// Abort the gesture and put the original widths back
    pub fn cancel(&mut self, editor: &mut Editor) -> bool {
        let ResizeState::Dragging(gesture) = std::mem::take(&mut self.state) else {
            return false;
        };
        if gesture.transient_updates > 0 {
            restore(editor, &gesture);
        }
        true
    }

    /// Reset both columns at the boundary under `point` to equal share
    pub fn double_click<L>(&mut self, editor: &mut Editor, layouts: &L, point: Point) -> bool
    where
        L: LayoutSource + ?Sized,
    {
        let Some(hit) = find_boundary(layouts, point, self.config.hit_tolerance_px) else {
            return false;
        };
        self.state = ResizeState::Idle;

        let columns = (hit.group.child(hit.left), hit.group.child(hit.left + 1));
        let staged = stage_widths(
            editor,
            &columns,
            (None, None),
            HistoryMode::Record,
            "Reset column widths",
        );
        match staged.and_then(|tr| editor.dispatch(tr)) {
            Ok(()) => true,
            Err(error) => {
                debug!(%error, "Width reset failed");
                false
            }
        }
    }
}

fn abandon(editor: &mut Editor, gesture: DragGesture) {
    debug!(group = %gesture.group, "Document changed under resize gesture, aborting");
    if gesture.transient_updates > 0 {
        restore(editor, &gesture);
    }
}

/// Put the pre-gesture widths back on the pair, wherever it now lives
fn restore(editor: &mut Editor, gesture: &DragGesture) {
    let (left, right) = gesture.column_paths();
    let Some(mapping) = editor.mapping_since(gesture.seen_version) else {
        debug!(group = %gesture.group, "Resize gesture outlived the edit journal");
        return;
    };
    let (Some(left), Some(right)) = (mapping.map(&left), mapping.map(&right)) else {
        debug!(group = %gesture.group, "Resized columns no longer exist");
        return;
    };
    let staged = stage_widths(
        editor,
        &(left, right),
        gesture.original,
        HistoryMode::Skip,
        "Restore column widths",
    );
    if let Err(error) = staged.and_then(|tr| editor.dispatch(tr)) {
        debug!(%error, "Could not restore column widths");
    }
}

fn stage_widths(
    editor: &Editor,
    (left_path, right_path): &(Path, Path),
    widths: (Option<f64>, Option<f64>),
    mode: HistoryMode,
    description: &str,
) -> EditorResult<Transaction> {
    let doc = editor.doc();
    let group = left_path.parent();
    let adjacent = match (left_path.last_index(), right_path.last_index()) {
        (Some(left), Some(right)) => right == left + 1 && group == right_path.parent(),
        _ => false,
    };
    if !adjacent
        || group.and_then(|group| doc.node_type_at(&group)) != Some(NodeType::ColumnGroup)
        || doc.node_type_at(left_path) != Some(NodeType::Column)
        || doc.node_type_at(right_path) != Some(NodeType::Column)
    {
        return Err(EditorError::InvalidGeometry(format!(
            "no column pair at {} / {}",
            left_path, right_path
        )));
    }

    let mut tr = editor.transaction();
    tr.set_width(left_path, widths.0)?;
    tr.set_width(right_path, widths.1)?;
    tr.set_history(mode)
        .set_origin(EditOrigin::Columns)
        .mark_structure_checked()
        .set_description(description);
    Ok(tr)
}
