//! Column resize gestures driven through the editor
//!
//! The layout below renders one 1000px group at the top of the page with
//! the boundary between its columns at x = 600.

mod common;

use common::editor_at;
use quire_document::builder::{column, column_with_width, doc, group, paragraph};
use quire_document::{Document, Node, Path};
use quire_editor::{
    insert_text, ColumnGroupLayout, Editor, EditorConfig, Point, Rect, ResizeController,
    ResizeEffect,
};

fn layout() -> Vec<ColumnGroupLayout> {
    vec![ColumnGroupLayout {
        group: Path::new(vec![0]),
        rect: Rect::new(0.0, 0.0, 1000.0, 300.0),
        columns: vec![
            Rect::new(0.0, 0.0, 600.0, 300.0),
            Rect::new(600.0, 0.0, 400.0, 300.0),
        ],
    }]
}

fn sized() -> Document {
    doc(vec![group(vec![
        column_with_width(60.0, vec![paragraph("A")]),
        column_with_width(40.0, vec![paragraph("B")]),
    ])])
}

fn r#unsized() -> Document {
    doc(vec![group(vec![
        column(vec![paragraph("A")]),
        column(vec![paragraph("B")]),
    ])])
}

/// A plain group above a sized one; only the lower group is laid out
fn stacked() -> Document {
    doc(vec![
        group(vec![column(vec![paragraph("a")]), column(vec![paragraph("b")])]),
        group(vec![
            column_with_width(60.0, vec![paragraph("c")]),
            column_with_width(40.0, vec![paragraph("d")]),
        ]),
    ])
}

fn lower_layout() -> Vec<ColumnGroupLayout> {
    vec![ColumnGroupLayout {
        group: Path::new(vec![1]),
        rect: Rect::new(0.0, 300.0, 1000.0, 300.0),
        columns: vec![
            Rect::new(0.0, 300.0, 600.0, 300.0),
            Rect::new(600.0, 300.0, 400.0, 300.0),
        ],
    }]
}

fn paste_at_top(editor: &mut Editor) -> anyhow::Result<()> {
    let mut tr = editor.transaction();
    tr.insert(&Path::root(), 0, vec![paragraph("pasted")])?;
    editor.dispatch(tr)?;
    Ok(())
}

fn widths(editor: &Editor) -> (Option<f64>, Option<f64>) {
    let width = |index: usize| {
        editor
            .doc()
            .node_at(&Path::new(vec![0, index]))
            .and_then(Node::as_column)
            .and_then(|column| column.width)
    };
    (width(0), width(1))
}

/// Move to `x` and render the frame the move asked for
fn drag_to(controller: &mut ResizeController, editor: &mut Editor, x: f64) {
    if controller.pointer_move(Point::new(x, 50.0)) == ResizeEffect::FrameRequested {
        assert!(controller.animation_frame(editor));
    }
}

#[test]
fn test_drag_commits_new_widths() {
    let mut editor = editor_at(r#unsized(), &[0, 0, 0]);
    let mut controller = ResizeController::for_editor(&editor);

    // Baseline comes from the rendered widths when no attribute is set
    assert!(controller.pointer_down(&editor, &layout(), Point::new(600.0, 50.0)));
    assert_eq!(controller.current_widths(), Some((60.0, 40.0)));

    drag_to(&mut controller, &mut editor, 700.0);
    assert_eq!(widths(&editor), (Some(70.0), Some(30.0)));

    assert!(controller.pointer_up(&mut editor));
    assert!(!controller.is_dragging());
    assert_eq!(widths(&editor), (Some(70.0), Some(30.0)));
    assert_eq!(editor.doc().outline(), "cols(col@70[A] col@30[B])");
}

#[test]
fn test_whole_drag_is_one_undo_step() {
    let mut editor = editor_at(sized(), &[0, 0, 0]);
    let mut controller = ResizeController::for_editor(&editor);

    assert!(controller.pointer_down(&editor, &layout(), Point::new(603.0, 50.0)));
    for x in [620.0, 655.0, 700.0, 680.0, 750.0] {
        drag_to(&mut controller, &mut editor, x);
    }
    assert!(controller.pointer_up(&mut editor));

    assert_eq!(editor.history().undo_levels(), 1);
    assert!(editor.undo());
    assert_eq!(widths(&editor), (Some(60.0), Some(40.0)));
    assert!(!editor.can_undo());
}

#[test]
fn test_coalesced_moves_share_a_frame() {
    let mut editor = editor_at(sized(), &[0, 0, 0]);
    let mut controller = ResizeController::for_editor(&editor);
    controller.pointer_down(&editor, &layout(), Point::new(600.0, 50.0));

    assert_eq!(controller.pointer_move(Point::new(650.0, 50.0)), ResizeEffect::FrameRequested);
    assert_eq!(controller.pointer_move(Point::new(700.0, 50.0)), ResizeEffect::Coalesced);
    assert!(controller.animation_frame(&mut editor));
    // Frame already consumed
    assert!(!controller.animation_frame(&mut editor));

    assert_eq!(widths(&editor), (Some(70.0), Some(30.0)));
    assert_eq!(editor.version(), 1);
}

#[test]
fn test_widths_clamp_and_conserve_their_sum() {
    let mut editor = editor_at(sized(), &[0, 0, 0]);
    let mut controller = ResizeController::for_editor(&editor);
    controller.pointer_down(&editor, &layout(), Point::new(600.0, 50.0));

    for x in [612.5, 647.3, 1200.0, 33.0, -400.0, 811.1] {
        drag_to(&mut controller, &mut editor, x);
        let (Some(left), Some(right)) = widths(&editor) else {
            panic!("widths missing after frame at x = {x}");
        };
        assert!(left >= 10.0 && right >= 10.0, "{left} / {right}");
        assert!((left + right - 100.0).abs() < 1e-9);
    }

    drag_to(&mut controller, &mut editor, 2000.0);
    assert_eq!(widths(&editor), (Some(90.0), Some(10.0)));
    drag_to(&mut controller, &mut editor, -2000.0);
    assert_eq!(widths(&editor), (Some(10.0), Some(90.0)));
}

#[test]
fn test_configured_floor() {
    let config = EditorConfig::from_json(r#"{ "resize": { "min_column_width_pct": 25.0 } }"#)
        .unwrap();
    let mut editor = Editor::with_config(sized(), config);
    let mut controller = ResizeController::for_editor(&editor);
    controller.pointer_down(&editor, &layout(), Point::new(600.0, 50.0));

    drag_to(&mut controller, &mut editor, 2000.0);
    assert_eq!(controller.current_widths(), Some((75.0, 25.0)));
}

#[test]
fn test_plain_click_commits_nothing() {
    let mut editor = editor_at(sized(), &[0, 0, 0]);
    let mut controller = ResizeController::for_editor(&editor);

    assert!(controller.pointer_down(&editor, &layout(), Point::new(600.0, 50.0)));
    assert!(!controller.pointer_up(&mut editor));
    assert_eq!(editor.version(), 0);
    assert!(!editor.can_undo());
}

#[test]
fn test_dragging_back_to_start_leaves_no_history() {
    let mut editor = editor_at(sized(), &[0, 0, 0]);
    let mut controller = ResizeController::for_editor(&editor);
    controller.pointer_down(&editor, &layout(), Point::new(600.0, 50.0));

    drag_to(&mut controller, &mut editor, 700.0);
    controller.pointer_move(Point::new(600.0, 50.0));
    assert!(!controller.pointer_up(&mut editor));

    assert_eq!(widths(&editor), (Some(60.0), Some(40.0)));
    assert!(!editor.can_undo());
}

#[test]
fn test_cancel_restores_original_widths() {
    let mut editor = editor_at(r#unsized(), &[0, 0, 0]);
    let mut controller = ResizeController::for_editor(&editor);
    controller.pointer_down(&editor, &layout(), Point::new(600.0, 50.0));
    drag_to(&mut controller, &mut editor, 520.0);
    assert_eq!(widths(&editor), (Some(52.0), Some(48.0)));

    assert!(controller.cancel(&mut editor));
    assert_eq!(widths(&editor), (None, None));
    assert!(!editor.can_undo());
    assert!(!controller.cancel(&mut editor));
}

#[test]
fn test_double_click_resets_to_equal_share() {
    let mut editor = editor_at(sized(), &[0, 0, 0]);
    let mut controller = ResizeController::for_editor(&editor);

    assert!(controller.double_click(&mut editor, &layout(), Point::new(595.0, 120.0)));
    assert_eq!(widths(&editor), (None, None));
    assert_eq!(editor.history().undo_levels(), 1);

    assert!(editor.undo());
    assert_eq!(widths(&editor), (Some(60.0), Some(40.0)));
}

#[test]
fn test_pointer_far_from_boundary_is_ignored() {
    let editor = editor_at(sized(), &[0, 0, 0]);
    let mut controller = ResizeController::for_editor(&editor);
    assert!(!controller.pointer_down(&editor, &layout(), Point::new(300.0, 50.0)));
    assert!(!controller.pointer_down(&editor, &layout(), Point::new(600.0, 900.0)));
    assert!(!controller.is_dragging());
}

#[test]
fn test_zero_width_group_is_ignored() {
    let editor = editor_at(sized(), &[0, 0, 0]);
    let mut controller = ResizeController::for_editor(&editor);
    let collapsed = vec![ColumnGroupLayout {
        group: Path::new(vec![0]),
        rect: Rect::new(0.0, 0.0, 0.0, 300.0),
        columns: vec![Rect::new(0.0, 0.0, 0.0, 300.0), Rect::new(0.0, 0.0, 0.0, 300.0)],
    }];
    assert!(!controller.pointer_down(&editor, &collapsed, Point::new(0.0, 10.0)));
}

#[test]
fn test_stale_layout_is_ignored() {
    let editor = editor_at(doc(vec![paragraph("no columns here")]), &[0]);
    let mut controller = ResizeController::for_editor(&editor);
    assert!(!controller.pointer_down(&editor, &layout(), Point::new(600.0, 50.0)));
}

#[test]
fn test_concurrent_edit_aborts_gesture() {
    let mut editor = editor_at(sized(), &[0, 0, 0]);
    let mut controller = ResizeController::for_editor(&editor);
    controller.pointer_down(&editor, &layout(), Point::new(600.0, 50.0));
    controller.pointer_move(Point::new(700.0, 50.0));

    assert!(insert_text(&mut editor, "x"));
    assert!(!controller.animation_frame(&mut editor));
    assert!(!controller.is_dragging());
    assert_eq!(widths(&editor), (Some(60.0), Some(40.0)));
}

#[test]
fn test_second_pointer_down_is_rejected() {
    let editor = editor_at(sized(), &[0, 0, 0]);
    let mut controller = ResizeController::for_editor(&editor);
    assert!(controller.pointer_down(&editor, &layout(), Point::new(600.0, 50.0)));
    assert!(!controller.pointer_down(&editor, &layout(), Point::new(600.0, 50.0)));
}

#[test]
fn test_release_after_foreign_edit_leaves_other_groups_alone() -> anyhow::Result<()> {
    let mut editor = editor_at(stacked(), &[0, 0, 0]);
    let mut controller = ResizeController::for_editor(&editor);
    assert!(controller.pointer_down(&editor, &lower_layout(), Point::new(600.0, 350.0)));
    assert_eq!(controller.pointer_move(Point::new(700.0, 350.0)), ResizeEffect::FrameRequested);

    paste_at_top(&mut editor)?;
    assert!(!controller.pointer_up(&mut editor));
    assert!(!controller.is_dragging());
    assert_eq!(
        editor.doc().outline(),
        "pasted, cols(col[a] col[b]), cols(col@60[c] col@40[d])"
    );
    Ok(())
}

#[test]
fn test_foreign_edit_mid_drag_restores_the_moved_group() -> anyhow::Result<()> {
    let mut editor = editor_at(stacked(), &[0, 0, 0]);
    let mut controller = ResizeController::for_editor(&editor);
    assert!(controller.pointer_down(&editor, &lower_layout(), Point::new(600.0, 350.0)));
    drag_to(&mut controller, &mut editor, 700.0);
    assert_eq!(
        editor.doc().outline(),
        "cols(col[a] col[b]), cols(col@70[c] col@30[d])"
    );

    // The resized group now sits at [2]; the path the gesture holds names the plain one
    paste_at_top(&mut editor)?;
    assert!(!controller.pointer_up(&mut editor));
    assert_eq!(
        editor.doc().outline(),
        "pasted, cols(col[a] col[b]), cols(col@60[c] col@40[d])"
    );

    assert_eq!(editor.history().undo_levels(), 1);
    assert!(editor.undo());
    assert_eq!(editor.doc(), &stacked());
    Ok(())
}

#[test]
fn test_interrupted_drag_stays_out_of_the_interrupting_undo() {
    let mut editor = editor_at(sized(), &[0, 0, 0]);
    let mut controller = ResizeController::for_editor(&editor);
    controller.pointer_down(&editor, &layout(), Point::new(600.0, 50.0));
    drag_to(&mut controller, &mut editor, 700.0);
    assert_eq!(widths(&editor), (Some(70.0), Some(30.0)));

    assert!(insert_text(&mut editor, "x"));
    assert_eq!(controller.pointer_move(Point::new(750.0, 50.0)), ResizeEffect::FrameRequested);
    assert!(!controller.animation_frame(&mut editor));
    assert!(!controller.is_dragging());
    assert_eq!(widths(&editor), (Some(60.0), Some(40.0)));

    // Only the typing is undoable, and undoing it touches no widths
    assert_eq!(editor.history().undo_levels(), 1);
    assert!(editor.undo());
    assert_eq!(editor.doc(), &sized());
    assert!(editor.redo());
    assert_eq!(editor.doc().outline(), "cols(col@60[xA] col@40[B])");
}

#[test]
fn test_cancel_after_foreign_edit_follows_the_group() -> anyhow::Result<()> {
    let mut editor = editor_at(stacked(), &[0, 0, 0]);
    let mut controller = ResizeController::for_editor(&editor);
    controller.pointer_down(&editor, &lower_layout(), Point::new(600.0, 350.0));
    drag_to(&mut controller, &mut editor, 520.0);

    paste_at_top(&mut editor)?;
    assert!(controller.cancel(&mut editor));
    assert_eq!(
        editor.doc().outline(),
        "pasted, cols(col[a] col[b]), cols(col@60[c] col@40[d])"
    );
    Ok(())
}
