//! Compound edits staged through a single transaction

use quire_document::builder::{column, column_with_width, doc, group, paragraph};
use quire_document::{Document, Path, Selection, Step, Transaction};

fn undo_all(tr: &Transaction) -> Document {
    let mut restored = tr.doc().clone();
    for inverse in tr.inverses().iter().rev() {
        inverse.apply(&mut restored).unwrap();
    }
    restored
}

#[test]
fn test_dissolve_after_earlier_edit_uses_live_position() -> anyhow::Result<()> {
    let source = doc(vec![
        paragraph("A"),
        group(vec![column(vec![paragraph("B")]), column(vec![paragraph("C")])]),
        group(vec![column(vec![paragraph("D")])]),
    ]);
    let second_group = Path::new(vec![2]);

    let mut tr = Transaction::new(&source, 0);
    // Dissolving the first group by hand shifts the second one.
    tr.delete_node(&Path::new(vec![1, 1]))?;
    tr.dissolve(&Path::new(vec![1]))?;
    let live = tr.mapping().map(&second_group).expect("group survives");
    assert_eq!(live, Path::new(vec![2]));
    tr.dissolve(&live)?;

    assert_eq!(tr.doc().outline(), "A, B, D");
    assert_eq!(undo_all(&tr), source);
    Ok(())
}

#[test]
fn test_selection_survives_group_dissolution() -> anyhow::Result<()> {
    let source = doc(vec![
        paragraph("A"),
        group(vec![column(vec![paragraph("B"), paragraph("C")])]),
    ]);
    let cursor = Selection::cursor(Path::new(vec![1, 0, 1]), 1);

    let mut tr = Transaction::new(&source, 0);
    tr.dissolve(&Path::new(vec![1]))?;

    let mapped = cursor.map(tr.mapping(), tr.doc());
    assert_eq!(mapped, Selection::cursor(Path::new(vec![2]), 1));
    Ok(())
}

#[test]
fn test_replace_group_with_flat_content_is_one_step() -> anyhow::Result<()> {
    let source = doc(vec![group(vec![
        column_with_width(50.0, vec![paragraph("A")]),
        column_with_width(50.0, vec![paragraph("B"), paragraph("C")]),
    ])]);

    let mut tr = Transaction::new(&source, 3);
    tr.replace_node(
        &Path::new(vec![0]),
        vec![paragraph("A"), paragraph("B"), paragraph("C")],
    )?;

    assert_eq!(tr.step_count(), 1);
    assert_eq!(tr.doc().outline(), "A, B, C");
    assert_eq!(undo_all(&tr), source);
    Ok(())
}

#[test]
fn test_steps_replay_onto_source() -> anyhow::Result<()> {
    let source = doc(vec![paragraph("A"), paragraph("B")]);
    let mut tr = Transaction::new(&source, 0);
    tr.insert(&Path::root(), 2, vec![paragraph("C")])?;
    tr.delete_node(&Path::new(vec![0]))?;

    let mut replayed = source.clone();
    for step in tr.steps() {
        step.apply(&mut replayed)?;
    }
    assert_eq!(&replayed, tr.doc());

    let json = serde_json::to_string(tr.steps())?;
    let decoded: Vec<Step> = serde_json::from_str(&json)?;
    assert_eq!(decoded.as_slice(), tr.steps());
    Ok(())
}
