//! Shared fixtures for editor integration tests
#![allow(dead_code)]

use quire_document::{Document, Path, Selection};
use quire_editor::{find_violations, Editor};
use tracing_subscriber::EnvFilter;

/// Route tracing output through the test harness. `RUST_LOG=debug` to see it.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn editor_at(document: Document, cursor: &[usize]) -> Editor {
    init_tracing();
    let mut editor = Editor::new(document);
    editor.set_selection(Selection::at_start(Path::from(cursor)));
    editor
}

/// Every group has two or more non-empty columns
pub fn assert_structure_valid(editor: &Editor) {
    let violations = find_violations(editor.doc());
    assert!(
        violations.is_empty(),
        "violations in {}: {:?}",
        editor.doc().outline(),
        violations
    );
}

pub fn sorted_texts(document: &Document) -> Vec<String> {
    let mut texts = document.block_texts();
    texts.sort();
    texts
}
