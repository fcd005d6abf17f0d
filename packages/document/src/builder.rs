//! Shorthand constructors for building trees in hosts and tests

use crate::node::{Block, BlockKind, Column, ColumnGroup, Document, Node};

pub fn paragraph(text: impl Into<String>) -> Node {
    Node::Block(Block::paragraph(text))
}

pub fn heading(level: u8, text: impl Into<String>) -> Node {
    Node::Block(Block::new(BlockKind::Heading { level }, text))
}

pub fn list_item(text: impl Into<String>) -> Node {
    Node::Block(Block::new(BlockKind::ListItem, text))
}

/// Empty paragraph
pub fn placeholder() -> Node {
    paragraph("")
}

pub fn column(children: Vec<Node>) -> Node {
    Node::Column(Column::new(children))
}

pub fn column_with_width(width: f64, children: Vec<Node>) -> Node {
    Node::Column(Column {
        width: Some(width),
        children,
    })
}

pub fn group(columns: Vec<Node>) -> Node {
    Node::ColumnGroup(ColumnGroup::new(columns))
}

pub fn doc(children: Vec<Node>) -> Document {
    Document::new(children)
}
