//! # Column Schema
//!
//! Containment rules for the column layout nodes.
//!
//! ```text
//! Root        := (Block | ColumnGroup)+
//! ColumnGroup := Column Column+
//! Column      := (Block | ColumnGroup)+
//! ```
//!
//! Steps enforce *containment* only. Cardinality (a group holding at least two
//! columns, a column holding at least one child) is transiently violated during
//! ordinary editing and is restored by the structural maintainer, not here.

use crate::error::{DocumentError, DocumentResult};
use crate::node::Node;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum number of columns a settled group holds
pub const MIN_GROUP_COLUMNS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Root,
    Block,
    Column,
    ColumnGroup,
}

impl NodeType {
    pub fn allows_child(self, child: NodeType) -> bool {
        match (self, child) {
            (NodeType::Root | NodeType::Column, NodeType::Block | NodeType::ColumnGroup) => true,
            (NodeType::ColumnGroup, NodeType::Column) => true,
            _ => false,
        }
    }

    pub fn min_children(self) -> usize {
        match self {
            NodeType::ColumnGroup => MIN_GROUP_COLUMNS,
            NodeType::Column | NodeType::Root => 1,
            NodeType::Block => 0,
        }
    }

    /// Text-editing boundary operations never merge content across an
    /// isolating node.
    pub fn is_isolating(self) -> bool {
        matches!(self, NodeType::Column | NodeType::ColumnGroup)
    }

    /// Flows hold blocks directly: the root and columns
    pub fn is_flow(self) -> bool {
        matches!(self, NodeType::Root | NodeType::Column)
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeType::Root => "root",
            NodeType::Block => "block",
            NodeType::Column => "column",
            NodeType::ColumnGroup => "column_group",
        };
        write!(f, "{}", name)
    }
}

/// `None` is the equal-share default; explicit widths are percentages in `(0, 100]`.
pub fn validate_width(width: Option<f64>) -> DocumentResult<()> {
    match width {
        None => Ok(()),
        Some(w) if w.is_finite() && w > 0.0 && w <= 100.0 => Ok(()),
        Some(w) => Err(DocumentError::InvalidWidth(w)),
    }
}

/// Check that `nodes` may be placed under a parent of type `parent`,
/// including every descendant of the inserted subtrees.
pub fn check_content(parent: NodeType, nodes: &[Node]) -> DocumentResult<()> {
    for node in nodes {
        let child = node.node_type();
        if !parent.allows_child(child) {
            return Err(DocumentError::SchemaViolation { parent, child });
        }
        if let Node::Column(column) = node {
            validate_width(column.width)?;
        }
        if let Some(children) = node.children() {
            check_content(child, children)?;
        }
    }
    Ok(())
}
