//! # Steps
//!
//! Validated, invertible tree edits. Every higher-level edit (moving a block,
//! dissolving a group, resizing columns) is a sequence of these.
//!
//! ## Step Semantics
//!
//! ### Replace
//! - Splices children `start..end` of `parent` with new nodes
//! - Insert and delete are the `start == end` and empty-`nodes` cases
//! - Inserted subtrees must satisfy containment rules
//!
//! ### Dissolve
//! - Replaces a group holding at most one column by that column's content
//! - Content is spliced into the group's slot, never nested
//!
//! ### SetWidth
//! - Sets or clears a column's width percentage

use crate::error::{DocumentError, DocumentResult};
use crate::mapping::StepMap;
use crate::node::{Document, Node};
use crate::path::Path;
use crate::schema::{check_content, validate_width, NodeType};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
    Replace {
        parent: Path,
        start: usize,
        end: usize,
        nodes: Vec<Node>,
    },

    Dissolve {
        group: Path,
    },

    SetWidth {
        column: Path,
        width: Option<f64>,
    },
}

/// Inverse and position map of an applied step
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedStep {
    pub inverse: Step,
    pub map: StepMap,
}

impl Step {
    pub fn insert(parent: &Path, index: usize, nodes: Vec<Node>) -> Self {
        Step::Replace {
            parent: parent.clone(),
            start: index,
            end: index,
            nodes,
        }
    }

    pub fn delete(parent: &Path, start: usize, end: usize) -> Self {
        Step::Replace {
            parent: parent.clone(),
            start,
            end,
            nodes: Vec::new(),
        }
    }

    /// Replace the single node at `at` with `nodes`
    pub fn replace_node(at: &Path, nodes: Vec<Node>) -> DocumentResult<Self> {
        let parent = at.parent().ok_or(DocumentError::RootNotReplaceable)?;
        let index = at.last_index().ok_or(DocumentError::RootNotReplaceable)?;
        Ok(Step::Replace {
            parent,
            start: index,
            end: index + 1,
            nodes,
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Step::Replace { nodes, start, end, .. } if nodes.is_empty() && start != end => "delete",
            Step::Replace { start, end, .. } if start == end => "insert",
            Step::Replace { .. } => "replace",
            Step::Dissolve { .. } => "dissolve",
            Step::SetWidth { .. } => "set_width",
        }
    }

    /// Validate without applying
    pub fn validate(&self, doc: &Document) -> DocumentResult<()> {
        match self {
            Step::Replace {
                parent,
                start,
                end,
                nodes,
            } => {
                let parent_type = doc
                    .node_type_at(parent)
                    .ok_or_else(|| DocumentError::PathNotFound(parent.clone()))?;
                let children = doc
                    .children_at(parent)
                    .ok_or_else(|| DocumentError::NotAContainer(parent.clone()))?;
                if start > end || *end > children.len() {
                    return Err(DocumentError::invalid_range(parent, *start, *end, children.len()));
                }
                check_content(parent_type, nodes)
            }

            Step::Dissolve { group } => {
                if group.is_root() {
                    return Err(DocumentError::RootNotReplaceable);
                }
                match doc.node_at(group) {
                    Some(Node::ColumnGroup(g)) if g.children.len() <= 1 => {
                        if let Some(only) = g.children.first() {
                            if only.node_type() != NodeType::Column {
                                return Err(DocumentError::NotAColumn(group.child(0)));
                            }
                        }
                        Ok(())
                    }
                    Some(Node::ColumnGroup(g)) => Err(DocumentError::GroupNotDissolvable {
                        path: group.clone(),
                        count: g.children.len(),
                    }),
                    Some(_) => Err(DocumentError::NotAColumnGroup(group.clone())),
                    None => Err(DocumentError::PathNotFound(group.clone())),
                }
            }

            Step::SetWidth { column, width } => {
                match doc.node_at(column) {
                    Some(Node::Column(_)) => {}
                    Some(_) => return Err(DocumentError::NotAColumn(column.clone())),
                    None => return Err(DocumentError::PathNotFound(column.clone())),
                }
                validate_width(*width)
            }
        }
    }

    /// Apply to the tree, returning the inverse step and position map
    pub fn apply(&self, doc: &mut Document) -> DocumentResult<AppliedStep> {
        self.validate(doc)?;

        match self {
            Step::Replace {
                parent,
                start,
                end,
                nodes,
            } => Self::apply_replace(doc, parent, *start, *end, nodes),
            Step::Dissolve { group } => Self::apply_dissolve(doc, group),
            Step::SetWidth { column, width } => Self::apply_set_width(doc, column, *width),
        }
    }

    fn apply_replace(
        doc: &mut Document,
        parent: &Path,
        start: usize,
        end: usize,
        nodes: &[Node],
    ) -> DocumentResult<AppliedStep> {
        let children = doc
            .children_at_mut(parent)
            .ok_or_else(|| DocumentError::NotAContainer(parent.clone()))?;
        let removed: Vec<Node> = children.splice(start..end, nodes.iter().cloned()).collect();

        Ok(AppliedStep {
            inverse: Step::Replace {
                parent: parent.clone(),
                start,
                end: start + nodes.len(),
                nodes: removed,
            },
            map: StepMap::Replace {
                parent: parent.clone(),
                start,
                end,
                inserted: nodes.len(),
            },
        })
    }

    fn apply_dissolve(doc: &mut Document, group: &Path) -> DocumentResult<AppliedStep> {
        let parent = group.parent().ok_or(DocumentError::RootNotReplaceable)?;
        let index = group.last_index().ok_or(DocumentError::RootNotReplaceable)?;

        let original = doc
            .node_at(group)
            .cloned()
            .ok_or_else(|| DocumentError::PathNotFound(group.clone()))?;
        let content: Vec<Node> = match &original {
            Node::ColumnGroup(g) => g
                .children
                .first()
                .and_then(Node::children)
                .map(<[Node]>::to_vec)
                .unwrap_or_default(),
            _ => return Err(DocumentError::NotAColumnGroup(group.clone())),
        };
        let spliced = content.len();

        let children = doc
            .children_at_mut(&parent)
            .ok_or_else(|| DocumentError::NotAContainer(parent.clone()))?;
        children.splice(index..index + 1, content);

        Ok(AppliedStep {
            inverse: Step::Replace {
                parent,
                start: index,
                end: index + spliced,
                nodes: vec![original],
            },
            map: StepMap::Dissolve {
                group: group.clone(),
                spliced,
            },
        })
    }

    fn apply_set_width(
        doc: &mut Document,
        column: &Path,
        width: Option<f64>,
    ) -> DocumentResult<AppliedStep> {
        let col = doc
            .node_at_mut(column)
            .and_then(Node::as_column_mut)
            .ok_or_else(|| DocumentError::NotAColumn(column.clone()))?;
        let previous = std::mem::replace(&mut col.width, width);

        Ok(AppliedStep {
            inverse: Step::SetWidth {
                column: column.clone(),
                width: previous,
            },
            map: StepMap::Identity,
        })
    }
}
