use crate::node::Document;
use crate::path::Path;
use crate::schema::NodeType;

/// One link of an ancestor chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ancestor {
    pub path: Path,
    pub node_type: NodeType,
}

/// A path resolved against a tree: the target plus every ancestor from the
/// root down to the target itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    pub target: Path,
    pub ancestors: Vec<Ancestor>,
}

/// The unit a keyboard move operates on: the highest node directly under the
/// nearest flow (root or column) that contains the cursor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Movable {
    pub container: Path,
    pub container_type: NodeType,
    pub node: Path,
}

impl Movable {
    pub fn index(&self) -> usize {
        self.node.last_index().unwrap_or_default()
    }
}

impl Document {
    pub fn resolve(&self, path: &Path) -> Option<ResolvedPath> {
        let mut ancestors = Vec::with_capacity(path.depth() + 1);
        for depth in 0..=path.depth() {
            let prefix = path.prefix(depth);
            let node_type = self.node_type_at(&prefix)?;
            ancestors.push(Ancestor {
                path: prefix,
                node_type,
            });
        }
        Some(ResolvedPath {
            target: path.clone(),
            ancestors,
        })
    }
}

impl ResolvedPath {
    pub fn depth(&self) -> usize {
        self.target.depth()
    }

    pub fn node_type(&self) -> NodeType {
        self.ancestors
            .last()
            .map(|a| a.node_type)
            .unwrap_or(NodeType::Root)
    }

    /// Nearest column strictly above the target
    pub fn enclosing_column(&self) -> Option<&Path> {
        self.ancestors
            .iter()
            .rev()
            .skip(1)
            .find(|a| a.node_type == NodeType::Column)
            .map(|a| &a.path)
    }

    /// Nearest flow strictly above the target and the node directly under it
    pub fn movable(&self) -> Option<Movable> {
        if self.target.is_root() {
            return None;
        }
        let container = self
            .ancestors
            .iter()
            .rev()
            .skip(1)
            .find(|a| a.node_type.is_flow())?;
        Some(Movable {
            container: container.path.clone(),
            container_type: container.node_type,
            node: self.target.prefix(container.path.depth() + 1),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{column, doc, group, paragraph};

    fn nested() -> Document {
        doc(vec![
            paragraph("Intro"),
            group(vec![
                column(vec![
                    paragraph("A"),
                    group(vec![column(vec![paragraph("X")]), column(vec![paragraph("Y")])]),
                ]),
                column(vec![paragraph("B")]),
            ]),
        ])
    }

    #[test]
    fn test_resolve_ancestor_chain() {
        let resolved = nested().resolve(&Path::new(vec![1, 1, 0])).unwrap();
        let types: Vec<NodeType> = resolved.ancestors.iter().map(|a| a.node_type).collect();
        assert_eq!(
            types,
            vec![NodeType::Root, NodeType::ColumnGroup, NodeType::Column, NodeType::Block]
        );
        assert_eq!(resolved.node_type(), NodeType::Block);
    }

    #[test]
    fn test_resolve_missing_path() {
        assert!(nested().resolve(&Path::new(vec![5])).is_none());
    }

    #[test]
    fn test_movable_in_root_flow() {
        let movable = nested().resolve(&Path::new(vec![0])).unwrap().movable().unwrap();
        assert_eq!(movable.container, Path::root());
        assert_eq!(movable.container_type, NodeType::Root);
        assert_eq!(movable.index(), 0);
    }

    #[test]
    fn test_movable_uses_nearest_column() {
        let resolved = nested().resolve(&Path::new(vec![1, 0, 1, 1, 0])).unwrap();
        assert_eq!(resolved.enclosing_column(), Some(&Path::new(vec![1, 0, 1, 1])));
        let movable = resolved.movable().unwrap();
        assert_eq!(movable.container, Path::new(vec![1, 0, 1, 1]));
        assert_eq!(movable.node, Path::new(vec![1, 0, 1, 1, 0]));
    }
}
