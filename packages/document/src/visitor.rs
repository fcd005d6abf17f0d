use crate::node::{Block, Column, ColumnGroup, Document, Node};
use crate::path::Path;

/// Depth-first traversal over the document tree
///
/// Default implementations walk the whole tree. Override specific visit_*
/// methods to act on nodes; call the matching walk_* function to keep
/// descending.
pub trait Visitor: Sized {
    fn visit_document(&mut self, doc: &Document) {
        walk_document(self, doc);
    }

    fn visit_node(&mut self, path: &Path, node: &Node) {
        walk_node(self, path, node);
    }

    fn visit_block(&mut self, _path: &Path, _block: &Block) {
        // Leaf node, no children to walk
    }

    fn visit_column(&mut self, path: &Path, column: &Column) {
        walk_children(self, path, &column.children);
    }

    fn visit_column_group(&mut self, path: &Path, group: &ColumnGroup) {
        walk_children(self, path, &group.children);
    }
}

pub fn walk_document<V: Visitor>(visitor: &mut V, doc: &Document) {
    walk_children(visitor, &Path::root(), &doc.children);
}

pub fn walk_node<V: Visitor>(visitor: &mut V, path: &Path, node: &Node) {
    match node {
        Node::Block(block) => visitor.visit_block(path, block),
        Node::Column(column) => visitor.visit_column(path, column),
        Node::ColumnGroup(group) => visitor.visit_column_group(path, group),
    }
}

pub fn walk_children<V: Visitor>(visitor: &mut V, parent: &Path, children: &[Node]) {
    for (index, child) in children.iter().enumerate() {
        visitor.visit_node(&parent.child(index), child);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    /// Parents before their descendants
    PreOrder,
    /// Descendants before their parents
    PostOrder,
}

struct GroupCollector {
    order: Order,
    paths: Vec<Path>,
}

impl Visitor for GroupCollector {
    fn visit_column_group(&mut self, path: &Path, group: &ColumnGroup) {
        if self.order == Order::PreOrder {
            self.paths.push(path.clone());
        }
        walk_children(self, path, &group.children);
        if self.order == Order::PostOrder {
            self.paths.push(path.clone());
        }
    }
}

/// Paths of every column group
pub fn collect_group_paths(doc: &Document, order: Order) -> Vec<Path> {
    let mut collector = GroupCollector {
        order,
        paths: Vec::new(),
    };
    collector.visit_document(doc);
    collector.paths
}

struct BlockCollector(Vec<Path>);

impl Visitor for BlockCollector {
    fn visit_block(&mut self, path: &Path, _block: &Block) {
        self.0.push(path.clone());
    }
}

pub fn block_paths(doc: &Document) -> Vec<Path> {
    let mut collector = BlockCollector(Vec::new());
    collector.visit_document(doc);
    collector.0
}
