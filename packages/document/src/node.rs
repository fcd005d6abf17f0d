use crate::error::DocumentResult;
use crate::path::Path;
use crate::schema::NodeType;
use serde::{Deserialize, Serialize};

/// Kind of content block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Paragraph,
    Heading { level: u8 },
    ListItem,
    Quote,
    Code,
}

/// Atomic unit of movement and duplication
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub kind: BlockKind,
    #[serde(default)]
    pub text: String,
}

impl Block {
    pub fn new(kind: BlockKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::new(BlockKind::Paragraph, text)
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// An empty paragraph, the block a fresh flow holds
    pub fn is_placeholder(&self) -> bool {
        self.kind == BlockKind::Paragraph && self.text.is_empty()
    }

    /// Length of the text in characters
    pub fn len_chars(&self) -> usize {
        self.text.chars().count()
    }
}

/// Spatial partition of a column group.
///
/// `width` is a percentage of the parent group. `None` means the column is
/// not locked to a percentage and takes an equal share.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub children: Vec<Node>,
}

impl Column {
    pub fn new(children: Vec<Node>) -> Self {
        Self {
            width: None,
            children,
        }
    }
}

/// Invisible layout wrapper around side-by-side columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnGroup {
    #[serde(default)]
    pub children: Vec<Node>,
}

impl ColumnGroup {
    pub fn new(columns: Vec<Node>) -> Self {
        Self { children: columns }
    }

    pub fn column_count(&self) -> usize {
        self.children.len()
    }

    pub fn column(&self, index: usize) -> Option<&Column> {
        self.children.get(index).and_then(Node::as_column)
    }
}

/// Document tree node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    Block(Block),
    Column(Column),
    ColumnGroup(ColumnGroup),
}

impl Node {
    pub fn node_type(&self) -> NodeType {
        match self {
            Node::Block(_) => NodeType::Block,
            Node::Column(_) => NodeType::Column,
            Node::ColumnGroup(_) => NodeType::ColumnGroup,
        }
    }

    pub fn children(&self) -> Option<&[Node]> {
        match self {
            Node::Block(_) => None,
            Node::Column(column) => Some(&column.children),
            Node::ColumnGroup(group) => Some(&group.children),
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Block(_) => None,
            Node::Column(column) => Some(&mut column.children),
            Node::ColumnGroup(group) => Some(&mut group.children),
        }
    }

    pub fn as_block(&self) -> Option<&Block> {
        match self {
            Node::Block(block) => Some(block),
            _ => None,
        }
    }

    pub fn as_block_mut(&mut self) -> Option<&mut Block> {
        match self {
            Node::Block(block) => Some(block),
            _ => None,
        }
    }

    pub fn as_column(&self) -> Option<&Column> {
        match self {
            Node::Column(column) => Some(column),
            _ => None,
        }
    }

    pub fn as_column_mut(&mut self) -> Option<&mut Column> {
        match self {
            Node::Column(column) => Some(column),
            _ => None,
        }
    }

    pub fn as_group(&self) -> Option<&ColumnGroup> {
        match self {
            Node::ColumnGroup(group) => Some(group),
            _ => None,
        }
    }

    pub fn is_block(&self) -> bool {
        matches!(self, Node::Block(_))
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Node::Block(block) if block.is_placeholder())
    }

    /// Compact structural sketch, used in logs and assertions
    pub fn outline(&self) -> String {
        match self {
            Node::Block(block) if block.text.is_empty() => "_".to_string(),
            Node::Block(block) => block.text.clone(),
            Node::Column(column) => {
                let inner = outline_list(&column.children, ", ");
                match column.width {
                    Some(width) => format!("col@{}[{}]", width, inner),
                    None => format!("col[{}]", inner),
                }
            }
            Node::ColumnGroup(group) => format!("cols({})", outline_list(&group.children, " ")),
        }
    }
}

fn outline_list(nodes: &[Node], separator: &str) -> String {
    nodes
        .iter()
        .map(Node::outline)
        .collect::<Vec<_>>()
        .join(separator)
}

/// Root document node: the top-level flow
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    pub children: Vec<Node>,
}

impl Document {
    pub fn new(children: Vec<Node>) -> Self {
        Self { children }
    }

    pub fn from_json(source: &str) -> DocumentResult<Self> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn to_json(&self) -> DocumentResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn node_at(&self, path: &Path) -> Option<&Node> {
        let (first, rest) = path.indices().split_first()?;
        let mut node = self.children.get(*first)?;
        for index in rest {
            node = node.children()?.get(*index)?;
        }
        Some(node)
    }

    pub fn node_at_mut(&mut self, path: &Path) -> Option<&mut Node> {
        let (first, rest) = path.indices().split_first()?;
        let mut node = self.children.get_mut(*first)?;
        for index in rest {
            node = node.children_mut()?.get_mut(*index)?;
        }
        Some(node)
    }

    /// Children of the node at `path`; the root path yields the top-level flow
    pub fn children_at(&self, path: &Path) -> Option<&[Node]> {
        if path.is_root() {
            Some(&self.children)
        } else {
            self.node_at(path)?.children()
        }
    }

    pub fn children_at_mut(&mut self, path: &Path) -> Option<&mut Vec<Node>> {
        if path.is_root() {
            Some(&mut self.children)
        } else {
            self.node_at_mut(path)?.children_mut()
        }
    }

    pub fn node_type_at(&self, path: &Path) -> Option<NodeType> {
        if path.is_root() {
            Some(NodeType::Root)
        } else {
            self.node_at(path).map(Node::node_type)
        }
    }

    pub fn block_at(&self, path: &Path) -> Option<&Block> {
        self.node_at(path).and_then(Node::as_block)
    }

    /// Paths of every block, in document order
    pub fn block_paths(&self) -> Vec<Path> {
        crate::visitor::block_paths(self)
    }

    /// First block at or below `path`
    pub fn first_block_within(&self, path: &Path) -> Option<Path> {
        let node = self.node_at(path)?;
        match node {
            Node::Block(_) => Some(path.clone()),
            _ => node
                .children()?
                .iter()
                .enumerate()
                .find_map(|(index, _)| self.first_block_within(&path.child(index))),
        }
    }

    /// Texts of every block in document order, ignoring layout
    pub fn block_texts(&self) -> Vec<String> {
        self.block_paths()
            .iter()
            .filter_map(|path| self.block_at(path))
            .map(|block| block.text.clone())
            .collect()
    }

    pub fn outline(&self) -> String {
        outline_list(&self.children, ", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{column, column_with_width, doc, group, paragraph, placeholder};

    fn sample() -> Document {
        doc(vec![
            paragraph("Intro"),
            group(vec![
                column_with_width(60.0, vec![paragraph("P1"), paragraph("P2")]),
                column_with_width(40.0, vec![paragraph("P3")]),
            ]),
            placeholder(),
        ])
    }

    #[test]
    fn test_node_lookup() {
        let document = sample();
        let p3 = document.node_at(&Path::new(vec![1, 1, 0])).unwrap();
        assert_eq!(p3.as_block().unwrap().text, "P3");
        assert!(document.node_at(&Path::new(vec![1, 2])).is_none());
        assert!(document.node_at(&Path::root()).is_none());
        assert_eq!(document.children_at(&Path::root()).unwrap().len(), 3);
        assert_eq!(document.node_type_at(&Path::new(vec![1, 0])), Some(NodeType::Column));
    }

    #[test]
    fn test_outline() {
        assert_eq!(
            sample().outline(),
            "Intro, cols(col@60[P1, P2] col@40[P3]), _"
        );
    }

    #[test]
    fn test_block_paths_in_document_order() {
        let document = sample();
        assert_eq!(document.block_texts(), vec!["Intro", "P1", "P2", "P3", ""]);
        assert_eq!(
            document.first_block_within(&Path::new(vec![1])),
            Some(Path::new(vec![1, 0, 0]))
        );
    }

    #[test]
    fn test_json_roundtrip_keeps_null_widths() {
        let document = doc(vec![group(vec![
            column(vec![paragraph("A")]),
            column_with_width(30.0, vec![paragraph("B")]),
        ])]);
        let json = document.to_json().unwrap();
        assert!(json.contains("\"width\":null"));
        assert_eq!(Document::from_json(&json).unwrap(), document);
    }

    #[test]
    fn test_placeholder_detection() {
        assert!(placeholder().is_placeholder());
        assert!(!paragraph("x").is_placeholder());
        assert!(!Node::Block(Block::new(BlockKind::Heading { level: 1 }, "")).is_placeholder());
    }
}
