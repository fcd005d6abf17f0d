use crate::mapping::Mapping;
use crate::node::{Document, Node};
use crate::path::Path;
use serde::{Deserialize, Serialize};

/// Collapsed cursor: a block and a character offset inside it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub block: Path,
    pub offset: usize,
}

impl Selection {
    pub fn cursor(block: Path, offset: usize) -> Self {
        Self { block, offset }
    }

    pub fn at_start(block: Path) -> Self {
        Self::cursor(block, 0)
    }

    /// Cursor at the start of the first block, or at the root of an empty document
    pub fn at_document_start(doc: &Document) -> Self {
        doc.block_paths()
            .into_iter()
            .next()
            .map(Self::at_start)
            .unwrap_or_else(|| Self::at_start(Path::root()))
    }

    /// Re-resolve through an edit. Falls back to the nearest block when the
    /// cursor's block was removed.
    pub fn map(&self, mapping: &Mapping, doc: &Document) -> Selection {
        match mapping.map(&self.block) {
            Some(path) if matches!(doc.node_at(&path), Some(Node::Block(_))) => {
                Selection::cursor(path, self.offset).clamped(doc)
            }
            _ => Self::near(doc, &self.block),
        }
    }

    /// Last block at or before `path` in document order, else the first block
    pub fn near(doc: &Document, path: &Path) -> Selection {
        let blocks = doc.block_paths();
        blocks
            .iter()
            .rev()
            .find(|candidate| *candidate <= path)
            .or_else(|| blocks.first())
            .map(|found| Self::at_start(found.clone()))
            .unwrap_or_else(|| Self::at_start(Path::root()))
    }

    /// Keep the offset within the block's text
    pub fn clamped(self, doc: &Document) -> Selection {
        match doc.block_at(&self.block) {
            Some(block) => {
                let len = block.len_chars();
                Selection::cursor(self.block, self.offset.min(len))
            }
            None => Self::near(doc, &self.block),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{column, doc, group, paragraph};
    use crate::mapping::StepMap;

    #[test]
    fn test_map_follows_moved_block() {
        let document = doc(vec![paragraph("Z"), paragraph("A"), paragraph("B")]);
        let mut mapping = Mapping::new();
        mapping.push(StepMap::Replace {
            parent: Path::root(),
            start: 0,
            end: 0,
            inserted: 1,
        });
        let selection = Selection::cursor(Path::new(vec![0]), 1);
        assert_eq!(
            selection.map(&mapping, &document),
            Selection::cursor(Path::new(vec![1]), 1)
        );
    }

    #[test]
    fn test_map_falls_back_when_block_removed() {
        // Tree after the deletion of "C"
        let document = doc(vec![
            paragraph("A"),
            group(vec![column(vec![paragraph("B")]), column(vec![])]),
        ]);
        let mut mapping = Mapping::new();
        mapping.push(StepMap::Replace {
            parent: Path::new(vec![1, 1]),
            start: 0,
            end: 1,
            inserted: 0,
        });
        let selection = Selection::cursor(Path::new(vec![1, 1, 0]), 0);
        assert_eq!(
            selection.map(&mapping, &document),
            Selection::at_start(Path::new(vec![1, 0, 0]))
        );
    }

    #[test]
    fn test_clamp_offset() {
        let document = doc(vec![paragraph("abc")]);
        let selection = Selection::cursor(Path::new(vec![0]), 10).clamped(&document);
        assert_eq!(selection.offset, 3);
    }

    #[test]
    fn test_empty_document_selection() {
        let selection = Selection::at_document_start(&Document::default());
        assert!(selection.block.is_root());
    }
}
