use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a node: child indices walked from the document root.
///
/// The empty path addresses the root flow itself. Lexicographic ordering of
/// paths matches document (pre-order) order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path(Vec<usize>);

impl Path {
    pub fn new(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn parent(&self) -> Option<Path> {
        if self.0.is_empty() {
            None
        } else {
            Some(Self(self.0[..self.0.len() - 1].to_vec()))
        }
    }

    /// Index of this node within its parent
    pub fn last_index(&self) -> Option<usize> {
        self.0.last().copied()
    }

    pub fn child(&self, index: usize) -> Path {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    /// Same parent, different index
    pub fn sibling(&self, index: usize) -> Option<Path> {
        self.parent().map(|parent| parent.child(index))
    }

    pub fn starts_with(&self, prefix: &Path) -> bool {
        self.0.starts_with(&prefix.0)
    }

    /// First `depth` components
    pub fn prefix(&self, depth: usize) -> Path {
        Self(self.0[..depth.min(self.0.len())].to_vec())
    }

    /// Components below `depth`
    pub fn suffix_from(&self, depth: usize) -> &[usize] {
        &self.0[depth.min(self.0.len())..]
    }

    pub fn join(&self, tail: &[usize]) -> Path {
        let mut indices = self.0.clone();
        indices.extend_from_slice(tail);
        Self(indices)
    }

    pub(crate) fn with_index_at(&self, depth: usize, index: usize) -> Path {
        let mut indices = self.0.clone();
        indices[depth] = index;
        Self(indices)
    }
}

impl From<Vec<usize>> for Path {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

impl From<&[usize]> for Path {
    fn from(indices: &[usize]) -> Self {
        Self(indices.to_vec())
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "/");
        }
        for index in &self.0 {
            write!(f, "/{}", index)?;
        }
        Ok(())
    }
}
