//! # Position Mapping
//!
//! Every applied step leaves a [`StepMap`] describing how paths captured
//! before the step translate to paths after it. A [`Mapping`] chains them so a
//! path captured at any point of a compound edit can be re-resolved against
//! the edit's current tree.
//!
//! Mapping a path whose node was removed yields `None`.

use crate::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub enum StepMap {
    /// Children `start..end` of `parent` were replaced by `inserted` nodes
    Replace {
        parent: Path,
        start: usize,
        end: usize,
        inserted: usize,
    },

    /// The group at `group` was replaced by the `spliced` children of its
    /// only column (zero when the group had no column)
    Dissolve { group: Path, spliced: usize },

    /// Attribute-only change
    Identity,
}

impl StepMap {
    pub fn map(&self, path: &Path) -> Option<Path> {
        match self {
            StepMap::Identity => Some(path.clone()),

            StepMap::Replace {
                parent,
                start,
                end,
                inserted,
            } => {
                let depth = parent.depth();
                if path.depth() <= depth || !path.starts_with(parent) {
                    return Some(path.clone());
                }
                let index = path.indices()[depth];
                if index < *start {
                    Some(path.clone())
                } else if index < *end {
                    None
                } else {
                    Some(path.with_index_at(depth, index - end + start + inserted))
                }
            }

            StepMap::Dissolve { group, spliced } => {
                let parent = group.parent()?;
                let group_index = group.last_index()?;
                let depth = parent.depth();
                if path.depth() <= depth || !path.starts_with(&parent) {
                    return Some(path.clone());
                }
                let index = path.indices()[depth];
                if index < group_index {
                    return Some(path.clone());
                }
                if index > group_index {
                    return Some(path.with_index_at(depth, index - 1 + spliced));
                }

                // Inside the dissolved group: only content of its single
                // column survives, lifted into the group's slot.
                let tail = path.suffix_from(depth + 1);
                match tail {
                    [0, child, rest @ ..] => Some(parent.child(group_index + child).join(rest)),
                    _ => None,
                }
            }
        }
    }
}

/// Ordered chain of step maps
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mapping {
    maps: Vec<StepMap>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, map: StepMap) {
        self.maps.push(map);
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }

    pub fn maps(&self) -> &[StepMap] {
        &self.maps
    }

    /// Map a path through every step
    pub fn map(&self, path: &Path) -> Option<Path> {
        self.map_from(0, path)
    }

    /// Map a path captured after the first `from` steps through the rest
    pub fn map_from(&self, from: usize, path: &Path) -> Option<Path> {
        self.maps
            .iter()
            .skip(from)
            .try_fold(path.clone(), |current, map| map.map(&current))
    }

    pub fn append(&mut self, other: &Mapping) {
        self.maps.extend(other.maps.iter().cloned());
    }
}
