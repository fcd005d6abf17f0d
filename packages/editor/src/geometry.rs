//! Rendered column geometry and boundary hit-testing
//!
//! The host reports the bounding boxes of every rendered column group. Hit
//! testing scans all of them instead of trusting the event target, since UI
//! chrome layered over a boundary can swallow the pointer event.

use quire_document::Path;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn spans_y(&self, y: f64) -> bool {
        y >= self.top() && y <= self.bottom()
    }
}

/// Bounding boxes of one rendered group and its columns, left to right
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnGroupLayout {
    pub group: Path,
    pub rect: Rect,
    pub columns: Vec<Rect>,
}

/// Supplies rendered geometry for hit-testing
pub trait LayoutSource {
    fn column_groups(&self) -> &[ColumnGroupLayout];
}

impl LayoutSource for [ColumnGroupLayout] {
    fn column_groups(&self) -> &[ColumnGroupLayout] {
        self
    }
}

impl LayoutSource for Vec<ColumnGroupLayout> {
    fn column_groups(&self) -> &[ColumnGroupLayout] {
        self
    }
}

/// A boundary between column `left` and `left + 1` of `group`
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryHit {
    pub group: Path,
    pub left: usize,
    pub boundary_x: f64,
    pub distance: f64,
    pub group_width: f64,
    pub left_rect: Rect,
    pub right_rect: Rect,
}

/// Closest column boundary within `tolerance` pixels of `point`. Ties go to
/// the more deeply nested group.
pub fn find_boundary<L>(layouts: &L, point: Point, tolerance: f64) -> Option<BoundaryHit>
where
    L: LayoutSource + ?Sized,
{
    let mut best: Option<BoundaryHit> = None;

    for layout in layouts.column_groups() {
        if !layout.rect.spans_y(point.y) {
            continue;
        }
        for (left, pair) in layout.columns.windows(2).enumerate() {
            let (left_rect, right_rect) = (pair[0], pair[1]);
            let boundary_x = (left_rect.right() + right_rect.left()) / 2.0;
            let distance = (point.x - boundary_x).abs();
            if distance > tolerance {
                continue;
            }

            let closer = match &best {
                None => true,
                Some(current) => {
                    distance < current.distance
                        || (distance == current.distance
                            && layout.group.depth() > current.group.depth())
                }
            };
            if closer {
                best = Some(BoundaryHit {
                    group: layout.group.clone(),
                    left,
                    boundary_x,
                    distance,
                    group_width: layout.rect.width,
                    left_rect,
                    right_rect,
                });
            }
        }
    }

    best
}
