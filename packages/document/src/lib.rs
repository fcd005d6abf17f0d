//! # Quire Document
//!
//! Document tree and transaction model for the Quire editor.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ node: tagged tree (Block / Column / Group)  │
//! │ schema: containment + width rules           │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ step: validated splice / dissolve / width   │
//! │ mapping: re-resolve paths through steps     │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ transaction: staged steps on a working copy │
//! │  - inverses for undo                        │
//! │  - history mode + origin metadata           │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Positions are paths**: a node is addressed by child indices from the root
//! 2. **Never hold stale paths**: every path captured before a step is re-resolved
//!    through the transaction's [`Mapping`] before it is used again
//! 3. **Immutable update**: a transaction works on a copy; the live tree only
//!    changes when the editor commits
//! 4. **Transient shapes are legal**: steps enforce containment, never cardinality
//!
//! ## Usage
//!
//! ```rust
//! use quire_document::builder::{column, doc, group, paragraph};
//! use quire_document::{Path, Transaction};
//!
//! let document = doc(vec![group(vec![
//!     column(vec![paragraph("P1")]),
//!     column(vec![paragraph("P2"), paragraph("P3")]),
//! ])]);
//!
//! let mut tr = Transaction::new(&document, 0);
//! tr.delete_node(&Path::new(vec![0, 0, 0])).unwrap();
//! assert_eq!(tr.doc().outline(), "cols(col[] col[P2, P3])");
//! ```

pub mod builder;
mod error;
mod mapping;
mod node;
mod path;
mod resolve;
mod schema;
mod selection;
mod step;
mod transaction;
pub mod visitor;

pub use error::{DocumentError, DocumentResult};
pub use mapping::{Mapping, StepMap};
pub use node::{Block, BlockKind, Column, ColumnGroup, Document, Node};
pub use path::Path;
pub use resolve::{Ancestor, Movable, ResolvedPath};
pub use schema::{validate_width, NodeType, MIN_GROUP_COLUMNS};
pub use selection::Selection;
pub use step::{AppliedStep, Step};
pub use transaction::{CommittedTransaction, EditOrigin, HistoryMode, Transaction};
