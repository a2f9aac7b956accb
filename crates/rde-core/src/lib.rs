//! Editable, versioned projection of an RDF subgraph rooted at one entity.
//!
//! ```text
//!   GraphStore ──► EntityGraph ──► EntityGraphState
//!                     │               baseline (as loaded)
//!                     │               current  (as edited)
//!                     ▼
//!                 HistoryStore  (per-entity undo/redo log)
//! ```
//!
//! - [`Path`]: one traversal step, forward or inverse, optionally list-valued.
//! - [`GraphNodeRef`]: a node bound to its graph, with derived display fields.
//! - [`Value`]: what a `(subject, property)` slot holds.
//! - [`EntityGraph`] / [`EntityGraphState`]: store handles plus session state.
//! - [`HistoryStore`]: the edit log, its status and parent-path reconstruction.

pub mod config;
pub mod graph;
pub mod history;
pub mod node;
pub mod path;
pub mod shapes;
pub mod state;
pub mod value;

pub use config::{ConfigError, EntityGraphConfig};
pub use graph::{EntityGraph, EntityGraphBuilder, GraphContext};
pub use history::{HistoryEntry, HistoryError, HistoryStatus, HistoryStore, RecordOutcome};
pub use node::{GraphNodeRef, Resource};
pub use path::{Path, PathError};
pub use shapes::{NodeShape, PropertyShape};
pub use state::{EntityGraphState, HistoryMode, PropertyValues, SubjectProperties};
pub use value::{IdGenerator, LiteralValue, Value, PLACEHOLDER_URI};
