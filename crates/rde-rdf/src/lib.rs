//! RDF plumbing for the RDF document editor.
//!
//! This crate owns everything the editing core treats as an external
//! collaborator:
//!
//! - the term model (`Node`, `Literal`, `Term`, `Triple`),
//! - the [`GraphStore`] pattern-matching interface plus an insertion-ordered
//!   [`MemoryStore`],
//! - Sophia-backed loading of N-Triples / Turtle / RDF/XML text into a store,
//! - prefix-based [`NamespaceResolver`]s and the default label/description
//!   property lists.

pub mod load;
pub mod ns;
pub mod store;
pub mod term;

pub use load::{parse_triples, RdfFormat};
pub use ns::{NamespaceResolver, PrefixMap};
pub use store::{GraphStore, MemoryStore};
pub use term::{Literal, Node, Term, Triple};
