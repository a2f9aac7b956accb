//! Pattern-matching triple store interface and its in-memory implementation.

use crate::ns::{RDF_FIRST, RDF_NIL, RDF_REST};
use crate::term::{Node, Term, Triple};
use std::collections::HashSet;

/// Minimal triple store surface consumed by the editing core.
pub trait GraphStore: Send + Sync {
    /// All triples matching the pattern; `None` is a wildcard.
    fn match_triples(
        &self,
        subject: Option<&Node>,
        predicate: Option<&str>,
        object: Option<&Term>,
    ) -> Vec<Triple>;

    /// Terms found in the first unbound position (subject, then predicate,
    /// then object) of every matching triple.
    fn each(
        &self,
        subject: Option<&Node>,
        predicate: Option<&str>,
        object: Option<&Term>,
    ) -> Vec<Term> {
        self.match_triples(subject, predicate, object)
            .into_iter()
            .filter_map(|t| {
                if subject.is_none() {
                    Some(Term::Node(t.subject))
                } else if predicate.is_none() {
                    Some(Term::Node(Node::Iri(t.predicate)))
                } else if object.is_none() {
                    Some(t.object)
                } else {
                    None
                }
            })
            .collect()
    }

    /// First term in the unbound position, if any.
    fn any(
        &self,
        subject: Option<&Node>,
        predicate: Option<&str>,
        object: Option<&Term>,
    ) -> Option<Term> {
        self.each(subject, predicate, object).into_iter().next()
    }
}

/// Insertion-ordered in-memory store. Duplicate triples are ignored.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    triples: Vec<Triple>,
    seen: HashSet<Triple>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when the triple was already present.
    pub fn add(&mut self, subject: Node, predicate: impl Into<String>, object: impl Into<Term>) -> bool {
        self.insert(Triple::new(subject, predicate, object))
    }

    pub fn insert(&mut self, triple: Triple) -> bool {
        if !self.seen.insert(triple.clone()) {
            return false;
        }
        self.triples.push(triple);
        true
    }

    pub fn extend(&mut self, triples: impl IntoIterator<Item = Triple>) -> usize {
        triples
            .into_iter()
            .map(|t| self.insert(t))
            .filter(|added| *added)
            .count()
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    pub fn triples(&self) -> &[Triple] {
        &self.triples
    }

    /// Resolve an `rdf:first` / `rdf:rest` chain into a collection node.
    ///
    /// Returns `None` when `head` is not a well-formed list (missing
    /// `rdf:first`, or a `rdf:rest` that loops back on itself).
    pub fn collection(&self, head: &Node) -> Option<Node> {
        let mut elements = Vec::new();
        let mut visited: HashSet<String> = HashSet::new();
        let mut cursor = head.clone();

        loop {
            if cursor.is_named() && cursor.value() == RDF_NIL {
                break;
            }
            if !visited.insert(cursor.value().to_string()) {
                return None;
            }
            let first = self.any(Some(&cursor), Some(RDF_FIRST), None)?;
            elements.push(first);
            cursor = self.any(Some(&cursor), Some(RDF_REST), None)?.into_node()?;
        }

        Some(Node::Collection {
            id: head.value().to_string(),
            elements,
        })
    }
}

impl GraphStore for MemoryStore {
    fn match_triples(
        &self,
        subject: Option<&Node>,
        predicate: Option<&str>,
        object: Option<&Term>,
    ) -> Vec<Triple> {
        self.triples
            .iter()
            .filter(|t| subject.map_or(true, |s| s.same_resource(&t.subject)))
            .filter(|t| predicate.map_or(true, |p| p == t.predicate))
            .filter(|t| object.map_or(true, |o| o.matches(&t.object)))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::Literal;

    const EX: &str = "http://example.org/";

    fn ex(local: &str) -> Node {
        Node::iri(format!("{EX}{local}"))
    }

    #[test]
    fn duplicate_triples_are_ignored() {
        let mut store = MemoryStore::new();
        assert!(store.add(ex("a"), format!("{EX}p"), ex("b")));
        assert!(!store.add(ex("a"), format!("{EX}p"), ex("b")));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn each_returns_first_unbound_position() {
        let mut store = MemoryStore::new();
        let p = format!("{EX}p");
        store.add(ex("a"), p.clone(), ex("b"));
        store.add(ex("a"), p.clone(), Literal::plain("x"));
        store.add(ex("c"), p.clone(), ex("b"));

        let objects = store.each(Some(&ex("a")), Some(p.as_str()), None);
        assert_eq!(objects.len(), 2);
        assert_eq!(objects[0], Term::Node(ex("b")));

        let subjects = store.each(None, Some(p.as_str()), Some(&Term::Node(ex("b"))));
        assert_eq!(
            subjects,
            vec![Term::Node(ex("a")), Term::Node(ex("c"))]
        );

        let predicates = store.each(Some(&ex("c")), None, Some(&Term::Node(ex("b"))));
        assert_eq!(predicates, vec![Term::Node(Node::iri(p))]);
    }

    #[test]
    fn collection_walks_first_rest_chain() {
        let mut store = MemoryStore::new();
        store.add(Node::blank("l0"), RDF_FIRST, Literal::plain("one"));
        store.add(Node::blank("l0"), RDF_REST, Node::blank("l1"));
        store.add(Node::blank("l1"), RDF_FIRST, Literal::plain("two"));
        store.add(Node::blank("l1"), RDF_REST, Node::iri(RDF_NIL));

        let list = store.collection(&Node::blank("l0")).expect("list");
        match list {
            Node::Collection { id, elements } => {
                assert_eq!(id, "l0");
                assert_eq!(
                    elements,
                    vec![
                        Term::Literal(Literal::plain("one")),
                        Term::Literal(Literal::plain("two"))
                    ]
                );
            }
            other => panic!("expected collection, got {other:?}"),
        }
    }

    #[test]
    fn looping_list_is_rejected() {
        let mut store = MemoryStore::new();
        store.add(Node::blank("l0"), RDF_FIRST, Literal::plain("one"));
        store.add(Node::blank("l0"), RDF_REST, Node::blank("l0"));
        assert!(store.collection(&Node::blank("l0")).is_none());
    }
}
