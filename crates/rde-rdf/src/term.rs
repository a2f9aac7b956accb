//! RDF term model shared by the store and the editing core.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A resource position in a triple: named, anonymous, or an ordered list.
///
/// Collections are blank-node headed lists whose elements have already been
/// resolved from `rdf:first` / `rdf:rest`. For matching purposes a collection
/// behaves like the blank node that heads it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Node {
    Iri(String),
    BlankNode(String),
    Collection { id: String, elements: Vec<Term> },
}

impl Node {
    pub fn iri(iri: impl Into<String>) -> Self {
        Node::Iri(iri.into())
    }

    pub fn blank(id: impl Into<String>) -> Self {
        Node::BlankNode(id.into())
    }

    /// Raw identifier: the IRI for named nodes, the label for anonymous ones.
    pub fn value(&self) -> &str {
        match self {
            Node::Iri(iri) => iri,
            Node::BlankNode(id) => id,
            Node::Collection { id, .. } => id,
        }
    }

    pub fn is_named(&self) -> bool {
        matches!(self, Node::Iri(_))
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, Node::Collection { .. })
    }

    /// Same underlying resource, ignoring whether a list has been resolved.
    pub fn same_resource(&self, other: &Node) -> bool {
        self.is_named() == other.is_named() && self.value() == other.value()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Iri(iri) => write!(f, "<{iri}>"),
            Node::BlankNode(id) => write!(f, "_:{id}"),
            Node::Collection { id, elements } => write!(f, "_:{id}({} items)", elements.len()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Literal {
    pub lexical: String,
    pub language: Option<String>,
    pub datatype: Option<String>,
}

impl Literal {
    pub fn plain(lexical: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            language: None,
            datatype: None,
        }
    }

    pub fn lang(lexical: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            language: Some(language.into()),
            datatype: None,
        }
    }

    pub fn typed(lexical: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            language: None,
            datatype: Some(datatype.into()),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.lexical)?;
        if let Some(lang) = &self.language {
            write!(f, "@{lang}")?;
        } else if let Some(dt) = &self.datatype {
            write!(f, "^^<{dt}>")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Term {
    Node(Node),
    Literal(Literal),
}

impl Term {
    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Term::Node(node) => Some(node),
            Term::Literal(_) => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Term::Literal(lit) => Some(lit),
            Term::Node(_) => None,
        }
    }

    pub fn into_node(self) -> Option<Node> {
        match self {
            Term::Node(node) => Some(node),
            Term::Literal(_) => None,
        }
    }

    pub fn into_literal(self) -> Option<Literal> {
        match self {
            Term::Literal(lit) => Some(lit),
            Term::Node(_) => None,
        }
    }

    /// Pattern equality: nodes compare by resource, literals by full value.
    pub fn matches(&self, other: &Term) -> bool {
        match (self, other) {
            (Term::Node(a), Term::Node(b)) => a.same_resource(b),
            (Term::Literal(a), Term::Literal(b)) => a == b,
            _ => false,
        }
    }
}

impl From<Node> for Term {
    fn from(node: Node) -> Self {
        Term::Node(node)
    }
}

impl From<Literal> for Term {
    fn from(lit: Literal) -> Self {
        Term::Literal(lit)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Node(node) => node.fmt(f),
            Term::Literal(lit) => lit.fmt(f),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple {
    pub subject: Node,
    pub predicate: String,
    pub object: Term,
}

impl Triple {
    pub fn new(subject: Node, predicate: impl Into<String>, object: impl Into<Term>) -> Self {
        Self {
            subject,
            predicate: predicate.into(),
            object: object.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_matches_its_blank_head() {
        let list = Node::Collection {
            id: "b0".to_string(),
            elements: vec![Term::Literal(Literal::plain("a"))],
        };
        assert!(list.is_collection());
        assert!(list.same_resource(&Node::blank("b0")));
        assert!(!list.same_resource(&Node::iri("b0")));
    }

    #[test]
    fn literal_display_prefers_language_tag() {
        assert_eq!(Literal::lang("chat", "fr").to_string(), "\"chat\"@fr");
        assert_eq!(
            Literal::typed("3", "http://www.w3.org/2001/XMLSchema#integer").to_string(),
            "\"3\"^^<http://www.w3.org/2001/XMLSchema#integer>"
        );
    }
}
