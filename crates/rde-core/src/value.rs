//! Values stored in a `(subject, property)` slot.

use crate::node::{GraphNodeRef, Resource};
use rde_rdf::Literal;
use uuid::Uuid;

/// Placeholder URI for rows the UI creates before the user picks a value.
pub const PLACEHOLDER_URI: &str = "tmp:uri";

/// Produces collision-resistant opaque tokens.
pub type IdGenerator = dyn Fn() -> String + Send + Sync;

pub fn generate_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// A literal plus the identity token that tells it apart from textually
/// identical literals in the same list.
///
/// The token is assigned at construction and survives `clone` and
/// [`LiteralValue::with_lexical`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralValue {
    literal: Literal,
    id: String,
}

impl LiteralValue {
    pub fn new(
        lexical: impl Into<String>,
        language: Option<String>,
        datatype: Option<String>,
        id: Option<String>,
    ) -> Self {
        Self::from_literal(
            Literal {
                lexical: lexical.into(),
                language,
                datatype,
            },
            id,
        )
    }

    pub fn from_literal(literal: Literal, id: Option<String>) -> Self {
        Self::with_generator(literal, id, &generate_id)
    }

    pub fn with_generator(literal: Literal, id: Option<String>, generator: &IdGenerator) -> Self {
        let id = match id {
            Some(id) if !id.is_empty() => id,
            _ => generator(),
        };
        Self { literal, id }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn literal(&self) -> &Literal {
        &self.literal
    }

    pub fn lexical(&self) -> &str {
        &self.literal.lexical
    }

    pub fn language(&self) -> Option<&str> {
        self.literal.language.as_deref()
    }

    pub fn datatype(&self) -> Option<&str> {
        self.literal.datatype.as_deref()
    }

    /// Same slot, new text.
    pub fn with_lexical(&self, lexical: impl Into<String>) -> Self {
        Self {
            literal: Literal {
                lexical: lexical.into(),
                ..self.literal.clone()
            },
            id: self.id.clone(),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        self.literal.lexical.trim().parse::<f64>().ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// A node with its own editable property set.
    Subject(GraphNodeRef),
    Literal(LiteralValue),
    /// A read-only external reference known by its label.
    Labeled(GraphNodeRef),
}

impl Value {
    /// Node URI for references, identity token for literals.
    pub fn id(&self) -> &str {
        match self {
            Value::Subject(node) | Value::Labeled(node) => node.id(),
            Value::Literal(lit) => lit.id(),
        }
    }

    /// Text a UI would show for the raw value.
    pub fn display_value(&self) -> &str {
        match self {
            Value::Subject(node) | Value::Labeled(node) => node.value(),
            Value::Literal(lit) => lit.lexical(),
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Value::Literal(_))
    }

    pub fn as_resource(&self) -> Option<&GraphNodeRef> {
        match self {
            Value::Subject(node) | Value::Labeled(node) => Some(node),
            Value::Literal(_) => None,
        }
    }

    pub fn as_subject(&self) -> Option<&GraphNodeRef> {
        match self {
            Value::Subject(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&LiteralValue> {
        match self {
            Value::Literal(lit) => Some(lit),
            _ => None,
        }
    }

    /// Auto-created empty row: not worth an undo step.
    pub fn is_placeholder(&self) -> bool {
        match self {
            Value::Literal(_) => false,
            Value::Subject(node) | Value::Labeled(node) => {
                node.id() == PLACEHOLDER_URI || node.value().is_empty()
            }
        }
    }

    /// Whether this is a subject reference to `target`, given as a URI or as
    /// a qualified name.
    pub fn refers_to_subject(&self, target: &str) -> bool {
        match self {
            Value::Subject(node) => node.id() == target || node.qualified_name() == target,
            _ => false,
        }
    }

    /// Content equality: literals ignore their identity token.
    pub fn same_content(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Subject(a), Value::Subject(b)) | (Value::Labeled(a), Value::Labeled(b)) => {
                a == b
            }
            (Value::Literal(a), Value::Literal(b)) => a.literal() == b.literal(),
            _ => false,
        }
    }
}

impl From<LiteralValue> for Value {
    fn from(lit: LiteralValue) -> Self {
        Value::Literal(lit)
    }
}

/// Pairwise content equality of two ordered value lists.
pub fn same_values(a: &[Value], b: &[Value]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.same_content(y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::EntityGraph;
    use rde_rdf::MemoryStore;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn missing_token_is_generated_and_unique() {
        let a = LiteralValue::new("same", None, None, None);
        let b = LiteralValue::new("same", None, None, None);
        assert!(!a.id().is_empty());
        assert_ne!(a.id(), b.id());
        assert!(Value::from(a.clone()).same_content(&Value::from(b.clone())));
        assert_ne!(a, b);
    }

    #[test]
    fn supplied_token_is_kept_through_edits() {
        let a = LiteralValue::new("old", Some("en".to_string()), None, Some("tok".to_string()));
        let edited = a.with_lexical("new");
        assert_eq!(edited.id(), "tok");
        assert_eq!(edited.lexical(), "new");
        assert_eq!(edited.language(), Some("en"));
        assert_eq!(edited.clone().id(), "tok");
    }

    #[test]
    fn injected_generator_is_used() {
        let counter = AtomicUsize::new(0);
        let generator = move || format!("lit-{}", counter.fetch_add(1, Ordering::SeqCst));
        let a = LiteralValue::with_generator(Literal::plain("x"), None, &generator);
        let b = LiteralValue::with_generator(Literal::plain("x"), Some(String::new()), &generator);
        assert_eq!(a.id(), "lit-0");
        assert_eq!(b.id(), "lit-1");
    }

    #[test]
    fn numeric_literals_parse() {
        let n = LiteralValue::new(" 12.5 ", None, None, None);
        assert_eq!(n.as_number(), Some(12.5));
        assert_eq!(LiteralValue::new("abc", None, None, None).as_number(), None);
    }

    #[test]
    fn placeholder_detection() {
        let g = EntityGraph::new(Arc::new(MemoryStore::new()), "http://example.org/W1");
        assert!(g.subject(PLACEHOLDER_URI).is_placeholder());
        assert!(g.labeled("").is_placeholder());
        assert!(!g.subject("http://example.org/P1").is_placeholder());
        assert!(!Value::from(LiteralValue::new("", None, None, None)).is_placeholder());
    }
}
