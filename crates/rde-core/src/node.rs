//! Node-backed references and the display fields derived from them.

use crate::graph::GraphContext;
use rde_rdf::{Literal, Node, Term};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Read accessors shared by every node-backed value.
pub trait Resource {
    fn id(&self) -> &str;
    fn local_name(&self) -> String;
    fn namespace(&self) -> String;
    fn qualified_name(&self) -> String;
    fn is_collection(&self) -> bool;
}

/// Identity wrapper around a graph node, bound to the graph it was read from.
///
/// Equality and hashing only consider the node. Display fields are computed
/// on every call through the graph's current resolver.
#[derive(Clone)]
pub struct GraphNodeRef {
    node: Node,
    context: Arc<GraphContext>,
}

impl GraphNodeRef {
    pub(crate) fn new(node: Node, context: Arc<GraphContext>) -> Self {
        Self { node, context }
    }

    pub fn node(&self) -> &Node {
        &self.node
    }

    pub fn value(&self) -> &str {
        self.node.value()
    }

    pub fn uri(&self) -> &str {
        self.node.value()
    }

    pub(crate) fn context(&self) -> &Arc<GraphContext> {
        &self.context
    }

    /// Label literals, in label-property priority order.
    ///
    /// The main store wins; the secondary store is only consulted when the
    /// main store has no label at all.
    pub fn labels(&self) -> Vec<Literal> {
        self.literals_for(self.context.label_properties())
    }

    pub fn descriptions(&self) -> Vec<Literal> {
        self.literals_for(self.context.description_properties())
    }

    /// Label matching `lang`, falling back to the first label.
    pub fn label(&self, lang: Option<&str>) -> Option<Literal> {
        let labels = self.labels();
        lang.and_then(|lang| {
            labels
                .iter()
                .find(|l| l.language.as_deref() == Some(lang))
                .cloned()
        })
        .or_else(|| labels.into_iter().next())
    }

    fn literals_for(&self, properties: &[String]) -> Vec<Literal> {
        let collect = |store: &dyn rde_rdf::GraphStore| -> Vec<Literal> {
            properties
                .iter()
                .flat_map(|p| store.each(Some(&self.node), Some(p.as_str()), None))
                .filter_map(Term::into_literal)
                .collect()
        };

        let found = collect(self.context.store().as_ref());
        if !found.is_empty() {
            return found;
        }
        match self.context.connex_graph() {
            Some(connex) => collect(connex.as_ref()),
            None => Vec::new(),
        }
    }
}

impl Resource for GraphNodeRef {
    fn id(&self) -> &str {
        self.node.value()
    }

    fn local_name(&self) -> String {
        self.context.resolver().local_name(self.node.value())
    }

    fn namespace(&self) -> String {
        self.context.resolver().namespace(self.node.value())
    }

    fn qualified_name(&self) -> String {
        self.context.resolver().qualified_name(self.node.value())
    }

    fn is_collection(&self) -> bool {
        self.node.is_collection()
    }
}

impl PartialEq for GraphNodeRef {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node
    }
}

impl Eq for GraphNodeRef {}

impl Hash for GraphNodeRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.node.hash(state);
    }
}

impl fmt::Debug for GraphNodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("GraphNodeRef").field(&self.node).finish()
    }
}
