//! Read-only views over SHACL shape nodes loaded into the graph's store.

use crate::graph::EntityGraph;
use crate::node::GraphNodeRef;
use crate::path::{Path, PathError};
use rde_rdf::ns::{RDFS_LABEL, SH_PATH, SH_PROPERTY};
use rde_rdf::{Literal, Term};

fn rdfs_labels(node: &GraphNodeRef) -> Vec<Literal> {
    node.context()
        .store()
        .each(Some(node.node()), Some(RDFS_LABEL), None)
        .into_iter()
        .filter_map(Term::into_literal)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyShape {
    node: GraphNodeRef,
}

impl PropertyShape {
    pub fn new(node: GraphNodeRef) -> Self {
        Self { node }
    }

    pub fn node(&self) -> &GraphNodeRef {
        &self.node
    }

    /// `rdfs:label` values of the shape itself.
    pub fn labels(&self) -> Vec<Literal> {
        rdfs_labels(&self.node)
    }

    /// The shape's `sh:path`, or `None` if it declares none.
    pub fn path(&self, list_mode: bool) -> Result<Option<Path>, PathError> {
        let store = self.node.context().store();
        let Some(target) = store
            .any(Some(self.node.node()), Some(SH_PATH), None)
            .and_then(Term::into_node)
        else {
            return Ok(None);
        };
        Path::new(&target, store.as_ref(), list_mode).map(Some)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeShape {
    node: GraphNodeRef,
}

impl NodeShape {
    pub fn new(node: GraphNodeRef) -> Self {
        Self { node }
    }

    pub fn node(&self) -> &GraphNodeRef {
        &self.node
    }

    pub fn labels(&self) -> Vec<Literal> {
        rdfs_labels(&self.node)
    }

    /// `sh:property` shapes, in store order.
    pub fn properties(&self, graph: &EntityGraph) -> Vec<PropertyShape> {
        graph
            .store()
            .each(Some(self.node.node()), Some(SH_PROPERTY), None)
            .into_iter()
            .filter_map(Term::into_node)
            .map(|n| PropertyShape::new(graph.node_ref(n)))
            .collect()
    }
}
