//! The entity being edited: store handles, display settings and session state.

use crate::config::EntityGraphConfig;
use crate::history::{HistoryError, HistoryStore, RecordOutcome};
use crate::node::{GraphNodeRef, Resource};
use crate::state::{EntityGraphState, HistoryMode};
use crate::value::Value;
use parking_lot::RwLock;
use rde_rdf::ns::{default_description_properties, default_label_properties};
use rde_rdf::{GraphStore, NamespaceResolver, Node, PrefixMap};
use std::sync::{Arc, OnceLock};

/// Everything a [`GraphNodeRef`] needs to derive its display fields.
///
/// Shared by every node ref handed out by one [`EntityGraph`], so replacing
/// the resolver is visible to all of them.
pub struct GraphContext {
    store: Arc<dyn GraphStore>,
    connex_graph: Option<Arc<dyn GraphStore>>,
    resolver: RwLock<Arc<dyn NamespaceResolver>>,
    label_properties: Vec<String>,
    description_properties: Vec<String>,
}

impl GraphContext {
    pub fn store(&self) -> &Arc<dyn GraphStore> {
        &self.store
    }

    /// Secondary store holding labels of referenced out-of-scope resources.
    pub fn connex_graph(&self) -> Option<&Arc<dyn GraphStore>> {
        self.connex_graph.as_ref()
    }

    pub fn resolver(&self) -> Arc<dyn NamespaceResolver> {
        self.resolver.read().clone()
    }

    pub fn label_properties(&self) -> &[String] {
        &self.label_properties
    }

    pub fn description_properties(&self) -> &[String] {
        &self.description_properties
    }
}

pub struct EntityGraphBuilder {
    store: Arc<dyn GraphStore>,
    top_subject_uri: String,
    connex_graph: Option<Arc<dyn GraphStore>>,
    resolver: Arc<dyn NamespaceResolver>,
    label_properties: Vec<String>,
    description_properties: Vec<String>,
}

impl EntityGraphBuilder {
    pub fn connex_graph(mut self, store: Arc<dyn GraphStore>) -> Self {
        self.connex_graph = Some(store);
        self
    }

    pub fn resolver(mut self, resolver: Arc<dyn NamespaceResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn label_properties(mut self, properties: Vec<String>) -> Self {
        self.label_properties = properties;
        self
    }

    pub fn description_properties(mut self, properties: Vec<String>) -> Self {
        self.description_properties = properties;
        self
    }

    pub fn build(self) -> EntityGraph {
        EntityGraph {
            context: Arc::new(GraphContext {
                store: self.store,
                connex_graph: self.connex_graph,
                resolver: RwLock::new(self.resolver),
                label_properties: self.label_properties,
                description_properties: self.description_properties,
            }),
            top_subject_uri: self.top_subject_uri,
            state: OnceLock::new(),
        }
    }
}

/// Read-only handle over an entity being edited.
///
/// The handle itself never changes after construction; the session state it
/// points to is a separate shared allocation that stays mutable.
pub struct EntityGraph {
    context: Arc<GraphContext>,
    /// Where tree reconstruction starts.
    top_subject_uri: String,
    state: OnceLock<Arc<RwLock<EntityGraphState>>>,
}

impl EntityGraph {
    pub fn builder(store: Arc<dyn GraphStore>, top_subject_uri: impl Into<String>) -> EntityGraphBuilder {
        EntityGraphBuilder {
            store,
            top_subject_uri: top_subject_uri.into(),
            connex_graph: None,
            resolver: Arc::new(PrefixMap::default()),
            label_properties: default_label_properties(),
            description_properties: default_description_properties(),
        }
    }

    pub fn new(store: Arc<dyn GraphStore>, top_subject_uri: impl Into<String>) -> Self {
        Self::builder(store, top_subject_uri).build()
    }

    pub fn with_config(
        store: Arc<dyn GraphStore>,
        top_subject_uri: impl Into<String>,
        config: &EntityGraphConfig,
    ) -> Self {
        Self::builder(store, top_subject_uri)
            .resolver(Arc::new(config.prefix_map()))
            .label_properties(config.label_properties.clone())
            .description_properties(config.description_properties.clone())
            .build()
    }

    /// Session state, created on first access. Every call returns the same
    /// allocation.
    pub fn state(&self) -> Arc<RwLock<EntityGraphState>> {
        self.state
            .get_or_init(|| {
                Arc::new(RwLock::new(EntityGraphState::new(
                    self.top_subject_uri.clone(),
                )))
            })
            .clone()
    }

    pub fn context(&self) -> &Arc<GraphContext> {
        &self.context
    }

    pub fn store(&self) -> &Arc<dyn GraphStore> {
        self.context.store()
    }

    pub fn connex_graph(&self) -> Option<&Arc<dyn GraphStore>> {
        self.context.connex_graph()
    }

    pub fn top_subject_uri(&self) -> &str {
        &self.top_subject_uri
    }

    /// Key of this entity's history log: the root URI, which survives
    /// [`set_resolver`](Self::set_resolver).
    pub fn entity_key(&self) -> String {
        self.top_subject_uri.clone()
    }

    /// Swap the resolver for this graph and every node ref it produced.
    pub fn set_resolver(&self, resolver: Arc<dyn NamespaceResolver>) {
        *self.context.resolver.write() = resolver;
    }

    pub fn node_ref(&self, node: Node) -> GraphNodeRef {
        GraphNodeRef::new(node, self.context.clone())
    }

    pub fn top_subject(&self) -> GraphNodeRef {
        self.node_ref(Node::iri(self.top_subject_uri.clone()))
    }

    pub fn subject(&self, uri: impl Into<String>) -> Value {
        Value::Subject(self.node_ref(Node::Iri(uri.into())))
    }

    pub fn labeled(&self, uri: impl Into<String>) -> Value {
        Value::Labeled(self.node_ref(Node::Iri(uri.into())))
    }

    /// Apply a UI edit to the live values of `(subject, property)` and record
    /// it in `history` according to the session's [`HistoryMode`].
    ///
    /// Both the state and the log are keyed by URI.
    ///
    /// On error neither the state nor the log is modified.
    pub fn edit(
        &self,
        history: &mut HistoryStore,
        subject: &GraphNodeRef,
        property: &str,
        values: Vec<Value>,
    ) -> Result<RecordOutcome, HistoryError> {
        let state = self.state();
        let mode = state.read().history_mode();

        let outcome = match mode {
            HistoryMode::Suppress => RecordOutcome::Suppressed,
            mode => history.record(
                &self.entity_key(),
                subject.id(),
                property,
                values.clone(),
                mode,
            )?,
        };
        state.write().set_values(subject.id(), property, values);
        Ok(outcome)
    }

    /// [`HistoryStore::parent_path`] for this entity, with subject hops shown
    /// as qualified names under the current resolver.
    pub fn parent_path(&self, history: &HistoryStore, target: &str) -> Result<Vec<String>, HistoryError> {
        let resolver = self.context.resolver();
        let mut path = history.parent_path(&self.entity_key(), target)?;
        for subject in path.iter_mut().step_by(2) {
            *subject = resolver.qualified_name(subject.as_str());
        }
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::LiteralValue;
    use rde_rdf::MemoryStore;

    const EX: &str = "http://example.org/";

    fn graph() -> EntityGraph {
        EntityGraph::builder(Arc::new(MemoryStore::new()), format!("{EX}W1"))
            .resolver(Arc::new(PrefixMap::default().with_prefix("ex", EX)))
            .build()
    }

    fn lit(s: &str) -> Value {
        Value::from(LiteralValue::new(s, None, None, None))
    }

    #[test]
    fn state_is_created_once() {
        let g = graph();
        let a = g.state();
        let b = g.state();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.read().subject_uri(), "http://example.org/W1");
    }

    #[test]
    fn edit_updates_state_and_history() {
        let g = graph();
        let mut history = HistoryStore::new();
        let root = g.top_subject();

        let outcome = g
            .edit(&mut history, &root, &format!("{EX}title"), vec![lit("t")])
            .unwrap();
        assert_eq!(outcome, RecordOutcome::Appended(0));
        assert_eq!(g.entity_key(), format!("{EX}W1"));
        assert_eq!(history.entries(&g.entity_key()).len(), 1);

        let state = g.state();
        let guard = state.read();
        let values = guard.values(&format!("{EX}W1"), &format!("{EX}title")).unwrap();
        assert_eq!(values[0].display_value(), "t");
    }

    #[test]
    fn suppressed_edits_skip_history() {
        let g = graph();
        let mut history = HistoryStore::new();
        g.state().write().set_history_mode(HistoryMode::Suppress);

        let outcome = g
            .edit(&mut history, &g.top_subject(), "p", vec![lit("x")])
            .unwrap();
        assert_eq!(outcome, RecordOutcome::Suppressed);
        assert!(history.entries(&g.entity_key()).is_empty());
        assert!(g.state().read().values(g.top_subject_uri(), "p").is_some());
    }

    #[test]
    fn placeholder_edit_updates_state_only() {
        let g = graph();
        let mut history = HistoryStore::new();
        let outcome = g
            .edit(&mut history, &g.top_subject(), "p", vec![g.subject("tmp:uri")])
            .unwrap();
        assert_eq!(outcome, RecordOutcome::Skipped);
        assert!(history.entries(&g.entity_key()).is_empty());
        assert_eq!(g.state().read().values(g.top_subject_uri(), "p").unwrap().len(), 1);
    }

    #[test]
    fn resolver_swap_keeps_one_log_per_session() {
        let g = graph();
        let mut history = HistoryStore::new();
        let root = g.top_subject();
        let creator = g.node_ref(Node::iri(format!("{EX}P1")));

        g.edit(&mut history, &root, &format!("{EX}creator"), vec![g.subject(format!("{EX}P1"))])
            .unwrap();
        assert_eq!(
            g.parent_path(&history, "ex:P1").unwrap(),
            vec!["ex:W1".to_string(), format!("{EX}creator")]
        );

        g.set_resolver(Arc::new(PrefixMap::default().with_prefix("e", EX)));
        g.edit(&mut history, &creator, &format!("{EX}name"), vec![lit("Nagarjuna")])
            .unwrap();

        let log = history.entries(&g.entity_key());
        assert_eq!(log.len(), 2);
        assert_eq!(
            log[1].parent_path.as_deref(),
            Some(&[format!("{EX}W1"), format!("{EX}creator")][..])
        );
        assert_eq!(history.status(&g.entity_key()).top, Some(1));
        assert_eq!(
            g.parent_path(&history, "e:P1").unwrap(),
            vec!["e:W1".to_string(), format!("{EX}creator")]
        );

        assert_eq!(history.undo(&g.entity_key()), Some(1));
        assert_eq!(history.undo(&g.entity_key()), Some(0));
    }
}
