//! Per-session editing state: the as-loaded snapshot and the live values.

use crate::value::{same_values, Value};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use uuid::Uuid;

/// property URI -> ordered values
pub type PropertyValues = BTreeMap<String, Vec<Value>>;
/// subject URI -> its property values
pub type SubjectProperties = BTreeMap<String, PropertyValues>;

/// How edits made through an [`EntityGraph`](crate::EntityGraph) reach the history log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryMode {
    #[default]
    Record,
    /// Edits are applied but never recorded.
    Suppress,
    /// Edits are recorded in front of the "all values loaded" marker, so
    /// late-arriving load-time values land on the baseline side of it.
    InsertBeforeLoaded,
}

#[derive(Debug, Clone)]
pub struct EntityGraphState {
    subject_uri: String,
    baseline: SubjectProperties,
    current: SubjectProperties,
    session_token: Uuid,
    history_mode: HistoryMode,
}

impl EntityGraphState {
    pub fn new(subject_uri: impl Into<String>) -> Self {
        Self {
            subject_uri: subject_uri.into(),
            baseline: SubjectProperties::new(),
            current: SubjectProperties::new(),
            session_token: Uuid::new_v4(),
            history_mode: HistoryMode::Record,
        }
    }

    pub fn subject_uri(&self) -> &str {
        &self.subject_uri
    }

    pub fn session_token(&self) -> Uuid {
        self.session_token
    }

    pub fn history_mode(&self) -> HistoryMode {
        self.history_mode
    }

    pub fn set_history_mode(&mut self, mode: HistoryMode) {
        self.history_mode = mode;
    }

    /// Seed both snapshots for a slot from the store.
    ///
    /// A slot's baseline is written once; returns `false` and leaves both
    /// maps untouched if it was already loaded.
    pub fn load_baseline(&mut self, subject: &str, property: &str, values: Vec<Value>) -> bool {
        match self
            .baseline
            .entry(subject.to_string())
            .or_default()
            .entry(property.to_string())
        {
            Entry::Occupied(_) => {
                tracing::warn!(subject, property, "baseline already loaded; ignoring reload");
                return false;
            }
            Entry::Vacant(slot) => {
                slot.insert(values.clone());
            }
        }
        self.current
            .entry(subject.to_string())
            .or_default()
            .insert(property.to_string(), values);
        true
    }

    /// Replace the live values of a slot. An empty list means "no values";
    /// the key is kept.
    pub fn set_values(&mut self, subject: &str, property: &str, values: Vec<Value>) {
        self.current
            .entry(subject.to_string())
            .or_default()
            .insert(property.to_string(), values);
    }

    pub fn values(&self, subject: &str, property: &str) -> Option<&[Value]> {
        self.current
            .get(subject)
            .and_then(|props| props.get(property))
            .map(Vec::as_slice)
    }

    pub fn baseline_values(&self, subject: &str, property: &str) -> Option<&[Value]> {
        self.baseline
            .get(subject)
            .and_then(|props| props.get(property))
            .map(Vec::as_slice)
    }

    pub fn current_properties(&self) -> &SubjectProperties {
        &self.current
    }

    pub fn baseline_properties(&self) -> &SubjectProperties {
        &self.baseline
    }

    pub fn is_modified(&self, subject: &str, property: &str) -> bool {
        let current = self.values(subject, property).unwrap_or(&[]);
        let baseline = self.baseline_values(subject, property).unwrap_or(&[]);
        !same_values(current, baseline)
    }

    /// `(subject, property)` slots whose live values differ from the baseline.
    pub fn modified_properties(&self) -> Vec<(String, String)> {
        self.current
            .iter()
            .flat_map(|(subject, props)| {
                props
                    .keys()
                    .map(move |property| (subject.clone(), property.clone()))
            })
            .filter(|(subject, property)| self.is_modified(subject, property))
            .collect()
    }
}
