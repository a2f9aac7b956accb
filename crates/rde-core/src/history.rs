//! Undo/redo log of edits, one log per root entity.
//!
//! A log is an ordered list of [`HistoryEntry`]. Two markers shape it:
//!
//! - `all_values_loaded` flags the point where loading finished; undo never
//!   goes past it.
//! - `undone` flags entries that were rolled back but are kept for redo.
//!   Undone entries always form a suffix of the log, because any new edit
//!   drops them before being recorded.
//!
//! The store does no locking. Callers that share one across the process must
//! keep a single writer per entity key.

use crate::state::{HistoryMode, PropertyValues};
use crate::value::Value;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HistoryError {
    #[error("subject {target} is recorded under two properties: {existing} and {conflicting}")]
    AmbiguousParentPath {
        target: String,
        existing: String,
        conflicting: String,
    },
    #[error("subject {target} is its own ancestor in the recorded history")]
    CyclicParentPath { target: String },
}

/// One recorded edit, or a bare marker.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    /// qualified subject name -> property URI -> values after the edit
    pub changes: BTreeMap<String, PropertyValues>,
    /// Alternating `[subject, property, ...]` hops from the root to the
    /// edited subject, for edits below the root.
    pub parent_path: Option<Vec<String>>,
    pub all_values_loaded: bool,
    pub undone: bool,
    pub recorded_at: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn edit(subject: &str, property: &str, values: Vec<Value>) -> Self {
        let mut props = PropertyValues::new();
        props.insert(property.to_string(), values);
        let mut changes = BTreeMap::new();
        changes.insert(subject.to_string(), props);
        Self {
            changes,
            parent_path: None,
            all_values_loaded: false,
            undone: false,
            recorded_at: Utc::now(),
        }
    }

    pub fn loaded_marker() -> Self {
        Self {
            changes: BTreeMap::new(),
            parent_path: None,
            all_values_loaded: true,
            undone: false,
            recorded_at: Utc::now(),
        }
    }

    pub fn is_marker(&self) -> bool {
        self.changes.is_empty()
    }
}

/// Position summary a UI uses to enable undo/redo controls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HistoryStatus {
    /// Index of the last entry.
    pub top: Option<usize>,
    /// Index of the first "all values loaded" marker.
    pub first: Option<usize>,
    /// Index just before the first trailing undone entry.
    pub current: Option<usize>,
    /// Number of trailing undone entries.
    pub undone: usize,
    /// Newest applied edit past the first marker; what `undo` would flag.
    pub undoable: Option<usize>,
}

impl HistoryStatus {
    pub fn is_empty(&self) -> bool {
        self.top.is_none()
    }

    /// Index of the newest entry that is still applied.
    pub fn active(&self) -> Option<usize> {
        if self.undone > 0 {
            self.current
        } else {
            self.top
        }
    }

    pub fn can_undo(&self) -> bool {
        self.undoable.is_some()
    }

    pub fn can_redo(&self) -> bool {
        self.undone > 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// Single placeholder value; nothing recorded.
    Skipped,
    /// History is suppressed for the session; nothing recorded.
    Suppressed,
    Appended(usize),
    Inserted(usize),
}

#[derive(Debug, Default)]
pub struct HistoryStore {
    logs: HashMap<String, Vec<HistoryEntry>>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty log for `entity` if none exists.
    pub fn open(&mut self, entity: &str) {
        self.logs.entry(entity.to_string()).or_default();
    }

    /// Drop the log of an entity whose editing session ended.
    pub fn evict(&mut self, entity: &str) -> Option<Vec<HistoryEntry>> {
        let evicted = self.logs.remove(entity);
        if let Some(log) = &evicted {
            tracing::debug!(entity, entries = log.len(), "evicted history log");
        }
        evicted
    }

    pub fn contains(&self, entity: &str) -> bool {
        self.logs.contains_key(entity)
    }

    pub fn entries(&self, entity: &str) -> &[HistoryEntry] {
        self.logs.get(entity).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Append the "all values loaded" marker. Like an edit, it discards
    /// any redo branch.
    pub fn mark_all_values_loaded(&mut self, entity: &str) -> usize {
        let log = self.logs.entry(entity.to_string()).or_default();
        log.truncate(log.len() - trailing_undone(log));
        log.push(HistoryEntry::loaded_marker());
        log.len() - 1
    }

    /// Record the new values of `(affected, property)` in `entity`'s log.
    ///
    /// A lone placeholder value is skipped and leaves the log untouched.
    /// Otherwise trailing undone entries are discarded first, then the entry
    /// is appended, or placed before the load marker for
    /// [`HistoryMode::InsertBeforeLoaded`].
    pub fn record(
        &mut self,
        entity: &str,
        affected: &str,
        property: &str,
        values: Vec<Value>,
        mode: HistoryMode,
    ) -> Result<RecordOutcome, HistoryError> {
        if let [only] = values.as_slice() {
            if only.is_placeholder() {
                tracing::debug!(entity, affected, property, "skipping placeholder edit");
                return Ok(RecordOutcome::Skipped);
            }
        }

        let active = self.entries(entity);
        let active = &active[..active.len() - trailing_undone(active)];

        let mut entry = HistoryEntry::edit(affected, property, values);
        if affected != entity {
            entry.parent_path = Some(resolve_parent_path(active, entity, affected, &mut Vec::new())?);
        }

        let log = self.logs.entry(entity.to_string()).or_default();
        let dropped = trailing_undone(log);
        if dropped > 0 {
            log.truncate(log.len() - dropped);
            tracing::debug!(entity, dropped, "discarded redo branch");
        }

        if mode == HistoryMode::InsertBeforeLoaded {
            if let Some(pos) = log.iter().position(|e| e.all_values_loaded).filter(|p| *p > 0) {
                log.insert(pos, entry);
                tracing::debug!(entity, pos, "recorded edit before load marker");
                return Ok(RecordOutcome::Inserted(pos));
            }
        }

        log.push(entry);
        Ok(RecordOutcome::Appended(log.len() - 1))
    }

    pub fn status(&self, entity: &str) -> HistoryStatus {
        let log = self.entries(entity);
        let Some(top) = log.len().checked_sub(1) else {
            return HistoryStatus::default();
        };

        let mut status = HistoryStatus {
            top: Some(top),
            ..HistoryStatus::default()
        };
        let mut seen_undone = false;
        for (i, entry) in log.iter().enumerate() {
            if status.first.is_none() && entry.all_values_loaded {
                status.first = Some(i);
            }
            if !seen_undone && entry.undone {
                seen_undone = true;
                status.current = i.checked_sub(1);
                status.undone = log.len() - i;
            }
            if status.first.is_some() && seen_undone {
                break;
            }
        }

        // Marker-only entries carry nothing to roll back.
        let floor = status.first.map_or(0, |first| first + 1);
        status.undoable = status
            .active()
            .and_then(|active| (floor..=active).rev().find(|&i| !log[i].is_marker()));
        status
    }

    /// Chain of `[subject, property, ...]` hops leading from `entity` down to
    /// `target` (a URI or qualified name), as recorded in the log.
    pub fn parent_path(&self, entity: &str, target: &str) -> Result<Vec<String>, HistoryError> {
        resolve_parent_path(self.entries(entity), entity, target, &mut Vec::new())
    }

    /// Flag the newest applied edit as undone and return its index. Later
    /// markers are flagged with it. Never crosses the first load marker.
    pub fn undo(&mut self, entity: &str) -> Option<usize> {
        let status = self.status(entity);
        let (index, active) = (status.undoable?, status.active()?);
        for entry in &mut self.logs.get_mut(entity)?[index..=active] {
            entry.undone = true;
        }
        Some(index)
    }

    /// Re-apply the oldest undone edit, along with the markers that follow it.
    pub fn redo(&mut self, entity: &str) -> Option<usize> {
        let status = self.status(entity);
        if !status.can_redo() {
            return None;
        }
        let log = self.logs.get_mut(entity)?;
        let index = log.len() - status.undone;
        let end = log[index + 1..]
            .iter()
            .position(|e| !e.is_marker())
            .map_or(log.len(), |p| index + 1 + p);
        for entry in &mut log[index..end] {
            entry.undone = false;
        }
        Some(index)
    }
}

fn trailing_undone(log: &[HistoryEntry]) -> usize {
    log.iter().rev().take_while(|e| e.undone).count()
}

fn resolve_parent_path(
    log: &[HistoryEntry],
    entity: &str,
    target: &str,
    visiting: &mut Vec<String>,
) -> Result<Vec<String>, HistoryError> {
    if target == entity {
        return Ok(Vec::new());
    }
    if visiting.iter().any(|v| v == target) {
        return Err(HistoryError::CyclicParentPath {
            target: target.to_string(),
        });
    }
    visiting.push(target.to_string());

    let mut found: Option<Vec<String>> = None;
    for entry in log {
        for (container, props) in &entry.changes {
            for (property, values) in props {
                if !values.iter().any(|v| v.refers_to_subject(target)) {
                    continue;
                }
                if let Some(path) = &found {
                    let (known_container, known_property) = (&path[path.len() - 2], &path[path.len() - 1]);
                    if known_property != property {
                        return Err(HistoryError::AmbiguousParentPath {
                            target: target.to_string(),
                            existing: known_property.clone(),
                            conflicting: property.clone(),
                        });
                    }
                    if known_container == container {
                        continue;
                    }
                }
                // Later entries win when a subject moved to another container.
                let mut path = if container == entity {
                    Vec::new()
                } else {
                    resolve_parent_path(log, entity, container, visiting)?
                };
                path.push(container.clone());
                path.push(property.clone());
                found = Some(path);
            }
        }
    }

    visiting.pop();
    Ok(found.unwrap_or_default())
}
