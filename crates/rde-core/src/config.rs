//! Display configuration for an [`EntityGraph`](crate::EntityGraph).

use rde_rdf::ns::{default_description_properties, default_label_properties, default_prefixes};
use rde_rdf::PrefixMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid entity graph config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Missing fields fall back to the built-in defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityGraphConfig {
    /// prefix -> namespace URI
    pub prefixes: BTreeMap<String, String>,
    /// Label properties, in lookup priority order.
    pub label_properties: Vec<String>,
    pub description_properties: Vec<String>,
}

impl Default for EntityGraphConfig {
    fn default() -> Self {
        Self {
            prefixes: default_prefixes(),
            label_properties: default_label_properties(),
            description_properties: default_description_properties(),
        }
    }
}

impl EntityGraphConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn prefix_map(&self) -> PrefixMap {
        PrefixMap::new(self.prefixes.clone())
    }
}
