//! Well-known vocabularies and prefix-based namespace resolution.

use std::collections::BTreeMap;

pub const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const RDFS_NS: &str = "http://www.w3.org/2000/01/rdf-schema#";
pub const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema#";
pub const OWL_NS: &str = "http://www.w3.org/2002/07/owl#";
pub const SKOS_NS: &str = "http://www.w3.org/2004/02/skos/core#";
pub const SH_NS: &str = "http://www.w3.org/ns/shacl#";

pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
pub const RDF_FIRST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#first";
pub const RDF_REST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#rest";
pub const RDF_NIL: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil";
pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
pub const RDFS_COMMENT: &str = "http://www.w3.org/2000/01/rdf-schema#comment";
pub const SKOS_PREF_LABEL: &str = "http://www.w3.org/2004/02/skos/core#prefLabel";
pub const SKOS_DEFINITION: &str = "http://www.w3.org/2004/02/skos/core#definition";
pub const SH_PATH: &str = "http://www.w3.org/ns/shacl#path";
pub const SH_INVERSE_PATH: &str = "http://www.w3.org/ns/shacl#inversePath";
pub const SH_PROPERTY: &str = "http://www.w3.org/ns/shacl#property";

/// Label properties, in lookup priority order.
pub fn default_label_properties() -> Vec<String> {
    vec![SKOS_PREF_LABEL.to_string(), RDFS_LABEL.to_string()]
}

pub fn default_description_properties() -> Vec<String> {
    vec![SKOS_DEFINITION.to_string(), RDFS_COMMENT.to_string()]
}

pub fn default_prefixes() -> BTreeMap<String, String> {
    [
        ("rdf", RDF_NS),
        ("rdfs", RDFS_NS),
        ("xsd", XSD_NS),
        ("owl", OWL_NS),
        ("skos", SKOS_NS),
        ("sh", SH_NS),
    ]
    .into_iter()
    .map(|(p, ns)| (p.to_string(), ns.to_string()))
    .collect()
}

/// Turns full URIs into display forms.
///
/// Implementations must be pure string functions; callers recompute on every
/// access instead of caching.
pub trait NamespaceResolver: Send + Sync {
    fn local_name(&self, uri: &str) -> String;
    fn namespace(&self, uri: &str) -> String;
    fn qualified_name(&self, uri: &str) -> String;
}

/// Fallback split point for URIs without a registered prefix.
fn split_index(uri: &str) -> usize {
    uri.rfind(['#', '/']).map(|i| i + 1).unwrap_or(0)
}

#[derive(Debug, Clone)]
pub struct PrefixMap {
    /// prefix -> namespace URI
    prefixes: BTreeMap<String, String>,
}

impl Default for PrefixMap {
    fn default() -> Self {
        Self {
            prefixes: default_prefixes(),
        }
    }
}

impl PrefixMap {
    pub fn new(prefixes: BTreeMap<String, String>) -> Self {
        Self { prefixes }
    }

    pub fn with_prefix(mut self, prefix: &str, namespace: &str) -> Self {
        self.prefixes
            .insert(prefix.to_string(), namespace.to_string());
        self
    }

    pub fn prefixes(&self) -> &BTreeMap<String, String> {
        &self.prefixes
    }

    /// Longest registered namespace that `uri` starts with.
    fn lookup(&self, uri: &str) -> Option<(&str, &str)> {
        self.prefixes
            .iter()
            .filter(|(_, ns)| !ns.is_empty() && uri.starts_with(ns.as_str()))
            .max_by_key(|(_, ns)| ns.len())
            .map(|(prefix, ns)| (prefix.as_str(), ns.as_str()))
    }

    /// Expand `prefix:local` back into a full URI.
    pub fn expand(&self, qname: &str) -> Option<String> {
        let (prefix, local) = qname.split_once(':')?;
        self.prefixes.get(prefix).map(|ns| format!("{ns}{local}"))
    }
}

impl NamespaceResolver for PrefixMap {
    fn local_name(&self, uri: &str) -> String {
        match self.lookup(uri) {
            Some((_, ns)) => uri[ns.len()..].to_string(),
            None => uri[split_index(uri)..].to_string(),
        }
    }

    fn namespace(&self, uri: &str) -> String {
        match self.lookup(uri) {
            Some((_, ns)) => ns.to_string(),
            None => uri[..split_index(uri)].to_string(),
        }
    }

    fn qualified_name(&self, uri: &str) -> String {
        match self.lookup(uri) {
            Some((prefix, ns)) => format!("{prefix}:{}", &uri[ns.len()..]),
            None => uri.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualified_name_uses_longest_namespace() {
        let map = PrefixMap::default()
            .with_prefix("ex", "http://example.org/")
            .with_prefix("exp", "http://example.org/person/");
        assert_eq!(
            map.qualified_name("http://example.org/person/P1"),
            "exp:P1"
        );
        assert_eq!(map.qualified_name("http://example.org/W1"), "ex:W1");
        assert_eq!(map.qualified_name(RDFS_LABEL), "rdfs:label");
    }

    #[test]
    fn unknown_namespace_falls_back_to_uri_split() {
        let map = PrefixMap::default();
        let uri = "http://unknown.org/onto#Thing";
        assert_eq!(map.qualified_name(uri), uri);
        assert_eq!(map.local_name(uri), "Thing");
        assert_eq!(map.namespace(uri), "http://unknown.org/onto#");
    }

    #[test]
    fn expand_round_trips_registered_prefix() {
        let map = PrefixMap::default();
        assert_eq!(map.expand("sh:path").as_deref(), Some(SH_PATH));
        assert_eq!(map.expand("nope:x"), None);
    }
}
