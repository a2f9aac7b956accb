//! Single-step property paths: direct, inverse (`^p`) or list-valued (`p[]`).

use rde_rdf::ns::SH_INVERSE_PATH;
use rde_rdf::{GraphStore, Node, Term};
use std::fmt;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PathError {
    #[error("too many inverse paths for {predicate}: {}", .inverse_paths.join(", "))]
    AmbiguousPath {
        predicate: String,
        inverse_paths: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    path_string: String,
    direct_path_node: Option<Node>,
    inverse_path_node: Option<Node>,
}

impl Path {
    /// Classify `node` as a direct or inverse path using its
    /// `sh:inversePath` declarations in `store`.
    ///
    /// `list_mode` appends `[]` to direct paths that address an ordered list.
    pub fn new(node: &Node, store: &dyn GraphStore, list_mode: bool) -> Result<Self, PathError> {
        let inverse: Vec<Node> = store
            .each(Some(node), Some(SH_INVERSE_PATH), None)
            .into_iter()
            .filter_map(Term::into_node)
            .collect();

        match inverse.as_slice() {
            [] => {
                let mut path_string = node.value().to_string();
                if list_mode {
                    path_string.push_str("[]");
                }
                Ok(Self {
                    path_string,
                    direct_path_node: Some(node.clone()),
                    inverse_path_node: None,
                })
            }
            [target] => Ok(Self {
                path_string: format!("^{}", target.value()),
                direct_path_node: None,
                inverse_path_node: Some(target.clone()),
            }),
            many => {
                let inverse_paths: Vec<String> = many.iter().map(|n| n.value().to_string()).collect();
                tracing::warn!(predicate = node.value(), ?inverse_paths, "ambiguous inverse path");
                Err(PathError::AmbiguousPath {
                    predicate: node.value().to_string(),
                    inverse_paths,
                })
            }
        }
    }

    /// Canonical path string used for display and query construction.
    pub fn path_string(&self) -> &str {
        &self.path_string
    }

    pub fn direct_path_node(&self) -> Option<&Node> {
        self.direct_path_node.as_ref()
    }

    pub fn inverse_path_node(&self) -> Option<&Node> {
        self.inverse_path_node.as_ref()
    }

    pub fn is_inverse(&self) -> bool {
        self.inverse_path_node.is_some()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path_string)
    }
}
