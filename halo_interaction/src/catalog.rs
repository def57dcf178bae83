// Copyright 2025 the Halo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node catalog: the label/tier lookup table the host populates before init.
//!
//! The host page injects one JSON object keyed by node id. Each entry carries the
//! label drawn by the chart and the node's tier; any other fields (plot sizes,
//! maturity, ...) are ignored.
//!
//! ```
//! use halo_interaction::catalog::NodeCatalog;
//!
//! let catalog = NodeCatalog::from_json(r#"{
//!     "DG": {"label": "Data Governance", "tier": "Foundational", "wrappedLabel": "Data<br>Governance"},
//!     "XX": {"tier": "Compilatory"}
//! }"#).unwrap();
//!
//! assert_eq!(catalog.len(), 1, "entries without a label are skipped");
//! assert_eq!(catalog.get("DG").unwrap().label_lines().collect::<Vec<_>>(), ["Data", "Governance"]);
//! ```

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

/// Label and tier of one node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeInfo {
    /// Label as drawn by the chart.
    pub label: String,
    /// Categorical tier; only used to style highlights.
    pub tier: String,
    /// Label with the chart's line breaks (`<br>` or `\n`), when known.
    pub wrapped_label: Option<String>,
}

impl NodeInfo {
    /// A node with the given label and tier.
    pub fn new(label: impl Into<String>, tier: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            tier: tier.into(),
            wrapped_label: None,
        }
    }

    /// Attach the wrapped form of the label.
    #[must_use]
    pub fn with_wrapped_label(mut self, wrapped: impl Into<String>) -> Self {
        self.wrapped_label = Some(wrapped.into());
        self
    }

    /// Non-empty lines of the wrapped label, or nothing if it is unknown.
    pub fn label_lines(&self) -> impl Iterator<Item = &str> {
        self.wrapped_label
            .as_deref()
            .into_iter()
            .flat_map(|w| w.split("<br>").flat_map(|l| l.split('\n')))
            .map(str::trim)
            .filter(|l| !l.is_empty())
    }
}

/// Errors raised while loading the host's node table.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The blob is not JSON at all.
    #[error("node table is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The blob is JSON but not an object keyed by node id.
    #[error("node table must be a JSON object keyed by node id, found {found}")]
    NotAnObject {
        /// JSON type found at the root.
        found: &'static str,
    },
}

#[derive(Deserialize)]
struct RawEntry {
    label: Option<String>,
    tier: Option<String>,
    #[serde(rename = "wrappedLabel")]
    wrapped_label: Option<String>,
}

/// Typed nodeId → [`NodeInfo`] mapping.
#[derive(Clone, Debug, Default)]
pub struct NodeCatalog {
    entries: BTreeMap<String, NodeInfo>,
}

impl NodeCatalog {
    /// An empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the host-injected node table.
    ///
    /// Entries that are malformed or lack a non-empty `label` or a `tier` are
    /// skipped with a warning; only a non-object root is an error.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let root: Value = serde_json::from_str(json)?;
        let Value::Object(map) = root else {
            return Err(CatalogError::NotAnObject {
                found: json_type(&root),
            });
        };
        let mut catalog = Self::new();
        for (id, value) in map {
            match serde_json::from_value::<RawEntry>(value) {
                Ok(RawEntry {
                    label: Some(label),
                    tier: Some(tier),
                    wrapped_label,
                }) if !label.trim().is_empty() => {
                    catalog.insert(
                        id,
                        NodeInfo {
                            label,
                            tier,
                            wrapped_label,
                        },
                    );
                }
                Ok(_) => tracing::warn!(node = %id, "skipping node entry without label or tier"),
                Err(error) => tracing::warn!(node = %id, %error, "skipping malformed node entry"),
            }
        }
        Ok(catalog)
    }

    /// Insert or replace an entry, returning the previous one.
    pub fn insert(&mut self, id: impl Into<String>, info: NodeInfo) -> Option<NodeInfo> {
        self.entries.insert(id.into(), info)
    }

    /// Look up a node.
    pub fn get(&self, id: &str) -> Option<&NodeInfo> {
        self.entries.get(id)
    }

    /// Whether the node is known.
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &NodeInfo)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>> FromIterator<(K, NodeInfo)> for NodeCatalog {
    fn from_iter<I: IntoIterator<Item = (K, NodeInfo)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

fn json_type(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
