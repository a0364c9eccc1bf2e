//! Normalized resource records shared by the bundled providers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use iacnorm_core::NormalizedTree;

/// One resource found in an IaC source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceConfig {
    /// Unique within a scan, e.g. `aws_s3_bucket.logs`.
    pub id: String,
    pub name: String,
    /// File the resource was read from.
    pub source: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    pub config: Value,
}

/// Resource records grouped by resource type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceConfigs {
    by_type: BTreeMap<String, Vec<ResourceConfig>>,
}

impl ResourceConfigs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, resource: ResourceConfig) {
        self.by_type
            .entry(resource.resource_type.clone())
            .or_default()
            .push(resource);
    }

    /// Append all records of `other`, keeping their order.
    pub fn merge(&mut self, other: ResourceConfigs) {
        for (resource_type, resources) in other.by_type {
            self.by_type.entry(resource_type).or_default().extend(resources);
        }
    }

    pub fn get(&self, resource_type: &str) -> &[ResourceConfig] {
        self.by_type
            .get(resource_type)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Total number of records.
    pub fn len(&self) -> usize {
        self.by_type.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_tree(self) -> serde_json::Result<NormalizedTree> {
        serde_json::to_value(self.by_type)
    }
}
