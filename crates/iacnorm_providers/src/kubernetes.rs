//! Kubernetes manifest provider.

use std::path::Path;

use serde_json::Value;
use tracing::debug;

use iacnorm_core::{IacProvider, LoadResult, NormalizedTree};

use crate::loader::{self, FileOutcome, Mode};
use crate::records::{ResourceConfig, ResourceConfigs};

const SUFFIXES: &[&str] = &[".yaml", ".yml", ".json"];

/// Loads Kubernetes manifests. YAML streams may hold several documents,
/// and `kind: List` documents are expanded into their items.
#[derive(Debug, Clone, Default)]
pub struct KubernetesProvider;

impl KubernetesProvider {
    pub fn new() -> Self {
        Self
    }

    fn load_source(&self, path: &Path, mode: Mode) -> LoadResult<FileOutcome> {
        let content = loader::read_source(path)?;
        let documents = loader::parse_yaml_documents(path, &content)?;

        let source = loader::display_path(path);
        let mut records = ResourceConfigs::new();
        let mut skipped = Vec::new();

        for document in documents {
            let is_list = document.get("kind").and_then(Value::as_str) == Some("List");
            let items = if is_list {
                document
                    .get("items")
                    .and_then(Value::as_array)
                    .cloned()
                    .unwrap_or_default()
            } else {
                vec![document]
            };

            for item in items {
                match to_record(&item, &source) {
                    Ok(record) => records.push(record),
                    Err(reason) if mode == Mode::Lenient => {
                        debug!("Skipping document in {:?}: {}", path, reason);
                        skipped.push(reason);
                    }
                    Err(reason) => return Err(loader::parse_error(path, reason)),
                }
            }
        }

        if mode == Mode::Lenient && records.is_empty() {
            let reason = if skipped.is_empty() {
                "no manifests".to_string()
            } else {
                skipped.join("; ")
            };
            return Ok(FileOutcome::Skipped(reason));
        }
        Ok(FileOutcome::Loaded(records))
    }
}

fn to_record(document: &Value, source: &str) -> Result<ResourceConfig, String> {
    let kind = document
        .get("kind")
        .and_then(Value::as_str)
        .ok_or_else(|| "manifest has no 'kind'".to_string())?;
    let metadata = document.get("metadata");
    let name = metadata
        .and_then(|m| m.get("name"))
        .and_then(Value::as_str)
        .ok_or_else(|| format!("{} manifest has no 'metadata.name'", kind))?;
    let namespace = metadata
        .and_then(|m| m.get("namespace"))
        .and_then(Value::as_str);

    let id = match namespace {
        Some(ns) => format!("{}.{}.{}", ns, kind, name),
        None => format!("{}.{}", kind, name),
    };

    Ok(ResourceConfig {
        id,
        name: name.to_string(),
        source: source.to_string(),
        resource_type: format!("kubernetes_{}", kind.to_lowercase()),
        config: document.clone(),
    })
}

impl IacProvider for KubernetesProvider {
    fn name(&self) -> &str {
        "kubernetes"
    }

    fn load_file(&self, path: &Path) -> LoadResult<NormalizedTree> {
        let outcome = self.load_source(path, Mode::Strict)?;
        loader::expect_loaded(path, outcome)
    }

    fn load_dir(&self, path: &Path) -> LoadResult<NormalizedTree> {
        loader::load_dir_with(path, SUFFIXES, |file| self.load_source(file, Mode::Lenient))
    }
}
