//! Terraform provider for the JSON configuration syntax (`*.tf.json`).

use std::path::Path;

use serde_json::{Map, Value};

use iacnorm_core::{IacProvider, LoadError, LoadResult, NormalizedTree};

use crate::loader::{self, FileOutcome, Mode};
use crate::records::{ResourceConfig, ResourceConfigs};

const SUFFIXES: &[&str] = &[".tf.json"];

/// Loads Terraform configurations written in JSON syntax.
///
/// Native HCL files are not parsed: a `.tf` file given directly is rejected
/// as unsupported, and `.tf` files in a directory are ignored.
#[derive(Debug, Clone, Default)]
pub struct TerraformProvider;

impl TerraformProvider {
    pub fn new() -> Self {
        Self
    }

    fn load_source(&self, path: &Path, mode: Mode) -> LoadResult<FileOutcome> {
        let content = loader::read_source(path)?;
        let document = loader::parse_json(path, &content)?;

        let root = match document.as_object() {
            Some(root) => root,
            None if mode == Mode::Lenient => {
                return Ok(FileOutcome::Skipped("not a JSON object".to_string()))
            }
            None => return Err(loader::parse_error(path, "expected a JSON object at the top level")),
        };

        let source = loader::display_path(path);
        let mut records = ResourceConfigs::new();

        if let Some(resource) = root.get("resource") {
            for by_type in objects(resource) {
                for (resource_type, blocks) in by_type {
                    for by_name in objects(blocks) {
                        for (name, body) in by_name {
                            records.push(ResourceConfig {
                                id: format!("{}.{}", resource_type, name),
                                name: name.clone(),
                                source: source.clone(),
                                resource_type: resource_type.clone(),
                                config: body.clone(),
                            });
                        }
                    }
                }
            }
        }

        Ok(FileOutcome::Loaded(records))
    }
}

/// Objects at a block level. JSON syntax allows either one object or an
/// array of objects for repeated blocks.
fn objects(value: &Value) -> Vec<&Map<String, Value>> {
    match value {
        Value::Object(map) => vec![map],
        Value::Array(items) => items.iter().filter_map(Value::as_object).collect(),
        _ => Vec::new(),
    }
}

impl IacProvider for TerraformProvider {
    fn name(&self) -> &str {
        "terraform"
    }

    fn load_file(&self, path: &Path) -> LoadResult<NormalizedTree> {
        if loader::has_suffix(path, &[".tf"]) {
            return Err(LoadError::Unsupported {
                path: path.to_path_buf(),
                reason: "native HCL syntax is not supported, use the JSON syntax (*.tf.json)"
                    .to_string(),
            });
        }
        let outcome = self.load_source(path, Mode::Strict)?;
        loader::expect_loaded(path, outcome)
    }

    fn load_dir(&self, path: &Path) -> LoadResult<NormalizedTree> {
        loader::load_dir_with(path, SUFFIXES, |file| self.load_source(file, Mode::Lenient))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const BUCKET: &str = r#"{
        "resource": {
            "aws_s3_bucket": {
                "logs": { "bucket": "my-logs", "acl": "private" }
            }
        }
    }"#;

    #[test]
    fn test_load_file_normalizes_resources() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("main.tf.json");
        fs::write(&file, BUCKET).unwrap();

        let tree = TerraformProvider::new().load_file(&file).unwrap();
        let buckets = tree["aws_s3_bucket"].as_array().unwrap();

        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0]["id"], "aws_s3_bucket.logs");
        assert_eq!(buckets[0]["name"], "logs");
        assert_eq!(buckets[0]["config"]["acl"], "private");
        assert_eq!(buckets[0]["source"], file.to_string_lossy().into_owned());
    }

    #[test]
    fn test_load_file_accepts_block_arrays() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("main.tf.json");
        fs::write(
            &file,
            r#"{ "resource": [
                { "aws_instance": { "web": { "ami": "ami-1" } } },
                { "aws_instance": [ { "worker": { "ami": "ami-2" } } ] }
            ] }"#,
        )
        .unwrap();

        let tree = TerraformProvider::new().load_file(&file).unwrap();
        let ids: Vec<_> = tree["aws_instance"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["id"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(ids, vec!["aws_instance.web", "aws_instance.worker"]);
    }

    #[test]
    fn test_load_file_keeps_declaration_order() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("main.tf.json");
        fs::write(
            &file,
            r#"{ "resource": { "aws_s3_bucket": {
                "zeta": { "versioning": {}, "acl": "private" },
                "alpha": {},
                "mid": {}
            } } }"#,
        )
        .unwrap();

        let tree = TerraformProvider::new().load_file(&file).unwrap();
        let buckets = tree["aws_s3_bucket"].as_array().unwrap();
        let names: Vec<_> = buckets.iter().map(|r| r["name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);

        let config_keys: Vec<_> = buckets[0]["config"].as_object().unwrap().keys().cloned().collect();
        assert_eq!(config_keys, vec!["versioning", "acl"]);
    }

    #[test]
    fn test_load_file_without_resources_is_empty() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("variables.tf.json");
        fs::write(&file, r#"{ "variable": { "region": { "default": "us-east-1" } } }"#).unwrap();

        let tree = TerraformProvider::new().load_file(&file).unwrap();
        assert_eq!(tree, serde_json::json!({}));
    }

    #[test]
    fn test_load_file_rejects_hcl() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("main.tf");
        fs::write(&file, "resource \"aws_s3_bucket\" \"logs\" {}").unwrap();

        let err = TerraformProvider::new().load_file(&file).unwrap_err();
        assert!(matches!(err, LoadError::Unsupported { .. }));
    }

    #[test]
    fn test_load_file_rejects_invalid_json() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("main.tf.json");
        fs::write(&file, "{ \"resource\": ").unwrap();

        let err = TerraformProvider::new().load_file(&file).unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
    }

    #[test]
    fn test_load_dir_ignores_hcl_files() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("main.tf"), "resource \"x\" \"y\" {}").unwrap();

        let err = TerraformProvider::new().load_dir(dir.path()).unwrap_err();
        assert!(matches!(err, LoadError::NoIacFiles(_)));
    }
}
