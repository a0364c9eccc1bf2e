//! AWS CloudFormation template provider.

use std::path::Path;

use serde_json::{json, Value};

use iacnorm_core::{IacProvider, LoadResult, NormalizedTree};

use crate::loader::{self, FileOutcome, Mode};
use crate::records::{ResourceConfig, ResourceConfigs};

const SUFFIXES: &[&str] = &[".json", ".yaml", ".yml", ".template"];

/// Loads CloudFormation templates in JSON or YAML form.
#[derive(Debug, Clone, Default)]
pub struct CloudFormationProvider;

impl CloudFormationProvider {
    pub fn new() -> Self {
        Self
    }

    fn load_source(&self, path: &Path, mode: Mode) -> LoadResult<FileOutcome> {
        let content = loader::read_source(path)?;
        let mut documents = loader::parse_yaml_documents(path, &content)?;

        let template = match documents.len() {
            1 => documents.remove(0),
            count if mode == Mode::Lenient => {
                return Ok(FileOutcome::Skipped(format!(
                    "{} YAML documents, a template is exactly one",
                    count
                )))
            }
            0 => return Err(loader::parse_error(path, "template is empty")),
            count => {
                return Err(loader::parse_error(
                    path,
                    format!("expected one template document, found {}", count),
                ))
            }
        };

        let resources = match template.get("Resources").and_then(Value::as_object) {
            Some(resources) => resources,
            None if mode == Mode::Lenient => {
                return Ok(FileOutcome::Skipped("no Resources section".to_string()))
            }
            None => return Err(loader::parse_error(path, "template has no Resources section")),
        };

        let source = loader::display_path(path);
        let mut records = ResourceConfigs::new();

        for (logical_id, resource) in resources {
            let resource_type = resource
                .get("Type")
                .and_then(Value::as_str)
                .ok_or_else(|| {
                    loader::parse_error(path, format!("resource '{}' has no Type", logical_id))
                })?;

            records.push(ResourceConfig {
                id: format!("{}.{}", resource_type, logical_id),
                name: logical_id.clone(),
                source: source.clone(),
                resource_type: resource_type.to_string(),
                config: resource.get("Properties").cloned().unwrap_or_else(|| json!({})),
            });
        }

        Ok(FileOutcome::Loaded(records))
    }
}

impl IacProvider for CloudFormationProvider {
    fn name(&self) -> &str {
        "cloudformation"
    }

    fn load_file(&self, path: &Path) -> LoadResult<NormalizedTree> {
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
    use iacnorm_core::LoadError;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_load_json_template() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("stack.json");
        fs::write(
            &file,
            r#"{
                "AWSTemplateFormatVersion": "2010-09-09",
                "Resources": {
                    "LogsBucket": {
                        "Type": "AWS::S3::Bucket",
                        "Properties": { "BucketName": "logs" }
                    },
                    "Topic": { "Type": "AWS::SNS::Topic" }
                }
            }"#,
        )
        .unwrap();

        let tree = CloudFormationProvider::new().load_file(&file).unwrap();

        assert_eq!(tree["AWS::S3::Bucket"][0]["id"], "AWS::S3::Bucket.LogsBucket");
        assert_eq!(tree["AWS::S3::Bucket"][0]["config"]["BucketName"], "logs");
        assert_eq!(tree["AWS::SNS::Topic"][0]["config"], json!({}));
    }

    #[test]
    fn test_load_yaml_template_keeps_short_form_intrinsics() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("stack.yaml");
        fs::write(
            &file,
            "Resources:\n  Bucket:\n    Type: AWS::S3::Bucket\n    Properties:\n      BucketName: !Ref NameParam\n",
        )
        .unwrap();

        let tree = CloudFormationProvider::new().load_file(&file).unwrap();
        let name = &tree["AWS::S3::Bucket"][0]["config"]["BucketName"];
        assert_eq!(name, &json!({ "!Ref": "NameParam" }));
    }

    #[test]
    fn test_resources_keep_template_order() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("stack.yaml");
        fs::write(
            &file,
            "Resources:\n  Zeta:\n    Type: AWS::S3::Bucket\n  Alpha:\n    Type: AWS::S3::Bucket\n  Mid:\n    Type: AWS::S3::Bucket\n",
        )
        .unwrap();

        let tree = CloudFormationProvider::new().load_file(&file).unwrap();
        let names: Vec<_> = tree["AWS::S3::Bucket"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Zeta", "Alpha", "Mid"]);
    }

    #[test]
    fn test_load_file_rejects_multi_document_yaml() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("stack.yaml");
        fs::write(
            &file,
            "Resources:\n  A:\n    Type: AWS::SNS::Topic\n---\nResources:\n  B:\n    Type: AWS::SNS::Topic\n",
        )
        .unwrap();

        let err = CloudFormationProvider::new().load_file(&file).unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
        assert!(err.to_string().contains("found 2"));

        fs::write(&file, "").unwrap();
        let err = CloudFormationProvider::new().load_file(&file).unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn test_load_dir_skips_multi_document_manifests() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("stack.yaml"),
            "Resources:\n  Topic:\n    Type: AWS::SNS::Topic\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("k8s.yaml"),
            "kind: Pod\nmetadata:\n  name: web\n---\nkind: Service\nmetadata:\n  name: web\n",
        )
        .unwrap();

        let tree = CloudFormationProvider::new().load_dir(dir.path()).unwrap();
        assert_eq!(tree.as_object().unwrap().len(), 1);
        assert_eq!(tree["AWS::SNS::Topic"][0]["name"], "Topic");
    }

    #[test]
    fn test_load_file_requires_resources() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("package.json");
        fs::write(&file, r#"{ "name": "app" }"#).unwrap();

        let err = CloudFormationProvider::new().load_file(&file).unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
    }

    #[test]
    fn test_load_file_requires_type() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("stack.json");
        fs::write(&file, r#"{ "Resources": { "Bucket": {} } }"#).unwrap();

        let err = CloudFormationProvider::new().load_file(&file).unwrap_err();
        assert!(err.to_string().contains("Bucket"));
    }

    #[test]
    fn test_load_dir_with_only_unrelated_files() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("package.json"), r#"{ "name": "app" }"#).unwrap();

        let err = CloudFormationProvider::new().load_dir(dir.path()).unwrap_err();
        assert!(matches!(err, LoadError::NoIacFiles(_)));
    }
}
