//! IaC format tags and the provider capability.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::LoadResult;

/// Normalized, dialect-agnostic representation of scanned IaC content.
///
/// The shape is defined by each provider; the executor passes it through
/// untouched.
pub type NormalizedTree = serde_json::Value;

/// Supported cloud targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CloudProvider {
    Aws,
    Azure,
    Gcp,
}

impl CloudProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            CloudProvider::Aws => "aws",
            CloudProvider::Azure => "azure",
            CloudProvider::Gcp => "gcp",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "aws" => Some(CloudProvider::Aws),
            "azure" => Some(CloudProvider::Azure),
            "gcp" => Some(CloudProvider::Gcp),
            _ => None,
        }
    }

    pub fn all() -> Vec<Self> {
        vec![CloudProvider::Aws, CloudProvider::Azure, CloudProvider::Gcp]
    }
}

impl std::fmt::Display for CloudProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// IaC dialect families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IacType {
    Terraform,
    #[serde(rename = "k8s")]
    Kubernetes,
    #[serde(rename = "cft")]
    CloudFormation,
}

impl IacType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IacType::Terraform => "terraform",
            IacType::Kubernetes => "k8s",
            IacType::CloudFormation => "cft",
        }
    }

    /// Parse a type tag. Accepts the canonical names and a few aliases.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "terraform" | "tf" => Some(IacType::Terraform),
            "k8s" | "kubernetes" => Some(IacType::Kubernetes),
            "cft" | "cloudformation" | "aws" => Some(IacType::CloudFormation),
            _ => None,
        }
    }

    pub fn all() -> Vec<Self> {
        vec![IacType::Terraform, IacType::Kubernetes, IacType::CloudFormation]
    }
}

impl std::fmt::Display for IacType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Dialect versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IacVersion {
    V1,
    V12,
    V14,
}

impl IacVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            IacVersion::V1 => "v1",
            IacVersion::V12 => "v12",
            IacVersion::V14 => "v14",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "v1" => Some(IacVersion::V1),
            "v12" => Some(IacVersion::V12),
            "v14" => Some(IacVersion::V14),
            _ => None,
        }
    }
}

impl std::fmt::Display for IacVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Registry key: a (type, version) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProviderKey {
    pub iac_type: IacType,
    pub iac_version: IacVersion,
}

impl ProviderKey {
    pub fn new(iac_type: IacType, iac_version: IacVersion) -> Self {
        Self {
            iac_type,
            iac_version,
        }
    }

    /// Parse both tags, returning `None` if either is unknown.
    pub fn parse(iac_type: &str, iac_version: &str) -> Option<Self> {
        Some(Self::new(
            IacType::from_str(iac_type)?,
            IacVersion::from_str(iac_version)?,
        ))
    }
}

impl std::fmt::Display for ProviderKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.iac_type, self.iac_version)
    }
}

/// A dialect-specific loader turning IaC source into a normalized tree.
///
/// Implementations must be safe to share between threads; the executor
/// itself never calls a provider concurrently.
pub trait IacProvider: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Load a single IaC file.
    fn load_file(&self, path: &Path) -> LoadResult<NormalizedTree>;

    /// Load every IaC file under a directory.
    fn load_dir(&self, path: &Path) -> LoadResult<NormalizedTree>;
}
