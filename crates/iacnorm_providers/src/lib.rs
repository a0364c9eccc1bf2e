//! # iacnorm_providers
//!
//! Bundled IaC providers for iacnorm.
//!
//! Each provider reads structured documents that serde can already parse
//! and flattens them into resource records grouped by resource type:
//!
//! | type        | versions   | sources                               |
//! |-------------|------------|---------------------------------------|
//! | `terraform` | `v12`, `v14` | `*.tf.json`                         |
//! | `k8s`       | `v1`       | `*.yaml`, `*.yml`, `*.json`           |
//! | `cft`       | `v1`       | `*.json`, `*.yaml`, `*.yml`, `*.template` |
//!
//! ## Example
//!
//! ```rust,no_run
//! use iacnorm_core::{registry, Executor};
//!
//! registry::install(iacnorm_providers::default_registry()).unwrap();
//!
//! let executor = Executor::new("k8s", "v1", "aws", "", "./manifests").unwrap();
//! let normalized = executor.execute().unwrap();
//! println!("{}", normalized);
//! ```

pub mod cloudformation;
pub mod kubernetes;
pub mod loader;
pub mod records;
pub mod terraform;

use iacnorm_core::{IacType, IacVersion, ProviderKey, ProviderRegistry};

pub use cloudformation::CloudFormationProvider;
pub use kubernetes::KubernetesProvider;
pub use records::{ResourceConfig, ResourceConfigs};
pub use terraform::TerraformProvider;

/// Add every bundled provider to `registry`.
pub fn register_defaults(registry: &mut ProviderRegistry) {
    for version in [IacVersion::V12, IacVersion::V14] {
        registry.register(ProviderKey::new(IacType::Terraform, version), || {
            Box::new(TerraformProvider::new())
        });
    }
    registry.register(ProviderKey::new(IacType::Kubernetes, IacVersion::V1), || {
        Box::new(KubernetesProvider::new())
    });
    registry.register(
        ProviderKey::new(IacType::CloudFormation, IacVersion::V1),
        || Box::new(CloudFormationProvider::new()),
    );
}

/// A registry holding every bundled provider.
pub fn default_registry() -> ProviderRegistry {
    let mut registry = ProviderRegistry::new();
    register_defaults(&mut registry);
    registry
}
