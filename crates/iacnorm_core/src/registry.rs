//! Provider registry mapping (type, version) keys to provider factories.
//!
//! A [`ProviderRegistry`] is plain data and can be built anywhere, e.g. in
//! tests. The process-wide instance is installed exactly once through
//! [`install`] during startup and is read-only afterwards.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use tracing::{debug, info};

use crate::error::RegistryError;
use crate::provider::{IacProvider, ProviderKey};

/// Builds a fresh provider instance.
pub type ProviderFactory = Arc<dyn Fn() -> Box<dyn IacProvider> + Send + Sync>;

/// Read-only lookup used by the executor to bind a provider.
#[cfg_attr(test, mockall::automock)]
pub trait ResolveProvider {
    /// Build the provider registered for `key`, if any.
    fn resolve(&self, key: ProviderKey) -> Option<Box<dyn IacProvider>>;
}

/// A registry of provider factories.
#[derive(Default)]
pub struct ProviderRegistry {
    factories: HashMap<ProviderKey, ProviderFactory>,
}

impl ProviderRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register a provider factory.
    ///
    /// If a factory with the same key already exists, it will be replaced.
    pub fn register<F>(&mut self, key: ProviderKey, factory: F)
    where
        F: Fn() -> Box<dyn IacProvider> + Send + Sync + 'static,
    {
        debug!("Registering IaC provider: {}", key);
        self.factories.insert(key, Arc::new(factory));
    }

    /// Check if a key is registered.
    pub fn contains(&self, key: ProviderKey) -> bool {
        self.factories.contains_key(&key)
    }

    /// All registered keys, sorted.
    pub fn keys(&self) -> Vec<ProviderKey> {
        let mut keys: Vec<_> = self.factories.keys().copied().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl ResolveProvider for ProviderRegistry {
    fn resolve(&self, key: ProviderKey) -> Option<Box<dyn IacProvider>> {
        let provider = self.factories.get(&key).map(|factory| factory());
        debug!("Resolving IaC provider {}: found={}", key, provider.is_some());
        provider
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.keys())
            .finish()
    }
}

static GLOBAL_REGISTRY: OnceLock<ProviderRegistry> = OnceLock::new();

/// Install the process-wide registry. Must be called once at startup.
pub fn install(registry: ProviderRegistry) -> Result<&'static ProviderRegistry, RegistryError> {
    let count = registry.len();
    GLOBAL_REGISTRY
        .set(registry)
        .map_err(|_| RegistryError::AlreadyInstalled)?;
    info!("Installed provider registry with {} provider(s)", count);
    global()
}

/// The process-wide registry, if [`install`] has run.
pub fn global() -> Result<&'static ProviderRegistry, RegistryError> {
    GLOBAL_REGISTRY.get().ok_or(RegistryError::NotInstalled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LoadResult;
    use crate::provider::{IacType, IacVersion, NormalizedTree};
    use std::path::Path;

    struct NamedProvider {
        name: &'static str,
    }

    impl IacProvider for NamedProvider {
        fn name(&self) -> &str {
            self.name
        }

        fn load_file(&self, _path: &Path) -> LoadResult<NormalizedTree> {
            Ok(NormalizedTree::Null)
        }

        fn load_dir(&self, _path: &Path) -> LoadResult<NormalizedTree> {
            Ok(NormalizedTree::Null)
        }
    }

    fn tf_v12() -> ProviderKey {
        ProviderKey::new(IacType::Terraform, IacVersion::V12)
    }

    #[test]
    fn test_registry_register() {
        let mut registry = ProviderRegistry::new();
        assert!(registry.is_empty());

        registry.register(tf_v12(), || Box::new(NamedProvider { name: "terraform" }));

        assert_eq!(registry.len(), 1);
        assert!(registry.contains(tf_v12()));
    }

    #[test]
    fn test_registry_resolve() {
        let mut registry = ProviderRegistry::new();
        registry.register(tf_v12(), || Box::new(NamedProvider { name: "terraform" }));

        let provider = registry.resolve(tf_v12());
        assert!(provider.is_some());
        assert_eq!(provider.unwrap().name(), "terraform");

        let missing = registry.resolve(ProviderKey::new(IacType::Terraform, IacVersion::V1));
        assert!(missing.is_none());
    }

    #[test]
    fn test_registry_register_replaces() {
        let mut registry = ProviderRegistry::new();
        registry.register(tf_v12(), || Box::new(NamedProvider { name: "first" }));
        registry.register(tf_v12(), || Box::new(NamedProvider { name: "second" }));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.resolve(tf_v12()).unwrap().name(), "second");
    }

    #[test]
    fn test_registry_keys_sorted() {
        let mut registry = ProviderRegistry::new();
        registry.register(
            ProviderKey::new(IacType::CloudFormation, IacVersion::V1),
            || Box::new(NamedProvider { name: "cft" }),
        );
        registry.register(tf_v12(), || Box::new(NamedProvider { name: "terraform" }));

        assert_eq!(
            registry.keys(),
            vec![
                tf_v12(),
                ProviderKey::new(IacType::CloudFormation, IacVersion::V1)
            ]
        );
    }
}
