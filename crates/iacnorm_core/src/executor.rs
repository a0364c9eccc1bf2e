//! Scan executor: validates a request, binds a provider and dispatches loads.
//!
//! The lifecycle is split across two types. A [`ScanRequest`] holds the raw,
//! unvalidated parameters. [`ScanRequest::initialize`] validates them,
//! resolves a provider and returns an [`Executor`] that always has a bound
//! provider. A failed initialization returns no executor.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::error::{InitError, LoadResult, ValidationError};
use crate::provider::{IacProvider, NormalizedTree, ProviderKey};
use crate::registry::{self, ResolveProvider};

/// Raw parameters of a scan, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRequest {
    pub iac_type: String,
    pub iac_version: String,
    /// Informational cloud label, passed through as given.
    pub cloud_target: String,
    /// Single file to load. Empty means unset.
    pub file_path: String,
    /// Directory to load. Empty means unset; wins over `file_path`.
    pub dir_path: String,
}

impl ScanRequest {
    pub fn new(iac_type: impl Into<String>, iac_version: impl Into<String>) -> Self {
        Self {
            iac_type: iac_type.into(),
            iac_version: iac_version.into(),
            ..Self::default()
        }
    }

    pub fn with_cloud(mut self, cloud_target: impl Into<String>) -> Self {
        self.cloud_target = cloud_target.into();
        self
    }

    pub fn with_file(mut self, file_path: impl Into<String>) -> Self {
        self.file_path = file_path.into();
        self
    }

    pub fn with_dir(mut self, dir_path: impl Into<String>) -> Self {
        self.dir_path = dir_path.into();
        self
    }

    /// Check the request parameters. Never touches a registry.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if is_blank(&self.iac_type) {
            return Err(ValidationError::EmptyIacType);
        }
        if is_blank(&self.iac_version) {
            return Err(ValidationError::EmptyIacVersion);
        }
        match (is_blank(&self.file_path), is_blank(&self.dir_path)) {
            (true, true) => Err(ValidationError::MissingPath),
            (false, false) => {
                warn!(
                    "Both file '{}' and directory '{}' given; the directory takes precedence",
                    self.file_path, self.dir_path
                );
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Validate, then resolve and bind a provider.
    pub fn initialize(self, resolver: &dyn ResolveProvider) -> Result<Executor, InitError> {
        self.validate()?;
        self.bind(resolver)
    }

    fn bind(self, resolver: &dyn ResolveProvider) -> Result<Executor, InitError> {
        let unresolved = || InitError::ProviderResolution {
            iac_type: self.iac_type.clone(),
            iac_version: self.iac_version.clone(),
        };

        let key = match ProviderKey::parse(&self.iac_type, &self.iac_version) {
            Some(key) => key,
            None => {
                error!(
                    "Unknown IaC type/version '{}'/'{}'",
                    self.iac_type, self.iac_version
                );
                return Err(unresolved());
            }
        };

        let provider = match resolver.resolve(key) {
            Some(provider) => provider,
            None => {
                error!("Failed to create an IaC provider for {}", key);
                return Err(unresolved());
            }
        };

        let target = if is_blank(&self.dir_path) {
            ScanTarget::File(PathBuf::from(&self.file_path))
        } else {
            ScanTarget::Dir(PathBuf::from(&self.dir_path))
        };

        debug!(
            "Bound provider '{}' for {} targeting {:?}",
            provider.name(),
            key,
            target
        );

        Ok(Executor {
            request: self,
            key,
            target,
            provider,
        })
    }
}

/// What an executor will load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanTarget {
    File(PathBuf),
    Dir(PathBuf),
}

impl ScanTarget {
    pub fn path(&self) -> &Path {
        match self {
            ScanTarget::File(path) | ScanTarget::Dir(path) => path,
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, ScanTarget::Dir(_))
    }
}

/// A validated scan request with a bound provider.
///
/// The provider is fixed for the lifetime of the executor. `execute` may be
/// called repeatedly but is not meant to be called concurrently.
pub struct Executor {
    request: ScanRequest,
    key: ProviderKey,
    target: ScanTarget,
    provider: Box<dyn IacProvider>,
}

impl Executor {
    /// Build and initialize an executor against the process-wide registry.
    ///
    /// Fails with [`InitError::RegistryUnavailable`] if
    /// [`registry::install`] has not run yet.
    pub fn new(
        iac_type: impl Into<String>,
        iac_version: impl Into<String>,
        cloud_target: impl Into<String>,
        file_path: impl Into<String>,
        dir_path: impl Into<String>,
    ) -> Result<Self, InitError> {
        let request = ScanRequest::new(iac_type, iac_version)
            .with_cloud(cloud_target)
            .with_file(file_path)
            .with_dir(dir_path);
        request.validate()?;
        let registry = registry::global()?;
        request.bind(registry)
    }

    /// Build and initialize an executor against a specific resolver.
    pub fn with_resolver(
        resolver: &dyn ResolveProvider,
        request: ScanRequest,
    ) -> Result<Self, InitError> {
        request.initialize(resolver)
    }

    /// Run the bound provider on the target.
    ///
    /// The provider's result and error are returned as-is.
    pub fn execute(&self) -> LoadResult<NormalizedTree> {
        match &self.target {
            ScanTarget::Dir(dir) => {
                info!("Loading IaC directory {:?} with {}", dir, self.key);
                self.provider.load_dir(dir)
            }
            ScanTarget::File(file) => {
                info!("Loading IaC file {:?} with {}", file, self.key);
                self.provider.load_file(file)
            }
        }
    }

    pub fn iac_type(&self) -> &str {
        &self.request.iac_type
    }

    pub fn iac_version(&self) -> &str {
        &self.request.iac_version
    }

    pub fn cloud_target(&self) -> &str {
        &self.request.cloud_target
    }

    pub fn file_path(&self) -> &str {
        &self.request.file_path
    }

    pub fn dir_path(&self) -> &str {
        &self.request.dir_path
    }

    pub fn key(&self) -> ProviderKey {
        self.key
    }

    pub fn target(&self) -> &ScanTarget {
        &self.target
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }
}

impl std::fmt::Debug for Executor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Executor")
            .field("request", &self.request)
            .field("key", &self.key)
            .field("target", &self.target)
            .field("provider", &self.provider.name())
            .finish()
    }
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}
