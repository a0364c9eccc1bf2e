//! # iacnorm_core
//!
//! Scan orchestration for iacnorm.
//!
//! This crate turns a declared IaC (type, version) pair and a file or
//! directory path into a normalized tree by resolving a format-specific
//! provider and dispatching to it. It knows nothing about any dialect.
//!
//! # Architecture
//!
//! - **Provider**: loads one file or one directory into a [`NormalizedTree`]
//! - **Registry**: maps a [`ProviderKey`] to a provider factory
//! - **Executor**: validates a request, binds a provider and runs it
//!
//! # Example
//!
//! ```rust,ignore
//! use iacnorm_core::{registry, Executor, ProviderRegistry};
//!
//! // At startup, exactly once
//! let mut providers = ProviderRegistry::new();
//! providers.register(key, || Box::new(MyProvider));
//! registry::install(providers)?;
//!
//! // Per scan
//! let executor = Executor::new("terraform", "v12", "aws", "", "./infra")?;
//! let normalized = executor.execute()?;
//! ```

pub mod error;
pub mod executor;
pub mod mock;
pub mod provider;
pub mod registry;

// Re-export main types for convenience
pub use error::{
    CoreError, CoreResult, InitError, LoadError, LoadResult, RegistryError, ValidationError,
};
pub use executor::{Executor, ScanRequest, ScanTarget};
pub use provider::{
    CloudProvider, IacProvider, IacType, IacVersion, NormalizedTree, ProviderKey,
};
pub use registry::{ProviderFactory, ProviderRegistry, ResolveProvider};
