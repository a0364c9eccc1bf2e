//! Error types for the core module.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Result type alias for provider loads.
pub type LoadResult<T> = Result<T, LoadError>;

/// A request parameter that failed validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("iac_type must not be empty")]
    EmptyIacType,

    #[error("iac_version must not be empty")]
    EmptyIacVersion,

    #[error("either a file path or a directory path is required")]
    MissingPath,
}

impl ValidationError {
    /// Name of the request field this error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::EmptyIacType => "iac_type",
            ValidationError::EmptyIacVersion => "iac_version",
            ValidationError::MissingPath => "path",
        }
    }
}

/// Errors raised while building an [`Executor`](crate::Executor).
#[derive(Error, Debug)]
pub enum InitError {
    #[error("Invalid scan request: {0}")]
    Validation(#[from] ValidationError),

    #[error("No IaC provider registered for type '{iac_type}' version '{iac_version}'")]
    ProviderResolution {
        iac_type: String,
        iac_version: String,
    },

    #[error("Provider registry unavailable: {0}")]
    RegistryUnavailable(#[from] RegistryError),
}

/// Errors raised by a provider while loading IaC source.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    #[error("Not a file: {0}")]
    NotAFile(PathBuf),

    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("No IaC files found in {0}")]
    NoIacFiles(PathBuf),

    #[error("Unsupported source {path}: {reason}")]
    Unsupported { path: PathBuf, reason: String },

    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors around the process-wide registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("provider registry already installed")]
    AlreadyInstalled,

    #[error("provider registry not installed")]
    NotInstalled,
}

/// Umbrella error for callers that want a single type.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error(transparent)]
    Init(#[from] InitError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}
