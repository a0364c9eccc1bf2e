//! Process-wide registry lifecycle.
//!
//! Kept in its own test binary with a single test, since the registry can
//! only be installed once per process.

use iacnorm_core::mock::MockProvider;
use iacnorm_core::registry;
use iacnorm_core::{
    Executor, IacType, IacVersion, InitError, ProviderKey, ProviderRegistry, RegistryError,
    ValidationError,
};

#[test]
fn test_global_registry_lifecycle() {
    assert_eq!(registry::global().unwrap_err(), RegistryError::NotInstalled);

    // Validation runs before the registry is consulted.
    let result = Executor::new("", "v12", "aws", "main.tf", "");
    assert!(matches!(
        result,
        Err(InitError::Validation(ValidationError::EmptyIacType))
    ));

    let result = Executor::new("terraform", "v12", "aws", "main.tf", "");
    assert!(matches!(
        result,
        Err(InitError::RegistryUnavailable(RegistryError::NotInstalled))
    ));

    let key = ProviderKey::new(IacType::Terraform, IacVersion::V12);
    let mut providers = ProviderRegistry::new();
    providers.register(key, || Box::new(MockProvider::new("global-mock")));
    let installed = registry::install(providers).unwrap();
    assert!(installed.contains(key));

    let again = registry::install(ProviderRegistry::new());
    assert_eq!(again.unwrap_err(), RegistryError::AlreadyInstalled);

    let executor = Executor::new("terraform", "v12", "aws", "main.tf", "").unwrap();
    assert_eq!(executor.provider_name(), "global-mock");
    let tree = executor.execute().unwrap();
    assert_eq!(tree["kind"], "file");

    let missing = Executor::new("terraform", "v14", "aws", "main.tf", "");
    assert!(matches!(missing, Err(InitError::ProviderResolution { .. })));
}
