//! Providers command - List registered providers.

use anyhow::Result;

use iacnorm_core::{registry, ProviderKey};

pub fn execute() -> Result<()> {
    let registry = registry::global()?;

    println!("{:<12} VERSION", "TYPE");
    for line in format_keys(&registry.keys()) {
        println!("{}", line);
    }
    Ok(())
}

fn format_keys(keys: &[ProviderKey]) -> Vec<String> {
    keys.iter()
        .map(|key| format!("{:<12} {}", key.iac_type.as_str(), key.iac_version.as_str()))
        .collect()
}
