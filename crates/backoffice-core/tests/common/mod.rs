#![allow(dead_code)]
use backoffice_core::{InMemoryPartnerRepository, NewPartnerConfig, PartnerConfigRepository};

/// Helper to build a repository seeded with the given `(name, description)` pairs.
/// Panics if any seed fails validation (intended for tests).
pub async fn seeded_repository(seeds: &[(&str, &str)]) -> InMemoryPartnerRepository {
    let repo = InMemoryPartnerRepository::new();
    for (name, description) in seeds {
        repo.create(NewPartnerConfig::new(*name, *description))
            .await
            .expect("Failed to seed test repository");
    }
    repo
}
