//! Backoffice Core - Domain types and traits
//!
//! This crate provides the partner configuration model, its validation rules,
//! and the collaborator traits (repository, service key lookup) consumed by
//! the HTTP server.

pub mod api_key;
pub mod error;
pub mod partner;
pub mod repository;

pub use api_key::{ApiKeyStore, InMemoryApiKeyStore, ServiceApiKey};
pub use error::{BackofficeError, Result};
pub use partner::{MAX_NAME_LENGTH, NewPartnerConfig, PartnerConfig, PartnerConfigPatch};
pub use repository::{InMemoryPartnerRepository, PartnerConfigRepository};

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_defined() {
        assert!(!version().is_empty());
    }

    #[test]
    fn version_is_semver() {
        let v = version();
        assert_eq!(v.split('.').count(), 3, "Version should be semver");
    }
}
