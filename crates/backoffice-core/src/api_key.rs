//! Service API keys used to authenticate trusted backend callers.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A static credential identifying a backend service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceApiKey {
    pub service_name: String,
    pub key: String,
}

impl ServiceApiKey {
    pub fn new(service_name: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            key: key.into(),
        }
    }
}

/// Lookup of provisioned service keys.
///
/// Matching is an exact comparison on the raw key value.
#[async_trait]
pub trait ApiKeyStore: Send + Sync {
    /// Returns the key record whose value equals `key`, if any.
    async fn find(&self, key: &str) -> Result<Option<ServiceApiKey>>;

    /// Returns every provisioned key value.
    async fn keys(&self) -> Result<Vec<String>>;
}

/// Process-local key store, populated from configuration.
#[derive(Debug, Default)]
pub struct InMemoryApiKeyStore {
    by_key: RwLock<HashMap<String, ServiceApiKey>>,
}

impl InMemoryApiKeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-loaded with the given keys.
    pub fn with_keys(keys: impl IntoIterator<Item = ServiceApiKey>) -> Self {
        let store = Self::new();
        for key in keys {
            store.insert(key);
        }
        store
    }

    /// Adds or replaces a key. Empty key values are ignored.
    pub fn insert(&self, key: ServiceApiKey) {
        if key.key.is_empty() {
            return;
        }
        self.by_key.write().insert(key.key.clone(), key);
    }

    pub fn len(&self) -> usize {
        self.by_key.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.read().is_empty()
    }
}

#[async_trait]
impl ApiKeyStore for InMemoryApiKeyStore {
    async fn find(&self, key: &str) -> Result<Option<ServiceApiKey>> {
        Ok(self.by_key.read().get(key).cloned())
    }

    async fn keys(&self) -> Result<Vec<String>> {
        let mut keys: Vec<String> = self.by_key.read().keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}
