//! Partner configuration repository abstraction.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::{BackofficeError, Result};
use crate::partner::{NewPartnerConfig, PartnerConfig, PartnerConfigPatch};

/// Persistence boundary for partner configurations.
///
/// The server only talks to this trait; the concrete storage is chosen at
/// startup.
///
/// # Implementors
///
/// - `InMemoryPartnerRepository` - process-local map, used by default and in tests
#[async_trait]
pub trait PartnerConfigRepository: Send + Sync {
    /// Returns every record ordered by id.
    async fn list(&self) -> Result<Vec<PartnerConfig>>;

    /// Returns a single record.
    ///
    /// # Errors
    ///
    /// `BackofficeError::PartnerNotFound` if the id does not exist.
    async fn get(&self, id: u64) -> Result<PartnerConfig>;

    /// Validates and stores a new record, assigning its id.
    async fn create(&self, input: NewPartnerConfig) -> Result<PartnerConfig>;

    /// Replaces both fields of an existing record.
    async fn replace(&self, id: u64, input: NewPartnerConfig) -> Result<PartnerConfig>;

    /// Applies a partial update to an existing record.
    async fn update(&self, id: u64, patch: PartnerConfigPatch) -> Result<PartnerConfig>;

    /// Removes a record.
    async fn delete(&self, id: u64) -> Result<()>;
}

/// In-memory repository backed by an ordered map.
#[derive(Debug)]
pub struct InMemoryPartnerRepository {
    records: RwLock<BTreeMap<u64, PartnerConfig>>,
    next_id: AtomicU64,
}

impl InMemoryPartnerRepository {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl Default for InMemoryPartnerRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PartnerConfigRepository for InMemoryPartnerRepository {
    async fn list(&self) -> Result<Vec<PartnerConfig>> {
        Ok(self.records.read().values().cloned().collect())
    }

    async fn get(&self, id: u64) -> Result<PartnerConfig> {
        self.records
            .read()
            .get(&id)
            .cloned()
            .ok_or_else(|| BackofficeError::partner_not_found(id))
    }

    async fn create(&self, input: NewPartnerConfig) -> Result<PartnerConfig> {
        let input = input.validated()?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let record = PartnerConfig::new(id, input.name, input.description);

        self.records.write().insert(id, record.clone());
        Ok(record)
    }

    async fn replace(&self, id: u64, input: NewPartnerConfig) -> Result<PartnerConfig> {
        let input = input.validated()?;
        let mut records = self.records.write();
        let record = records
            .get_mut(&id)
            .ok_or_else(|| BackofficeError::partner_not_found(id))?;

        record.name = input.name;
        record.description = input.description;
        Ok(record.clone())
    }

    async fn update(&self, id: u64, patch: PartnerConfigPatch) -> Result<PartnerConfig> {
        let mut records = self.records.write();
        let record = records
            .get_mut(&id)
            .ok_or_else(|| BackofficeError::partner_not_found(id))?;

        record.apply(patch)?;
        Ok(record.clone())
    }

    async fn delete(&self, id: u64) -> Result<()> {
        self.records
            .write()
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| BackofficeError::partner_not_found(id))
    }
}
