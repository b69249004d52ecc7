//! Response cache metrics recording.

use metrics::{counter, histogram};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Registra las metricas de cache.
/// Llamar una vez al inicio para registrar las metricas.
pub fn register_cache_metrics() {
    metrics::describe_counter!("backoffice_cache_hits_total", "Total number of cache hits");
    metrics::describe_counter!(
        "backoffice_cache_misses_total",
        "Total number of cache misses"
    );
    metrics::describe_counter!(
        "backoffice_cache_stores_total",
        "Total number of responses written to the store"
    );
    metrics::describe_counter!(
        "backoffice_cache_store_errors_total",
        "Total number of failed store operations"
    );
    metrics::describe_counter!(
        "backoffice_cache_invalidated_total",
        "Total number of keys removed by invalidation"
    );
    metrics::describe_histogram!(
        "backoffice_cache_operation_seconds",
        "Time spent on store operations"
    );
}

/// Recorder de metricas de cache.
/// Usa atomic counters internos para consultar hits/misses sin exporter.
#[derive(Debug, Clone)]
pub struct CacheMetrics {
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
    stores: Arc<AtomicU64>,
}

impl CacheMetrics {
    pub fn new() -> Self {
        Self {
            hits: Arc::new(AtomicU64::new(0)),
            misses: Arc::new(AtomicU64::new(0)),
            stores: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Registra un cache hit
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
        counter!("backoffice_cache_hits_total").increment(1);
    }

    /// Registra un cache miss
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
        counter!("backoffice_cache_misses_total").increment(1);
    }

    /// Registra una respuesta almacenada
    pub fn record_store(&self) {
        self.stores.fetch_add(1, Ordering::Relaxed);
        counter!("backoffice_cache_stores_total").increment(1);
    }

    /// Registra un fallo del store (get, set, invalidate...)
    pub fn record_store_error(&self, operation: &'static str) {
        counter!("backoffice_cache_store_errors_total", "operation" => operation).increment(1);
    }

    /// Registra keys eliminadas por invalidacion
    pub fn record_invalidated(&self, count: u64) {
        counter!("backoffice_cache_invalidated_total").increment(count);
    }

    /// Registra la duracion de una operacion
    pub fn record_operation_duration(&self, operation: &'static str, duration: Duration) {
        histogram!("backoffice_cache_operation_seconds", "operation" => operation)
            .record(duration.as_secs_f64());
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn stores(&self) -> u64 {
        self.stores.load(Ordering::Relaxed)
    }
}

impl Default for CacheMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_track_outcomes() {
        let metrics = CacheMetrics::new();

        metrics.record_hit();
        metrics.record_hit();
        metrics.record_miss();
        metrics.record_store();

        assert_eq!(metrics.hits(), 2);
        assert_eq!(metrics.misses(), 1);
        assert_eq!(metrics.stores(), 1);
    }

    #[test]
    fn test_counters_are_shared_between_clones() {
        let metrics = CacheMetrics::new();
        let clone = metrics.clone();

        clone.record_hit();
        clone.record_miss();
        clone.record_store();

        assert_eq!(metrics.hits(), 1);
        assert_eq!(metrics.misses(), 1);
        assert_eq!(metrics.stores(), 1);
    }
}
