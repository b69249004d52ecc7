//! Store connection settings.

use std::time::Duration;

use serde::Deserialize;

/// Which backend the response cache is stored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Redis,
    Memory,
}

/// Configuracion del store de cache.
///
/// Se resuelve una sola vez al arrancar y se comparte en modo lectura.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Backend a utilizar (default: redis)
    pub backend: StoreBackend,
    /// Host de Redis
    pub host: String,
    /// Puerto de Redis
    pub port: u16,
    /// Base de datos logica de Redis
    pub db: i64,
    /// Password opcional
    pub password: Option<String>,
    /// TTL por defecto en segundos (default: 3600). 0 = sin expiracion
    pub default_ttl_secs: u64,
    /// Tamano de lote para SCAN (default: 10000)
    pub scan_batch_size: usize,
    /// Timeout de conexion en milisegundos
    pub connect_timeout_ms: u64,
    /// Timeout por operacion en milisegundos
    pub operation_timeout_ms: u64,
    /// Capacidad maxima del store en memoria
    pub memory_max_capacity: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Redis,
            host: "localhost".to_string(),
            port: 6379,
            db: 0,
            password: None,
            default_ttl_secs: 3600,
            scan_batch_size: 10_000,
            connect_timeout_ms: 5_000,
            operation_timeout_ms: 2_000,
            memory_max_capacity: 100_000,
        }
    }
}

impl StoreConfig {
    /// Builds the connection URL, e.g. `redis://localhost:6379/0`.
    pub fn redis_url(&self) -> String {
        match &self.password {
            Some(password) => format!(
                "redis://:{}@{}:{}/{}",
                password, self.host, self.port, self.db
            ),
            None => format!("redis://{}:{}/{}", self.host, self.port, self.db),
        }
    }

    /// Same as [`redis_url`](Self::redis_url) with the password masked.
    pub fn redacted_url(&self) -> String {
        match self.password {
            Some(_) => format!("redis://:***@{}:{}/{}", self.host, self.port, self.db),
            None => self.redis_url(),
        }
    }

    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn operation_timeout(&self) -> Duration {
        Duration::from_millis(self.operation_timeout_ms)
    }

    /// Returns a copy configured for the in-memory backend.
    pub fn memory() -> Self {
        Self {
            backend: StoreBackend::Memory,
            ..Self::default()
        }
    }

    /// Checks values that would make the store unusable.
    pub fn validate(&self) -> Result<(), String> {
        if self.backend == StoreBackend::Redis && self.host.trim().is_empty() {
            return Err("store host cannot be empty".to_string());
        }
        if self.db < 0 {
            return Err("store db index cannot be negative".to_string());
        }
        if self.scan_batch_size == 0 {
            return Err("scan batch size must be greater than zero".to_string());
        }
        if self.operation_timeout_ms == 0 || self.connect_timeout_ms == 0 {
            return Err("store timeouts must be greater than zero".to_string());
        }
        Ok(())
    }
}
