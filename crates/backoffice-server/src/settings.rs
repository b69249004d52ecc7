//! Server settings.
//!
//! Precedence: built-in defaults, then an optional `backoffice.toml` in the
//! working directory, then an explicit file, then `BACKOFFICE__*` environment
//! variables (`BACKOFFICE__STORE__HOST=redis`).

use std::net::SocketAddr;
use std::path::Path;

use backoffice_core::ServiceApiKey;
use backoffice_store::StoreConfig;
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use thiserror::Error;

use crate::cache::{DEFAULT_MAX_BODY_BYTES, KeyStrategyKind};

const DEFAULT_CONFIG_BASENAME: &str = "backoffice";
const ENV_PREFIX: &str = "BACKOFFICE";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl SettingsError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Configuracion completa del servidor, resuelta una vez al arrancar.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub store: StoreConfig,
    pub cache: CacheSettings,
    pub auth: AuthSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Si es false las requests nunca consultan el store
    pub enabled: bool,
    pub key_strategy: KeyStrategyKind,
    /// Bodies mas grandes no se cachean
    pub max_body_bytes: usize,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            key_strategy: KeyStrategyKind::Composite,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

/// Claves de servicio aprovisionadas.
///
/// ```toml
/// [[auth.service_keys]]
/// service_name = "billing"
/// key = "tok123"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    pub service_keys: Vec<ServiceApiKey>,
}

impl Settings {
    /// Loads settings from `backoffice.toml` (if present) and the environment.
    pub fn load() -> Result<Self, SettingsError> {
        Self::load_from(None)
    }

    /// Like [`load`](Self::load), with an additional required file.
    pub fn load_from(path: Option<&Path>) -> Result<Self, SettingsError> {
        let mut builder = Config::builder()
            .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false));

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parses settings from a TOML document, without environment overrides.
    pub fn from_toml(source: &str) -> Result<Self, SettingsError> {
        let settings: Settings = Config::builder()
            .add_source(File::from_str(source, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        self.store
            .validate()
            .map_err(|reason| SettingsError::invalid("store", reason))?;

        if self.cache.max_body_bytes == 0 {
            return Err(SettingsError::invalid(
                "cache.max_body_bytes",
                "must be greater than zero",
            ));
        }

        if let Some(bad) = self
            .auth
            .service_keys
            .iter()
            .find(|k| k.key.trim().is_empty())
        {
            return Err(SettingsError::invalid(
                "auth.service_keys",
                format!("service '{}' has an empty key", bad.service_name),
            ));
        }

        Ok(())
    }

    /// Address the HTTP listener binds to.
    pub fn listen_addr(&self) -> Result<SocketAddr, SettingsError> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e: std::net::AddrParseError| {
                SettingsError::invalid("server.host", e.to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backoffice_store::StoreBackend;

    #[test]
    fn test_defaults() {
        let settings = Settings::from_toml("").unwrap();

        assert_eq!(settings.server.port, 8000);
        assert_eq!(settings.store.backend, StoreBackend::Redis);
        assert_eq!(settings.store.default_ttl_secs, 3600);
        assert!(settings.cache.enabled);
        assert_eq!(settings.cache.key_strategy, KeyStrategyKind::Composite);
        assert_eq!(settings.cache.max_body_bytes, 1024 * 1024);
        assert!(settings.auth.service_keys.is_empty());
        assert_eq!(
            settings.listen_addr().unwrap(),
            "0.0.0.0:8000".parse::<SocketAddr>().unwrap()
        );
    }

    #[test]
    fn test_full_document() {
        let settings = Settings::from_toml(
            r#"
            [server]
            host = "127.0.0.1"
            port = 9000

            [store]
            backend = "memory"
            host = "cache.internal"
            port = 6380
            db = 2
            default_ttl_secs = 120

            [cache]
            enabled = false
            key_strategy = "authorization"
            max_body_bytes = 2048

            [[auth.service_keys]]
            service_name = "billing"
            key = "tok123"
            "#,
        )
        .unwrap();

        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.store.backend, StoreBackend::Memory);
        assert_eq!(settings.store.db, 2);
        assert_eq!(settings.store.default_ttl_secs, 120);
        // Valores no indicados conservan el default
        assert_eq!(settings.store.scan_batch_size, 10_000);
        assert!(!settings.cache.enabled);
        assert_eq!(settings.cache.key_strategy, KeyStrategyKind::Authorization);
        assert_eq!(settings.cache.max_body_bytes, 2048);
        assert_eq!(
            settings.auth.service_keys,
            vec![ServiceApiKey::new("billing", "tok123")]
        );
    }

    #[test]
    fn test_rejects_empty_service_key() {
        let err = Settings::from_toml(
            r#"
            [[auth.service_keys]]
            service_name = "billing"
            key = " "
            "#,
        )
        .unwrap_err();

        assert!(matches!(
            err,
            SettingsError::Invalid {
                key: "auth.service_keys",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_invalid_store() {
        let err = Settings::from_toml("[store]\nscan_batch_size = 0\n").unwrap_err();
        assert!(matches!(err, SettingsError::Invalid { key: "store", .. }));
    }

    #[test]
    fn test_invalid_host_is_reported() {
        let mut settings = Settings::default();
        settings.server.host = "not a host".to_string();

        assert!(settings.listen_addr().is_err());
    }
}
