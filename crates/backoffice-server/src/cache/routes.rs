//! Which routes may be served from the cache.

use std::collections::HashSet;

use axum::http::Method;

/// Path of the partner configuration collection.
pub const PARTNER_CONFIG_PATH: &str = "/partner-config";
/// Route template of a single partner configuration.
pub const PARTNER_CONFIG_ITEM_PATH: &str = "/partner-config/{id}";

/// Tabla de rutas cacheables, indexada por metodo y template de ruta.
///
/// Se fija al construir el router; cualquier ruta que no figure aqui
/// no es cacheable.
#[derive(Debug, Clone, Default)]
pub struct CacheRoutes {
    entries: HashSet<(Method, String)>,
}

impl CacheRoutes {
    /// Empty table: nothing is cacheable.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `method` on the route template `path` as cacheable.
    pub fn cacheable(mut self, method: Method, path: impl Into<String>) -> Self {
        self.entries.insert((method, path.into()));
        self
    }

    /// Default table: the two partner configuration reads.
    pub fn partner_config() -> Self {
        Self::new()
            .cacheable(Method::GET, PARTNER_CONFIG_PATH)
            .cacheable(Method::GET, PARTNER_CONFIG_ITEM_PATH)
    }

    /// Looks up a route template, as reported by `MatchedPath`.
    pub fn is_cacheable(&self, method: &Method, route: &str) -> bool {
        self.entries.contains(&(method.clone(), route.to_string()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partner_config_reads_are_cacheable() {
        let routes = CacheRoutes::partner_config();

        assert!(routes.is_cacheable(&Method::GET, "/partner-config"));
        assert!(routes.is_cacheable(&Method::GET, "/partner-config/{id}"));
        assert_eq!(routes.len(), 2);
    }

    #[test]
    fn test_writes_and_unknown_routes_are_not_cacheable() {
        let routes = CacheRoutes::partner_config();

        assert!(!routes.is_cacheable(&Method::POST, "/partner-config"));
        assert!(!routes.is_cacheable(&Method::DELETE, "/partner-config/{id}"));
        assert!(!routes.is_cacheable(&Method::GET, "/health"));
        // Se compara contra el template, no contra la URI concreta
        assert!(!routes.is_cacheable(&Method::GET, "/partner-config/7"));
    }

    #[test]
    fn test_empty_table() {
        let routes = CacheRoutes::new();
        assert!(routes.is_empty());
        assert!(!routes.is_cacheable(&Method::GET, "/partner-config"));
    }
}
