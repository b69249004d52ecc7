//! Cache invalidation with glob pattern support.

use backoffice_store::StoreResult;
use tracing::{info, warn};

use crate::cache::{CacheKey, ResponseCache};

/// Resultado de una operación de invalidación.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvalidationResult {
    /// Número de keys eliminadas.
    pub count: u64,
    /// Patrones aplicados.
    pub patterns: Vec<String>,
}

impl InvalidationResult {
    fn merge(&mut self, other: InvalidationResult) {
        self.count += other.count;
        self.patterns.extend(other.patterns);
    }
}

impl ResponseCache {
    /// Invalida keys usando un patrón glob estilo Redis.
    ///
    /// - `*`: coincide con cualquier secuencia de caracteres (incluido `/`)
    /// - `?`: coincide con un carácter
    /// - `[abc]`, `[a-z]`, `[^a]`: clases de caracteres
    /// - `\x`: `x` literal
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use std::sync::Arc;
    /// # use backoffice_server::cache::ResponseCache;
    /// # use backoffice_store::MemoryStore;
    /// # #[tokio::main]
    /// # async fn main() {
    /// # let cache = ResponseCache::new(Arc::new(MemoryStore::new(100, std::time::Duration::from_secs(60))));
    /// // Todas las respuestas cacheadas del partner p1
    /// let result = cache.invalidate_by_pattern("p1_*").await.unwrap();
    /// println!("Invalidated {} entries", result.count);
    /// # }
    /// ```
    pub async fn invalidate_by_pattern(&self, pattern: &str) -> StoreResult<InvalidationResult> {
        let count = self.store().delete_matching(pattern).await.inspect_err(|_| {
            self.metrics().record_store_error("delete_matching");
        })?;

        self.metrics().record_invalidated(count);
        info!(pattern = %pattern, count = count, "Cache entries invalidated by pattern");

        Ok(InvalidationResult {
            count,
            patterns: vec![pattern.to_string()],
        })
    }

    /// Para cada URI invalida `pattern + uri + "*"`.
    ///
    /// `invalidate_by_pattern_and_uris("*", &["/partner-config".into()])`
    /// removes every composite key whose path starts with `/partner-config`.
    pub async fn invalidate_by_pattern_and_uris(
        &self,
        pattern: &str,
        uris: &[String],
    ) -> StoreResult<InvalidationResult> {
        let count = self
            .store()
            .delete_matching_with_suffixes(pattern, uris)
            .await
            .inspect_err(|_| {
                self.metrics().record_store_error("delete_matching");
            })?;

        let patterns: Vec<String> = uris.iter().map(|uri| format!("{pattern}{uri}*")).collect();

        self.metrics().record_invalidated(count);
        info!(
            patterns = ?patterns,
            count = count,
            "Cache entries invalidated by URI"
        );

        Ok(InvalidationResult { count, patterns })
    }

    /// Invalida múltiples patrones a la vez. Se detiene en el primer error.
    ///
    /// With a non-empty `uris`, each pattern is expanded as in
    /// [`invalidate_by_pattern_and_uris`](Self::invalidate_by_pattern_and_uris).
    pub async fn invalidate_by_patterns(
        &self,
        patterns: &[String],
        uris: &[String],
    ) -> StoreResult<InvalidationResult> {
        let mut total = InvalidationResult::default();
        for pattern in patterns {
            let result = if uris.is_empty() {
                self.invalidate_by_pattern(pattern).await?
            } else {
                self.invalidate_by_pattern_and_uris(pattern, uris).await?
            };
            total.merge(result);
        }
        Ok(total)
    }

    /// Drops every cached response derived from a resource family.
    ///
    /// Removes the composite keys under `uris` for any partner and origin,
    /// plus the exact authorization-only keys for `credentials`. Those keys
    /// carry no path, so a pattern cannot reach them. Best-effort: failures
    /// are logged and the partial count is returned.
    pub async fn invalidate_resource(
        &self,
        uris: &[String],
        credentials: &[String],
    ) -> InvalidationResult {
        let mut result = match self.invalidate_by_pattern_and_uris("*", uris).await {
            Ok(result) => result,
            Err(e) => {
                warn!(uris = ?uris, error = %e, "Pattern invalidation failed");
                InvalidationResult::default()
            },
        };

        for credential in credentials {
            let key = CacheKey::new(credential.as_str());
            match self.invalidate(&key).await {
                Ok(true) => result.count += 1,
                Ok(false) => {},
                Err(e) => {
                    // No logueamos la key: es una credencial
                    warn!(error = %e, "Credential key invalidation failed");
                },
            }
        }

        result
    }
}
