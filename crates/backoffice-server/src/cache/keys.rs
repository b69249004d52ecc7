//! Cache key derivation from request headers.
//!
//! Keys are plain strings built from the partner identifier, the caller
//! origin, the raw `authorization` value and the request path. Derivation is
//! pure: the same inputs always produce the same key, and requests carrying
//! different credentials never share a key.

use std::fmt;
use std::sync::Arc;

use axum::http::{HeaderMap, HeaderName, Request, Uri, header};
use serde::Deserialize;

/// Header carrying the partner identifier.
pub static PARTNER_ID_HEADER: HeaderName = HeaderName::from_static("partner-id");

/// Key unica de una respuesta cacheada.
/// No se normaliza: el valor de authorization distingue mayusculas.
///
/// Every key embeds the caller's credential. Never put one in a log field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Wraps an already-derived key.
    ///
    /// # Examples
    ///
    /// ```
    /// use backoffice_server::cache::CacheKey;
    ///
    /// let key = CacheKey::new("tok123");
    /// assert_eq!(key.as_str(), "tok123");
    /// ```
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for CacheKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

/// The request attributes that feed key derivation.
///
/// Built once per request; it also carries the origin echoed back in
/// `access-control-allow-origin` when a cached response is served. Empty
/// header values are stored as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestKeyParts {
    pub partner_id: Option<String>,
    pub origin: Option<String>,
    pub authorization: Option<String>,
    /// Request path without the query string
    pub path: String,
}

impl RequestKeyParts {
    /// Creates parts for `path` with no headers.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Extracts the parts from request headers and URI.
    pub fn from_parts(headers: &HeaderMap, uri: &Uri) -> Self {
        Self {
            partner_id: header_value(headers, &PARTNER_ID_HEADER),
            origin: header_value(headers, &header::ORIGIN),
            authorization: header_value(headers, &header::AUTHORIZATION),
            path: uri.path().to_string(),
        }
    }

    pub fn from_request<B>(request: &Request<B>) -> Self {
        Self::from_parts(request.headers(), request.uri())
    }

    pub fn with_partner_id(mut self, partner_id: impl Into<String>) -> Self {
        self.partner_id = non_empty(partner_id.into());
        self
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = non_empty(origin.into());
        self
    }

    pub fn with_authorization(mut self, authorization: impl Into<String>) -> Self {
        self.authorization = non_empty(authorization.into());
        self
    }
}

fn header_value(headers: &HeaderMap, name: &HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .and_then(non_empty)
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

/// Turns request attributes into a cache key.
///
/// Returning `None` means the request must not be cached.
pub trait KeyStrategy: Send + Sync + fmt::Debug {
    fn derive(&self, parts: &RequestKeyParts) -> Option<CacheKey>;

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}

/// Composite key over partner, origin, authorization and path.
///
/// Rules, first match wins:
///
/// | partner | origin | authorization | key |
/// |---------|--------|---------------|-----|
/// | yes | yes | no  | `{partner}_{origin}_{path}` |
/// | yes | yes | yes | `{partner}_{origin}_{authorization}_{path}` |
/// | yes | no  | yes | `{partner}_{authorization}_{path}` |
/// | otherwise |  |  | `{authorization}` or no key |
///
/// # Examples
///
/// ```
/// use backoffice_server::cache::{CompositeKeyStrategy, KeyStrategy, RequestKeyParts};
///
/// let parts = RequestKeyParts::new("/path")
///     .with_partner_id("p1")
///     .with_origin("https://a.com")
///     .with_authorization("tok123");
///
/// let key = CompositeKeyStrategy.derive(&parts).unwrap();
/// assert_eq!(key.as_str(), "p1_https://a.com_tok123_/path");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct CompositeKeyStrategy;

impl KeyStrategy for CompositeKeyStrategy {
    fn derive(&self, parts: &RequestKeyParts) -> Option<CacheKey> {
        let path = &parts.path;
        let key = match (
            parts.partner_id.as_deref(),
            parts.origin.as_deref(),
            parts.authorization.as_deref(),
        ) {
            (Some(partner), Some(origin), None) => format!("{partner}_{origin}_{path}"),
            (Some(partner), Some(origin), Some(auth)) => {
                format!("{partner}_{origin}_{auth}_{path}")
            },
            (Some(partner), None, Some(auth)) => format!("{partner}_{auth}_{path}"),
            (_, _, Some(auth)) => auth.to_string(),
            _ => return None,
        };
        Some(CacheKey(key))
    }

    fn name(&self) -> &'static str {
        "composite"
    }
}

/// Key is the raw authorization value alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthorizationKeyStrategy;

impl KeyStrategy for AuthorizationKeyStrategy {
    fn derive(&self, parts: &RequestKeyParts) -> Option<CacheKey> {
        parts.authorization.clone().map(CacheKey)
    }

    fn name(&self) -> &'static str {
        "authorization"
    }
}

/// Strategy selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyStrategyKind {
    #[default]
    Composite,
    Authorization,
}

impl KeyStrategyKind {
    pub fn build(self) -> Arc<dyn KeyStrategy> {
        match self {
            Self::Composite => Arc::new(CompositeKeyStrategy),
            Self::Authorization => Arc::new(AuthorizationKeyStrategy),
        }
    }
}
