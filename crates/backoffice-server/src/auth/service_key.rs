//! Service API key authentication middleware.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use backoffice_core::ApiKeyStore;
use tracing::{debug, warn};

/// Servicio autenticado, insertado en las extensions del request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceIdentity {
    pub service_name: String,
}

/// Looks up the raw `authorization` value among the provisioned keys.
///
/// A match attaches a [`ServiceIdentity`] to the request. Anything else,
/// including a failing key store, lets the request continue unmarked; the
/// handlers decide whether that is acceptable.
pub async fn authenticate_service(
    State(keys): State<Arc<dyn ApiKeyStore>>,
    mut request: Request,
    next: Next,
) -> Response {
    let credential = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .filter(|h| !h.is_empty())
        .map(str::to_string);

    if let Some(credential) = credential {
        match keys.find(&credential).await {
            Ok(Some(key)) => {
                debug!(service = %key.service_name, "Service authenticated");
                request.extensions_mut().insert(ServiceIdentity {
                    service_name: key.service_name,
                });
            },
            Ok(None) => debug!("Unknown service key"),
            Err(e) => warn!(error = %e, "Service key lookup failed"),
        }
    }

    next.run(request).await
}

/// Extract authenticated service from request extensions
pub fn get_authenticated_service(request: &Request) -> Option<&ServiceIdentity> {
    request.extensions().get::<ServiceIdentity>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, middleware, routing::get};
    use backoffice_core::{InMemoryApiKeyStore, ServiceApiKey};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn app() -> Router {
        let keys: Arc<dyn ApiKeyStore> = Arc::new(InMemoryApiKeyStore::with_keys([
            ServiceApiKey::new("billing", "tok123"),
        ]));

        Router::new()
            .route(
                "/whoami",
                get(|request: Request| async move {
                    get_authenticated_service(&request)
                        .map(|s| s.service_name.clone())
                        .unwrap_or_else(|| "anonymous".to_string())
                }),
            )
            .layer(middleware::from_fn_with_state(keys, authenticate_service))
    }

    async fn whoami(authorization: Option<&str>) -> String {
        let mut builder = Request::builder().uri("/whoami");
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }

        let response = app()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_known_key_attaches_identity() {
        assert_eq!(whoami(Some("tok123")).await, "billing");
    }

    #[tokio::test]
    async fn test_unknown_or_missing_key_stays_anonymous() {
        assert_eq!(whoami(Some("nope")).await, "anonymous");
        assert_eq!(whoami(Some("")).await, "anonymous");
        assert_eq!(whoami(None).await, "anonymous");
    }

    #[tokio::test]
    async fn test_lookup_is_exact() {
        // Sin normalizacion: prefijos o mayusculas no cuentan
        assert_eq!(whoami(Some("Bearer tok123")).await, "anonymous");
        assert_eq!(whoami(Some("TOK123")).await, "anonymous");
    }
}
