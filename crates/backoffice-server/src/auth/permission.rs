//! Permission check for service-only endpoints.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::auth::ServiceIdentity;
use crate::error::AppError;

/// Extractor que exige un servicio autenticado.
///
/// Rejects with 403 when [`authenticate_service`](crate::auth::authenticate_service)
/// did not attach a [`ServiceIdentity`].
#[derive(Debug, Clone)]
pub struct RequireService(pub ServiceIdentity);

impl<S> FromRequestParts<S> for RequireService
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<ServiceIdentity>()
            .cloned()
            .map(RequireService)
            .ok_or_else(|| {
                AppError::Forbidden("A valid service API key is required".to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Request, StatusCode};
    use axum::response::IntoResponse;

    #[tokio::test]
    async fn test_rejects_without_identity() {
        let (mut parts, _) = Request::builder().body(()).unwrap().into_parts();

        let rejection = RequireService::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();

        assert_eq!(rejection.into_response().status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_accepts_with_identity() {
        let (mut parts, _) = Request::builder().body(()).unwrap().into_parts();
        parts.extensions.insert(ServiceIdentity {
            service_name: "billing".to_string(),
        });

        let RequireService(identity) = RequireService::from_request_parts(&mut parts, &())
            .await
            .unwrap();

        assert_eq!(identity.service_name, "billing");
    }
}
