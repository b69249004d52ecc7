//! Service API key authentication.
//!
//! - `authenticate_service`: middleware que marca el request con el servicio
//! - `RequireService`: extractor que rechaza con 403 si no hay marca

mod permission;
mod service_key;

pub use permission::RequireService;
pub use service_key::{ServiceIdentity, authenticate_service, get_authenticated_service};
