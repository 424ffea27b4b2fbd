use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use registry::AppRegistry;
use shared::error::AppError;

/// Caller presenting the configured admin bearer token. Without a configured
/// token every request is rejected.
pub struct AdminUser;

#[async_trait]
impl FromRequestParts<AppRegistry> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        registry: &AppRegistry,
    ) -> Result<Self, Self::Rejection> {
        let config = registry.config();
        let expected = config
            .server
            .admin_token
            .as_deref()
            .ok_or(AppError::UnauthorizedError)?;

        let presented = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or(AppError::UnauthorizedError)?;

        if presented.trim() != expected {
            return Err(AppError::UnauthorizedError);
        }
        Ok(Self)
    }
}
