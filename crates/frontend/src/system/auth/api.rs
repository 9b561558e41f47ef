use async_trait::async_trait;
use contracts::system::auth::{AuthResponse, LoginRequest, RegisterRequest};

use crate::shared::http::{ApiClient, ApiError};

/// Anonymous authentication endpoints
#[async_trait(?Send)]
pub trait AuthApi {
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError>;
    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HttpAuthApi;

#[async_trait(?Send)]
impl AuthApi for HttpAuthApi {
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        ApiClient::new().post_json("/auth/login", request).await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        ApiClient::new().post_json("/auth/register", request).await
    }
}
