//! Authentication endpoints

use crate::error::ApiResult;
use crate::gateway::Gateway;
use eegdash_common::models::{
    HealthResponse, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse,
};

#[derive(Debug, Clone)]
pub struct AuthApi {
    gateway: Gateway,
}

impl AuthApi {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    pub async fn login(&self, username: &str, password: &str) -> ApiResult<LoginResponse> {
        let body = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        self.gateway.post("/login", &body).await
    }

    pub async fn register(
        &self,
        username: &str,
        password: &str,
        role: Option<&str>,
    ) -> ApiResult<RegisterResponse> {
        let body = RegisterRequest {
            username: username.to_string(),
            password: password.to_string(),
            role: role.map(str::to_string),
        };
        self.gateway.post("/register", &body).await
    }

    /// Liveness check; also used as the weak startup token check
    pub async fn check_health(&self) -> ApiResult<HealthResponse> {
        self.gateway.get("/health").await
    }
}
