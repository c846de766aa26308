use crate::error::ApiResult;
use crate::gateway::Gateway;
use eegdash_common::models::{DashboardResponse, SystemStats};

#[derive(Debug, Clone)]
pub struct DashboardApi {
    gateway: Gateway,
}

impl DashboardApi {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    /// Stats, recent analyses and active queue in one call
    pub async fn get_dashboard(&self) -> ApiResult<DashboardResponse> {
        self.gateway.get("/dashboard").await
    }

    pub async fn get_stats(&self) -> ApiResult<SystemStats> {
        self.gateway.get("/stats").await
    }
}
