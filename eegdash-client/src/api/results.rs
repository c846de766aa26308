use super::require_id;
use crate::error::ApiResult;
use crate::gateway::Gateway;
use eegdash_common::models::{AnalysisJob, MessageResponse, ResultList};

#[derive(Debug, Clone)]
pub struct ResultsApi {
    gateway: Gateway,
}

impl ResultsApi {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    pub async fn get_results(&self) -> ApiResult<ResultList> {
        self.gateway.get("/results").await
    }

    /// Job with its attached result, if any
    pub async fn get_result(&self, result_id: u64) -> ApiResult<AnalysisJob> {
        let id = require_id(result_id, "result")?;
        self.gateway.get(&format!("/results/{}", id)).await
    }

    /// Permanent removal of the job, its result and uploaded files
    pub async fn delete_result(&self, result_id: u64) -> ApiResult<MessageResponse> {
        let id = require_id(result_id, "result")?;
        self.gateway.delete(&format!("/results/{}", id)).await
    }
}
