use super::require_id;
use crate::error::ApiResult;
use crate::gateway::Gateway;
use eegdash_common::models::{
    GenerateReportRequest, MessageResponse, Report, ReportGenerated, ReportList,
};

#[derive(Debug, Clone)]
pub struct ReportsApi {
    gateway: Gateway,
}

impl ReportsApi {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    pub async fn generate_report(&self, request: &GenerateReportRequest) -> ApiResult<ReportGenerated> {
        require_id(request.result_id, "result")?;
        self.gateway.post("/reports/generate", request).await
    }

    pub async fn get_reports(&self) -> ApiResult<ReportList> {
        self.gateway.get("/reports").await
    }

    pub async fn get_report(&self, report_id: u64) -> ApiResult<Report> {
        let id = require_id(report_id, "report")?;
        self.gateway.get(&format!("/reports/{}", id)).await
    }

    pub async fn delete_report(&self, report_id: u64) -> ApiResult<MessageResponse> {
        let id = require_id(report_id, "report")?;
        self.gateway.delete(&format!("/reports/{}", id)).await
    }

    /// Rendered report file as raw bytes
    pub async fn download_report(&self, report_id: u64) -> ApiResult<Vec<u8>> {
        let id = require_id(report_id, "report")?;
        self.gateway
            .download(&format!("/reports/{}/download", id))
            .await
    }
}
