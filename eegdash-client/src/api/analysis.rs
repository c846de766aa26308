//! Classification, queue and prediction endpoints

use super::require_id;
use crate::error::ApiResult;
use crate::gateway::{Gateway, RequestOptions};
use eegdash_common::models::{
    ClassifyRequest, JobAccepted, JobList, JobStatus, MessageResponse, PredictRequest, Priority,
    UpdatePriorityRequest, UpdateStatusRequest,
};
use reqwest::Method;
use tracing::info;

/// Server-side filter for `GET /queue`
///
/// `all` and empty values mean no filter and are not sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueueQuery {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub search: Option<String>,
}

impl QueueQuery {
    pub fn to_params(&self) -> Vec<(String, String)> {
        // "all" is a filter sentinel; a search for the text "all" is sent as is
        let mut params = Vec::new();
        for (key, value, filter) in [
            ("status", &self.status, true),
            ("priority", &self.priority, true),
            ("search", &self.search, false),
        ] {
            if let Some(value) = value {
                let value = value.trim();
                if !value.is_empty() && !(filter && value == "all") {
                    params.push((key.to_string(), value.to_string()));
                }
            }
        }
        params
    }
}

/// How a delete request is routed, chosen from the job's status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteAction {
    /// Stop an active job: `DELETE /queue/{id}`
    Cancel,
    /// Remove a finished job with its result and files: `DELETE /results/{id}`
    Purge,
}

impl DeleteAction {
    pub fn for_status(status: &JobStatus) -> Self {
        match status {
            JobStatus::Queued | JobStatus::Processing => DeleteAction::Cancel,
            JobStatus::Completed
            | JobStatus::Failed
            | JobStatus::Cancelled
            | JobStatus::Unknown(_) => DeleteAction::Purge,
        }
    }

    pub fn path(&self, id: u64) -> String {
        match self {
            DeleteAction::Cancel => format!("/queue/{}", id),
            DeleteAction::Purge => format!("/results/{}", id),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnalysisApi {
    gateway: Gateway,
}

impl AnalysisApi {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    /// Queue an uploaded file for classification
    pub async fn start_classification(
        &self,
        filename: &str,
        patient_id: &str,
        priority: &Priority,
    ) -> ApiResult<JobAccepted> {
        let body = ClassifyRequest {
            filename: filename.to_string(),
            patient_id: patient_id.to_string(),
            priority: priority.clone(),
        };
        self.gateway.post("/classify", &body).await
    }

    pub async fn get_queue(&self, query: &QueueQuery) -> ApiResult<JobList> {
        let options = RequestOptions::new(Method::GET).query(query.to_params());
        self.gateway.request("/queue", options).await
    }

    pub async fn update_priority(&self, job_id: u64, priority: &Priority) -> ApiResult<MessageResponse> {
        let id = require_id(job_id, "job")?;
        let body = UpdatePriorityRequest {
            priority: priority.clone(),
        };
        self.gateway
            .put(&format!("/queue/{}/priority", id), &body)
            .await
    }

    pub async fn update_status(&self, job_id: u64, status: &JobStatus) -> ApiResult<MessageResponse> {
        let id = require_id(job_id, "job")?;
        let body = UpdateStatusRequest {
            status: status.clone(),
        };
        self.gateway.put(&format!("/queue/{}/status", id), &body).await
    }

    pub async fn cancel_job(&self, job_id: u64) -> ApiResult<MessageResponse> {
        let id = require_id(job_id, "job")?;
        self.gateway.delete(&DeleteAction::Cancel.path(id)).await
    }

    /// Run the model directly on a file already on the server
    pub async fn predict(&self, file_path: &str, patient_id: &str) -> ApiResult<JobAccepted> {
        let body = PredictRequest {
            file_path: file_path.to_string(),
            patient_id: patient_id.to_string(),
        };
        self.gateway.post("/predict", &body).await
    }

    /// Cancel an active job or purge a finished one, depending on `status`
    pub async fn delete_analysis(&self, job_id: u64, status: &JobStatus) -> ApiResult<MessageResponse> {
        let id = require_id(job_id, "analysis")?;
        let action = DeleteAction::for_status(status);
        info!(job_id = id, status = %status, ?action, "Deleting analysis");
        self.gateway.delete(&action.path(id)).await
    }
}
