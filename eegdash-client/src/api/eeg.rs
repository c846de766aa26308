//! Stored EEG time-series endpoints

use super::require_subject_id;
use crate::error::ApiResult;
use crate::gateway::{Gateway, RequestOptions};
use eegdash_common::models::{
    DeleteEegResponse, EegDataResponse, ImportEegRequest, ImportResponse, SubjectList,
};
use reqwest::Method;

pub const DEFAULT_SAMPLE_LIMIT: u32 = 1000;

/// Window for `GET /eeg/data/{subject_id}`; `limit` is always sent
#[derive(Debug, Clone, PartialEq)]
pub struct EegDataQuery {
    pub limit: u32,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

impl Default for EegDataQuery {
    fn default() -> Self {
        Self {
            limit: DEFAULT_SAMPLE_LIMIT,
            start_time: None,
            end_time: None,
        }
    }
}

impl EegDataQuery {
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![("limit".to_string(), self.limit.to_string())];
        if let Some(start) = self.start_time.as_deref().filter(|s| !s.is_empty()) {
            params.push(("start_time".to_string(), start.to_string()));
        }
        if let Some(end) = self.end_time.as_deref().filter(|s| !s.is_empty()) {
            params.push(("end_time".to_string(), end.to_string()));
        }
        params
    }
}

#[derive(Debug, Clone)]
pub struct EegDataApi {
    gateway: Gateway,
}

impl EegDataApi {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    pub async fn get_subjects(&self) -> ApiResult<SubjectList> {
        self.gateway.get("/eeg/subjects").await
    }

    /// Import a CSV already on the server under `subject_id`
    pub async fn import_eeg_data(&self, file_path: &str, subject_id: &str) -> ApiResult<ImportResponse> {
        let body = ImportEegRequest {
            file_path: file_path.to_string(),
            subject_id: require_subject_id(subject_id)?.to_string(),
        };
        self.gateway.post("/eeg/import", &body).await
    }

    pub async fn get_eeg_data(&self, subject_id: &str, query: &EegDataQuery) -> ApiResult<EegDataResponse> {
        let subject_id = require_subject_id(subject_id)?;
        let options = RequestOptions::new(Method::GET).query(query.to_params());
        self.gateway
            .request(&format!("/eeg/data/{}", subject_id), options)
            .await
    }

    pub async fn delete_eeg_data(&self, subject_id: &str) -> ApiResult<DeleteEegResponse> {
        let subject_id = require_subject_id(subject_id)?;
        self.gateway
            .delete(&format!("/eeg/data/{}", subject_id))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_always_sent() {
        assert_eq!(
            EegDataQuery::default().to_params(),
            vec![("limit".to_string(), "1000".to_string())]
        );
    }

    #[test]
    fn test_time_window_params() {
        let query = EegDataQuery {
            limit: 250,
            start_time: Some("2024-01-01T00:00:00Z".to_string()),
            end_time: Some(String::new()),
        };
        let params = query.to_params();
        assert_eq!(params.len(), 2);
        assert_eq!(params[0], ("limit".to_string(), "250".to_string()));
        assert_eq!(params[1].0, "start_time");
    }
}
