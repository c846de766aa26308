//! File upload endpoints

use super::require_id;
use crate::error::{ApiError, ApiResult};
use crate::gateway::Gateway;
use eegdash_common::models::{FileList, MessageResponse, Priority, UploadResponse};
use reqwest::multipart::{Form, Part};
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone)]
pub struct UploadApi {
    gateway: Gateway,
}

impl UploadApi {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    /// Multipart upload with fields `file`, `patient_id` and `priority`
    pub async fn upload_bytes(
        &self,
        file_name: &str,
        contents: Vec<u8>,
        patient_id: &str,
        priority: &Priority,
    ) -> ApiResult<UploadResponse> {
        let size = contents.len();
        let form = Form::new()
            .part("file", Part::bytes(contents).file_name(file_name.to_string()))
            .text("patient_id", patient_id.to_string())
            .text("priority", priority.as_str().to_string());

        let response: UploadResponse = self.gateway.upload("/upload", form).await?;
        info!(
            file = file_name,
            size,
            job_id = response.job_id,
            "Uploaded file for patient {}",
            patient_id
        );
        Ok(response)
    }

    /// Read a local file and upload it under its own file name
    pub async fn upload_file(
        &self,
        path: &Path,
        patient_id: &str,
        priority: &Priority,
    ) -> ApiResult<UploadResponse> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ApiError::InvalidInput(format!("Not a file: {}", path.display())))?
            .to_string();
        let contents = tokio::fs::read(path).await?;
        self.upload_bytes(&file_name, contents, patient_id, priority)
            .await
    }

    pub async fn list_files(&self) -> ApiResult<FileList> {
        self.gateway.get("/files").await
    }

    pub async fn delete_file(&self, file_id: u64) -> ApiResult<MessageResponse> {
        let id = require_id(file_id, "file")?;
        self.gateway.delete(&format!("/files/{}", id)).await
    }
}
