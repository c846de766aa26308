//! Upload batch and workflow
//!
//! A batch is tied to one patient and priority. Each file is uploaded, then
//! queued for classification under the filename the backend assigned:
//!
//! ```text
//! Uploading(0) -> Uploading(50) -> Uploaded(100, job_id) -> Analyzing(0)
//!                        \________________\___________________> Error(message)
//! ```
//!
//! Items run concurrently and fail independently.

use crate::api::{AnalysisApi, UploadApi};
use crate::error::{ApiError, ApiResult};
use eegdash_common::format::format_file_size;
use eegdash_common::models::{AnalysisJob, JobAccepted, JobStatus, Priority};
use futures::future::join_all;
use std::fmt;
use std::path::Path;
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

/// 500 MB per file
pub const MAX_UPLOAD_BYTES: u64 = 500 * 1024 * 1024;

/// Lowercase, without the dot
pub const ACCEPTED_EXTENSIONS: [&str; 3] = ["edf", "csv", "txt"];

#[derive(Debug, Clone, PartialEq)]
pub enum UploadStatus {
    Uploading,
    Uploaded,
    Analyzing,
    Completed,
    Error(String),
}

impl UploadStatus {
    pub fn is_finished(&self) -> bool {
        matches!(self, UploadStatus::Completed | UploadStatus::Error(_))
    }
}

impl fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadStatus::Uploading => f.write_str("Uploading"),
            UploadStatus::Uploaded => f.write_str("Uploaded"),
            UploadStatus::Analyzing => f.write_str("Analyzing"),
            UploadStatus::Completed => f.write_str("Completed"),
            UploadStatus::Error(message) => write!(f, "Error: {}", message),
        }
    }
}

/// One file in a batch
#[derive(Debug, Clone)]
pub struct UploadItem {
    pub id: Uuid,
    pub name: String,
    pub size: u64,
    pub patient_id: String,
    pub priority: Priority,
    pub status: UploadStatus,
    /// Percent
    pub progress: u8,
    pub job_id: Option<u64>,
    contents: Vec<u8>,
}

impl UploadItem {
    /// Not yet sent
    fn is_pending(&self) -> bool {
        self.status == UploadStatus::Uploading && self.progress == 0
    }

    pub fn size_label(&self) -> String {
        format_file_size(self.size)
    }

    fn set(&mut self, status: UploadStatus, progress: u8) {
        self.status = status;
        self.progress = progress;
    }
}

/// Progress notification for live displays
#[derive(Debug, Clone, PartialEq)]
pub struct UploadProgress {
    pub item: Uuid,
    pub name: String,
    pub status: UploadStatus,
    pub progress: u8,
}

#[derive(Debug, Clone)]
pub struct UploadBatch {
    patient_id: String,
    priority: Priority,
    items: Vec<UploadItem>,
    /// Most recent item failure, shown as a banner
    pub last_error: Option<String>,
}

impl UploadBatch {
    /// A patient ID is required before any file is accepted
    pub fn new(patient_id: &str, priority: Priority) -> ApiResult<Self> {
        let patient_id = patient_id.trim();
        if patient_id.is_empty() {
            return Err(ApiError::InvalidInput(
                "Please enter a Patient ID before uploading files".to_string(),
            ));
        }
        Ok(Self {
            patient_id: patient_id.to_string(),
            priority,
            items: Vec::new(),
            last_error: None,
        })
    }

    pub fn patient_id(&self) -> &str {
        &self.patient_id
    }

    pub fn priority(&self) -> &Priority {
        &self.priority
    }

    pub fn items(&self) -> &[UploadItem] {
        &self.items
    }

    pub fn item(&self, id: Uuid) -> Option<&UploadItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Queue in-memory file contents
    pub fn add_file(&mut self, name: &str, contents: Vec<u8>) -> ApiResult<Uuid> {
        validate_file(name, contents.len() as u64)?;

        let item = UploadItem {
            id: Uuid::new_v4(),
            name: name.to_string(),
            size: contents.len() as u64,
            patient_id: self.patient_id.clone(),
            priority: self.priority.clone(),
            status: UploadStatus::Uploading,
            progress: 0,
            job_id: None,
            contents,
        };
        let id = item.id;
        self.items.push(item);
        Ok(id)
    }

    /// Queue a file from disk; size and type are checked before reading
    pub async fn add_path(&mut self, path: &Path) -> ApiResult<Uuid> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ApiError::InvalidInput(format!("Not a file: {}", path.display())))?
            .to_string();
        let metadata = tokio::fs::metadata(path).await?;
        validate_file(&name, metadata.len())?;

        let contents = tokio::fs::read(path).await?;
        self.add_file(&name, contents)
    }

    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.id != id);
        self.items.len() != before
    }

    /// Drop completed and failed items
    pub fn clear_finished(&mut self) {
        self.items.retain(|i| !i.status.is_finished());
    }

    /// Move analyzing items forward from the backend's view of their jobs
    pub fn sync_with_jobs(&mut self, jobs: &[AnalysisJob]) {
        for item in self
            .items
            .iter_mut()
            .filter(|i| i.status == UploadStatus::Analyzing)
        {
            let Some(job) = item
                .job_id
                .and_then(|id| jobs.iter().find(|job| job.id == id))
            else {
                continue;
            };

            match &job.status {
                JobStatus::Completed => item.set(UploadStatus::Completed, 100),
                JobStatus::Failed | JobStatus::Cancelled => {
                    let message = job
                        .error_message
                        .clone()
                        .filter(|m| !m.trim().is_empty())
                        .unwrap_or_else(|| format!("Analysis {}", job.status));
                    item.set(UploadStatus::Error(message), 0);
                }
                _ => item.progress = job.progress.clamp(0.0, 100.0) as u8,
            }
        }
    }
}

fn validate_file(name: &str, size: u64) -> ApiResult<()> {
    let extension = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension {
        Some(ext) if ACCEPTED_EXTENSIONS.contains(&ext.as_str()) => {}
        _ => {
            return Err(ApiError::InvalidInput(format!(
                "Unsupported file type: {} (expected EDF, CSV or TXT)",
                name
            )))
        }
    }

    if size > MAX_UPLOAD_BYTES {
        return Err(ApiError::InvalidInput(format!(
            "{} is {}, larger than the 500 MB limit",
            name,
            format_file_size(size)
        )));
    }
    Ok(())
}

/// Message shown for a failed item
pub fn upload_error_message(err: &ApiError, patient_id: &str) -> String {
    let message = err.to_string();
    if message.contains("already exists") {
        format!(
            "Patient ID '{}' already exists. Please use a unique patient ID or clear the existing records for this patient.",
            patient_id
        )
    } else {
        message
    }
}

/// Drives a batch through upload and classification
#[derive(Debug, Clone)]
pub struct UploadWorkflow {
    upload: UploadApi,
    analysis: AnalysisApi,
    progress: Option<mpsc::UnboundedSender<UploadProgress>>,
}

impl UploadWorkflow {
    pub fn new(upload: UploadApi, analysis: AnalysisApi) -> Self {
        Self {
            upload,
            analysis,
            progress: None,
        }
    }

    pub fn with_progress(mut self, tx: mpsc::UnboundedSender<UploadProgress>) -> Self {
        self.progress = Some(tx);
        self
    }

    /// Process every item not yet sent, concurrently
    pub async fn run(&self, batch: &mut UploadBatch) {
        let pending: Vec<_> = batch
            .items
            .iter_mut()
            .filter(|i| i.is_pending())
            .map(|item| self.process(item))
            .collect();

        let errors: Vec<String> = join_all(pending).await.into_iter().flatten().collect();
        if let Some(last) = errors.last() {
            batch.last_error = Some(last.clone());
        }
    }

    /// Returns the failure message, if any
    async fn process(&self, item: &mut UploadItem) -> Option<String> {
        self.advance(item, UploadStatus::Uploading, 50);

        let contents = std::mem::take(&mut item.contents);
        let uploaded = match self
            .upload
            .upload_bytes(&item.name, contents, &item.patient_id, &item.priority)
            .await
        {
            Ok(uploaded) => uploaded,
            Err(e) => return Some(self.fail(item, &e)),
        };

        item.job_id = Some(uploaded.job_id);
        self.advance(item, UploadStatus::Uploaded, 100);

        if let Err(e) = self
            .analysis
            .start_classification(&uploaded.filename, &item.patient_id, &item.priority)
            .await
        {
            return Some(self.fail(item, &e));
        }

        self.advance(item, UploadStatus::Analyzing, 0);
        info!(file = %item.name, job_id = uploaded.job_id, "Queued for analysis");
        None
    }

    fn advance(&self, item: &mut UploadItem, status: UploadStatus, progress: u8) {
        item.set(status, progress);
        if let Some(tx) = &self.progress {
            let _ = tx.send(UploadProgress {
                item: item.id,
                name: item.name.clone(),
                status: item.status.clone(),
                progress,
            });
        }
    }

    fn fail(&self, item: &mut UploadItem, err: &ApiError) -> String {
        let message = upload_error_message(err, &item.patient_id);
        warn!(file = %item.name, "Upload failed: {}", message);
        let progress = item.progress;
        self.advance(item, UploadStatus::Error(message.clone()), progress);
        message
    }

    /// Run the model directly on an uploaded file
    pub async fn predict(&self, item: &UploadItem) -> ApiResult<JobAccepted> {
        if item.job_id.is_none() {
            return Err(ApiError::InvalidInput(
                "File not uploaded properly, cannot run prediction".to_string(),
            ));
        }
        self.analysis
            .predict(&format!("uploads/{}", item.name), &item.patient_id)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_patient_id_required() {
        assert!(UploadBatch::new("   ", Priority::Normal).is_err());
        let batch = UploadBatch::new(" PT-1 ", Priority::Urgent).unwrap();
        assert_eq!(batch.patient_id(), "PT-1");
    }

    #[test]
    fn test_accepted_types() {
        let mut batch = UploadBatch::new("PT-1", Priority::Normal).unwrap();
        assert!(batch.add_file("a.edf", vec![1]).is_ok());
        assert!(batch.add_file("b.CSV", vec![1]).is_ok());
        assert!(batch.add_file("c.txt", vec![1]).is_ok());
        assert!(batch.add_file("d.pdf", vec![1]).is_err());
        assert!(batch.add_file("noext", vec![1]).is_err());
        assert_eq!(batch.items().len(), 3);
    }

    #[test]
    fn test_size_limit() {
        assert!(validate_file("big.edf", MAX_UPLOAD_BYTES).is_ok());
        let err = validate_file("big.edf", MAX_UPLOAD_BYTES + 1).unwrap_err();
        assert!(err.to_string().contains("500 MB"));
    }

    #[test]
    fn test_duplicate_patient_message() {
        let err = ApiError::Validation {
            status: 409,
            message: "Patient ID 'PT-1' already exists in an active job".to_string(),
        };
        assert_eq!(
            upload_error_message(&err, "PT-1"),
            "Patient ID 'PT-1' already exists. Please use a unique patient ID or clear the existing records for this patient."
        );

        let other = ApiError::Server { status: 500, message: "disk full".to_string() };
        assert_eq!(upload_error_message(&other, "PT-1"), "disk full");
    }

    #[test]
    fn test_sync_with_jobs() {
        let mut batch = UploadBatch::new("PT-1", Priority::Normal).unwrap();
        let a = batch.add_file("a.edf", vec![]).unwrap();
        let b = batch.add_file("b.edf", vec![]).unwrap();
        for (item, job_id) in batch.items.iter_mut().zip([10, 11]) {
            item.job_id = Some(job_id);
            item.set(UploadStatus::Analyzing, 0);
        }

        let jobs: Vec<AnalysisJob> = serde_json::from_value(json!([
            {"id": 10, "status": "completed"},
            {"id": 11, "status": "failed", "error_message": "bad header"}
        ]))
        .unwrap();
        batch.sync_with_jobs(&jobs);

        assert_eq!(batch.item(a).unwrap().status, UploadStatus::Completed);
        assert_eq!(
            batch.item(b).unwrap().status,
            UploadStatus::Error("bad header".to_string())
        );

        batch.clear_finished();
        assert!(batch.items().is_empty());
    }

    #[test]
    fn test_sync_blank_error_message_falls_back_to_status() {
        let mut batch = UploadBatch::new("PT-1", Priority::Normal).unwrap();
        let a = batch.add_file("a.edf", vec![]).unwrap();
        let b = batch.add_file("b.edf", vec![]).unwrap();
        for (item, job_id) in batch.items.iter_mut().zip([20, 21]) {
            item.job_id = Some(job_id);
            item.set(UploadStatus::Analyzing, 0);
        }

        let jobs: Vec<AnalysisJob> = serde_json::from_value(json!([
            {"id": 20, "status": "failed", "error_message": ""},
            {"id": 21, "status": "cancelled", "error_message": "   "}
        ]))
        .unwrap();
        batch.sync_with_jobs(&jobs);

        assert_eq!(
            batch.item(a).unwrap().status,
            UploadStatus::Error("Analysis failed".to_string())
        );
        assert_eq!(
            batch.item(b).unwrap().status,
            UploadStatus::Error("Analysis cancelled".to_string())
        );
    }
}
