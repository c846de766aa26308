//! Wire models for the EEG analysis backend
//!
//! These are plain request/response records. The backend owns every state
//! transition; the client only reads them and asks for changes through the API.
//!
//! The backend embeds a base model that serializes as `ID`/`CreatedAt`/
//! `UpdatedAt`, while newer handlers emit snake_case. Both spellings are
//! accepted via serde aliases.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

// ========================================
// Enumerations
// ========================================

/// Lifecycle status of an analysis job
///
/// Unknown strings are preserved in [`JobStatus::Unknown`] so one odd record
/// does not fail a whole list response.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobStatus {
    Queued,
    Processing,
    Completed,
    Failed,
    Cancelled,
    Unknown(String),
}

impl JobStatus {
    pub fn as_str(&self) -> &str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
            JobStatus::Cancelled => "cancelled",
            JobStatus::Unknown(s) => s.as_str(),
        }
    }

    /// Queued or processing jobs are still running on the backend
    pub fn is_active(&self) -> bool {
        matches!(self, JobStatus::Queued | JobStatus::Processing)
    }

    /// Human label used in status badges
    pub fn label(&self) -> &str {
        match self {
            JobStatus::Queued => "Queued",
            JobStatus::Processing => "Processing",
            JobStatus::Completed => "Completed",
            JobStatus::Failed => "Failed",
            JobStatus::Cancelled => "Cancelled",
            JobStatus::Unknown(_) => "Unknown",
        }
    }
}

impl From<String> for JobStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "queued" => JobStatus::Queued,
            "processing" => JobStatus::Processing,
            "completed" => JobStatus::Completed,
            "failed" => JobStatus::Failed,
            "cancelled" => JobStatus::Cancelled,
            _ => JobStatus::Unknown(s),
        }
    }
}

impl From<&str> for JobStatus {
    fn from(s: &str) -> Self {
        JobStatus::from(s.to_string())
    }
}

impl From<JobStatus> for String {
    fn from(status: JobStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scheduling hint attached to a job
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Priority {
    Urgent,
    Normal,
    Routine,
    Unknown(String),
}

impl Priority {
    pub fn as_str(&self) -> &str {
        match self {
            Priority::Urgent => "urgent",
            Priority::Normal => "normal",
            Priority::Routine => "routine",
            Priority::Unknown(s) => s.as_str(),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Priority::Urgent => "Urgent",
            Priority::Normal => "Normal",
            Priority::Routine => "Routine",
            Priority::Unknown(_) => "Unknown",
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Normal
    }
}

impl From<String> for Priority {
    fn from(s: String) -> Self {
        match s.as_str() {
            "urgent" => Priority::Urgent,
            "normal" => Priority::Normal,
            "routine" => Priority::Routine,
            _ => Priority::Unknown(s),
        }
    }
}

impl From<&str> for Priority {
    fn from(s: &str) -> Self {
        Priority::from(s.to_string())
    }
}

impl From<Priority> for String {
    fn from(priority: Priority) -> Self {
        priority.as_str().to_string()
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ========================================
// Users and authentication
// ========================================

/// Authenticated user as returned by `/login`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(alias = "ID")]
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub role: String,
}

impl User {
    /// Only used to decide what to render; never a security boundary
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub user_id: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

// ========================================
// Jobs and results
// ========================================

/// Embedded owner summary on a job
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobOwner {
    #[serde(default)]
    pub username: Option<String>,
}

/// One submitted EEG file's classification request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisJob {
    /// 0 when the backend omitted the identifier or sent null
    #[serde(default, alias = "ID", deserialize_with = "null_as_zero")]
    pub id: u64,
    #[serde(default)]
    pub user_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<JobOwner>,
    #[serde(default)]
    pub patient_id: String,
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub file_path: String,
    #[serde(default)]
    pub file_size: u64,
    pub status: JobStatus,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub progress: f64,
    /// Minutes
    #[serde(default)]
    pub estimated_time: f64,
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default)]
    pub completed_at: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<AnalysisResult>,
    #[serde(default, alias = "CreatedAt")]
    pub created_at: String,
    #[serde(default, alias = "UpdatedAt")]
    pub updated_at: String,
}

/// Diagnostic output attached to a completed job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default, alias = "ID")]
    pub id: u64,
    #[serde(default)]
    pub job_id: u64,
    #[serde(default)]
    pub primary_diagnosis: String,
    /// Percent, 0 to 100
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub risk_level: String,
    /// Seconds
    #[serde(default)]
    pub processing_time: f64,
    #[serde(default)]
    pub model_version: String,
    #[serde(default)]
    pub recording_duration: String,
    #[serde(default)]
    pub abnormal_segments: u32,
    #[serde(default)]
    pub detailed_results: String,
    #[serde(default)]
    pub raw_output: String,
    #[serde(default)]
    pub spectral_data: String,
    #[serde(default)]
    pub temporal_data: String,
    #[serde(default, alias = "CreatedAt")]
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifyRequest {
    pub filename: String,
    pub patient_id: String,
    pub priority: Priority,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictRequest {
    pub file_path: String,
    pub patient_id: String,
}

/// Reply to classify/predict
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobAccepted {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub job_id: u64,
    #[serde(default)]
    pub status: String,
}

/// Reply to `POST /upload`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub message: String,
    pub job_id: u64,
    pub filename: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePriorityRequest {
    pub priority: Priority,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: JobStatus,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileList {
    #[serde(default)]
    pub files: Vec<AnalysisJob>,
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobList {
    #[serde(default)]
    pub jobs: Vec<AnalysisJob>,
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultList {
    #[serde(default)]
    pub results: Vec<AnalysisJob>,
    #[serde(default)]
    pub total: u64,
}

/// Generic `{message}` acknowledgement
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

// ========================================
// Dashboard
// ========================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    #[serde(default)]
    pub files_processed_today: u64,
    #[serde(default)]
    pub pending_analyses: u64,
    #[serde(default)]
    pub accuracy_rate: f64,
    /// Minutes
    #[serde(default)]
    pub avg_processing_time: f64,
}

/// Reply to `GET /stats`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemStats {
    #[serde(flatten)]
    pub dashboard: DashboardStats,
    #[serde(default)]
    pub total_files: u64,
    #[serde(default)]
    pub completed_jobs: u64,
    #[serde(default)]
    pub pending_jobs: u64,
    #[serde(default)]
    pub failed_jobs: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardResponse {
    #[serde(default)]
    pub stats: DashboardStats,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub recent_analyses: Vec<AnalysisJob>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub queue_status: Vec<AnalysisJob>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_zero<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<u64>::deserialize(deserializer)?.unwrap_or(0))
}

// ========================================
// Reports
// ========================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateReportRequest {
    pub result_id: u64,
    pub template: String,
    pub title: String,
    pub patient_info: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportGenerated {
    #[serde(default)]
    pub message: String,
    pub report_id: u64,
}

/// Generated report artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    #[serde(alias = "ID")]
    pub id: u64,
    #[serde(default)]
    pub user_id: u64,
    #[serde(default)]
    pub result_id: u64,
    #[serde(default)]
    pub template: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    /// JSON-encoded patient details
    #[serde(default)]
    pub patient_info: String,
    #[serde(default)]
    pub generated_at: String,
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default)]
    pub result: Option<AnalysisResult>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportList {
    #[serde(default)]
    pub reports: Vec<Report>,
    #[serde(default)]
    pub total: u64,
}

// ========================================
// EEG time series
// ========================================

/// Number of electrode channels per sample
pub const EEG_CHANNELS: usize = 19;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EegSubject {
    #[serde(default, alias = "ID")]
    pub id: u64,
    pub subject_id: String,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "CreatedAt")]
    pub created_at: String,
    #[serde(default, alias = "UpdatedAt")]
    pub updated_at: String,
}

/// One multichannel sample
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EegDataPoint {
    pub time: String,
    #[serde(default)]
    pub subject_id: String,
    #[serde(default)]
    pub channel_1: f64,
    #[serde(default)]
    pub channel_2: f64,
    #[serde(default)]
    pub channel_3: f64,
    #[serde(default)]
    pub channel_4: f64,
    #[serde(default)]
    pub channel_5: f64,
    #[serde(default)]
    pub channel_6: f64,
    #[serde(default)]
    pub channel_7: f64,
    #[serde(default)]
    pub channel_8: f64,
    #[serde(default)]
    pub channel_9: f64,
    #[serde(default)]
    pub channel_10: f64,
    #[serde(default)]
    pub channel_11: f64,
    #[serde(default)]
    pub channel_12: f64,
    #[serde(default)]
    pub channel_13: f64,
    #[serde(default)]
    pub channel_14: f64,
    #[serde(default)]
    pub channel_15: f64,
    #[serde(default)]
    pub channel_16: f64,
    #[serde(default)]
    pub channel_17: f64,
    #[serde(default)]
    pub channel_18: f64,
    #[serde(default)]
    pub channel_19: f64,
}

impl EegDataPoint {
    /// 1-based channel lookup, `None` outside 1..=19
    pub fn channel(&self, n: usize) -> Option<f64> {
        let value = match n {
            1 => self.channel_1,
            2 => self.channel_2,
            3 => self.channel_3,
            4 => self.channel_4,
            5 => self.channel_5,
            6 => self.channel_6,
            7 => self.channel_7,
            8 => self.channel_8,
            9 => self.channel_9,
            10 => self.channel_10,
            11 => self.channel_11,
            12 => self.channel_12,
            13 => self.channel_13,
            14 => self.channel_14,
            15 => self.channel_15,
            16 => self.channel_16,
            17 => self.channel_17,
            18 => self.channel_18,
            19 => self.channel_19,
            _ => return None,
        };
        Some(value)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubjectList {
    #[serde(default)]
    pub subjects: Vec<EegSubject>,
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportEegRequest {
    pub file_path: String,
    pub subject_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub subject_id: String,
    #[serde(default)]
    pub file_path: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EegDataResponse {
    #[serde(default)]
    pub subject_id: String,
    #[serde(default)]
    pub data_points: Vec<EegDataPoint>,
    #[serde(default)]
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteEegResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub subject_id: String,
    #[serde(default)]
    pub rows_deleted: u64,
}
