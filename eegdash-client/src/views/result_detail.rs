//! Single result page: id parsing, probability breakdown, report request

use crate::api::{ReportsApi, ResultsApi};
use crate::error::{ApiError, ApiResult};
use eegdash_common::models::{AnalysisJob, AnalysisResult, GenerateReportRequest, ReportGenerated};
use serde_json::json;

use super::results::ConfidenceTier;

/// Parse a result id from route or CLI input, before any request
pub fn parse_result_id(raw: &str) -> ApiResult<u64> {
    let raw = raw.trim();
    if raw.is_empty() || raw == "undefined" || raw == "null" {
        return Err(ApiError::InvalidIdentifier("Invalid result ID".to_string()));
    }

    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id as u64),
        _ => Err(ApiError::InvalidIdentifier("Invalid result ID format".to_string())),
    }
}

/// One bar in the disorder probability chart
#[derive(Debug, Clone, PartialEq)]
pub struct DisorderProbability {
    pub disorder: String,
    /// Percent
    pub probability: f64,
}

/// Primary diagnosis at its confidence, remainder split 60/30/10
///
/// Entries that come out at zero or below are dropped.
pub fn disorder_breakdown(result: &AnalysisResult) -> Vec<DisorderProbability> {
    let primary = result.confidence;
    let remaining = 100.0 - primary;

    [
        (result.primary_diagnosis.as_str(), primary),
        ("Normal/Healthy", remaining * 0.6),
        ("Other Conditions", remaining * 0.3),
        ("Inconclusive", remaining * 0.1),
    ]
    .into_iter()
    .filter(|(_, probability)| *probability > 0.0)
    .map(|(disorder, probability)| DisorderProbability {
        disorder: disorder.to_string(),
        probability,
    })
    .collect()
}

/// One-line interpretation shown under the diagnosis
pub fn interpretation(result: &AnalysisResult) -> String {
    let diagnosis = result.primary_diagnosis.to_lowercase();
    match ConfidenceTier::for_confidence(result.confidence) {
        ConfidenceTier::High => format!("Strong evidence of {}.", diagnosis),
        ConfidenceTier::Medium => format!("Moderate evidence of {}. Clinical correlation recommended.", diagnosis),
        ConfidenceTier::Low => format!(
            "Inconclusive findings for {}. Additional testing may be needed.",
            diagnosis
        ),
    }
}

/// Clinical report request for a completed job
pub fn clinical_report_request(job: &AnalysisJob) -> ApiResult<GenerateReportRequest> {
    let result = job.result.as_ref().ok_or_else(|| {
        ApiError::InvalidInput("Analysis has no result to report on".to_string())
    })?;

    Ok(GenerateReportRequest {
        result_id: result.id,
        template: "clinical".to_string(),
        title: format!("Clinical Analysis Report - {}", job.patient_id),
        patient_info: json!({
            "patient_id": job.patient_id,
            "file_name": job.file_name,
            "analysis_date": job.completed_at,
        }),
    })
}

/// Loaded result page
#[derive(Debug, Clone)]
pub struct ResultDetail {
    pub job: AnalysisJob,
}

impl ResultDetail {
    /// Validate `raw_id`, then fetch
    pub async fn load(api: &ResultsApi, raw_id: &str) -> ApiResult<Self> {
        let id = parse_result_id(raw_id)?;
        let job = api.get_result(id).await?;
        Ok(Self { job })
    }

    pub fn breakdown(&self) -> Vec<DisorderProbability> {
        self.job
            .result
            .as_ref()
            .map(disorder_breakdown)
            .unwrap_or_default()
    }

    pub async fn generate_report(&self, api: &ReportsApi) -> ApiResult<ReportGenerated> {
        let request = clinical_report_request(&self.job)?;
        api.generate_report(&request).await
    }
}
