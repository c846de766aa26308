//! Report composer and downloads

use crate::api::ReportsApi;
use crate::error::{ApiError, ApiResult};
use eegdash_common::models::{GenerateReportRequest, Report, ReportGenerated};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportTemplate {
    #[default]
    Clinical,
    Research,
    Brief,
}

impl ReportTemplate {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportTemplate::Clinical => "clinical",
            ReportTemplate::Research => "research",
            ReportTemplate::Brief => "brief",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReportTemplate::Clinical => "Clinical Report",
            ReportTemplate::Research => "Research Report",
            ReportTemplate::Brief => "Brief Summary",
        }
    }
}

impl fmt::Display for ReportTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportTemplate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "clinical" => Ok(ReportTemplate::Clinical),
            "research" => Ok(ReportTemplate::Research),
            "brief" => Ok(ReportTemplate::Brief),
            other => Err(format!(
                "Unknown template '{}' (expected clinical, research or brief)",
                other
            )),
        }
    }
}

/// Patient details entered on the composer form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientInfo {
    pub patient_id: String,
    pub age: String,
    pub gender: String,
    pub recording_date: String,
    pub clinical_history: String,
    pub medications: String,
}

/// Report generation form
#[derive(Debug, Clone, Default)]
pub struct ReportComposer {
    pub result_id: u64,
    pub template: ReportTemplate,
    pub title: Option<String>,
    pub patient: PatientInfo,
}

impl ReportComposer {
    pub fn new(result_id: u64) -> Self {
        Self {
            result_id,
            ..Default::default()
        }
    }

    /// Title defaults to `<Template label> - <patient>`
    pub fn request(&self) -> ApiResult<GenerateReportRequest> {
        if self.result_id == 0 {
            return Err(ApiError::InvalidIdentifier("Invalid result ID".to_string()));
        }

        let title = match self.title.as_deref().map(str::trim) {
            Some(title) if !title.is_empty() => title.to_string(),
            _ if self.patient.patient_id.is_empty() => self.template.label().to_string(),
            _ => format!("{} - {}", self.template.label(), self.patient.patient_id),
        };

        let patient_info: Value =
            serde_json::to_value(&self.patient).map_err(eegdash_common::Error::from)?;

        Ok(GenerateReportRequest {
            result_id: self.result_id,
            template: self.template.as_str().to_string(),
            title,
            patient_info,
        })
    }

    pub async fn generate(&self, api: &ReportsApi) -> ApiResult<ReportGenerated> {
        let request = self.request()?;
        let generated = api.generate_report(&request).await?;
        info!(report_id = generated.report_id, template = %self.template, "Generated report");
        Ok(generated)
    }
}

/// File name used when the caller gives a directory
pub fn default_download_name(report: &Report) -> String {
    report
        .file_path
        .as_deref()
        .and_then(|p| Path::new(p).file_name())
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| format!("report_{}.pdf", report.id))
}

/// Fetch a report's file and write it to `dest`
///
/// A directory destination gets the report's own file name.
pub async fn download_to(api: &ReportsApi, report_id: u64, dest: &Path) -> ApiResult<PathBuf> {
    let bytes = api.download_report(report_id).await?;

    let target = if tokio::fs::metadata(dest)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false)
    {
        let report = api.get_report(report_id).await?;
        dest.join(default_download_name(&report))
    } else {
        dest.to_path_buf()
    };

    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&target, &bytes).await?;
    info!(report_id, path = %target.display(), bytes = bytes.len(), "Downloaded report");
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_parsing() {
        assert_eq!("Research".parse::<ReportTemplate>().unwrap(), ReportTemplate::Research);
        assert_eq!(ReportTemplate::default().as_str(), "clinical");
        assert!("full".parse::<ReportTemplate>().is_err());
    }

    #[test]
    fn test_request_defaults_title() {
        let mut composer = ReportComposer::new(5);
        composer.template = ReportTemplate::Brief;
        composer.patient.patient_id = "PT-1".to_string();
        composer.patient.clinical_history = "None".to_string();

        let request = composer.request().unwrap();
        assert_eq!(request.title, "Brief Summary - PT-1");
        assert_eq!(request.template, "brief");
        assert_eq!(request.patient_info["patientId"], "PT-1");
        assert_eq!(request.patient_info["clinicalHistory"], "None");
    }

    #[test]
    fn test_request_requires_result() {
        assert!(ReportComposer::default().request().is_err());
    }

    #[test]
    fn test_default_download_name() {
        let report: Report = serde_json::from_value(serde_json::json!({
            "id": 4, "file_path": "reports/clinical_4.pdf"
        }))
        .unwrap();
        assert_eq!(default_download_name(&report), "clinical_4.pdf");

        let bare: Report = serde_json::from_value(serde_json::json!({"id": 8})).unwrap();
        assert_eq!(default_download_name(&bare), "report_8.pdf");
    }
}
