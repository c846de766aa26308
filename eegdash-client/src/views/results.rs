//! Results library: filtering, sorting, summary statistics

use eegdash_common::format::parse_timestamp;
use eegdash_common::models::{AnalysisJob, JobStatus};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// Badge colouring for a confidence percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceTier {
    High,
    Medium,
    Low,
}

impl ConfidenceTier {
    pub fn for_confidence(confidence: f64) -> Self {
        if confidence >= 90.0 {
            ConfidenceTier::High
        } else if confidence >= 70.0 {
            ConfidenceTier::Medium
        } else {
            ConfidenceTier::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RiskLevel {
    High,
    Medium,
    Low,
    Other(String),
}

impl RiskLevel {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "high" => RiskLevel::High,
            "medium" => RiskLevel::Medium,
            "low" => RiskLevel::Low,
            _ => RiskLevel::Other(raw.to_string()),
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::High => f.write_str("High Risk"),
            RiskLevel::Medium => f.write_str("Medium Risk"),
            RiskLevel::Low => f.write_str("Low Risk"),
            RiskLevel::Other(raw) => f.write_str(raw),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    /// Newest first, by completion time falling back to creation time
    #[default]
    Date,
    /// Highest first
    Confidence,
    Patient,
    Diagnosis,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "date" => Ok(SortKey::Date),
            "confidence" => Ok(SortKey::Confidence),
            "patient" => Ok(SortKey::Patient),
            "diagnosis" => Ok(SortKey::Diagnosis),
            other => Err(format!("Unknown sort key: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultFilter {
    pub search: String,
    pub status: Option<String>,
    /// Case-insensitive substring of the primary diagnosis
    pub diagnosis: Option<String>,
    pub sort: SortKey,
}

impl ResultFilter {
    pub fn matches(&self, job: &AnalysisJob) -> bool {
        let diagnosis = diagnosis_of(job).map(str::to_lowercase);

        let needle = self.search.trim().to_lowercase();
        let matches_search = needle.is_empty()
            || job.patient_id.to_lowercase().contains(&needle)
            || job.file_name.to_lowercase().contains(&needle)
            || diagnosis.as_deref().is_some_and(|d| d.contains(&needle));

        let matches_status = match active(&self.status) {
            None => true,
            Some(status) => job.status.as_str() == status,
        };

        let matches_diagnosis = match active(&self.diagnosis) {
            None => true,
            Some(wanted) => diagnosis
                .as_deref()
                .is_some_and(|d| d.contains(&wanted.to_lowercase())),
        };

        matches_search && matches_status && matches_diagnosis
    }

    /// Filtered and sorted copy
    pub fn apply(&self, jobs: &[AnalysisJob]) -> Vec<AnalysisJob> {
        let mut filtered: Vec<AnalysisJob> =
            jobs.iter().filter(|job| self.matches(job)).cloned().collect();
        filtered.sort_by(|a, b| compare(self.sort, a, b));
        filtered
    }
}

fn active(filter: &Option<String>) -> Option<&str> {
    filter
        .as_deref()
        .map(str::trim)
        .filter(|f| !f.is_empty() && *f != "all")
}

fn diagnosis_of(job: &AnalysisJob) -> Option<&str> {
    job.result
        .as_ref()
        .map(|r| r.primary_diagnosis.as_str())
        .filter(|d| !d.is_empty())
}

fn confidence_of(job: &AnalysisJob) -> f64 {
    job.result.as_ref().map(|r| r.confidence).unwrap_or(0.0)
}

/// Unparseable dates sort last
fn sort_timestamp(job: &AnalysisJob) -> i64 {
    let raw = job
        .completed_at
        .as_deref()
        .filter(|s| !s.is_empty())
        .unwrap_or(&job.created_at);
    parse_timestamp(raw)
        .map(|dt| dt.timestamp_millis())
        .unwrap_or(i64::MIN)
}

fn compare(key: SortKey, a: &AnalysisJob, b: &AnalysisJob) -> Ordering {
    match key {
        SortKey::Date => sort_timestamp(b).cmp(&sort_timestamp(a)),
        SortKey::Confidence => confidence_of(b).total_cmp(&confidence_of(a)),
        SortKey::Patient => a.patient_id.cmp(&b.patient_id),
        SortKey::Diagnosis => diagnosis_of(a)
            .unwrap_or("")
            .cmp(diagnosis_of(b).unwrap_or("")),
    }
}

/// Summary cards over the whole library
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultStats {
    pub total: usize,
    /// Completed jobs that carry a result
    pub completed: usize,
    pub average_confidence: f64,
    pub diagnosis_distribution: BTreeMap<String, usize>,
}

impl ResultStats {
    pub fn from_jobs(jobs: &[AnalysisJob]) -> Self {
        let completed: Vec<&AnalysisJob> = jobs
            .iter()
            .filter(|job| job.status == JobStatus::Completed && job.result.is_some())
            .collect();

        let average_confidence = if completed.is_empty() {
            0.0
        } else {
            completed.iter().map(|job| confidence_of(job)).sum::<f64>() / completed.len() as f64
        };

        let mut diagnosis_distribution = BTreeMap::new();
        for job in &completed {
            let diagnosis = diagnosis_of(job).unwrap_or("Unknown").to_string();
            *diagnosis_distribution.entry(diagnosis).or_insert(0) += 1;
        }

        Self {
            total: jobs.len(),
            completed: completed.len(),
            average_confidence,
            diagnosis_distribution,
        }
    }

    /// Most frequent diagnosis; ties go to the alphabetically first
    pub fn most_common_diagnosis(&self) -> Option<&str> {
        self.diagnosis_distribution
            .iter()
            .max_by(|(da, ca), (db, cb)| ca.cmp(cb).then_with(|| db.cmp(da)))
            .map(|(d, _)| d.as_str())
    }
}

/// Distinct non-empty diagnoses, sorted, for the filter picker
pub fn unique_diagnoses(jobs: &[AnalysisJob]) -> Vec<String> {
    jobs.iter()
        .filter_map(diagnosis_of)
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn library() -> Vec<AnalysisJob> {
        serde_json::from_value(json!([
            {"id": 1, "patient_id": "PT-B", "file_name": "b.edf", "status": "completed",
             "created_at": "2024-05-01T08:00:00Z", "completed_at": "2024-05-03T08:00:00Z",
             "result": {"primary_diagnosis": "Epilepsy", "confidence": 95.0}},
            {"id": 2, "patient_id": "PT-A", "file_name": "a.edf", "status": "completed",
             "created_at": "2024-05-02T08:00:00Z",
             "result": {"primary_diagnosis": "Normal", "confidence": 71.0}},
            {"id": 3, "patient_id": "PT-C", "file_name": "c.edf", "status": "failed",
             "created_at": "2024-05-04T08:00:00Z"},
            {"id": 4, "patient_id": "PT-D", "file_name": "d.edf", "status": "completed",
             "created_at": "2024-04-30T08:00:00Z",
             "result": {"primary_diagnosis": "Epilepsy", "confidence": 80.0}}
        ]))
        .unwrap()
    }

    fn ids(jobs: &[AnalysisJob]) -> Vec<u64> {
        jobs.iter().map(|j| j.id).collect()
    }

    #[test]
    fn test_confidence_tiers() {
        assert_eq!(ConfidenceTier::for_confidence(90.0), ConfidenceTier::High);
        assert_eq!(ConfidenceTier::for_confidence(89.9), ConfidenceTier::Medium);
        assert_eq!(ConfidenceTier::for_confidence(70.0), ConfidenceTier::Medium);
        assert_eq!(ConfidenceTier::for_confidence(12.0), ConfidenceTier::Low);
    }

    #[test]
    fn test_risk_level_parsing() {
        assert_eq!(RiskLevel::parse("HIGH"), RiskLevel::High);
        assert_eq!(RiskLevel::parse("medium").to_string(), "Medium Risk");
        assert_eq!(RiskLevel::parse("severe"), RiskLevel::Other("severe".to_string()));
    }

    #[test]
    fn test_sort_by_date_uses_completion_first() {
        let sorted = ResultFilter::default().apply(&library());
        assert_eq!(ids(&sorted), vec![3, 1, 2, 4]);
    }

    #[test]
    fn test_sort_by_confidence_and_patient() {
        let by_conf = ResultFilter { sort: SortKey::Confidence, ..Default::default() };
        assert_eq!(ids(&by_conf.apply(&library())), vec![1, 4, 2, 3]);

        let by_patient = ResultFilter { sort: SortKey::Patient, ..Default::default() };
        assert_eq!(ids(&by_patient.apply(&library())), vec![2, 1, 3, 4]);
    }

    #[test]
    fn test_search_covers_diagnosis() {
        let filter = ResultFilter { search: "epilep".to_string(), ..Default::default() };
        assert_eq!(filter.apply(&library()).len(), 2);
    }

    #[test]
    fn test_status_and_diagnosis_filters() {
        let filter = ResultFilter {
            status: Some("completed".to_string()),
            diagnosis: Some("normal".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(&filter.apply(&library())), vec![2]);
    }

    #[test]
    fn test_stats() {
        let stats = ResultStats::from_jobs(&library());
        assert_eq!(stats.total, 4);
        assert_eq!(stats.completed, 3);
        assert!((stats.average_confidence - 82.0).abs() < 1e-9);
        assert_eq!(stats.diagnosis_distribution.get("Epilepsy"), Some(&2));
        assert_eq!(stats.most_common_diagnosis(), Some("Epilepsy"));
        assert_eq!(unique_diagnoses(&library()), vec!["Epilepsy", "Normal"]);
    }

    #[test]
    fn test_sort_key_parsing() {
        assert_eq!("confidence".parse::<SortKey>().unwrap(), SortKey::Confidence);
        assert!("size".parse::<SortKey>().is_err());
    }
}
