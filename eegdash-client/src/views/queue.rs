//! Client-side queue filtering and counts

use eegdash_common::models::{AnalysisJob, JobStatus};

/// `None` or `"all"` means no filter on that field
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueueFilter {
    pub search: String,
    pub status: Option<String>,
    pub priority: Option<String>,
}

impl QueueFilter {
    pub fn matches(&self, job: &AnalysisJob) -> bool {
        let needle = self.search.trim().to_lowercase();
        let matches_search = needle.is_empty()
            || job.file_name.to_lowercase().contains(&needle)
            || job.patient_id.to_lowercase().contains(&needle);

        matches_search
            && field_matches(&self.status, job.status.as_str())
            && field_matches(&self.priority, job.priority.as_str())
    }

    pub fn apply<'a>(&self, jobs: &'a [AnalysisJob]) -> Vec<&'a AnalysisJob> {
        jobs.iter().filter(|job| self.matches(job)).collect()
    }
}

fn field_matches(filter: &Option<String>, value: &str) -> bool {
    match filter.as_deref().map(str::trim) {
        None | Some("") | Some("all") => true,
        Some(wanted) => wanted == value,
    }
}

/// Header counts over the unfiltered queue
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueStats {
    pub total: usize,
    pub queued: usize,
    pub processing: usize,
    pub completed: usize,
    pub failed: usize,
}

impl QueueStats {
    pub fn from_jobs(jobs: &[AnalysisJob]) -> Self {
        let count = |status: JobStatus| jobs.iter().filter(|job| job.status == status).count();
        Self {
            total: jobs.len(),
            queued: count(JobStatus::Queued),
            processing: count(JobStatus::Processing),
            completed: count(JobStatus::Completed),
            failed: count(JobStatus::Failed),
        }
    }
}
