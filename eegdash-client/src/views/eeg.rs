//! EEG subject browser and chart slicing

use crate::api::{AnalysisApi, EegDataApi, EegDataQuery};
use crate::error::{ApiError, ApiResult};
use eegdash_common::models::{EegDataPoint, EegSubject, JobAccepted, EEG_CHANNELS};
use tracing::info;

/// Samples drawn in the chart
pub const CHART_POINTS: usize = 100;
/// Rows shown in the sample table
pub const TABLE_ROWS: usize = 50;

/// Server-side path of a subject's exported samples
pub fn subject_data_path(subject_id: &str) -> String {
    format!("uploads/subject_{}_data.csv", subject_id)
}

/// One channel's values, in sample order
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelSeries {
    /// 1-based
    pub channel: usize,
    pub values: Vec<f64>,
}

/// Per-channel series over the first `max_points` samples
///
/// Channels outside 1..=19 are skipped.
pub fn channel_series(points: &[EegDataPoint], channels: &[usize], max_points: usize) -> Vec<ChannelSeries> {
    let window = &points[..points.len().min(max_points)];
    channels
        .iter()
        .copied()
        .filter(|c| (1..=EEG_CHANNELS).contains(c))
        .map(|channel| ChannelSeries {
            channel,
            values: window.iter().filter_map(|p| p.channel(channel)).collect(),
        })
        .collect()
}

/// Case-insensitive match on subject id or description
pub fn filter_subjects<'a>(subjects: &'a [EegSubject], search: &str) -> Vec<&'a EegSubject> {
    let needle = search.trim().to_lowercase();
    subjects
        .iter()
        .filter(|s| {
            needle.is_empty()
                || s.subject_id.to_lowercase().contains(&needle)
                || s.description.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Subject list plus the samples of the selected subject
#[derive(Debug, Clone)]
pub struct EegBrowser {
    api: EegDataApi,
    pub subjects: Vec<EegSubject>,
    pub selected: Option<String>,
    pub data: Vec<EegDataPoint>,
    pub query: EegDataQuery,
}

impl EegBrowser {
    pub fn new(api: EegDataApi) -> Self {
        Self {
            api,
            subjects: Vec::new(),
            selected: None,
            data: Vec::new(),
            query: EegDataQuery::default(),
        }
    }

    pub async fn load_subjects(&mut self) -> ApiResult<()> {
        self.subjects = self.api.get_subjects().await?.subjects;
        Ok(())
    }

    /// Select a subject and load its samples; an empty id clears the selection
    pub async fn select(&mut self, subject_id: &str) -> ApiResult<()> {
        if subject_id.is_empty() {
            self.selected = None;
            self.data.clear();
            return Ok(());
        }
        self.selected = Some(subject_id.to_string());
        self.reload_data().await
    }

    pub async fn reload_data(&mut self) -> ApiResult<()> {
        let Some(subject_id) = self.selected.clone() else {
            return Ok(());
        };
        let response = self.api.get_eeg_data(&subject_id, &self.query).await?;
        self.data = response.data_points;
        Ok(())
    }

    /// Delete all samples for a subject, then refresh the list
    ///
    /// Selection and cached list drop the subject before the reload, which
    /// may still fail.
    pub async fn delete_subject(&mut self, subject_id: &str) -> ApiResult<u64> {
        let response = self.api.delete_eeg_data(subject_id).await?;
        info!(subject_id, rows = response.rows_deleted, "Deleted EEG data");

        if self.selected.as_deref() == Some(subject_id) {
            self.selected = None;
            self.data.clear();
        }
        self.subjects.retain(|s| s.subject_id != subject_id);

        self.load_subjects().await?;
        Ok(response.rows_deleted)
    }

    pub fn delete_prompt(subject_id: &str) -> String {
        format!(
            "Are you sure you want to delete all data for subject {}? This action cannot be undone.",
            subject_id
        )
    }

    pub fn filtered(&self, search: &str) -> Vec<&EegSubject> {
        filter_subjects(&self.subjects, search)
    }

    pub fn chart(&self, channels: &[usize]) -> Vec<ChannelSeries> {
        channel_series(&self.data, channels, CHART_POINTS)
    }

    /// Run the model on a subject's exported samples
    pub async fn predict_subject(analysis: &AnalysisApi, subject_id: &str) -> ApiResult<JobAccepted> {
        if subject_id.trim().is_empty() {
            return Err(ApiError::InvalidInput(
                "Please select a subject to run predictions".to_string(),
            ));
        }
        analysis
            .predict(&subject_data_path(subject_id), subject_id)
            .await
    }
}
