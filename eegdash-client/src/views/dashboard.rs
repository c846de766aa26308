//! Dashboard view model and background poller
//!
//! The dashboard shows summary stats, the most recent analyses and the active
//! queue. Records the backend sent without an id are kept visible but flagged
//! as corrupted, and every action on them is disabled.

use crate::api::{AnalysisApi, DashboardApi, DeleteAction};
use crate::error::{ApiError, ApiResult};
use eegdash_common::models::{
    AnalysisJob, DashboardResponse, DashboardStats, JobAccepted, MessageResponse,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

pub const MISSING_ID_WARNING: &str =
    "Some analysis records are missing IDs. Please contact support.";

/// One recent analysis as rendered
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRow {
    pub job: AnalysisJob,
    /// Backend sent the record without an id
    pub corrupted: bool,
}

impl AnalysisRow {
    pub fn actions_enabled(&self) -> bool {
        !self.corrupted
    }
}

/// Summary card
#[derive(Debug, Clone, PartialEq)]
pub struct QuickStat {
    pub title: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardView {
    pub stats: DashboardStats,
    pub recent: Vec<AnalysisRow>,
    pub queue: Vec<AnalysisJob>,
    pub warning: Option<String>,
}

impl DashboardView {
    pub fn from_response(response: DashboardResponse) -> Self {
        let recent: Vec<AnalysisRow> = response
            .recent_analyses
            .into_iter()
            .map(|job| AnalysisRow {
                corrupted: job.id == 0,
                job,
            })
            .collect();

        let corrupted = recent.iter().filter(|r| r.corrupted).count();
        let warning = if corrupted > 0 {
            warn!(count = corrupted, "Dashboard returned analyses without IDs");
            Some(MISSING_ID_WARNING.to_string())
        } else {
            None
        };

        Self {
            stats: response.stats,
            recent,
            queue: response.queue_status,
            warning,
        }
    }

    pub fn quick_stats(&self) -> Vec<QuickStat> {
        vec![
            QuickStat {
                title: "Files Processed Today",
                value: self.stats.files_processed_today.to_string(),
            },
            QuickStat {
                title: "Pending Analyses",
                value: self.stats.pending_analyses.to_string(),
            },
            QuickStat {
                title: "Accuracy Rate",
                value: format!("{:.1}%", self.stats.accuracy_rate),
            },
            QuickStat {
                title: "Avg Processing Time",
                value: format!("{:.1} min", self.stats.avg_processing_time),
            },
        ]
    }

    /// Look up a recent analysis by id; id 0 never matches
    pub fn find_recent(&self, id: u64) -> Option<&AnalysisJob> {
        if id == 0 {
            return None;
        }
        self.recent.iter().map(|r| &r.job).find(|job| job.id == id)
    }

    /// Confirmation prompt for deleting or cancelling `job`
    pub fn delete_prompt(job: &AnalysisJob) -> String {
        let patient = patient_label(job);
        match DeleteAction::for_status(&job.status) {
            DeleteAction::Cancel => format!(
                "Are you sure you want to cancel the analysis for {}?\n\nThis will stop the current processing.",
                patient
            ),
            DeleteAction::Purge => format!(
                "Are you sure you want to delete the analysis for {}?\n\nThis will permanently remove the analysis job, results, and associated files. This action cannot be undone.",
                patient
            ),
        }
    }

    /// Cancel or purge a recent analysis, then drop it from the view
    ///
    /// Refuses unknown or zero ids without contacting the backend. On success
    /// the job leaves both lists and `pending_analyses` drops by one if the job
    /// was still active. Returns a confirmation message.
    pub async fn delete_analysis(&mut self, api: &AnalysisApi, id: u64) -> ApiResult<String> {
        if id == 0 {
            return Err(ApiError::InvalidIdentifier(
                "Invalid analysis ID. Please refresh the page and try again.".to_string(),
            ));
        }
        let job = self.find_recent(id).cloned().ok_or_else(|| {
            ApiError::InvalidIdentifier(
                "Analysis not found. Please refresh the page and try again.".to_string(),
            )
        })?;

        let _: MessageResponse = api.delete_analysis(id, &job.status).await?;
        self.remove_analysis(id, job.status.is_active());

        let patient = patient_label(&job);
        let message = match DeleteAction::for_status(&job.status) {
            DeleteAction::Cancel => format!("Analysis for {} has been successfully cancelled.", patient),
            DeleteAction::Purge => format!("Analysis for {} has been successfully deleted.", patient),
        };
        info!("{}", message);
        Ok(message)
    }

    /// Optimistic local removal after a confirmed delete
    pub fn remove_analysis(&mut self, id: u64, was_active: bool) {
        self.recent.retain(|r| r.job.id != id);
        self.queue.retain(|job| job.id != id);
        if was_active {
            self.stats.pending_analyses = self.stats.pending_analyses.saturating_sub(1);
        }
    }

    /// Re-run the model on a job's stored file
    pub async fn predict(api: &AnalysisApi, job: &AnalysisJob) -> ApiResult<JobAccepted> {
        if job.id == 0 {
            return Err(ApiError::InvalidIdentifier("Invalid analysis ID".to_string()));
        }
        if job.file_path.trim().is_empty() {
            return Err(ApiError::InvalidInput(
                "File path not available for prediction".to_string(),
            ));
        }
        api.predict(&job.file_path, &job.patient_id).await
    }
}

fn patient_label(job: &AnalysisJob) -> &str {
    if job.patient_id.is_empty() {
        "Unknown Patient"
    } else {
        &job.patient_id
    }
}

/// Latest poll outcome
///
/// A failed poll keeps the previous view and sets `error`, so the banner
/// shows over stale data until the next success.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardSnapshot {
    pub view: Option<DashboardView>,
    pub error: Option<String>,
    pub loading: bool,
}

/// Background task refreshing the dashboard on a fixed period
///
/// Fetches immediately, then once per period or on [`DashboardPoller::refresh`].
/// Stops on cancel, on drop, or after a 401 (the session is gone by then).
pub struct DashboardPoller {
    cancel: CancellationToken,
    refresh: Arc<Notify>,
    snapshots: watch::Receiver<DashboardSnapshot>,
    handle: Option<JoinHandle<()>>,
}

impl DashboardPoller {
    pub fn spawn(api: DashboardApi, period: Duration) -> Self {
        let cancel = CancellationToken::new();
        let refresh = Arc::new(Notify::new());
        let (tx, snapshots) = watch::channel(DashboardSnapshot {
            loading: true,
            ..Default::default()
        });

        info!("Starting dashboard poller (interval: {}s)", period.as_secs());
        let handle = tokio::spawn(poll_loop(api, period, cancel.clone(), refresh.clone(), tx));

        Self {
            cancel,
            refresh,
            snapshots,
            handle: Some(handle),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<DashboardSnapshot> {
        self.snapshots.clone()
    }

    pub fn latest(&self) -> DashboardSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Manual refresh, outside the regular period
    pub fn refresh(&self) {
        self.refresh.notify_one();
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Cancel and wait for the task to finish
    pub async fn stop(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                error!("Dashboard poller task failed: {}", e);
            }
        }
    }
}

impl Drop for DashboardPoller {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn poll_loop(
    api: DashboardApi,
    period: Duration,
    cancel: CancellationToken,
    refresh: Arc<Notify>,
    tx: watch::Sender<DashboardSnapshot>,
) {
    let mut timer = interval(period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = timer.tick() => {}
            _ = refresh.notified() => debug!("Manual dashboard refresh"),
        }

        tx.send_modify(|s| s.loading = true);
        let result = api.get_dashboard().await;

        match result {
            Ok(response) => {
                let view = DashboardView::from_response(response);
                tx.send_replace(DashboardSnapshot {
                    view: Some(view),
                    error: None,
                    loading: false,
                });
            }
            Err(e) => {
                let unauthorized = e.is_unauthorized();
                if unauthorized {
                    warn!("Dashboard poll unauthorized, stopping poller");
                } else {
                    error!("Dashboard poll failed: {}", e);
                }
                tx.send_modify(|s| {
                    s.error = Some(e.to_string());
                    s.loading = false;
                });
                if unauthorized {
                    break;
                }
            }
        }
    }

    debug!("Dashboard poller stopped");
}
