//! Typed resource APIs
//!
//! One thin wrapper per backend resource, each holding a clone of the shared
//! [`Gateway`]. [`ApiClient`] bundles them.

pub mod analysis;
pub mod auth;
pub mod dashboard;
pub mod eeg;
pub mod reports;
pub mod results;
pub mod upload;

pub use analysis::{AnalysisApi, DeleteAction, QueueQuery};
pub use auth::AuthApi;
pub use dashboard::DashboardApi;
pub use eeg::{EegDataApi, EegDataQuery};
pub use reports::ReportsApi;
pub use results::ResultsApi;
pub use upload::UploadApi;

use crate::error::{ApiError, ApiResult};
use crate::gateway::Gateway;

/// All resource APIs over one gateway
#[derive(Debug, Clone)]
pub struct ApiClient {
    pub auth: AuthApi,
    pub dashboard: DashboardApi,
    pub upload: UploadApi,
    pub analysis: AnalysisApi,
    pub results: ResultsApi,
    pub reports: ReportsApi,
    pub eeg: EegDataApi,
}

impl ApiClient {
    pub fn new(gateway: Gateway) -> Self {
        Self {
            auth: AuthApi::new(gateway.clone()),
            dashboard: DashboardApi::new(gateway.clone()),
            upload: UploadApi::new(gateway.clone()),
            analysis: AnalysisApi::new(gateway.clone()),
            results: ResultsApi::new(gateway.clone()),
            reports: ReportsApi::new(gateway.clone()),
            eeg: EegDataApi::new(gateway),
        }
    }
}

/// Refuse the zero id a corrupted record decodes to
pub(crate) fn require_id(id: u64, what: &str) -> ApiResult<u64> {
    if id == 0 {
        return Err(ApiError::InvalidIdentifier(format!("Invalid {} ID", what)));
    }
    Ok(id)
}

/// Subject ids are interpolated into the path, so only a safe charset passes
pub(crate) fn require_subject_id(subject_id: &str) -> ApiResult<&str> {
    let valid = !subject_id.is_empty()
        && subject_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if !valid || subject_id == "." || subject_id == ".." {
        return Err(ApiError::InvalidIdentifier(format!(
            "Invalid subject ID '{}'",
            subject_id
        )));
    }
    Ok(subject_id)
}
