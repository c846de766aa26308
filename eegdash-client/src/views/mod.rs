//! Page-level state and behaviour, independent of how it is rendered

pub mod dashboard;
pub mod eeg;
pub mod queue;
pub mod reports;
pub mod result_detail;
pub mod results;
pub mod upload;

pub use dashboard::{DashboardPoller, DashboardSnapshot, DashboardView};
pub use eeg::EegBrowser;
pub use queue::{QueueFilter, QueueStats};
pub use reports::{PatientInfo, ReportComposer, ReportTemplate};
pub use result_detail::{disorder_breakdown, parse_result_id, ResultDetail};
pub use results::{ConfidenceTier, ResultFilter, ResultStats, RiskLevel, SortKey};
pub use upload::{UploadBatch, UploadStatus, UploadWorkflow};
