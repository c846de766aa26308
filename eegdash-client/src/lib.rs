//! eegdash-client library interface
//!
//! Client for the EEG analysis backend: credential store, request gateway,
//! typed resource APIs, session context and page view models. The `eegdash`
//! binary is a thin terminal front end over this crate.

pub mod api;
pub mod error;
pub mod gateway;
pub mod session;
pub mod token_store;
pub mod views;

pub use crate::api::ApiClient;
pub use crate::error::{ApiError, ApiResult};
pub use crate::gateway::{Gateway, RequestOptions};
pub use crate::session::{Session, SessionState};
pub use crate::token_store::TokenStore;

use eegdash_common::config::ClientConfig;
use eegdash_common::{DurableStorage, EventBus, FileStorage};
use serde::Serialize;
use std::sync::Arc;

/// Build identification, captured by build.rs
#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    pub version: &'static str,
    /// `git describe` output, or `untracked` outside a checkout
    pub revision: &'static str,
    /// UTC build date, `YYYY-MM-DD`
    pub built_on: &'static str,
    pub optimized: bool,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            revision: env!("EEGDASH_REVISION"),
            built_on: env!("EEGDASH_BUILT_ON"),
            optimized: env!("EEGDASH_OPTIMIZED") == "true",
        }
    }
}

impl std::fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "eegdash {} (rev {}, built {}, {})",
            self.version,
            self.revision,
            self.built_on,
            if self.optimized { "release" } else { "debug" }
        )
    }
}

/// Everything a front end needs, wired over one storage and one event bus
pub struct ClientContext {
    pub api: ApiClient,
    pub session: Session,
    pub events: EventBus,
    pub poll_interval: std::time::Duration,
}

impl ClientContext {
    /// Open the state file from `config` and wire the client over it
    pub fn from_config(config: &ClientConfig) -> ApiResult<Self> {
        let storage = FileStorage::open(&config.state_file)?;
        let mut context = Self::with_storage(&config.api_url, Arc::new(storage))?;
        context.poll_interval = config.poll_interval;
        Ok(context)
    }

    pub fn with_storage(api_url: &str, storage: Arc<dyn DurableStorage>) -> ApiResult<Self> {
        let events = EventBus::default();
        let state = Arc::new(SessionState::new(storage));
        let gateway = Gateway::new(api_url, state.clone(), events.clone())?;
        let api = ApiClient::new(gateway);
        let session = Session::new(state, api.auth.clone(), events.clone());

        Ok(Self {
            api,
            session,
            events,
            poll_interval: std::time::Duration::from_secs(
                eegdash_common::config::DEFAULT_POLL_INTERVAL_SECS,
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_info_display() {
        let info = BuildInfo {
            version: "0.1.0",
            revision: "a1b2c3d-dirty",
            built_on: "2026-10-16",
            optimized: false,
        };
        assert_eq!(
            info.to_string(),
            "eegdash 0.1.0 (rev a1b2c3d-dirty, built 2026-10-16, debug)"
        );

        let release = BuildInfo { optimized: true, ..info };
        assert!(release.to_string().ends_with(", release)"));
    }

    #[test]
    fn test_build_info_current_uses_package_version() {
        let info = BuildInfo::current();
        assert_eq!(info.version, env!("CARGO_PKG_VERSION"));
        assert!(!info.revision.is_empty());
        assert_eq!(info.built_on.len(), 10);
    }
}
