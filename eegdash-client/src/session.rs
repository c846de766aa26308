//! Session context
//!
//! [`SessionState`] pairs the bearer token with the authenticated user so the
//! two are always set and cleared together. [`Session`] layers the auth
//! actions (login, register, logout, startup validation) on top and is what
//! front ends hold.

use crate::api::auth::AuthApi;
use crate::error::ApiResult;
use crate::token_store::TokenStore;
use eegdash_common::models::User;
use eegdash_common::storage::{DurableStorage, USER_KEY};
use eegdash_common::{ClientEvent, EventBus};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};

/// Credential and user record, kept in lockstep
pub struct SessionState {
    tokens: TokenStore,
    storage: Arc<dyn DurableStorage>,
    user: watch::Sender<Option<User>>,
}

impl SessionState {
    pub fn new(storage: Arc<dyn DurableStorage>) -> Self {
        let (user, _) = watch::channel(None);
        Self {
            tokens: TokenStore::new(storage.clone()),
            storage,
            user,
        }
    }

    /// Current bearer token, hydrated from storage if needed
    pub fn token(&self) -> Option<String> {
        self.tokens.get_token()
    }

    /// Current user, if authenticated
    pub fn user(&self) -> Option<User> {
        self.user.borrow().clone()
    }

    /// Receiver that observes every user change
    pub fn subscribe(&self) -> watch::Receiver<Option<User>> {
        self.user.subscribe()
    }

    /// Store token and user together
    ///
    /// On a storage failure nothing is left half-populated.
    pub fn establish(&self, token: &str, user: &User) -> eegdash_common::Result<()> {
        let encoded = serde_json::to_string(user)?;
        let stored = self
            .tokens
            .set_token(token)
            .and_then(|_| self.storage.set(USER_KEY, &encoded));

        if let Err(e) = stored {
            self.clear();
            return Err(e);
        }

        self.user.send_replace(Some(user.clone()));
        Ok(())
    }

    /// Load the cached user record from durable storage into memory
    ///
    /// A missing or undecodable record leaves the user unset.
    pub fn restore_user(&self) -> Option<User> {
        let raw = match self.storage.get(USER_KEY) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!("Failed to read stored user: {}", e);
                return None;
            }
        };

        match serde_json::from_str::<User>(&raw) {
            Ok(user) => {
                self.user.send_replace(Some(user.clone()));
                Some(user)
            }
            Err(e) => {
                warn!("Discarding undecodable stored user: {}", e);
                None
            }
        }
    }

    /// Wipe token and user from memory and durable storage
    ///
    /// Storage failures are logged; memory is always cleared.
    pub fn clear(&self) {
        if let Err(e) = self.tokens.clear_token() {
            warn!("Failed to remove stored token: {}", e);
        }
        if let Err(e) = self.storage.remove(USER_KEY) {
            warn!("Failed to remove stored user: {}", e);
        }
        self.user.send_replace(None);
    }
}

impl std::fmt::Debug for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionState")
            .field("tokens", &self.tokens)
            .field("user", &*self.user.borrow())
            .finish()
    }
}

/// Application-wide session: current user plus auth actions
pub struct Session {
    state: Arc<SessionState>,
    auth: AuthApi,
    events: EventBus,
    loading: AtomicBool,
}

impl Session {
    pub fn new(state: Arc<SessionState>, auth: AuthApi, events: EventBus) -> Self {
        Self {
            state,
            auth,
            events,
            loading: AtomicBool::new(true),
        }
    }

    /// Startup validation of a persisted session
    ///
    /// With a stored token, the health endpoint is used as a best-effort
    /// validity check; the token itself is never decoded. Success restores the
    /// cached user, failure clears all credential state. Returns whether a
    /// user is present afterwards.
    pub async fn initialize(&self) -> bool {
        if self.state.token().is_some() {
            match self.auth.check_health().await {
                Ok(health) => {
                    if let Some(user) = self.state.restore_user() {
                        info!(
                            username = %user.username,
                            backend = %health.status,
                            "Restored persisted session"
                        );
                        self.events.emit_lossy(ClientEvent::session_started(&user.username));
                    }
                }
                Err(e) => {
                    warn!("Token validation failed: {}", e);
                    self.state.clear();
                }
            }
        }

        self.loading.store(false, Ordering::SeqCst);
        self.is_authenticated()
    }

    /// Authenticate and store token and user together
    ///
    /// Failures propagate untouched.
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<User> {
        let response = self.auth.login(username, password).await?;
        self.state.establish(&response.token, &response.user)?;

        info!(username = %response.user.username, role = %response.user.role, "Logged in");
        self.events
            .emit_lossy(ClientEvent::session_started(&response.user.username));
        Ok(response.user)
    }

    /// Register, then immediately log in with the same credentials
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        role: Option<&str>,
    ) -> ApiResult<User> {
        let registered = self.auth.register(username, password, role).await?;
        info!(user_id = registered.user_id, "Registered {}", username);
        self.login(username, password).await
    }

    /// Clear token, stored user and in-memory user. No backend call.
    pub fn logout(&self) {
        let had_user = self.is_authenticated();
        self.state.clear();
        if had_user {
            info!("Logged out");
        }
        self.events.emit_lossy(ClientEvent::session_ended());
    }

    pub fn user(&self) -> Option<User> {
        self.state.user()
    }

    /// Derived: true iff a user record is present
    pub fn is_authenticated(&self) -> bool {
        self.state.user().is_some()
    }

    /// True until [`Session::initialize`] has finished
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<User>> {
        self.state.subscribe()
    }

    pub fn state(&self) -> &Arc<SessionState> {
        &self.state
    }
}
