//! Authentication/session lifecycle.
//!
//! The controller owns the in-memory profile and is the only writer of the
//! session store. Views observe it through [`AuthController::subscribe`];
//! every transition is published before the operation that caused it returns.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tokio::sync::{Mutex, MutexGuard, watch};

use wework_core::DomainError;

use crate::gateway::{AccountGateway, GatewayError};
use crate::session_store::SessionStore;
use crate::types::{
    ChangePasswordRequest, Credentials, MyAuthorities, Profile, SessionToken, UpdateProfileRequest,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthPhase {
    /// Silent restore has not finished yet.
    Initializing,
    Anonymous,
    Authenticated,
    /// Login, logout or a profile refresh is in flight.
    Transitioning,
}

/// What subscribers see: the phase plus the profile, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthSnapshot {
    pub phase: AuthPhase,
    pub profile: Option<Arc<Profile>>,
}

impl AuthSnapshot {
    pub fn initializing() -> Self {
        Self {
            phase: AuthPhase::Initializing,
            profile: None,
        }
    }

    fn anonymous() -> Self {
        Self {
            phase: AuthPhase::Anonymous,
            profile: None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.profile.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.phase == AuthPhase::Initializing
    }

    /// No profile yet, but one may still arrive.
    pub fn is_pending(&self) -> bool {
        self.profile.is_none()
            && matches!(self.phase, AuthPhase::Initializing | AuthPhase::Transitioning)
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("login ID and password are required")]
    MissingCredentials,

    /// Deliberately generic: never says which credential was wrong.
    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("another authentication operation is already in progress")]
    Busy,

    #[error("signed out while the operation was in flight")]
    Cancelled,

    #[error("not signed in")]
    NotAuthenticated,

    #[error(transparent)]
    Invalid(#[from] DomainError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("session storage failed: {0:#}")]
    Store(anyhow::Error),
}

pub struct AuthController {
    gateway: Arc<dyn AccountGateway>,
    store: Arc<dyn SessionStore>,
    state: watch::Sender<AuthSnapshot>,
    /// Held for the duration of every state-changing operation.
    in_flight: Mutex<()>,
    /// Bumped by every logout. In-flight operations abort when it moves.
    logout_epoch: watch::Sender<u64>,
}

impl AuthController {
    pub fn new(gateway: Arc<dyn AccountGateway>, store: Arc<dyn SessionStore>) -> Self {
        let (state, _) = watch::channel(AuthSnapshot::initializing());
        let (logout_epoch, _) = watch::channel(0);
        Self {
            gateway,
            store,
            state,
            in_flight: Mutex::new(()),
            logout_epoch,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthSnapshot> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> AuthSnapshot {
        self.state.borrow().clone()
    }

    pub fn phase(&self) -> AuthPhase {
        self.state.borrow().phase
    }

    pub fn profile(&self) -> Option<Arc<Profile>> {
        self.state.borrow().profile.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading()
    }

    /// Best-effort restore from a previously stored token.
    ///
    /// Failures are logged and swallowed: the outcome is always `Anonymous` or
    /// `Authenticated`. A token the service rejects stays in storage; only
    /// [`AuthController::logout`] removes it.
    pub async fn restore_session(&self) -> Result<AuthPhase, AuthError> {
        self.exclusive(self.restore_inner()).await
    }

    pub async fn login(&self, login_id: &str, password: &str) -> Result<Arc<Profile>, AuthError> {
        let credentials = Credentials::new(login_id, password);
        if !credentials.is_complete() {
            return Err(AuthError::MissingCredentials);
        }
        self.exclusive(self.login_inner(&credentials)).await
    }

    /// Invalidate remotely (best-effort), then always drop the local session.
    ///
    /// Never refused as busy: an operation still in flight is cancelled first.
    pub async fn logout(&self) -> Result<(), AuthError> {
        self.logout_epoch.send_modify(|epoch| *epoch += 1);
        let _guard = self.in_flight.lock().await;
        self.mark_transitioning();

        let token = self.load_token_lenient().await;
        if let Err(err) = self.gateway.invalidate(token.as_ref()).await {
            tracing::warn!(error = %err, "logout call failed; clearing local session anyway");
        }

        let cleared = self.store.clear().await;
        self.publish(AuthSnapshot::anonymous());

        cleared.map_err(|err| {
            tracing::error!(error = %format!("{err:#}"), "failed to clear session token");
            AuthError::Store(err)
        })
    }

    /// Re-read the profile and replace it wholesale.
    ///
    /// Returns `None` (and ends `Anonymous`) when no token is stored. On
    /// failure the previous snapshot is kept.
    pub async fn refresh_profile(&self) -> Result<Option<Arc<Profile>>, AuthError> {
        self.exclusive(self.refresh_inner()).await
    }

    /// Push the edited fields, then refresh so derived views see them.
    pub async fn update_profile(&self, request: &UpdateProfileRequest) -> Result<Arc<Profile>, AuthError> {
        self.exclusive(async {
            self.require_authenticated()?;

            let token = self.store.load().await.map_err(AuthError::Store)?;
            self.gateway.update_profile(token.as_ref(), request).await?;
            tracing::info!("profile updated");

            self.refresh_inner().await?.ok_or(AuthError::NotAuthenticated)
        })
        .await
    }

    pub async fn change_password(&self, request: &ChangePasswordRequest) -> Result<(), AuthError> {
        self.exclusive(async {
            self.require_authenticated()?;

            let token = self.store.load().await.map_err(AuthError::Store)?;
            self.gateway.change_password(token.as_ref(), request).await?;
            tracing::info!("password changed");
            Ok(())
        })
        .await
    }

    /// Read-only: roles, permissions and department scopes of the session.
    pub async fn fetch_authorities(&self) -> Result<MyAuthorities, AuthError> {
        self.require_authenticated()?;
        let token = self.store.load().await.map_err(AuthError::Store)?;
        Ok(self.gateway.fetch_authorities(token.as_ref()).await?)
    }

    /// Run `op` as the single in-flight operation, abandoning it on logout.
    async fn exclusive<T>(&self, op: impl Future<Output = Result<T, AuthError>>) -> Result<T, AuthError> {
        let mut logged_out = self.logout_epoch.subscribe();
        let _guard = self.begin()?;

        tokio::select! {
            result = op => result,
            _ = logged_out.changed() => {
                tracing::info!("in-flight auth operation cancelled by logout");
                Err(AuthError::Cancelled)
            }
        }
    }

    async fn restore_inner(&self) -> Result<AuthPhase, AuthError> {
        let token = match self.store.load().await {
            Ok(Some(token)) => token,
            Ok(None) => {
                tracing::debug!("no stored session");
                self.publish(AuthSnapshot::anonymous());
                return Ok(AuthPhase::Anonymous);
            }
            Err(err) => {
                tracing::warn!(error = %format!("{err:#}"), "session store unreadable; starting signed out");
                self.publish(AuthSnapshot::anonymous());
                return Ok(AuthPhase::Anonymous);
            }
        };

        match self.gateway.fetch_profile(Some(&token)).await {
            Ok(profile) => {
                self.publish_authenticated(profile);
                Ok(AuthPhase::Authenticated)
            }
            Err(err) => {
                tracing::warn!(error = %err, "silent session restore failed");
                self.publish(AuthSnapshot::anonymous());
                Ok(AuthPhase::Anonymous)
            }
        }
    }

    async fn login_inner(&self, credentials: &Credentials) -> Result<Arc<Profile>, AuthError> {
        self.mark_transitioning();

        let token = match self.gateway.authenticate(credentials).await {
            Ok(token) => token,
            Err(err) => {
                tracing::warn!(login_id = %credentials.login_id, error = %err, "login rejected");
                self.publish(AuthSnapshot::anonymous());
                return Err(AuthError::AuthenticationFailed);
            }
        };

        if let Err(err) = self.store.save(&token).await {
            tracing::error!(error = %format!("{err:#}"), "failed to persist session token");
            self.publish(AuthSnapshot::anonymous());
            return Err(AuthError::Store(err));
        }

        match self.gateway.fetch_profile(Some(&token)).await {
            Ok(profile) => Ok(self.publish_authenticated(profile)),
            Err(err) => {
                tracing::warn!(error = %err, "profile fetch after login failed");
                self.publish(AuthSnapshot::anonymous());
                Err(AuthError::AuthenticationFailed)
            }
        }
    }

    async fn refresh_inner(&self) -> Result<Option<Arc<Profile>>, AuthError> {
        let previous = self.snapshot();

        let Some(token) = self.store.load().await.map_err(AuthError::Store)? else {
            self.publish(AuthSnapshot::anonymous());
            return Ok(None);
        };

        self.mark_transitioning();
        match self.gateway.fetch_profile(Some(&token)).await {
            Ok(profile) => Ok(Some(self.publish_authenticated(profile))),
            Err(err) => {
                tracing::warn!(error = %err, "profile refresh failed");
                // Nothing to fall back to before the first restore.
                if previous.phase == AuthPhase::Initializing {
                    self.publish(AuthSnapshot::anonymous());
                } else {
                    self.publish(previous);
                }
                Err(err.into())
            }
        }
    }

    fn begin(&self) -> Result<MutexGuard<'_, ()>, AuthError> {
        self.in_flight.try_lock().map_err(|_| {
            tracing::debug!("rejecting overlapping auth operation");
            AuthError::Busy
        })
    }

    fn require_authenticated(&self) -> Result<(), AuthError> {
        if self.is_authenticated() {
            Ok(())
        } else {
            Err(AuthError::NotAuthenticated)
        }
    }

    async fn load_token_lenient(&self) -> Option<SessionToken> {
        self.store.load().await.unwrap_or_else(|err| {
            tracing::warn!(error = %format!("{err:#}"), "session store unreadable");
            None
        })
    }

    fn mark_transitioning(&self) {
        self.state.send_modify(|s| s.phase = AuthPhase::Transitioning);
    }

    fn publish_authenticated(&self, profile: Profile) -> Arc<Profile> {
        let profile = Arc::new(profile);
        tracing::info!(employee_id = %profile.employee_id, "signed in");
        self.publish(AuthSnapshot {
            phase: AuthPhase::Authenticated,
            profile: Some(profile.clone()),
        });
        profile
    }

    fn publish(&self, snapshot: AuthSnapshot) {
        let phase = snapshot.phase;
        let old = self.state.send_replace(snapshot);
        if old.phase != phase {
            tracing::info!(from = ?old.phase, to = ?phase, "auth state changed");
        }
    }
}
