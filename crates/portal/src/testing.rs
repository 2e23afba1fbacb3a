//! Stub collaborators shared by the unit tests.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use async_trait::async_trait;
use tokio::sync::Notify;

use wework_auth::{Role, Sex};
use wework_core::EmployeeId;

use crate::gateway::{AccountGateway, GatewayError};
use crate::session_store::{MemorySessionStore, SessionStore};
use crate::types::{
    ChangePasswordRequest, Credentials, MyAuthorities, Profile, SessionToken, UpdateProfileRequest,
};

pub(crate) const GOOD_PASSWORD: &str = "correct";

pub(crate) fn profile(name: &str, roles: &[&str]) -> Profile {
    Profile {
        employee_id: EmployeeId::new(100),
        name: name.to_string(),
        department: Some("HR".to_string()),
        position: Some("Staff".to_string()),
        login_id: name.to_ascii_lowercase(),
        birthday: None,
        email: None,
        sex: Sex::Unspecified,
        roles: roles.iter().map(|r| Role::parse(r)).collect::<BTreeSet<_>>(),
        permissions: None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Authenticate(String),
    Invalidate(Option<String>),
    FetchProfile(Option<String>),
    UpdateProfile(UpdateProfileRequest),
    ChangePassword(Option<String>),
    FetchAuthorities(Option<String>),
}

/// Scriptable in-process account service.
#[derive(Default)]
pub(crate) struct StubGateway {
    /// `None` makes every profile fetch fail as unauthorized.
    profile: Mutex<Option<Profile>>,
    fail_invalidate: bool,
    fail_update: bool,
    /// Profile fetches past this many fail with a network error.
    fail_profile_after: Option<usize>,
    /// Profile fetches past this many never complete.
    hang_profile_after: Option<usize>,
    hold_authenticate: Option<Arc<Notify>>,
    calls: Mutex<Vec<Call>>,
}

impl StubGateway {
    pub(crate) fn with_profile(profile: Profile) -> Self {
        Self {
            profile: Mutex::new(Some(profile)),
            ..Self::default()
        }
    }

    pub(crate) fn rejecting_profile() -> Self {
        Self::default()
    }

    pub(crate) fn failing_invalidate(mut self) -> Self {
        self.fail_invalidate = true;
        self
    }

    pub(crate) fn failing_update(mut self) -> Self {
        self.fail_update = true;
        self
    }

    pub(crate) fn failing_profile_after(mut self, served: usize) -> Self {
        self.fail_profile_after = Some(served);
        self
    }

    pub(crate) fn hanging_profile_after(mut self, served: usize) -> Self {
        self.hang_profile_after = Some(served);
        self
    }

    /// Park `authenticate` until the returned handle is notified.
    pub(crate) fn holding_authenticate(mut self) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        self.hold_authenticate = Some(gate.clone());
        (self, gate)
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| pred(c)).count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

fn raw(token: Option<&SessionToken>) -> Option<String> {
    token.map(|t| t.as_str().to_string())
}

#[async_trait]
impl AccountGateway for StubGateway {
    async fn authenticate(&self, credentials: &Credentials) -> Result<SessionToken, GatewayError> {
        self.record(Call::Authenticate(credentials.login_id.clone()));
        if let Some(gate) = &self.hold_authenticate {
            gate.notified().await;
        }
        if credentials.password == GOOD_PASSWORD {
            Ok(SessionToken::new(format!("token-{}", credentials.login_id)))
        } else {
            Err(GatewayError::Unauthorized(401))
        }
    }

    async fn invalidate(&self, token: Option<&SessionToken>) -> Result<(), GatewayError> {
        self.record(Call::Invalidate(raw(token)));
        if self.fail_invalidate {
            Err(GatewayError::Network("connection reset".to_string()))
        } else {
            Ok(())
        }
    }

    async fn fetch_profile(&self, token: Option<&SessionToken>) -> Result<Profile, GatewayError> {
        let served = self.count(|c| matches!(c, Call::FetchProfile(_)));
        self.record(Call::FetchProfile(raw(token)));
        if self.hang_profile_after.is_some_and(|n| served >= n) {
            std::future::pending::<()>().await;
        }
        if self.fail_profile_after.is_some_and(|n| served >= n) {
            return Err(GatewayError::Network("down".to_string()));
        }
        if token.is_none() {
            return Err(GatewayError::Unauthorized(401));
        }
        self.profile
            .lock()
            .unwrap()
            .clone()
            .ok_or(GatewayError::Unauthorized(401))
    }

    async fn update_profile(
        &self,
        _token: Option<&SessionToken>,
        request: &UpdateProfileRequest,
    ) -> Result<(), GatewayError> {
        self.record(Call::UpdateProfile(request.clone()));
        if self.fail_update {
            return Err(GatewayError::Api(500, "internal error".to_string()));
        }
        if let Some(profile) = self.profile.lock().unwrap().as_mut() {
            profile.name = request.name.clone();
            profile.email = Some(request.email.clone());
            profile.birthday = request.birthday.parse().ok();
            profile.sex = request.sex;
        }
        Ok(())
    }

    async fn change_password(
        &self,
        token: Option<&SessionToken>,
        _request: &ChangePasswordRequest,
    ) -> Result<(), GatewayError> {
        self.record(Call::ChangePassword(raw(token)));
        Ok(())
    }

    async fn fetch_authorities(&self, token: Option<&SessionToken>) -> Result<MyAuthorities, GatewayError> {
        self.record(Call::FetchAuthorities(raw(token)));
        let profile = self.profile.lock().unwrap().clone().ok_or(GatewayError::Unauthorized(401))?;
        Ok(MyAuthorities {
            roles: profile.roles,
            permissions: profile.permissions.unwrap_or_default(),
            scope_dept_ids: Vec::new(),
        })
    }
}

/// Session store whose reads or clears fail on demand.
#[derive(Default)]
pub(crate) struct FaultyStore {
    inner: MemorySessionStore,
    fail_load: bool,
    fail_clear: bool,
}

impl FaultyStore {
    pub(crate) fn unreadable() -> Self {
        Self {
            fail_load: true,
            ..Self::default()
        }
    }

    pub(crate) fn failing_clear() -> Self {
        Self {
            fail_clear: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl SessionStore for FaultyStore {
    async fn load(&self) -> anyhow::Result<Option<SessionToken>> {
        if self.fail_load {
            return Err(anyhow!("session database is locked"));
        }
        self.inner.load().await
    }

    async fn save(&self, token: &SessionToken) -> anyhow::Result<()> {
        self.inner.save(token).await
    }

    async fn clear(&self) -> anyhow::Result<()> {
        if self.fail_clear {
            return Err(anyhow!("session database is read-only"));
        }
        self.inner.clear().await
    }
}
