//! Calls into the remote account/auth service.

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::config::PortalConfig;
use crate::types::{
    ChangePasswordRequest, Credentials, LoginResponse, MyAuthorities, Profile, SessionToken,
    UpdateProfileRequest,
};

pub const LOGIN_PATH: &str = "/api/auth/login";
pub const LOGOUT_PATH: &str = "/api/auth/logout";
pub const PROFILE_PATH: &str = "/api/account/me";
pub const PASSWORD_PATH: &str = "/api/account/me/password";
pub const AUTHORITIES_PATH: &str = "/api/account/me/auth";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("network error: {0}")]
    Network(String),
    #[error("rejected by the account service ({0})")]
    Unauthorized(u16),
    #[error("API error ({0}): {1}")]
    Api(u16, String),
    #[error("parse error: {0}")]
    Parse(String),
}

/// The account/auth service as seen by the client.
///
/// Every call receives the current session token, if any. Implementations
/// attach it as a bearer credential and omit the header when it is `None`.
#[async_trait]
pub trait AccountGateway: Send + Sync {
    async fn authenticate(&self, credentials: &Credentials) -> Result<SessionToken, GatewayError>;

    async fn invalidate(&self, token: Option<&SessionToken>) -> Result<(), GatewayError>;

    async fn fetch_profile(&self, token: Option<&SessionToken>) -> Result<Profile, GatewayError>;

    async fn update_profile(
        &self,
        token: Option<&SessionToken>,
        request: &UpdateProfileRequest,
    ) -> Result<(), GatewayError>;

    async fn change_password(
        &self,
        token: Option<&SessionToken>,
        request: &ChangePasswordRequest,
    ) -> Result<(), GatewayError>;

    async fn fetch_authorities(&self, token: Option<&SessionToken>) -> Result<MyAuthorities, GatewayError>;
}

/// `reqwest`-backed gateway.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    api_url: String,
}

impl HttpGateway {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), api_url)
    }

    pub fn with_client(client: reqwest::Client, api_url: impl Into<String>) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Self { client, api_url }
    }

    pub fn from_config(config: &PortalConfig) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        Ok(Self::with_client(client, config.api_url.clone()))
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn request(&self, method: Method, path: &str, token: Option<&SessionToken>) -> RequestBuilder {
        let url = format!("{}{}", self.api_url, path);
        let req = self.client.request(method, url);
        match token {
            Some(token) => req.bearer_auth(token.as_str()),
            None => req,
        }
    }

    async fn send(req: RequestBuilder) -> Result<Response, GatewayError> {
        let resp = req
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(GatewayError::Unauthorized(status.as_u16()));
        }
        if !status.is_success() {
            return Err(GatewayError::Api(status.as_u16(), resp.text().await.unwrap_or_default()));
        }
        Ok(resp)
    }

    async fn json<T: DeserializeOwned>(resp: Response) -> Result<T, GatewayError> {
        resp.json().await.map_err(|e| GatewayError::Parse(e.to_string()))
    }
}

#[async_trait]
impl AccountGateway for HttpGateway {
    async fn authenticate(&self, credentials: &Credentials) -> Result<SessionToken, GatewayError> {
        tracing::debug!(login_id = %credentials.login_id, "POST {LOGIN_PATH}");
        let resp = Self::send(self.request(Method::POST, LOGIN_PATH, None).json(credentials)).await?;
        let body: LoginResponse = Self::json(resp).await?;
        Ok(body.access_token)
    }

    async fn invalidate(&self, token: Option<&SessionToken>) -> Result<(), GatewayError> {
        tracing::debug!("POST {LOGOUT_PATH}");
        Self::send(self.request(Method::POST, LOGOUT_PATH, token)).await?;
        Ok(())
    }

    async fn fetch_profile(&self, token: Option<&SessionToken>) -> Result<Profile, GatewayError> {
        tracing::debug!("GET {PROFILE_PATH}");
        let resp = Self::send(self.request(Method::GET, PROFILE_PATH, token)).await?;
        Self::json(resp).await
    }

    async fn update_profile(
        &self,
        token: Option<&SessionToken>,
        request: &UpdateProfileRequest,
    ) -> Result<(), GatewayError> {
        tracing::debug!("PUT {PROFILE_PATH}");
        Self::send(self.request(Method::PUT, PROFILE_PATH, token).json(request)).await?;
        Ok(())
    }

    async fn change_password(
        &self,
        token: Option<&SessionToken>,
        request: &ChangePasswordRequest,
    ) -> Result<(), GatewayError> {
        tracing::debug!("PUT {PASSWORD_PATH}");
        Self::send(self.request(Method::PUT, PASSWORD_PATH, token).json(request)).await?;
        Ok(())
    }

    async fn fetch_authorities(&self, token: Option<&SessionToken>) -> Result<MyAuthorities, GatewayError> {
        tracing::debug!("GET {AUTHORITIES_PATH}");
        let resp = Self::send(self.request(Method::GET, AUTHORITIES_PATH, token)).await?;
        Self::json(resp).await
    }
}
