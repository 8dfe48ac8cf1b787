use std::time::Duration;

use reqwest::{Client, StatusCode};

use super::error::AuthError;
use super::types::{rejection_reason, TokenBody};
use crate::traits::{AuthBackend, AuthResponse, Credentials};

pub const DEFAULT_BASE_URL: &str = "https://reqres.in/api";

#[derive(Debug, Clone, Copy)]
enum Endpoint {
    Login,
    Register,
}

impl Endpoint {
    fn path(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Register => "register",
        }
    }

    /// What a 400 from this endpoint means.
    fn rejection(self) -> AuthError {
        match self {
            Self::Login => AuthError::InvalidCredentials,
            Self::Register => AuthError::EmailConflictOrInvalid,
        }
    }
}

/// Client for the email/password demo auth API.
pub struct AuthClient {
    base_url: String,
    api_key: Option<String>,
    http: Client,
}

impl AuthClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            api_key: None,
            http: Client::new(),
        }
    }

    /// Client with a request timeout applied to every call.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, AuthError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            ..Self::new(base_url)
        })
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|k| !k.is_empty());
        self
    }

    async fn post_credentials(
        &self,
        endpoint: Endpoint,
        credentials: &Credentials,
    ) -> Result<AuthResponse, AuthError> {
        let mut req = self
            .http
            .post(format!("{}/{}", self.base_url, endpoint.path()))
            .json(credentials);
        if let Some(key) = &self.api_key {
            req = req.header("x-api-key", key);
        }

        let resp = req.send().await?;
        let status = resp.status();

        if status == StatusCode::BAD_REQUEST {
            let body = resp.text().await.unwrap_or_default();
            tracing::debug!(
                endpoint = endpoint.path(),
                reason = %rejection_reason(&body),
                "Auth request rejected"
            );
            return Err(endpoint.rejection());
        }

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AuthError::Api {
                status: status.as_u16(),
                message: rejection_reason(&body),
            });
        }

        let text = resp.text().await?;
        let body: TokenBody = serde_json::from_str(&text)
            .map_err(|e| AuthError::MalformedResponse(e.to_string()))?;
        body.into_auth_response()
    }
}

impl AuthBackend for AuthClient {
    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, AuthError> {
        self.post_credentials(Endpoint::Login, credentials).await
    }

    async fn register(&self, credentials: &Credentials) -> Result<AuthResponse, AuthError> {
        self.post_credentials(Endpoint::Register, credentials).await
    }
}
