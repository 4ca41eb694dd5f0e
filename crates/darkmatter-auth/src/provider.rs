//! Identity provider trait and concrete implementations.
//!
//! Providers:
//!   FirebaseProvider:     Firebase Identity Toolkit REST API (v1)
//!   UnconfiguredProvider: stands in when no API key is configured

use async_trait::async_trait;
use darkmatter_common::{DarkMatterError, SandboxClient};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::classification::ProviderErrorCode;

// ── Error ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("identity provider rejected the request: {0}")]
    Provider(ProviderErrorCode),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Sandbox(#[from] DarkMatterError),
    #[error("unexpected identity provider response [{status}]: {body}")]
    UnexpectedResponse { status: u16, body: String },
    #[error("identity provider is not configured")]
    NotConfigured,
}

impl AuthError {
    pub fn provider_code(&self) -> Option<&ProviderErrorCode> {
        match self {
            AuthError::Provider(code) => Some(code),
            _ => None,
        }
    }
}

// ── Credentials ───────────────────────────────────────────────────────────────

/// Email and password for a single provider call. Never stored.
#[derive(Debug)]
pub struct Credentials {
    pub email: String,
    password: SecretString,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self { email: email.into(), password: SecretString::from(password.into()) }
    }

    pub fn password(&self) -> &str {
        self.password.expose_secret()
    }
}

// ── Trait ─────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(&self, credentials: &Credentials) -> Result<(), AuthError>;
    async fn create_account(&self, credentials: &Credentials) -> Result<(), AuthError>;
    async fn send_password_reset(&self, email: &str) -> Result<(), AuthError>;
}

// ── 1. Firebase ───────────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OobRequest<'a> {
    request_type: &'static str,
    email: &'a str,
}

pub struct FirebaseProvider {
    base_url: String,
    api_key: SecretString,
    client: SandboxClient,
}

impl FirebaseProvider {
    /// `base_url` is the Identity Toolkit root, e.g. `https://identitytoolkit.googleapis.com/v1`.
    pub fn new(base_url: impl Into<String>, api_key: SecretString, client: SandboxClient) -> Self {
        Self { base_url: base_url.into(), api_key, client }
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "{}/accounts:{}?key={}",
            self.base_url.trim_end_matches('/'),
            action,
            self.api_key.expose_secret()
        )
    }

    /// The request URL carries the API key, so transport errors drop it.
    async fn call<B: Serialize + Sync>(&self, action: &str, body: &B) -> Result<(), AuthError> {
        let resp = self
            .client
            .post(&self.endpoint(action))?
            .json(body)
            .send()
            .await
            .map_err(|e| AuthError::Http(e.without_url()))?;
        check_response_status(resp).await
    }
}

/// Maps a provider response to `Ok` or the provider's error code.
async fn check_response_status(resp: reqwest::Response) -> Result<(), AuthError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(());
    }
    let body = resp.text().await.map_err(|e| AuthError::Http(e.without_url()))?;
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|json| json["error"]["message"].as_str().map(String::from));
    match message {
        Some(message) => {
            debug!(status = status.as_u16(), %message, "identity provider error");
            Err(AuthError::Provider(ProviderErrorCode::parse(&message)))
        }
        None => Err(AuthError::UnexpectedResponse { status: status.as_u16(), body }),
    }
}

#[async_trait]
impl IdentityProvider for FirebaseProvider {
    #[instrument(level = "debug", skip_all, fields(email = %credentials.email))]
    async fn sign_in(&self, credentials: &Credentials) -> Result<(), AuthError> {
        let body = PasswordRequest {
            email: &credentials.email,
            password: credentials.password(),
            return_secure_token: true,
        };
        self.call("signInWithPassword", &body).await
    }

    #[instrument(level = "debug", skip_all, fields(email = %credentials.email))]
    async fn create_account(&self, credentials: &Credentials) -> Result<(), AuthError> {
        let body = PasswordRequest {
            email: &credentials.email,
            password: credentials.password(),
            return_secure_token: true,
        };
        self.call("signUp", &body).await
    }

    #[instrument(level = "debug", skip(self))]
    async fn send_password_reset(&self, email: &str) -> Result<(), AuthError> {
        let body = OobRequest { request_type: "PASSWORD_RESET", email };
        self.call("sendOobCode", &body).await
    }
}

// ── 2. Unconfigured ───────────────────────────────────────────────────────────

/// Fails every call. Lets the server start without an API key.
pub struct UnconfiguredProvider;

#[async_trait]
impl IdentityProvider for UnconfiguredProvider {
    async fn sign_in(&self, _credentials: &Credentials) -> Result<(), AuthError> {
        Err(AuthError::NotConfigured)
    }

    async fn create_account(&self, _credentials: &Credentials) -> Result<(), AuthError> {
        Err(AuthError::NotConfigured)
    }

    async fn send_password_reset(&self, _email: &str) -> Result<(), AuthError> {
        Err(AuthError::NotConfigured)
    }
}
