//! Thin client for the hosted backend's identity endpoints.
//!
//! Password sign-in, sign-out, and a broadcast of session changes for
//! anything that needs to react to them (the admin shell gates itself on
//! [`AuthEvent::SignedIn`]).

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::client::rest::extract_error_message;
use crate::error::{normalize_message, NETWORK_ERROR_MESSAGE};

/// Buffer capacity of the session-change channel.
const EVENT_CAPACITY: usize = 16;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The identity service refused the request. Carries the
    /// user-facing message.
    #[error("{0}")]
    Rejected(String),
}

impl AuthError {
    pub fn user_message(&self) -> String {
        match self {
            AuthError::Request(_) => NETWORK_ERROR_MESSAGE.to_string(),
            AuthError::Rejected(message) => message.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// An authenticated session as returned by the token endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    pub user: AuthUser,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn(Session),
    SignedOut,
}

#[derive(Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

pub struct AuthClient {
    client: reqwest::Client,
    base_url: String,
    anon_key: String,
    session: Mutex<Option<Session>>,
    events: broadcast::Sender<AuthEvent>,
}

impl AuthClient {
    pub fn new(
        base_url: impl Into<String>,
        anon_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url, anon_key))
    }

    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        anon_key: impl Into<String>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
            session: Mutex::new(None),
            events,
        }
    }

    /// Receive every subsequent session change.
    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }

    pub fn current_session(&self) -> Option<Session> {
        self.lock().clone()
    }

    /// Exchange email and password for a session.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let response = self
            .client
            .post(format!("{}/auth/v1/token", self.base_url))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.anon_key)
            .json(&PasswordGrant { email, password })
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        let session: Session = response.json().await?;

        tracing::info!(user_id = %session.user.id, "Signed in");
        *self.lock() = Some(session.clone());
        // A send error only means nobody is subscribed.
        let _ = self.events.send(AuthEvent::SignedIn(session.clone()));
        Ok(session)
    }

    /// End the current session. The local session is cleared even when the
    /// server call fails.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        let previous = self.lock().take();
        let result = match &previous {
            Some(session) => self.revoke(&session.access_token).await,
            None => Ok(()),
        };
        if let Err(e) = &result {
            tracing::warn!(error = %e, "Server-side sign-out failed");
        }
        let _ = self.events.send(AuthEvent::SignedOut);
        result
    }

    async fn revoke(&self, access_token: &str) -> Result<(), AuthError> {
        let response = self
            .client
            .post(format!("{}/auth/v1/logout", self.base_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;
        Self::ensure_success(response).await?;
        Ok(())
    }

    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, AuthError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = normalize_message(&extract_error_message(&body));
        tracing::debug!(status = status.as_u16(), %message, "Auth request rejected");
        Err(AuthError::Rejected(message))
    }

    fn lock(&self) -> MutexGuard<'_, Option<Session>> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
