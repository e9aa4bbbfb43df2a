use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;
use thiserror::Error;

/// Message GoTrue sends back for a wrong email/password pair.
pub const INVALID_CREDENTIALS: &str = "Invalid login credentials";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuthError {
    #[error("Invalid login credentials")]
    InvalidCredentials,

    #[error("{0}")]
    Provider(String),

    #[error("{0}")]
    Transport(String),

    #[error("Request timed out")]
    TimedOut,
}

impl AuthError {
    /// Classifies a provider message; only the exact GoTrue sentinel counts as bad credentials.
    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        if message == INVALID_CREDENTIALS {
            AuthError::InvalidCredentials
        } else {
            AuthError::Provider(message)
        }
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(error: reqwest::Error) -> Self {
        AuthError::Transport(error.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
    pub full_name: Option<String>,
}

#[derive(Clone, PartialEq)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
    pub user: AuthUser,
}

// tokens stay out of logs
impl fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSession")
            .field("user", &self.user)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

impl AuthSession {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Clears `slot` when its session has run out, handing the stale session back.
pub fn take_if_expired(slot: &mut Option<AuthSession>, now: DateTime<Utc>) -> Option<AuthSession> {
    if slot.as_ref().is_some_and(|s| s.is_expired(now)) {
        slot.take()
    } else {
        None
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait AuthProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError>;

    async fn sign_up(&self, email: &str, password: &str, full_name: &str) -> Result<AuthUser, AuthError>;
}

#[derive(Debug, Default, Deserialize)]
struct UserMetadata {
    full_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GoTrueUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    user_metadata: Option<UserMetadata>,
}

impl From<GoTrueUser> for AuthUser {
    fn from(user: GoTrueUser) -> Self {
        AuthUser {
            id: user.id,
            email: user.email.unwrap_or_default(),
            full_name: user.user_metadata.and_then(|m| m.full_name),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    expires_in: i64,
    user: GoTrueUser,
}

impl TokenResponse {
    fn into_session(self, now: DateTime<Utc>) -> AuthSession {
        AuthSession {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at: now + Duration::seconds(self.expires_in),
            user: self.user.into(),
        }
    }
}

/// With email confirmation on, sign-up answers with the bare user; with it off, with a session.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SignUpResponse {
    Session(TokenResponse),
    User(GoTrueUser),
}

#[derive(Debug, Default, Deserialize)]
struct GoTrueError {
    msg: Option<String>,
    message: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
}

fn error_from_body(status: reqwest::StatusCode, body: &str) -> AuthError {
    let parsed = serde_json::from_str::<GoTrueError>(body).unwrap_or_default();
    let message = parsed
        .msg
        .or(parsed.message)
        .or(parsed.error_description)
        .or(parsed.error)
        .unwrap_or_else(|| format!("{}", status));
    AuthError::from_message(message)
}

#[derive(Debug, Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct SignUpBody<'a> {
    email: &'a str,
    password: &'a str,
    data: SignUpData<'a>,
}

#[derive(Debug, Serialize)]
struct SignUpData<'a> {
    full_name: &'a str,
}

/// Supabase GoTrue over its REST endpoints.
#[derive(Debug, Clone)]
pub struct SupabaseAuth {
    client: reqwest::Client,
    project_url: String,
    anon_key: String,
}

impl SupabaseAuth {
    pub fn new(project_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            project_url: project_url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
        }
    }

    async fn post<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<String, AuthError> {
        let resp = self
            .client
            .post(format!("{}{}", self.project_url, path))
            .header("apikey", &self.anon_key)
            .json(body)
            .send()
            .await?;
        let status = resp.status();
        let text = resp.text().await?;
        if status.is_success() {
            Ok(text)
        } else {
            Err(error_from_body(status, &text))
        }
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl AuthProvider for SupabaseAuth {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let text = self
            .post("/auth/v1/token?grant_type=password", &Credentials { email, password })
            .await?;
        let token: TokenResponse = serde_json::from_str(&text)
            .map_err(|e| AuthError::Provider(format!("Unexpected sign-in response: {}", e)))?;
        Ok(token.into_session(Utc::now()))
    }

    async fn sign_up(&self, email: &str, password: &str, full_name: &str) -> Result<AuthUser, AuthError> {
        let body = SignUpBody { email, password, data: SignUpData { full_name } };
        let text = self.post("/auth/v1/signup", &body).await?;
        let resp: SignUpResponse = serde_json::from_str(&text)
            .map_err(|e| AuthError::Provider(format!("Unexpected sign-up response: {}", e)))?;
        Ok(match resp {
            SignUpResponse::Session(token) => token.user.into(),
            SignUpResponse::User(user) => user.into(),
        })
    }
}

struct LocalAccount {
    password: String,
    user: AuthUser,
}

/// In-memory accounts for running without a Supabase project. Mirrors GoTrue's messages.
#[derive(Default)]
pub struct LocalAuth {
    accounts: Mutex<HashMap<String, LocalAccount>>,
}

const MIN_PASSWORD_LEN: usize = 6;

impl LocalAuth {
    pub fn new() -> Self {
        Self::default()
    }

    fn accounts(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, LocalAccount>>, AuthError> {
        self.accounts
            .lock()
            .map_err(|_| AuthError::Provider("Account store unavailable".to_string()))
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl AuthProvider for LocalAuth {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let accounts = self.accounts()?;
        match accounts.get(&email.to_lowercase()) {
            Some(account) if account.password == password => {
                let now = Utc::now();
                Ok(AuthSession {
                    access_token: format!("local-access-{}-{}", account.user.id, now.timestamp_millis()),
                    refresh_token: format!("local-refresh-{}", account.user.id),
                    expires_at: now + Duration::hours(1),
                    user: account.user.clone(),
                })
            }
            _ => Err(AuthError::InvalidCredentials),
        }
    }

    async fn sign_up(&self, email: &str, password: &str, full_name: &str) -> Result<AuthUser, AuthError> {
        if !email.contains('@') {
            return Err(AuthError::Provider("Unable to validate email address: invalid format".to_string()));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::Provider(format!(
                "Password should be at least {} characters.",
                MIN_PASSWORD_LEN
            )));
        }
        let mut accounts = self.accounts()?;
        let key = email.to_lowercase();
        if accounts.contains_key(&key) {
            return Err(AuthError::Provider("User already registered".to_string()));
        }
        let user = AuthUser {
            id: format!("local-{:04}", accounts.len() + 1),
            email: email.to_string(),
            full_name: (!full_name.is_empty()).then(|| full_name.to_string()),
        };
        accounts.insert(key, LocalAccount { password: password.to_string(), user: user.clone() });
        Ok(user)
    }
}
