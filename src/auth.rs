//! Backend auth API client.
//!
//! A thin async wrapper over `/api/frontend/auth/...`: it issues the HTTP
//! calls the login/register/reset forms need and caches the bearer token
//! (in memory and in durable storage under `"auth_token"`). Security
//! properties — hashing, token validation, session expiry — belong to the
//! backend; this client only carries credentials and the token.

use crate::error::ApiError;
use crate::retry::{with_retry_if, RetryConfig};
use crate::storage::Storage;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// Storage key holding the persisted bearer token.
pub const AUTH_TOKEN_STORAGE_KEY: &str = "auth_token";

/// The backend's uniform response envelope; `code == 200` is success.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    pub data: T,
}

/// An authenticated user as the backend reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginParams {
    /// Username or email.
    pub account: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterParams {
    pub name: String,
    pub email: String,
    pub password: String,
    /// Email verification code obtained via [`AuthClient::send_verification_code`].
    pub verify_code: String,
}

/// What a verification code will be used for.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CodePurpose {
    Register,
    ResetPassword,
}

#[derive(Debug, Serialize)]
pub struct SendCodeParams {
    pub email: String,
    #[serde(rename = "type")]
    pub purpose: CodePurpose,
}

#[derive(Debug, Serialize)]
pub struct ResetPasswordParams {
    pub email: String,
    pub verify_code: String,
    pub new_password: String,
}

/// Payload of a successful login or registration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSession {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Deserialize)]
struct CurrentUserData {
    user: User,
}

/// Client for the backend auth endpoints.
pub struct AuthClient {
    http: reqwest::Client,
    base_url: String,
    token: Mutex<Option<String>>,
    storage: Arc<dyn Storage>,
    retry: RetryConfig,
}

impl AuthClient {
    /// Build a client, restoring a previously persisted token if present.
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, storage: Arc<dyn Storage>) -> Self {
        let token = storage.read(AUTH_TOKEN_STORAGE_KEY);
        Self {
            http,
            base_url: base_url.into(),
            token: Mutex::new(token),
            storage,
            retry: RetryConfig::api_call(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }

    /// Whether a token is currently cached.
    pub fn is_authenticated(&self) -> bool {
        self.token.lock().expect("token mutex poisoned").is_some()
    }

    /// The cached bearer token, if any.
    pub fn auth_token(&self) -> Option<String> {
        self.token.lock().expect("token mutex poisoned").clone()
    }

    fn store_token(&self, token: &str) {
        *self.token.lock().expect("token mutex poisoned") = Some(token.to_string());
        if let Err(err) = self.storage.write(AUTH_TOKEN_STORAGE_KEY, token) {
            warn!("failed to persist auth token: {err}");
        }
    }

    fn clear_token(&self) {
        *self.token.lock().expect("token mutex poisoned") = None;
        if let Err(err) = self.storage.remove(AUTH_TOKEN_STORAGE_KEY) {
            warn!("failed to clear persisted auth token: {err}");
        }
    }

    async fn post_json<B, T>(&self, path: &str, body: &B, with_token: bool) -> Result<T, ApiError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let endpoint = self.endpoint(path);
        let token = with_token.then(|| self.auth_token()).flatten();

        // Decode the envelope with a raw `data` first: error envelopes
        // carry `data: null`, which must surface as a backend error, not a
        // decode failure of the success payload.
        let response = with_retry_if(
            &self.retry,
            path,
            ApiError::is_transient,
            || async {
                let mut request = self.http.post(&endpoint).json(body);
                if let Some(token) = &token {
                    request = request.bearer_auth(token);
                }
                let response = request.send().await.map_err(|source| ApiError::Transport {
                    endpoint: endpoint.clone(),
                    source,
                })?;
                response
                    .json::<ApiResponse<serde_json::Value>>()
                    .await
                    .map_err(|source| ApiError::Decode {
                        endpoint: endpoint.clone(),
                        source,
                    })
            },
        )
        .await?;

        let response = check_envelope(path, response)?;
        serde_json::from_value(response.data).map_err(|source| ApiError::Payload {
            endpoint: path.to_string(),
            source,
        })
    }

    /// Request an email verification code for registration or password
    /// reset.
    pub async fn send_verification_code(&self, params: &SendCodeParams) -> Result<(), ApiError> {
        self.post_json::<_, serde_json::Value>("/api/frontend/auth/send-code", params, false)
            .await?;
        Ok(())
    }

    /// Log in. On success the session token is cached and persisted.
    pub async fn login(&self, params: &LoginParams) -> Result<AuthSession, ApiError> {
        let session: AuthSession =
            self.post_json("/api/frontend/auth/login", params, false).await?;
        self.store_token(&session.token);
        debug!("logged in as {}", session.user.name);
        Ok(session)
    }

    /// Register a new account. Like login, a successful registration
    /// establishes a session.
    pub async fn register(&self, params: &RegisterParams) -> Result<AuthSession, ApiError> {
        let session: AuthSession =
            self.post_json("/api/frontend/auth/register", params, false).await?;
        self.store_token(&session.token);
        Ok(session)
    }

    /// Log out. The cached token is cleared even when the backend call
    /// fails — a dead session on the server must not strand the client in
    /// a logged-in state.
    pub async fn logout(&self) -> Result<(), ApiError> {
        if !self.is_authenticated() {
            return Err(ApiError::NotLoggedIn);
        }

        let result = self
            .post_json::<_, serde_json::Value>("/api/frontend/auth/logout", &serde_json::json!({}), true)
            .await;
        self.clear_token();
        result.map(|_| ())
    }

    /// Reset a password using an emailed verification code.
    pub async fn reset_password(&self, params: &ResetPasswordParams) -> Result<(), ApiError> {
        self.post_json::<_, serde_json::Value>("/api/frontend/auth/reset-password", params, false)
            .await?;
        Ok(())
    }

    /// Fetch the logged-in user's profile.
    pub async fn current_user(&self) -> Result<User, ApiError> {
        let token = self.auth_token().ok_or(ApiError::NotLoggedIn)?;
        let endpoint = self.endpoint("/api/frontend/auth/me");

        let response = with_retry_if(
            &self.retry,
            "/api/frontend/auth/me",
            ApiError::is_transient,
            || async {
                let response = self
                    .http
                    .get(&endpoint)
                    .bearer_auth(&token)
                    .send()
                    .await
                    .map_err(|source| ApiError::Transport {
                        endpoint: endpoint.clone(),
                        source,
                    })?;
                response
                    .json::<ApiResponse<serde_json::Value>>()
                    .await
                    .map_err(|source| ApiError::Decode {
                        endpoint: endpoint.clone(),
                        source,
                    })
            },
        )
        .await?;

        let response = check_envelope("/api/frontend/auth/me", response)?;
        let data: CurrentUserData =
            serde_json::from_value(response.data).map_err(|source| ApiError::Payload {
                endpoint: "/api/frontend/auth/me".to_string(),
                source,
            })?;
        Ok(data.user)
    }
}

fn check_envelope<T>(path: &str, response: ApiResponse<T>) -> Result<ApiResponse<T>, ApiError> {
    if response.code == 200 {
        Ok(response)
    } else {
        Err(ApiError::Backend {
            endpoint: path.to_string(),
            code: response.code,
            message: response.message,
        })
    }
}
