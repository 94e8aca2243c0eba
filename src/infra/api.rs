//! Async client for the freight backend: health probe and authentication.
//!
//! - Attaches the stored session token as a bearer header.
//! - Retries connection failures and 5xx answers with a linear backoff.
//! - Drops the stored token when the server answers 401.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::HealthStatus;
use crate::util::config::AppConfig;
use crate::util::persistence::{clear_token, load_token, save_token, KeyValueStore};

const USER_AGENT: &str = concat!("freight-desk/", env!("CARGO_PKG_VERSION"));
const GENERIC_FAILURE: &str = "Request failed. Please check your credentials and connection.";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("http request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server responded with {status}: {message}")]
    Status { status: u16, message: String },
    #[error("Passwords do not match")]
    PasswordMismatch,
}

impl ApiError {
    /// Text suitable for showing next to a form.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status { message, .. } if !message.is_empty() => message.clone(),
            ApiError::PasswordMismatch => self.to_string(),
            ApiError::Http(err) if err.is_connect() || err.is_timeout() => {
                "Cannot reach the server. Please check your connection.".to_string()
            }
            _ => GENERIC_FAILURE.to_string(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Status { status: 401, .. })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ServiceState {
    Up,
    Down,
}

/// Body of the health endpoint. Fields other than `status` are kept as-is.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: ServiceState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl HealthReport {
    pub fn down(reason: impl Into<String>) -> Self {
        Self {
            status: ServiceState::Down,
            error: Some(reason.into()),
            details: Map::new(),
        }
    }

    pub fn to_status(&self) -> HealthStatus {
        match self.status {
            ServiceState::Up => HealthStatus::Up,
            ServiceState::Down => HealthStatus::Down(self.error.clone()),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RegisterRequest<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
    confirm_password: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Clone)]
pub struct ApiClient<S: KeyValueStore + Clone> {
    http: Client,
    base_url: Url,
    store: S,
    max_retries: u32,
    retry_delay: Duration,
}

impl<S: KeyValueStore + Clone> ApiClient<S> {
    pub fn new(config: &AppConfig, store: S) -> Result<Self, ApiError> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: config.api_base_url.clone(),
            store,
            max_retries: config.max_retries,
            retry_delay: config.retry_delay,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Health probe that never fails: errors come back as a `DOWN` report.
    pub async fn health(&self) -> HealthReport {
        match self.check_connection().await {
            Ok(report) => {
                debug!(status = ?report.status, "health check");
                report
            }
            Err(err) => {
                warn!("health check failed: {err}");
                HealthReport::down(err.to_string())
            }
        }
    }

    /// Same probe, but surfaces the failure to callers that want to show it.
    pub async fn check_connection(&self) -> Result<HealthReport, ApiError> {
        let url = self.url("health")?;
        let response = self.send(|| self.http.get(url.clone())).await?;
        Ok(response.json::<HealthReport>().await?)
    }

    /// Logs in and stores the returned token, if any.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let url = self.url("auth/login")?;
        let body = LoginRequest { email, password };
        let auth: AuthResponse = self
            .send_json(|| self.http.post(url.clone()).json(&body))
            .await?;

        if let Some(token) = auth.token.as_deref() {
            if let Err(err) = save_token(&self.store, token) {
                warn!("failed to persist session token: {err}");
            }
            info!(email, "logged in");
        } else {
            warn!(email, "login response carried no token");
        }
        Ok(auth)
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<AuthResponse, ApiError> {
        if password != confirm_password {
            return Err(ApiError::PasswordMismatch);
        }
        let url = self.url("auth/register")?;
        let body = RegisterRequest {
            name,
            email,
            password,
            confirm_password,
        };
        let auth = self
            .send_json(|| self.http.post(url.clone()).json(&body))
            .await?;
        info!(email, "registered account");
        Ok(auth)
    }

    pub fn logout(&self) {
        if let Err(err) = clear_token(&self.store) {
            warn!("failed to clear session token: {err}");
        }
        info!("logged out");
    }

    pub fn session_token(&self) -> Option<String> {
        load_token(&self.store)
    }

    async fn send_json<T>(&self, build: impl Fn() -> RequestBuilder) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let response = self.send(build).await?;
        Ok(response.json::<T>().await?)
    }

    async fn send(&self, build: impl Fn() -> RequestBuilder) -> Result<Response, ApiError> {
        let mut attempt: u32 = 0;
        loop {
            let request = match self.session_token() {
                Some(token) => build().bearer_auth(token),
                None => build(),
            };

            match request.send().await {
                Ok(response) if response.status().is_server_error() && attempt < self.max_retries => {
                    warn!(status = %response.status(), attempt, "server error, retrying");
                }
                Ok(response) => return self.check_status(response).await,
                Err(err) if is_transient(&err) && attempt < self.max_retries => {
                    warn!(attempt, "request failed ({err}), retrying");
                }
                Err(err) => return Err(err.into()),
            }

            attempt += 1;
            tokio::time::sleep(self.retry_delay * attempt).await;
        }
    }

    async fn check_status(&self, response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED {
            warn!("server rejected session, clearing token");
            if let Err(err) = clear_token(&self.store) {
                warn!("failed to clear session token: {err}");
            }
        }

        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.message)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or_default().to_string());
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }

    fn url(&self, path: &str) -> Result<Url, url::ParseError> {
        self.base_url.join(path)
    }
}

fn is_transient(err: &reqwest::Error) -> bool {
    err.is_connect() || err.is_timeout()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::persistence::MemoryStore;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client(server: &MockServer, store: MemoryStore) -> ApiClient<MemoryStore> {
        let config = AppConfig::for_api(&server.url("/api"), ".").unwrap();
        ApiClient::new(&config, store).unwrap()
    }

    #[tokio::test]
    async fn health_reports_up() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/api/health");
                then.status(200)
                    .json_body(json!({ "status": "UP", "database": "ok" }));
            })
            .await;

        let report = client(&server, MemoryStore::default()).health().await;
        mock.assert_async().await;
        assert_eq!(report.status, ServiceState::Up);
        assert_eq!(report.details.get("database"), Some(&json!("ok")));
        assert_eq!(report.to_status(), HealthStatus::Up);
    }

    #[tokio::test]
    async fn unreachable_server_reports_down() {
        let config = AppConfig::for_api("http://127.0.0.1:1/api", ".").unwrap();
        let api = ApiClient::new(&config, MemoryStore::default()).unwrap();

        let report = api.health().await;
        assert_eq!(report.status, ServiceState::Down);
        assert!(report.error.is_some());
        assert!(matches!(report.to_status(), HealthStatus::Down(Some(_))));
    }

    #[tokio::test]
    async fn login_stores_token_and_sends_it_afterwards() {
        let server = MockServer::start_async().await;
        let login = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/auth/login")
                    .json_body(json!({ "email": "ops@example.com", "password": "secret" }));
                then.status(200)
                    .json_body(json!({ "token": "jwt-123", "name": "Ops" }));
            })
            .await;
        let health = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/health")
                    .header("authorization", "Bearer jwt-123");
                then.status(200).json_body(json!({ "status": "UP" }));
            })
            .await;

        let store = MemoryStore::default();
        let api = client(&server, store.clone());
        let auth = api.login("ops@example.com", "secret").await.unwrap();
        login.assert_async().await;
        assert_eq!(auth.token.as_deref(), Some("jwt-123"));
        assert_eq!(load_token(&store).as_deref(), Some("jwt-123"));

        api.check_connection().await.unwrap();
        health.assert_async().await;
    }

    #[tokio::test]
    async fn unauthorized_clears_token_and_surfaces_message() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/auth/login");
                then.status(401)
                    .json_body(json!({ "message": "Invalid email or password" }));
            })
            .await;

        let store = MemoryStore::default();
        save_token(&store, "stale").unwrap();
        let api = client(&server, store.clone());

        let err = api.login("ops@example.com", "wrong").await.unwrap_err();
        assert!(err.is_unauthorized());
        assert_eq!(err.user_message(), "Invalid email or password");
        assert_eq!(load_token(&store), None);
    }

    #[tokio::test]
    async fn register_checks_password_confirmation_locally() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/api/auth/register");
                then.status(201).json_body(json!({ "id": 7 }));
            })
            .await;
        let api = client(&server, MemoryStore::default());

        let err = api
            .register("Ops", "ops@example.com", "one", "two")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::PasswordMismatch));
        assert_eq!(err.user_message(), "Passwords do not match");
        mock.assert_hits_async(0).await;

        let auth = api
            .register("Ops", "ops@example.com", "same", "same")
            .await
            .unwrap();
        assert_eq!(auth.token, None);
        assert_eq!(auth.details.get("id"), Some(&json!(7)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn server_errors_are_retried() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/api/health");
                then.status(503);
            })
            .await;

        let mut config = AppConfig::for_api(&server.url("/api"), ".").unwrap();
        config.max_retries = 2;
        let api = ApiClient::new(&config, MemoryStore::default()).unwrap();

        let err = api.check_connection().await.unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 503, .. }));
        assert_eq!(err.user_message(), "Service Unavailable");
        mock.assert_hits_async(3).await;
    }
}
