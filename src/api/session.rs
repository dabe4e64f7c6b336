//! Bearer-token session and the authenticated request wrapper.
//!
//! [`SessionManager`] is the single place that knows about the token. Every
//! API call goes through [`SessionManager::authenticated_request`], which
//! attaches `Authorization: Bearer <token>` and turns a 401 into a cleared
//! session plus a [`SessionEvent::Expired`] notification. Expiry is
//! discovered lazily: a stale token still reports authenticated until the
//! first request bounces.

use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::{Arc, RwLock};
use tokio::sync::mpsc;

pub use reqwest::Method;

use super::models::{AccessToken, User};
use super::token_store::TokenStore;
use super::{ApiError, ApiResult};
use crate::constants::{
    ERROR_LOGIN_FAILED, ERROR_LOGIN_UNREACHABLE, ERROR_NOT_AUTHENTICATED, ERROR_NO_TOKEN, ERROR_REQUEST_FAILED,
};

/// Session lifecycle notifications consumed by the UI loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    LoggedIn,
    LoggedOut,
    Expired,
}

/// A file attached to a multipart request.
#[derive(Debug, Clone, PartialEq)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    Form(Vec<(String, String)>),
    Multipart(FilePart),
}

/// A request relative to the API base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn json<T: Serialize>(mut self, body: &T) -> ApiResult<Self> {
        self.body = RequestBody::Json(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn file(mut self, part: FilePart) -> Self {
        self.body = RequestBody::Multipart(part);
        self
    }
}

/// Owns the bearer token and performs authenticated calls.
///
/// Cheap to clone; clones share the token and the event channel.
#[derive(Clone)]
pub struct SessionManager {
    http: reqwest::Client,
    base_url: String,
    token: Arc<RwLock<Option<String>>>,
    store: Arc<dyn TokenStore>,
    events: mpsc::UnboundedSender<SessionEvent>,
}

impl SessionManager {
    pub fn new(
        base_url: impl Into<String>,
        store: Arc<dyn TokenStore>,
    ) -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let base_url = base_url.into().trim_end_matches('/').to_string();

        (
            Self {
                http: reqwest::Client::new(),
                base_url,
                token: Arc::new(RwLock::new(None)),
                store,
                events: tx,
            },
            rx,
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Load a persisted token into memory. Returns whether one was found.
    pub async fn restore(&self) -> ApiResult<bool> {
        let stored = self.store.load().await?;
        let found = stored.is_some();
        self.set_token(stored);
        if found {
            log::info!("Session: restored token from {} storage", self.store.name());
        }
        Ok(found)
    }

    /// Exchange credentials for a bearer token and persist it.
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<AccessToken> {
        let response = self
            .http
            .post(self.url("/auth/token"))
            .form(&[("username", username), ("password", password)])
            .send()
            .await
            .map_err(|e| {
                log::warn!("Session: login request failed: {}", e);
                ApiError::Auth(format!("{}: {}", ERROR_LOGIN_UNREACHABLE, e))
            })?;

        if !response.status().is_success() {
            let detail = error_detail(response, ERROR_LOGIN_FAILED).await;
            log::warn!("Session: login rejected for '{}': {}", username, detail);
            return Err(ApiError::Auth(detail));
        }

        let token: AccessToken = response.json().await?;
        self.set_token(Some(token.access_token.clone()));

        if let Err(e) = self.store.save(&token.access_token).await {
            log::warn!("Session: could not persist token: {}", e);
        }

        log::info!("Session: logged in as '{}'", username);
        let _ = self.events.send(SessionEvent::LoggedIn);
        Ok(token)
    }

    /// Resolve the authenticated identity.
    ///
    /// Any failure clears the session before the error is returned. An
    /// expired token is reported as `Expired` only, never also as `LoggedOut`.
    pub async fn current_user(&self) -> ApiResult<User> {
        if !self.is_authenticated() {
            self.logout().await;
            return Err(ApiError::Auth(ERROR_NO_TOKEN.to_string()));
        }

        match self.authenticated_request::<User>(ApiRequest::get("/auth/me")).await {
            Ok(user) => Ok(user),
            Err(e) => {
                log::warn!("Session: failed to resolve current user: {}", e);
                // A 401 has already cleared the session and announced the expiry
                if !e.is_session_expired() {
                    self.logout().await;
                }
                Err(ApiError::Auth(e.to_string()))
            }
        }
    }

    /// Perform an authenticated call and decode its JSON body.
    pub async fn authenticated_request<T: DeserializeOwned>(&self, request: ApiRequest) -> ApiResult<T> {
        let response = self.send(request).await?;
        let bytes = response.bytes().await?;

        if bytes.is_empty() {
            return Ok(serde_json::from_str("null")?);
        }

        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Perform an authenticated call and return the raw body.
    pub async fn authenticated_bytes(&self, request: ApiRequest) -> ApiResult<Vec<u8>> {
        let response = self.send(request).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// Clear the token everywhere and tell the UI to show the login screen.
    pub async fn logout(&self) {
        self.set_token(None);
        if let Err(e) = self.store.clear().await {
            log::warn!("Session: could not clear stored token: {}", e);
        }
        let _ = self.events.send(SessionEvent::LoggedOut);
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn token(&self) -> Option<String> {
        self.token.read().map(|token| token.clone()).unwrap_or(None)
    }

    fn set_token(&self, token: Option<String>) {
        if let Ok(mut current) = self.token.write() {
            *current = token;
        }
    }

    async fn expire(&self) {
        log::warn!("Session: server rejected token, clearing session");
        self.set_token(None);
        if let Err(e) = self.store.clear().await {
            log::warn!("Session: could not clear stored token: {}", e);
        }
        let _ = self.events.send(SessionEvent::Expired);
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    async fn send(&self, request: ApiRequest) -> ApiResult<reqwest::Response> {
        let token = self
            .token()
            .ok_or_else(|| ApiError::Auth(ERROR_NOT_AUTHENTICATED.to_string()))?;

        log::debug!("API: {} {}", request.method, request.path);

        let mut builder = self
            .http
            .request(request.method.clone(), self.url(&request.path))
            .bearer_auth(token);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Form(fields) => builder.form(&fields),
            RequestBody::Multipart(file) => {
                let part = Part::bytes(file.bytes)
                    .file_name(file.file_name)
                    .mime_str(&file.mime)
                    .map_err(|e| ApiError::Io(e.to_string()))?;
                builder.multipart(Form::new().part(file.field, part))
            }
        };

        let response = builder.send().await.map_err(|e| ApiError::Network(e.to_string()))?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            self.expire().await;
            return Err(ApiError::SessionExpired);
        }

        if !status.is_success() {
            let detail = error_detail(response, ERROR_REQUEST_FAILED).await;
            log::warn!("API: {} {} failed with {}: {}", request.method, request.path, status, detail);
            return Err(ApiError::Request {
                status: status.as_u16(),
                detail,
            });
        }

        Ok(response)
    }
}

/// Pull the `detail` field out of an error body, falling back to `fallback`.
async fn error_detail(response: reqwest::Response, fallback: &str) -> String {
    match response.json::<serde_json::Value>().await {
        Ok(body) => match body.get("detail") {
            Some(serde_json::Value::String(detail)) => detail.clone(),
            Some(serde_json::Value::Null) | None => fallback.to_string(),
            Some(other) => other.to_string(),
        },
        Err(_) => fallback.to_string(),
    }
}
