use std::sync::Arc;

use bytes::Bytes;
use http::header::{HeaderName, HeaderValue};
use http::{HeaderMap, Method, StatusCode};
use hrms_http::{HttpClient, HttpClientBuilder};
use hrms_session::{SecretString, SessionStore};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use url::Url;
use zeroize::Zeroizing;

use crate::config::{ApiClientConfig, endpoint_url};
use crate::error::ApiError;
use crate::request::ApiRequest;
use crate::response::ApiResponse;

/// Authentication state as seen by a front-end.
///
/// Published on the channel returned by [`ApiClient::subscribe`].
/// `ReauthRequired` is the signal to send the user back to the login view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Authenticated,
    Anonymous,
    ReauthRequired,
}

/// Which send of a request this is. A request is sent at most twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attempt {
    Initial,
    Retry,
}

enum Outcome {
    Success(ApiResponse),
    /// 401 on the initial attempt
    NeedsRefresh { body: String },
}

/// Method, URL and headers of a request, ready for the transport.
#[derive(Debug)]
struct Prepared {
    method: Method,
    url: Url,
    headers: Vec<(HeaderName, HeaderValue)>,
}

#[derive(Serialize)]
struct RefreshRequest<'a> {
    #[serde(rename = "refreshToken")]
    refresh_token: &'a str,
}

#[derive(Deserialize)]
struct RefreshResponse {
    #[serde(default)]
    token: Option<String>,
}

struct Inner {
    http: HttpClient,
    base_url: Url,
    auth_header: HeaderName,
    auth_scheme: Option<String>,
    refresh_url: Url,
    session: SessionStore,
    auth_state: watch::Sender<AuthState>,
}

/// HTTP client for the HRMS backend.
///
/// Attaches the stored access token to every request. When a request that
/// carried a token gets HTTP 401, the client refreshes the token once,
/// stores it and resends the request once. If the refresh fails the session
/// is cleared and the call ends in [`ApiError::ReauthRequired`].
///
/// Cheap to clone; clones share the transport, the session store and the
/// auth-state channel.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("auth_header", &self.inner.auth_header)
            .field("session", &self.inner.session)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Build the transport from `config.http` and wrap it.
    ///
    /// # Errors
    /// Returns `ApiError::InvalidRequest` for a bad auth header name or
    /// refresh path, and `ApiError::Network` if TLS setup fails.
    pub fn new(config: ApiClientConfig, session: SessionStore) -> Result<Self, ApiError> {
        let http = HttpClientBuilder::with_config(config.http.clone())
            .build()
            .map_err(ApiError::Network)?;
        Self::with_http_client(config, http, session)
    }

    /// Use an existing transport; `config.http` is ignored.
    ///
    /// # Errors
    /// Returns `ApiError::InvalidRequest` for a bad auth header name or
    /// refresh path.
    pub fn with_http_client(
        config: ApiClientConfig,
        http: HttpClient,
        session: SessionStore,
    ) -> Result<Self, ApiError> {
        let auth_header = HeaderName::try_from(config.auth_header.as_str()).map_err(|e| {
            ApiError::InvalidRequest(format!("auth header '{}': {e}", config.auth_header))
        })?;
        let refresh_url = endpoint_url(&config.base_url, &config.refresh_path, &[])?;
        let initial = if session.is_logged_in() {
            AuthState::Authenticated
        } else {
            AuthState::Anonymous
        };
        let (auth_state, _) = watch::channel(initial);

        tracing::debug!(
            base_url = %config.base_url,
            auth_header = %auth_header,
            "api client ready"
        );

        Ok(Self {
            inner: Arc::new(Inner {
                http,
                base_url: config.base_url,
                auth_header,
                auth_scheme: config.auth_scheme,
                refresh_url,
                session,
                auth_state,
            }),
        })
    }

    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    #[must_use]
    pub fn auth_state(&self) -> AuthState {
        *self.inner.auth_state.borrow()
    }

    /// Receiver for auth-state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.inner.auth_state.subscribe()
    }

    pub(crate) fn publish(&self, state: AuthState) {
        let previous = self.inner.auth_state.send_replace(state);
        if previous != state {
            tracing::debug!(from = ?previous, to = ?state, "auth state changed");
        }
    }

    /// Send an authenticated request and return the 2xx response.
    ///
    /// # Errors
    /// - `Unauthorized` on a 401 that no refresh could fix
    /// - `ReauthRequired` when the refresh failed or its token could not be
    ///   stored (the session is cleared)
    /// - `Http` for any other non-2xx status
    /// - `Network` when no response was received
    pub async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let token = self.inner.session.access_token();

        let body = match self
            .execute(request, token.as_ref(), Attempt::Initial)
            .await?
        {
            Outcome::Success(response) => return Ok(response),
            Outcome::NeedsRefresh { body } => body,
        };

        let Some(refresh_token) = self.inner.session.refresh_token() else {
            tracing::debug!(path = %request.path, "401 without a refresh token");
            return Err(ApiError::Unauthorized { body });
        };

        let fresh = match self.refresh(&refresh_token).await {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(error = %e, "token refresh failed; clearing session");
                return Err(self.expire_session());
            }
        };
        if let Err(e) = self.inner.session.update_access_token(&fresh) {
            tracing::warn!(error = %e, "refreshed token could not be stored; clearing session");
            return Err(self.expire_session());
        }

        match self.execute(request, Some(&fresh), Attempt::Retry).await? {
            Outcome::Success(response) => Ok(response),
            Outcome::NeedsRefresh { body } => Err(ApiError::Unauthorized { body }),
        }
    }

    fn expire_session(&self) -> ApiError {
        self.inner.session.clear();
        self.publish(AuthState::ReauthRequired);
        ApiError::ReauthRequired
    }

    /// [`send`](Self::send) and decode the JSON body.
    ///
    /// # Errors
    /// Everything `send` returns, plus `Decode`.
    pub async fn send_json<T: DeserializeOwned>(&self, request: &ApiRequest) -> Result<T, ApiError> {
        self.send(request).await?.json()
    }

    /// Send without the access token and without refresh handling.
    ///
    /// # Errors
    /// `Unauthorized` on 401, otherwise as [`send`](Self::send).
    pub async fn send_unauthenticated(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        match self.execute(request, None, Attempt::Initial).await? {
            Outcome::Success(response) => Ok(response),
            Outcome::NeedsRefresh { body } => Err(ApiError::Unauthorized { body }),
        }
    }

    async fn execute(
        &self,
        request: &ApiRequest,
        token: Option<&SecretString>,
        attempt: Attempt,
    ) -> Result<Outcome, ApiError> {
        let prepared = self.prepare(request, token)?;

        let mut builder = self
            .inner
            .http
            .request(prepared.method, prepared.url.as_str());
        for (name, value) in prepared.headers {
            builder = builder.typed_header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body)?;
        }

        let response = builder.send().await.inspect_err(|e| {
            tracing::debug!(
                method = %request.method,
                path = %request.path,
                attempt = ?attempt,
                error = %e,
                "api request failed"
            );
        })?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        tracing::debug!(
            method = %request.method,
            path = %request.path,
            status = status.as_u16(),
            attempt = ?attempt,
            "api response"
        );

        classify(status, headers, body, attempt)
    }

    /// Resolve the URL and build the header list. The session token
    /// replaces any caller header of the same name.
    fn prepare(
        &self,
        request: &ApiRequest,
        token: Option<&SecretString>,
    ) -> Result<Prepared, ApiError> {
        let url = endpoint_url(&self.inner.base_url, &request.path, &request.query)?;

        let mut headers = Vec::with_capacity(request.headers.len() + 1);
        for (name, value) in &request.headers {
            let name = HeaderName::try_from(name.as_str())
                .map_err(|e| ApiError::InvalidRequest(format!("header name '{name}': {e}")))?;
            if token.is_some() && name == self.inner.auth_header {
                continue;
            }
            let value = HeaderValue::try_from(value.as_str())
                .map_err(|e| ApiError::InvalidRequest(format!("header '{name}': {e}")))?;
            headers.push((name, value));
        }

        if let Some(token) = token {
            headers.push((self.inner.auth_header.clone(), self.auth_value(token)?));
        }

        Ok(Prepared {
            method: request.method.clone(),
            url,
            headers,
        })
    }

    fn auth_value(&self, token: &SecretString) -> Result<HeaderValue, ApiError> {
        let raw = Zeroizing::new(match &self.inner.auth_scheme {
            Some(scheme) => format!("{scheme} {}", token.expose()),
            None => token.expose().to_owned(),
        });
        let mut value = HeaderValue::from_str(&raw).map_err(|_| {
            ApiError::InvalidRequest("stored access token is not a valid header value".to_owned())
        })?;
        value.set_sensitive(true);
        Ok(value)
    }

    /// `POST <refresh_path>` with `{"refreshToken": ..}`, unauthenticated.
    async fn refresh(&self, refresh_token: &SecretString) -> Result<SecretString, ApiError> {
        tracing::debug!("refreshing access token");
        let payload = RefreshRequest {
            refresh_token: refresh_token.expose(),
        };
        let body = self
            .inner
            .http
            .post(self.inner.refresh_url.as_str())
            .json(&payload)?
            .send()
            .await?
            .checked_bytes()
            .await?;
        let parsed: RefreshResponse = serde_json::from_slice(&body)?;
        match parsed.token {
            Some(token) if !token.is_empty() => Ok(SecretString::new(token)),
            _ => Err(ApiError::Decode(
                "refresh response carries no token".to_owned(),
            )),
        }
    }
}

fn classify(
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
    attempt: Attempt,
) -> Result<Outcome, ApiError> {
    if status.is_success() {
        return Ok(Outcome::Success(ApiResponse::new(status, headers, body)));
    }
    let text = String::from_utf8_lossy(&body).into_owned();
    if status == StatusCode::UNAUTHORIZED {
        if attempt == Attempt::Initial {
            return Ok(Outcome::NeedsRefresh { body: text });
        }
        return Err(ApiError::Unauthorized { body: text });
    }
    Err(ApiError::Http { status, body: text })
}
