use http::StatusCode;
use hrms_http::HttpError;
use hrms_session::StorageError;
use thiserror::Error;

/// Failure of an HRMS API call.
///
/// Messages never contain token values. `Http` and `Unauthorized` keep the
/// response body verbatim so callers can show the backend's own message.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    /// No usable response: connection, TLS, timeout or an unreadable body
    #[error("network error: {0}")]
    Network(#[source] HttpError),

    /// 401 that could not be recovered by a token refresh
    #[error("unauthorized (HTTP 401)")]
    Unauthorized { body: String },

    /// The token refresh failed and the session was cleared; log in again
    #[error("session expired; please log in again")]
    ReauthRequired,

    /// Any other non-2xx status
    #[error("HTTP {status}")]
    Http { status: StatusCode, body: String },

    /// Session persistence failed on a write the operation depends on
    #[error("session storage failed: {0}")]
    Storage(#[from] StorageError),

    /// Response body is not the expected JSON
    #[error("unexpected response body: {0}")]
    Decode(String),

    /// The request could not be built (path, header, base URL)
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// Status code of the response that caused this error, if there was one.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Unauthorized { .. } => Some(StatusCode::UNAUTHORIZED),
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The caller has to sign in (again) to make progress.
    #[must_use]
    pub fn requires_login(&self) -> bool {
        matches!(self, Self::Unauthorized { .. } | Self::ReauthRequired)
    }

    /// `message` field of a JSON error body, the backend's error convention.
    #[must_use]
    pub fn server_message(&self) -> Option<String> {
        let body = match self {
            Self::Unauthorized { body } | Self::Http { body, .. } => body,
            _ => return None,
        };
        let value: serde_json::Value = serde_json::from_str(body).ok()?;
        value.get("message")?.as_str().map(str::to_owned)
    }
}

impl From<HttpError> for ApiError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::RequestBuild(_)
            | HttpError::InvalidHeaderName(_)
            | HttpError::InvalidHeaderValue(_)
            | HttpError::InvalidUri { .. }
            | HttpError::InvalidScheme { .. } => Self::InvalidRequest(err.to_string()),
            HttpError::Json(e) => Self::Decode(e.to_string()),
            HttpError::HttpStatus {
                status,
                body_preview,
                ..
            } if status == StatusCode::UNAUTHORIZED => Self::Unauthorized { body: body_preview },
            HttpError::HttpStatus {
                status,
                body_preview,
                ..
            } => Self::Http {
                status,
                body: body_preview,
            },
            other => Self::Network(other),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn timeout_is_network() {
        let err = ApiError::from(HttpError::Timeout(Duration::from_secs(30)));
        assert!(matches!(err, ApiError::Network(HttpError::Timeout(_))));
        assert_eq!(err.status(), None);
    }

    #[test]
    fn bad_scheme_is_invalid_request() {
        let err = ApiError::from(HttpError::InvalidScheme {
            scheme: "ftp".to_owned(),
            reason: "unsupported".to_owned(),
        });
        assert!(matches!(err, ApiError::InvalidRequest(_)));
    }

    #[test]
    fn status_errors_keep_body() {
        let err = ApiError::from(HttpError::HttpStatus {
            status: StatusCode::UNAUTHORIZED,
            body_preview: r#"{"message":"Invalid credentials"}"#.to_owned(),
            content_type: None,
        });
        assert!(err.requires_login());
        assert_eq!(err.server_message().as_deref(), Some("Invalid credentials"));

        let err = ApiError::from(HttpError::HttpStatus {
            status: StatusCode::CONFLICT,
            body_preview: "plain text".to_owned(),
            content_type: None,
        });
        assert_eq!(err.status(), Some(StatusCode::CONFLICT));
        assert_eq!(err.server_message(), None);
        assert_eq!(err.to_string(), "HTTP 409 Conflict");
    }

    #[test]
    fn reauth_message_has_no_detail() {
        assert_eq!(
            ApiError::ReauthRequired.to_string(),
            "session expired; please log in again"
        );
        assert!(ApiError::ReauthRequired.requires_login());
    }
}
