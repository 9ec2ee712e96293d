use hrms_http::HttpClientConfig;
use url::Url;

use crate::error::ApiError;

/// Header that carries the access token unless configured otherwise
pub const DEFAULT_AUTH_HEADER: &str = "X-Auth-Token";

/// Refresh endpoint, relative to the base URL
pub const DEFAULT_REFRESH_PATH: &str = "refresh.php";

/// Configuration for [`ApiClient`](crate::ApiClient).
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Root of the backend, e.g. `https://hr.example.com/hrms/api`
    pub base_url: Url,

    /// Header name the access token is sent under
    pub auth_header: String,

    /// Optional value prefix, e.g. `Bearer` gives `Bearer <token>`
    pub auth_scheme: Option<String>,

    pub refresh_path: String,

    /// Transport settings (timeout, TLS, body limit)
    pub http: HttpClientConfig,
}

impl ApiClientConfig {
    /// Defaults for every field except the base URL.
    ///
    /// # Errors
    /// Returns `ApiError::InvalidRequest` if `base_url` is not an absolute
    /// http(s) URL.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            auth_header: DEFAULT_AUTH_HEADER.to_owned(),
            auth_scheme: None,
            refresh_path: DEFAULT_REFRESH_PATH.to_owned(),
            http: HttpClientConfig::default(),
        })
    }

    /// Send the token as `Authorization: Bearer <token>`.
    #[must_use]
    pub fn with_bearer_auth(mut self) -> Self {
        "Authorization".clone_into(&mut self.auth_header);
        self.auth_scheme = Some("Bearer".to_owned());
        self
    }

    #[must_use]
    pub fn with_http(mut self, http: HttpClientConfig) -> Self {
        self.http = http;
        self
    }
}

/// Parse a base URL and normalize it to end with `/` so relative joins
/// append instead of replacing the last segment.
///
/// # Errors
/// Returns `ApiError::InvalidRequest` for unparsable or non-http(s) URLs.
pub fn parse_base_url(raw: &str) -> Result<Url, ApiError> {
    let mut url = Url::parse(raw.trim())
        .map_err(|e| ApiError::InvalidRequest(format!("base URL '{raw}': {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ApiError::InvalidRequest(format!(
            "base URL '{raw}': scheme must be http or https"
        )));
    }
    if url.cannot_be_a_base() {
        return Err(ApiError::InvalidRequest(format!(
            "base URL '{raw}': cannot be a base"
        )));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

/// `<base>/<path>?<query>`; query values are form-urlencoded.
///
/// The result always stays under the base path.
pub(crate) fn endpoint_url(
    base: &Url,
    path: &str,
    query: &[(String, String)],
) -> Result<Url, ApiError> {
    let outside = || {
        ApiError::InvalidRequest(format!("path '{path}' must stay under the base URL"))
    };
    if path.contains("://") || path.starts_with("//") {
        return Err(outside());
    }
    let route = path.split(['?', '#']).next().unwrap_or_default();
    if route.split(['/', '\\']).any(|segment| segment == "..") {
        return Err(outside());
    }
    let mut url = base
        .join(path.trim_start_matches('/'))
        .map_err(|e| ApiError::InvalidRequest(format!("path '{path}': {e}")))?;
    // Catches encoded forms such as `%2e%2e` that the parser normalizes.
    if url.origin() != base.origin() || !url.path().starts_with(base.path()) {
        return Err(outside());
    }
    if !query.is_empty() {
        url.query_pairs_mut()
            .extend_pairs(query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    }
    Ok(url)
}
