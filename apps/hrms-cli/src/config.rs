use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use hrms_client::{ApiClientConfig, DEFAULT_AUTH_HEADER, DEFAULT_REFRESH_PATH};
use hrms_http::{HttpClientConfig, TransportSecurity};
use serde::{Deserialize, Serialize};

/// Prefix of environment overrides, e.g. `HRMS__API__BASE_URL`
pub const ENV_PREFIX: &str = "HRMS__";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub api: ApiSection,
    pub session: SessionSection,
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSection {
    pub base_url: String,
    pub auth_header: String,
    /// Value prefix such as `Bearer`; none sends the bare token
    pub auth_scheme: Option<String>,
    pub refresh_path: String,
    /// Milliseconds
    pub request_timeout: u64,
    /// Permit plain `http://` base URLs
    pub allow_insecure_http: bool,
    pub user_agent: Option<String>,
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            base_url: "https://localhost/hrms/api".to_owned(),
            auth_header: DEFAULT_AUTH_HEADER.to_owned(),
            auth_scheme: None,
            refresh_path: DEFAULT_REFRESH_PATH.to_owned(),
            request_timeout: 30_000,
            allow_insecure_http: false,
            user_agent: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSection {
    /// Directory holding `session.json`; `~` is expanded
    pub dir: String,
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            dir: "~/.hrms".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Filter used when neither `RUST_LOG` nor `-v` is given
    pub level: Option<String>,
    pub json: bool,
}

impl CliConfig {
    /// defaults -> YAML file -> `HRMS__*` environment
    ///
    /// # Errors
    /// Returns an error if the file or an environment value does not match
    /// the configuration schema.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("invalid configuration")
    }

    pub fn apply_cli_overrides(&mut self, base_url: Option<&str>) {
        if let Some(url) = base_url {
            url.clone_into(&mut self.api.base_url);
        }
    }

    /// # Errors
    /// Returns an error for an invalid base URL.
    pub fn api_client_config(&self) -> anyhow::Result<ApiClientConfig> {
        let mut http = HttpClientConfig {
            request_timeout: Duration::from_millis(self.api.request_timeout),
            ..HttpClientConfig::default()
        };
        if self.api.allow_insecure_http {
            http.transport = TransportSecurity::AllowInsecureHttp;
        }
        if let Some(ua) = &self.api.user_agent {
            ua.clone_into(&mut http.user_agent);
        }

        let mut config = ApiClientConfig::new(&self.api.base_url)
            .with_context(|| format!("api.base_url = '{}'", self.api.base_url))?
            .with_http(http);
        config.auth_header.clone_from(&self.api.auth_header);
        config.auth_scheme.clone_from(&self.api.auth_scheme);
        config.refresh_path.clone_from(&self.api.refresh_path);
        Ok(config)
    }

    /// # Errors
    /// Returns an error if `~` is used and no home directory is known.
    pub fn session_dir(&self) -> anyhow::Result<PathBuf> {
        expand_tilde(&self.session.dir)
    }

    /// # Errors
    /// Returns an error if the configuration cannot be serialized.
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn expand_tilde(raw: &str) -> anyhow::Result<PathBuf> {
    let rest = if raw == "~" {
        ""
    } else if let Some(rest) = raw.strip_prefix("~/") {
        rest
    } else {
        return Ok(PathBuf::from(raw));
    };
    let home = dirs::home_dir().context("cannot determine the home directory for '~'")?;
    Ok(home.join(rest))
}
