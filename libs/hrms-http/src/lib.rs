#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![warn(warnings)]

//! HTTP transport for the HRMS client
//!
//! A hyper-based HTTP client with:
//! - TLS via rustls (HTTPS only by default)
//! - Connection pooling
//! - A fixed per-request timeout
//! - User-Agent header injection
//! - Transparent response decompression (gzip, brotli, deflate)
//! - Size-limited body reading
//!
//! The client never retries on its own. Retry policy (the single
//! refresh-and-retry on HTTP 401) lives one level up, in `hrms-client`.
//!
//! # Example
//!
//! ```ignore
//! use hrms_http::HttpClient;
//! use std::time::Duration;
//!
//! let client = HttpClient::builder()
//!     .timeout(Duration::from_secs(10))
//!     .user_agent("hrms/0.1")
//!     .build()?;
//!
//! let resp = client
//!     .request(http::Method::GET, "https://hr.example.com/api/dashboard.php?type=stats")
//!     .header("x-auth-token", token)
//!     .send()
//!     .await?;
//! ```

mod builder;
mod client;
mod config;
mod error;
mod layers;
mod request;
mod response;
mod tls;

pub use builder::HttpClientBuilder;
pub use client::HttpClient;
pub use config::{DEFAULT_USER_AGENT, HttpClientConfig, TlsRootConfig, TransportSecurity};
pub use error::{HttpError, InvalidUriKind};
pub use layers::{UserAgentLayer, UserAgentService};
pub use request::RequestBuilder;
pub use response::{ERROR_BODY_PREVIEW_LIMIT, HttpResponse, ResponseBody};
