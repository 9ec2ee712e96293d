#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![warn(warnings)]

//! Authenticated client for the HRMS backend
//!
//! [`ApiClient`] sends requests relative to a base URL and attaches the
//! access token held by a [`SessionStore`](hrms_session::SessionStore). A
//! 401 on a request that carried a token triggers one refresh through
//! `refresh.php` and one resend; if the refresh fails the session is cleared
//! and the caller gets [`ApiError::ReauthRequired`].
//!
//! ```ignore
//! use hrms_client::{ApiClient, ApiClientConfig};
//! use hrms_session::{FileStore, SessionStore};
//!
//! let session = SessionStore::new(FileStore::new("/home/me/.hrms"));
//! let client = ApiClient::new(ApiClientConfig::new("https://hr.example.com/api")?, session)?;
//!
//! client.auth().login("me@example.com", "secret").await?;
//! let stats = client.dashboard().stats().await?;
//! ```

pub mod api;
mod auth;
mod client;
mod config;
mod error;
mod request;
mod response;

pub use auth::{AuthApi, NewAccount};
pub use client::{ApiClient, AuthState};
pub use config::{ApiClientConfig, DEFAULT_AUTH_HEADER, DEFAULT_REFRESH_PATH, parse_base_url};
pub use error::ApiError;
pub use request::ApiRequest;
pub use response::ApiResponse;
