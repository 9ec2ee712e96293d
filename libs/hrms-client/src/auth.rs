//! Sign-in, sign-out and profile flows.

use hrms_session::{Profile, ProfilePatch, Role, SecretString};
use serde::{Deserialize, Serialize};

use crate::client::{ApiClient, AuthState};
use crate::error::ApiError;
use crate::request::ApiRequest;
use crate::response::ApiResponse;

const LOGIN_PATH: &str = "login.php";
const LOGOUT_PATH: &str = "logout.php";
const REGISTER_PATH: &str = "register.php";
const PROFILE_PATH: &str = "profile.php";

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    token: String,
    refresh_token: String,
    user: Profile,
}

#[derive(Deserialize)]
struct ProfileResponse {
    user: Profile,
}

/// Payload of `register.php`
#[derive(Debug, Clone, Serialize)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

/// Authentication endpoints, bound to an [`ApiClient`] and its session.
#[derive(Debug, Clone, Copy)]
pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Exchange credentials for a session and persist it.
    ///
    /// # Errors
    /// - `Unauthorized` or `Http` when the backend rejects the credentials
    /// - `Decode` when the response lacks tokens or a user
    /// - `Storage` when the session cannot be persisted; the login has not
    ///   happened in that case
    pub async fn login(&self, email: &str, password: &str) -> Result<Profile, ApiError> {
        let request = ApiRequest::post(LOGIN_PATH).json(&Credentials { email, password })?;
        let response: LoginResponse = self.client.send_unauthenticated(&request).await?.json()?;

        if response.token.is_empty() || response.refresh_token.is_empty() {
            return Err(ApiError::Decode("login response carries an empty token".to_owned()));
        }
        let access = SecretString::from(response.token);
        let refresh = SecretString::from(response.refresh_token);
        self.client.session().save(&access, &refresh, &response.user)?;

        tracing::info!(user_id = %response.user.id, role = %response.user.role, "logged in");
        self.client.publish(AuthState::Authenticated);
        Ok(response.user)
    }

    /// Tell the backend, then clear the local session whatever it answered.
    pub async fn logout(&self) {
        if let Err(e) = self.client.send(&ApiRequest::post(LOGOUT_PATH)).await {
            tracing::warn!(error = %e, "logout request failed; clearing local session anyway");
        }
        self.client.session().clear();
        self.client.publish(AuthState::Anonymous);
        tracing::info!("logged out");
    }

    /// # Errors
    /// Any [`ApiClient::send_unauthenticated`] error.
    pub async fn register(&self, account: &NewAccount) -> Result<ApiResponse, ApiError> {
        let request = ApiRequest::post(REGISTER_PATH).json(account)?;
        self.client.send_unauthenticated(&request).await
    }

    /// Load the profile from the backend and replace the stored copy.
    ///
    /// # Errors
    /// Any [`ApiClient::send`] error, `Decode` for an unexpected body and
    /// `Storage` if the profile cannot be stored.
    pub async fn fetch_profile(&self) -> Result<Profile, ApiError> {
        let response: ProfileResponse = self
            .client
            .send_json(&ApiRequest::get(PROFILE_PATH))
            .await?;
        self.client.session().replace_profile(&response.user)?;
        Ok(response.user)
    }

    /// Send the changed fields, then merge them into the stored profile.
    ///
    /// # Errors
    /// Any [`ApiClient::send`] error, or `Storage` if the merge cannot be
    /// written.
    pub async fn update_profile(&self, patch: &ProfilePatch) -> Result<ApiResponse, ApiError> {
        let request = ApiRequest::put(PROFILE_PATH).json(patch)?;
        let response = self.client.send(&request).await?;
        self.client.session().update_profile(patch)?;
        Ok(response)
    }

    /// Validate a stored session against the backend at startup.
    ///
    /// Returns the server's profile when the session is still good. Any
    /// failure clears the session and yields `None`.
    pub async fn restore(&self) -> Option<Profile> {
        if !self.client.session().is_logged_in() {
            tracing::debug!("no stored session to restore");
            self.client.publish(AuthState::Anonymous);
            return None;
        }
        match self.fetch_profile().await {
            Ok(profile) => {
                tracing::debug!(user_id = %profile.id, "session restored");
                self.client.publish(AuthState::Authenticated);
                Some(profile)
            }
            Err(e) => {
                tracing::warn!(error = %e, "stored session is no longer valid; clearing it");
                self.client.session().clear();
                self.client.publish(AuthState::Anonymous);
                None
            }
        }
    }
}

impl ApiClient {
    #[must_use]
    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }
}
