use serde_json::json;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::request::ApiRequest;
use crate::response::ApiResponse;

const PATH: &str = "training.php";

#[derive(Debug, Clone, Copy)]
pub struct TrainingApi<'a> {
    pub(super) client: &'a ApiClient,
}

impl TrainingApi<'_> {
    /// # Errors
    /// Any [`ApiClient::send`] error.
    pub async fn programs(&self) -> Result<ApiResponse, ApiError> {
        self.client
            .send(&ApiRequest::get(PATH).query("type", "programs"))
            .await
    }

    /// # Errors
    /// Any [`ApiClient::send`] error.
    pub async fn nominations(&self, employee_id: Option<&str>) -> Result<ApiResponse, ApiError> {
        let request = ApiRequest::get(PATH)
            .query("type", "nominations")
            .query_opt("employeeId", employee_id);
        self.client.send(&request).await
    }

    /// # Errors
    /// Any [`ApiClient::send`] error.
    pub async fn nominate(&self, program_id: &str, employee_id: &str) -> Result<ApiResponse, ApiError> {
        let body = json!({"type": "nominate", "programId": program_id, "employeeId": employee_id});
        self.client.send(&ApiRequest::post(PATH).body(body)).await
    }
}
