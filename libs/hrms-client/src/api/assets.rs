use serde_json::json;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::request::ApiRequest;
use crate::response::ApiResponse;

const PATH: &str = "assets.php";

#[derive(Debug, Clone, Copy)]
pub struct AssetsApi<'a> {
    pub(super) client: &'a ApiClient,
}

impl AssetsApi<'_> {
    /// # Errors
    /// Any [`ApiClient::send`] error.
    pub async fn list(&self) -> Result<ApiResponse, ApiError> {
        self.client.send(&ApiRequest::get(PATH)).await
    }

    /// Assets currently issued to an employee.
    ///
    /// # Errors
    /// Any [`ApiClient::send`] error.
    pub async fn for_employee(&self, employee_id: &str) -> Result<ApiResponse, ApiError> {
        self.client
            .send(&ApiRequest::get(PATH).query("employeeId", employee_id))
            .await
    }

    /// # Errors
    /// Any [`ApiClient::send`] error.
    pub async fn issue(&self, asset_id: &str, employee_id: &str) -> Result<ApiResponse, ApiError> {
        let body = json!({"action": "issue", "assetId": asset_id, "employeeId": employee_id});
        self.client.send(&ApiRequest::post(PATH).body(body)).await
    }

    /// # Errors
    /// Any [`ApiClient::send`] error.
    pub async fn return_asset(&self, asset_id: &str) -> Result<ApiResponse, ApiError> {
        let body = json!({"action": "return", "assetId": asset_id});
        self.client.send(&ApiRequest::post(PATH).body(body)).await
    }
}
