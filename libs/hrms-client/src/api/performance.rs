use serde::Serialize;
use serde_json::json;

use super::object_with;
use crate::client::ApiClient;
use crate::error::ApiError;
use crate::request::ApiRequest;
use crate::response::ApiResponse;

const PATH: &str = "performance.php";

#[derive(Debug, Clone, Copy)]
pub struct PerformanceApi<'a> {
    pub(super) client: &'a ApiClient,
}

impl PerformanceApi<'_> {
    /// Goals and appraisals, optionally narrowed to an employee or a period.
    ///
    /// # Errors
    /// Any [`ApiClient::send`] error.
    pub async fn list(
        &self,
        employee_id: Option<&str>,
        period: Option<&str>,
    ) -> Result<ApiResponse, ApiError> {
        let request = ApiRequest::get(PATH)
            .query_opt("employeeId", employee_id)
            .query_opt("period", period);
        self.client.send(&request).await
    }

    /// # Errors
    /// `InvalidRequest` if `goal` is not a JSON object, else any send error.
    pub async fn create_goal<T: Serialize + ?Sized>(&self, goal: &T) -> Result<ApiResponse, ApiError> {
        let body = object_with(goal, &[("type", json!("goal"))])?;
        self.client.send(&ApiRequest::post(PATH).body(body)).await
    }

    /// # Errors
    /// `InvalidRequest` if `appraisal` is not a JSON object, else any send
    /// error.
    pub async fn submit_appraisal<T: Serialize + ?Sized>(
        &self,
        appraisal: &T,
    ) -> Result<ApiResponse, ApiError> {
        let body = object_with(appraisal, &[("type", json!("appraisal"))])?;
        self.client.send(&ApiRequest::post(PATH).body(body)).await
    }

    /// # Errors
    /// Any [`ApiClient::send`] error.
    pub async fn ratings(&self, employee_id: &str) -> Result<ApiResponse, ApiError> {
        let request = ApiRequest::get(PATH)
            .query("employeeId", employee_id)
            .query("type", "ratings");
        self.client.send(&request).await
    }
}
