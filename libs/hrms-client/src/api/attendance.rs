use serde_json::json;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::request::ApiRequest;
use crate::response::ApiResponse;

const PATH: &str = "attendance.php";

#[derive(Debug, Clone, Default)]
pub struct AttendanceQuery {
    /// `YYYY-MM-DD`
    pub date: Option<String>,
    pub employee_id: Option<String>,
    /// `YYYY-MM`
    pub month: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct AttendanceApi<'a> {
    pub(super) client: &'a ApiClient,
}

impl AttendanceApi<'_> {
    /// # Errors
    /// Any [`ApiClient::send`] error.
    pub async fn list(&self, query: &AttendanceQuery) -> Result<ApiResponse, ApiError> {
        let request = ApiRequest::get(PATH)
            .query_opt("date", query.date.as_deref())
            .query_opt("employeeId", query.employee_id.as_deref())
            .query_opt("month", query.month.as_deref());
        self.client.send(&request).await
    }

    /// # Errors
    /// Any [`ApiClient::send`] error.
    pub async fn punch_in(&self, employee_id: &str) -> Result<ApiResponse, ApiError> {
        self.punch("punch_in", employee_id).await
    }

    /// # Errors
    /// Any [`ApiClient::send`] error.
    pub async fn punch_out(&self, employee_id: &str) -> Result<ApiResponse, ApiError> {
        self.punch("punch_out", employee_id).await
    }

    /// Month summary for one employee; `month` is `YYYY-MM`.
    ///
    /// # Errors
    /// Any [`ApiClient::send`] error.
    pub async fn monthly(&self, employee_id: &str, month: &str) -> Result<ApiResponse, ApiError> {
        let request = ApiRequest::get(PATH)
            .query("employeeId", employee_id)
            .query("month", month)
            .query("type", "monthly");
        self.client.send(&request).await
    }

    async fn punch(&self, action: &str, employee_id: &str) -> Result<ApiResponse, ApiError> {
        let request =
            ApiRequest::post(PATH).body(json!({"action": action, "employeeId": employee_id}));
        self.client.send(&request).await
    }
}
