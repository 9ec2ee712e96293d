use serde_json::json;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::request::ApiRequest;
use crate::response::ApiResponse;

const PATH: &str = "payroll.php";

#[derive(Debug, Clone, Copy)]
pub struct PayrollApi<'a> {
    pub(super) client: &'a ApiClient,
}

impl PayrollApi<'_> {
    /// Payroll register for a month.
    ///
    /// # Errors
    /// Any [`ApiClient::send`] error.
    pub async fn list(&self, month: &str, year: i32) -> Result<ApiResponse, ApiError> {
        let request = ApiRequest::get(PATH).query("month", month).query("year", year);
        self.client.send(&request).await
    }

    /// # Errors
    /// Any [`ApiClient::send`] error.
    pub async fn for_employee(
        &self,
        employee_id: &str,
        month: Option<&str>,
    ) -> Result<ApiResponse, ApiError> {
        let request = ApiRequest::get(PATH)
            .query("employeeId", employee_id)
            .query_opt("month", month);
        self.client.send(&request).await
    }

    /// # Errors
    /// Any [`ApiClient::send`] error.
    pub async fn generate_payslip(
        &self,
        employee_id: &str,
        month: &str,
    ) -> Result<ApiResponse, ApiError> {
        let body = json!({"action": "generate", "employeeId": employee_id, "month": month});
        self.client.send(&ApiRequest::post(PATH).body(body)).await
    }

    /// Run payroll for every employee in the month.
    ///
    /// # Errors
    /// Any [`ApiClient::send`] error.
    pub async fn process(&self, month: &str, year: i32) -> Result<ApiResponse, ApiError> {
        let body = json!({"action": "process", "month": month, "year": year});
        self.client.send(&ApiRequest::post(PATH).body(body)).await
    }
}
