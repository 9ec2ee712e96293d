use crate::client::ApiClient;
use crate::error::ApiError;
use crate::request::ApiRequest;
use crate::response::ApiResponse;

const PATH: &str = "reports.php";

/// Read-only report endpoints. Every report is `GET reports.php?type=..`.
#[derive(Debug, Clone, Copy)]
pub struct ReportsApi<'a> {
    pub(super) client: &'a ApiClient,
}

impl ReportsApi<'_> {
    /// # Errors
    /// Any [`ApiClient::send`] error.
    pub async fn headcount(
        &self,
        department: Option<&str>,
        date: Option<&str>,
    ) -> Result<ApiResponse, ApiError> {
        let request = report("headcount")
            .query_opt("department", department)
            .query_opt("date", date);
        self.client.send(&request).await
    }

    /// # Errors
    /// Any [`ApiClient::send`] error.
    pub async fn attendance_summary(
        &self,
        month: &str,
        department: Option<&str>,
    ) -> Result<ApiResponse, ApiError> {
        let request = report("attendance")
            .query("month", month)
            .query_opt("department", department);
        self.client.send(&request).await
    }

    /// # Errors
    /// Any [`ApiClient::send`] error.
    pub async fn payroll_summary(&self, month: &str, year: i32) -> Result<ApiResponse, ApiError> {
        let request = report("payroll").query("month", month).query("year", year);
        self.client.send(&request).await
    }

    /// # Errors
    /// Any [`ApiClient::send`] error.
    pub async fn attrition(&self, year: i32) -> Result<ApiResponse, ApiError> {
        self.client.send(&report("attrition").query("year", year)).await
    }

    /// # Errors
    /// Any [`ApiClient::send`] error.
    pub async fn leave_balance(&self, department: Option<&str>) -> Result<ApiResponse, ApiError> {
        let request = report("leave-balance").query_opt("department", department);
        self.client.send(&request).await
    }
}

fn report(kind: &str) -> ApiRequest {
    ApiRequest::get(PATH).query("type", kind)
}
