use serde::Serialize;

use super::models::LeaveStatus;
use super::tag;
use crate::client::ApiClient;
use crate::error::ApiError;
use crate::request::ApiRequest;
use crate::response::ApiResponse;

const PATH: &str = "leave.php";

#[derive(Debug, Clone, Default)]
pub struct LeaveQuery {
    pub status: Option<LeaveStatus>,
    pub employee_id: Option<String>,
}

/// Body of a new leave request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveApplication {
    pub leave_type: String,
    pub from_date: String,
    pub to_date: String,
    pub reason: String,
}

/// Outcome an approver can record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaveDecision {
    Approved,
    Rejected,
}

#[derive(Serialize)]
struct DecisionBody<'a> {
    id: &'a str,
    status: LeaveDecision,
    #[serde(skip_serializing_if = "Option::is_none")]
    remarks: Option<&'a str>,
}

#[derive(Debug, Clone, Copy)]
pub struct LeaveApi<'a> {
    pub(super) client: &'a ApiClient,
}

impl LeaveApi<'_> {
    /// # Errors
    /// Any [`ApiClient::send`] error.
    pub async fn list(&self, query: &LeaveQuery) -> Result<ApiResponse, ApiError> {
        let status = query.status.as_ref().map(tag).transpose()?;
        let request = ApiRequest::get(PATH)
            .query_opt("status", status)
            .query_opt("employeeId", query.employee_id.as_deref());
        self.client.send(&request).await
    }

    /// # Errors
    /// Any [`ApiClient::send`] error.
    pub async fn apply(&self, application: &LeaveApplication) -> Result<ApiResponse, ApiError> {
        self.client
            .send(&ApiRequest::post(PATH).json(application)?)
            .await
    }

    /// # Errors
    /// Any [`ApiClient::send`] error.
    pub async fn decide(
        &self,
        id: &str,
        decision: LeaveDecision,
        remarks: Option<&str>,
    ) -> Result<ApiResponse, ApiError> {
        let body = DecisionBody {
            id,
            status: decision,
            remarks,
        };
        self.client.send(&ApiRequest::put(PATH).json(&body)?).await
    }

    /// # Errors
    /// Any [`ApiClient::send`] error.
    pub async fn balance(&self, employee_id: &str) -> Result<ApiResponse, ApiError> {
        let request = ApiRequest::get(PATH)
            .query("employeeId", employee_id)
            .query("type", "balance");
        self.client.send(&request).await
    }
}
