//! Typed access to the HRMS resource endpoints.
//!
//! Each group is a borrowed handle, e.g. `client.leave().apply(..)`. Calls go
//! through [`ApiClient::send`], so they carry the session token and get the
//! refresh-and-retry behaviour. They return the raw [`ApiResponse`]; decode
//! the backend's envelope with [`ApiResponse::json`] and the [`models`].
//!
//! [`ApiResponse`]: crate::ApiResponse
//! [`ApiResponse::json`]: crate::ApiResponse::json

mod assets;
mod attendance;
mod dashboard;
mod employees;
mod leave;
pub mod models;
mod organization;
mod payroll;
mod performance;
mod recruitment;
mod reports;
mod training;
mod travel;

pub use assets::AssetsApi;
pub use attendance::{AttendanceApi, AttendanceQuery};
pub use dashboard::{DashboardApi, DashboardView};
pub use employees::{EmployeeQuery, EmployeesApi};
pub use leave::{LeaveApi, LeaveApplication, LeaveDecision, LeaveQuery};
pub use organization::{OrgView, OrganizationApi};
pub use payroll::PayrollApi;
pub use performance::PerformanceApi;
pub use recruitment::RecruitmentApi;
pub use reports::ReportsApi;
pub use training::TrainingApi;
pub use travel::TravelApi;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::client::ApiClient;
use crate::error::ApiError;

impl ApiClient {
    #[must_use]
    pub fn employees(&self) -> EmployeesApi<'_> {
        EmployeesApi { client: self }
    }

    #[must_use]
    pub fn attendance(&self) -> AttendanceApi<'_> {
        AttendanceApi { client: self }
    }

    #[must_use]
    pub fn leave(&self) -> LeaveApi<'_> {
        LeaveApi { client: self }
    }

    #[must_use]
    pub fn payroll(&self) -> PayrollApi<'_> {
        PayrollApi { client: self }
    }

    #[must_use]
    pub fn recruitment(&self) -> RecruitmentApi<'_> {
        RecruitmentApi { client: self }
    }

    #[must_use]
    pub fn performance(&self) -> PerformanceApi<'_> {
        PerformanceApi { client: self }
    }

    #[must_use]
    pub fn training(&self) -> TrainingApi<'_> {
        TrainingApi { client: self }
    }

    #[must_use]
    pub fn assets(&self) -> AssetsApi<'_> {
        AssetsApi { client: self }
    }

    #[must_use]
    pub fn travel(&self) -> TravelApi<'_> {
        TravelApi { client: self }
    }

    #[must_use]
    pub fn reports(&self) -> ReportsApi<'_> {
        ReportsApi { client: self }
    }

    #[must_use]
    pub fn dashboard(&self) -> DashboardApi<'_> {
        DashboardApi { client: self }
    }

    #[must_use]
    pub fn organization(&self) -> OrganizationApi<'_> {
        OrganizationApi { client: self }
    }
}

/// Serialize `body` to a JSON object and set `fields` on it. The given
/// fields win over keys of the same name in `body`.
fn object_with<T: Serialize + ?Sized>(
    body: &T,
    fields: &[(&str, Value)],
) -> Result<Value, ApiError> {
    let mut object = match serde_json::to_value(body) {
        Ok(Value::Object(object)) => object,
        Ok(Value::Null) => Map::new(),
        Ok(other) => {
            return Err(ApiError::InvalidRequest(format!(
                "request body must be a JSON object, got {}",
                json_kind(&other)
            )));
        }
        Err(e) => return Err(ApiError::InvalidRequest(format!("request body: {e}"))),
    };
    for (key, value) in fields {
        object.insert((*key).to_owned(), value.clone());
    }
    Ok(Value::Object(object))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Wire tag of a unit enum, e.g. `LeaveStatus::Pending` -> `pending`.
fn tag<T: Serialize>(value: &T) -> Result<String, ApiError> {
    match serde_json::to_value(value) {
        Ok(Value::String(s)) => Ok(s),
        Ok(other) => Err(ApiError::InvalidRequest(format!(
            "expected a string tag, got {}",
            json_kind(&other)
        ))),
        Err(e) => Err(ApiError::InvalidRequest(e.to_string())),
    }
}
