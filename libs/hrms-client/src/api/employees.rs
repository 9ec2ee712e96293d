use serde::Serialize;
use serde_json::json;

use super::object_with;
use crate::client::ApiClient;
use crate::error::ApiError;
use crate::request::ApiRequest;
use crate::response::ApiResponse;

const PATH: &str = "employees.php";

/// Filters for [`EmployeesApi::list`]. Unset fields are not sent.
#[derive(Debug, Clone, Default)]
pub struct EmployeeQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub department: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct EmployeesApi<'a> {
    pub(super) client: &'a ApiClient,
}

impl EmployeesApi<'_> {
    /// # Errors
    /// Any [`ApiClient::send`] error.
    pub async fn list(&self, query: &EmployeeQuery) -> Result<ApiResponse, ApiError> {
        let request = ApiRequest::get(PATH)
            .query_opt("page", query.page)
            .query_opt("limit", query.limit)
            .query_opt("search", query.search.as_deref())
            .query_opt("department", query.department.as_deref());
        self.client.send(&request).await
    }

    /// # Errors
    /// Any [`ApiClient::send`] error.
    pub async fn get(&self, id: &str) -> Result<ApiResponse, ApiError> {
        self.client.send(&ApiRequest::get(PATH).query("id", id)).await
    }

    /// # Errors
    /// `InvalidRequest` if `employee` is not JSON, else any send error.
    pub async fn create<T: Serialize + ?Sized>(&self, employee: &T) -> Result<ApiResponse, ApiError> {
        self.client.send(&ApiRequest::post(PATH).json(employee)?).await
    }

    /// Sends `{id, ...changes}`.
    ///
    /// # Errors
    /// `InvalidRequest` if `changes` is not a JSON object, else any send
    /// error.
    pub async fn update<T: Serialize + ?Sized>(
        &self,
        id: &str,
        changes: &T,
    ) -> Result<ApiResponse, ApiError> {
        let body = object_with(changes, &[("id", json!(id))])?;
        self.client.send(&ApiRequest::put(PATH).body(body)).await
    }

    /// # Errors
    /// Any [`ApiClient::send`] error.
    pub async fn delete(&self, id: &str) -> Result<ApiResponse, ApiError> {
        self.client.send(&ApiRequest::delete(PATH).query("id", id)).await
    }
}
