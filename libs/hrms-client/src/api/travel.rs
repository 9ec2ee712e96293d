use serde::Serialize;
use serde_json::json;

use super::models::TravelStatus;
use super::{object_with, tag};
use crate::client::ApiClient;
use crate::error::ApiError;
use crate::request::ApiRequest;
use crate::response::ApiResponse;

const PATH: &str = "travel.php";

#[derive(Debug, Clone, Copy)]
pub struct TravelApi<'a> {
    pub(super) client: &'a ApiClient,
}

impl TravelApi<'_> {
    /// # Errors
    /// Any [`ApiClient::send`] error.
    pub async fn requests(&self, status: Option<TravelStatus>) -> Result<ApiResponse, ApiError> {
        let status = status.as_ref().map(tag).transpose()?;
        self.client
            .send(&ApiRequest::get(PATH).query_opt("status", status))
            .await
    }

    /// # Errors
    /// `InvalidRequest` if `request` is not JSON, else any send error.
    pub async fn create_request<T: Serialize + ?Sized>(
        &self,
        request: &T,
    ) -> Result<ApiResponse, ApiError> {
        self.client.send(&ApiRequest::post(PATH).json(request)?).await
    }

    /// # Errors
    /// Any [`ApiClient::send`] error.
    pub async fn decide(&self, id: &str, status: TravelStatus) -> Result<ApiResponse, ApiError> {
        let status = tag(&status)?;
        let body = json!({"id": id, "status": status});
        self.client.send(&ApiRequest::put(PATH).body(body)).await
    }

    /// # Errors
    /// `InvalidRequest` if `expense` is not a JSON object, else any send
    /// error.
    pub async fn submit_expense<T: Serialize + ?Sized>(
        &self,
        expense: &T,
    ) -> Result<ApiResponse, ApiError> {
        let body = object_with(expense, &[("type", json!("expense"))])?;
        self.client.send(&ApiRequest::post(PATH).body(body)).await
    }
}
