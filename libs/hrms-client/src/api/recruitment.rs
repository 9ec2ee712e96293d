use serde::Serialize;
use serde_json::json;

use super::object_with;
use crate::client::ApiClient;
use crate::error::ApiError;
use crate::request::ApiRequest;
use crate::response::ApiResponse;

const PATH: &str = "recruitment.php";

#[derive(Debug, Clone, Copy)]
pub struct RecruitmentApi<'a> {
    pub(super) client: &'a ApiClient,
}

impl RecruitmentApi<'_> {
    /// # Errors
    /// Any [`ApiClient::send`] error.
    pub async fn jobs(&self) -> Result<ApiResponse, ApiError> {
        self.client
            .send(&ApiRequest::get(PATH).query("type", "jobs"))
            .await
    }

    /// # Errors
    /// `InvalidRequest` if `job` is not a JSON object, else any send error.
    pub async fn create_job<T: Serialize + ?Sized>(&self, job: &T) -> Result<ApiResponse, ApiError> {
        let body = object_with(job, &[("type", json!("job"))])?;
        self.client.send(&ApiRequest::post(PATH).body(body)).await
    }

    /// All candidates, or those of one job.
    ///
    /// # Errors
    /// Any [`ApiClient::send`] error.
    pub async fn candidates(&self, job_id: Option<&str>) -> Result<ApiResponse, ApiError> {
        let request = ApiRequest::get(PATH)
            .query("type", "candidates")
            .query_opt("jobId", job_id);
        self.client.send(&request).await
    }

    /// # Errors
    /// `InvalidRequest` if `changes` is not a JSON object, else any send
    /// error.
    pub async fn update_candidate<T: Serialize + ?Sized>(
        &self,
        id: &str,
        changes: &T,
    ) -> Result<ApiResponse, ApiError> {
        let body = object_with(changes, &[("type", json!("candidate")), ("id", json!(id))])?;
        self.client.send(&ApiRequest::put(PATH).body(body)).await
    }
}
