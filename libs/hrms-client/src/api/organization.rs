use crate::client::ApiClient;
use crate::error::ApiError;
use crate::request::ApiRequest;
use crate::response::ApiResponse;

const PATH: &str = "organization.php";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrgView {
    Company,
    Branches,
    Departments,
    Designations,
}

impl OrgView {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Company => "company",
            Self::Branches => "branches",
            Self::Departments => "departments",
            Self::Designations => "designations",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OrganizationApi<'a> {
    pub(super) client: &'a ApiClient,
}

impl OrganizationApi<'_> {
    /// # Errors
    /// Any [`ApiClient::send`] error.
    pub async fn view(&self, view: OrgView) -> Result<ApiResponse, ApiError> {
        self.client
            .send(&ApiRequest::get(PATH).query("type", view.as_str()))
            .await
    }

    /// # Errors
    /// Any [`ApiClient::send`] error.
    pub async fn company(&self) -> Result<ApiResponse, ApiError> {
        self.view(OrgView::Company).await
    }

    /// # Errors
    /// Any [`ApiClient::send`] error.
    pub async fn branches(&self) -> Result<ApiResponse, ApiError> {
        self.view(OrgView::Branches).await
    }

    /// # Errors
    /// Any [`ApiClient::send`] error.
    pub async fn departments(&self) -> Result<ApiResponse, ApiError> {
        self.view(OrgView::Departments).await
    }

    /// # Errors
    /// Any [`ApiClient::send`] error.
    pub async fn designations(&self) -> Result<ApiResponse, ApiError> {
        self.view(OrgView::Designations).await
    }
}
