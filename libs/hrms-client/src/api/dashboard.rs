use crate::client::ApiClient;
use crate::error::ApiError;
use crate::request::ApiRequest;
use crate::response::ApiResponse;

const PATH: &str = "dashboard.php";

/// Dashboard widgets, selected by `?type=`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardView {
    Stats,
    Activities,
    Notifications,
    QuickStats,
}

impl DashboardView {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stats => "stats",
            Self::Activities => "activities",
            Self::Notifications => "notifications",
            Self::QuickStats => "quick-stats",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DashboardApi<'a> {
    pub(super) client: &'a ApiClient,
}

impl DashboardApi<'_> {
    /// # Errors
    /// Any [`ApiClient::send`] error.
    pub async fn view(&self, view: DashboardView) -> Result<ApiResponse, ApiError> {
        self.client
            .send(&ApiRequest::get(PATH).query("type", view.as_str()))
            .await
    }

    /// # Errors
    /// Any [`ApiClient::send`] error.
    pub async fn stats(&self) -> Result<ApiResponse, ApiError> {
        self.view(DashboardView::Stats).await
    }

    /// # Errors
    /// Any [`ApiClient::send`] error.
    pub async fn recent_activities(&self) -> Result<ApiResponse, ApiError> {
        self.view(DashboardView::Activities).await
    }

    /// # Errors
    /// Any [`ApiClient::send`] error.
    pub async fn notifications(&self) -> Result<ApiResponse, ApiError> {
        self.view(DashboardView::Notifications).await
    }

    /// # Errors
    /// Any [`ApiClient::send`] error.
    pub async fn quick_stats(&self) -> Result<ApiResponse, ApiError> {
        self.view(DashboardView::QuickStats).await
    }
}
