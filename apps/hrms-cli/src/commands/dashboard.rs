use anyhow::Context as _;
use clap::{Args, ValueEnum};
use hrms_client::ApiClient;
use hrms_client::api::DashboardView;

#[derive(Clone, Copy, ValueEnum)]
pub enum ViewArg {
    Stats,
    Activities,
    Notifications,
    QuickStats,
}

impl From<ViewArg> for DashboardView {
    fn from(arg: ViewArg) -> Self {
        match arg {
            ViewArg::Stats => Self::Stats,
            ViewArg::Activities => Self::Activities,
            ViewArg::Notifications => Self::Notifications,
            ViewArg::QuickStats => Self::QuickStats,
        }
    }
}

#[derive(Args)]
pub struct DashboardArgs {
    #[arg(value_enum, default_value_t = ViewArg::Stats)]
    view: ViewArg,
}

impl DashboardArgs {
    pub async fn run(&self, client: &ApiClient) -> anyhow::Result<()> {
        let response = client
            .dashboard()
            .view(self.view.into())
            .await
            .context("loading dashboard failed")?;
        super::print_response(&response);
        Ok(())
    }
}
