use anyhow::Context as _;
use clap::{Subcommand, ValueEnum};
use hrms_client::ApiClient;
use hrms_client::api::{LeaveApplication, LeaveQuery};
use hrms_client::api::models::LeaveStatus;

#[derive(Clone, Copy, ValueEnum)]
pub enum StatusArg {
    Pending,
    Approved,
    Rejected,
}

impl From<StatusArg> for LeaveStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Pending => Self::Pending,
            StatusArg::Approved => Self::Approved,
            StatusArg::Rejected => Self::Rejected,
        }
    }
}

#[derive(Subcommand)]
pub enum LeaveCommand {
    List {
        #[arg(long, value_enum)]
        status: Option<StatusArg>,
        #[arg(long)]
        employee_id: Option<String>,
    },
    /// Request leave for the signed-in user
    Apply {
        /// e.g. "Casual Leave"
        #[arg(long = "type")]
        leave_type: String,
        /// `YYYY-MM-DD`
        #[arg(long)]
        from: String,
        /// `YYYY-MM-DD`
        #[arg(long)]
        to: String,
        #[arg(long)]
        reason: String,
    },
    Balance {
        #[arg(long)]
        employee_id: Option<String>,
    },
}

impl LeaveCommand {
    pub async fn run(&self, client: &ApiClient) -> anyhow::Result<()> {
        let leave = client.leave();
        let response = match self {
            Self::List {
                status,
                employee_id,
            } => {
                let query = LeaveQuery {
                    status: status.map(LeaveStatus::from),
                    employee_id: employee_id.clone(),
                };
                leave.list(&query).await.context("listing leave failed")?
            }
            Self::Apply {
                leave_type,
                from,
                to,
                reason,
            } => {
                let application = LeaveApplication {
                    leave_type: leave_type.clone(),
                    from_date: from.clone(),
                    to_date: to.clone(),
                    reason: reason.clone(),
                };
                leave
                    .apply(&application)
                    .await
                    .context("leave application failed")?
            }
            Self::Balance { employee_id } => {
                let id = super::employee_id(client, employee_id.as_deref())?;
                leave
                    .balance(&id)
                    .await
                    .context("loading leave balance failed")?
            }
        };
        super::print_response(&response);
        Ok(())
    }
}
