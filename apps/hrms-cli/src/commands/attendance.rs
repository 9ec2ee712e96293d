use anyhow::Context as _;
use clap::{Args, Subcommand};
use hrms_client::ApiClient;

#[derive(Args)]
pub struct EmployeeArg {
    /// Defaults to the signed-in user
    #[arg(long)]
    employee_id: Option<String>,
}

#[derive(Subcommand)]
pub enum AttendanceCommand {
    PunchIn(EmployeeArg),
    PunchOut(EmployeeArg),
    /// Month summary
    Monthly {
        #[command(flatten)]
        employee: EmployeeArg,
        /// `YYYY-MM`
        #[arg(long)]
        month: String,
    },
}

impl AttendanceCommand {
    pub async fn run(&self, client: &ApiClient) -> anyhow::Result<()> {
        let attendance = client.attendance();
        let response = match self {
            Self::PunchIn(arg) => {
                let id = super::employee_id(client, arg.employee_id.as_deref())?;
                attendance.punch_in(&id).await.context("punch-in failed")?
            }
            Self::PunchOut(arg) => {
                let id = super::employee_id(client, arg.employee_id.as_deref())?;
                attendance.punch_out(&id).await.context("punch-out failed")?
            }
            Self::Monthly { employee, month } => {
                let id = super::employee_id(client, employee.employee_id.as_deref())?;
                attendance
                    .monthly(&id, month)
                    .await
                    .context("loading monthly attendance failed")?
            }
        };
        super::print_response(&response);
        Ok(())
    }
}
