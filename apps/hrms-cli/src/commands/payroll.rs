use anyhow::Context as _;
use clap::Subcommand;
use hrms_client::ApiClient;

#[derive(Subcommand)]
pub enum PayrollCommand {
    /// Payslips of one employee
    Show {
        /// Defaults to the signed-in user
        #[arg(long)]
        employee_id: Option<String>,
        #[arg(long)]
        month: Option<String>,
    },
}

impl PayrollCommand {
    pub async fn run(&self, client: &ApiClient) -> anyhow::Result<()> {
        match self {
            Self::Show { employee_id, month } => {
                let id = super::employee_id(client, employee_id.as_deref())?;
                let response = client
                    .payroll()
                    .for_employee(&id, month.as_deref())
                    .await
                    .context("loading payroll failed")?;
                super::print_response(&response);
            }
        }
        Ok(())
    }
}
