use anyhow::Context as _;
use clap::Subcommand;
use hrms_client::{ApiClient, ApiResponse};

mod attendance;
mod auth;
mod dashboard;
mod leave;
mod payroll;
mod profile;
mod request;

/// Commands that talk to the backend
#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and store the session
    Login(auth::LoginArgs),
    /// Sign out and forget the stored session
    Logout,
    /// Validate the stored session and print the signed-in user
    Whoami,
    /// Manage the signed-in user's profile
    #[command(subcommand)]
    Profile(profile::ProfileCommand),
    /// Send an arbitrary authenticated request
    Request(request::RequestArgs),
    #[command(subcommand)]
    Attendance(attendance::AttendanceCommand),
    #[command(subcommand)]
    Leave(leave::LeaveCommand),
    #[command(subcommand)]
    Payroll(payroll::PayrollCommand),
    Dashboard(dashboard::DashboardArgs),
}

impl Commands {
    /// # Errors
    /// Any client error, wrapped with the command context.
    pub async fn run(&self, client: &ApiClient) -> anyhow::Result<()> {
        match self {
            Self::Login(args) => args.run(client).await,
            Self::Logout => {
                auth::logout(client).await;
                Ok(())
            }
            Self::Whoami => auth::whoami(client).await,
            Self::Profile(command) => command.run(client).await,
            Self::Request(args) => args.run(client).await,
            Self::Attendance(command) => command.run(client).await,
            Self::Leave(command) => command.run(client).await,
            Self::Payroll(command) => command.run(client).await,
            Self::Dashboard(args) => args.run(client).await,
        }
    }
}

/// Pretty-print a JSON body, or the raw text if it is not JSON.
fn print_response(response: &ApiResponse) {
    match response.json::<serde_json::Value>() {
        Ok(value) => match serde_json::to_string_pretty(&value) {
            Ok(pretty) => println!("{pretty}"),
            Err(_) => println!("{}", response.text()),
        },
        Err(_) => println!("{}", response.text()),
    }
}

/// Explicit `--employee-id`, else the signed-in user's own id.
fn employee_id(client: &ApiClient, explicit: Option<&str>) -> anyhow::Result<String> {
    if let Some(id) = explicit {
        return Ok(id.to_owned());
    }
    client
        .session()
        .profile()
        .and_then(|profile| profile.employee_id)
        .context("no --employee-id given and the signed-in user has no employee id")
}
