use anyhow::Context as _;
use clap::Args;
use hrms_client::ApiClient;

#[derive(Args)]
pub struct LoginArgs {
    #[arg(long)]
    email: String,

    /// Taken from `HRMS_PASSWORD` when omitted
    #[arg(long, env = "HRMS_PASSWORD", hide_env_values = true)]
    password: String,
}

impl LoginArgs {
    pub async fn run(&self, client: &ApiClient) -> anyhow::Result<()> {
        let profile = client
            .auth()
            .login(&self.email, &self.password)
            .await
            .context("login failed")?;
        println!("Logged in as {} <{}> ({})", profile.name, profile.email, profile.role);
        Ok(())
    }
}

pub async fn logout(client: &ApiClient) {
    client.auth().logout().await;
    println!("Logged out");
}

pub async fn whoami(client: &ApiClient) -> anyhow::Result<()> {
    match client.auth().restore().await {
        Some(profile) => println!("{}", serde_json::to_string_pretty(&profile)?),
        None => println!("not logged in"),
    }
    Ok(())
}
