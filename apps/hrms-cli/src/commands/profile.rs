use anyhow::Context as _;
use clap::{Args, Subcommand};
use hrms_client::ApiClient;
use hrms_session::ProfilePatch;

#[derive(Subcommand)]
pub enum ProfileCommand {
    /// Change profile fields; unspecified fields are left alone
    Update(UpdateArgs),
}

impl ProfileCommand {
    pub async fn run(&self, client: &ApiClient) -> anyhow::Result<()> {
        match self {
            Self::Update(args) => args.run(client).await,
        }
    }
}

#[derive(Args)]
pub struct UpdateArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    department: Option<String>,
    #[arg(long)]
    designation: Option<String>,
    #[arg(long)]
    avatar: Option<String>,
}

impl UpdateArgs {
    fn patch(&self) -> ProfilePatch {
        ProfilePatch {
            name: self.name.clone(),
            email: self.email.clone(),
            department: self.department.clone(),
            designation: self.designation.clone(),
            avatar: self.avatar.clone(),
            ..ProfilePatch::default()
        }
    }

    pub async fn run(&self, client: &ApiClient) -> anyhow::Result<()> {
        let patch = self.patch();
        if patch.is_empty() {
            anyhow::bail!("nothing to update; pass at least one field");
        }
        client
            .auth()
            .update_profile(&patch)
            .await
            .context("profile update failed")?;
        if let Some(profile) = client.session().profile() {
            println!("{}", serde_json::to_string_pretty(&profile)?);
        }
        Ok(())
    }
}
