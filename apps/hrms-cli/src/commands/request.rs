use anyhow::Context as _;
use clap::Args;
use hrms_client::{ApiClient, ApiRequest};
use http::Method;

#[derive(Args)]
pub struct RequestArgs {
    /// HTTP method, e.g. GET or POST
    method: String,

    /// Path relative to the base URL, e.g. `employees.php`
    path: String,

    /// Query parameter `key=value`; repeatable
    #[arg(short, long = "query", value_parser = parse_key_value)]
    query: Vec<(String, String)>,

    /// JSON request body
    #[arg(short, long)]
    data: Option<String>,
}

impl RequestArgs {
    fn build(&self) -> anyhow::Result<ApiRequest> {
        let method = Method::from_bytes(self.method.to_ascii_uppercase().as_bytes())
            .with_context(|| format!("invalid HTTP method '{}'", self.method))?;
        let mut request = ApiRequest::new(method, self.path.as_str());
        request.query.clone_from(&self.query);
        if let Some(data) = &self.data {
            let body: serde_json::Value =
                serde_json::from_str(data).context("--data is not valid JSON")?;
            request = request.body(body);
        }
        Ok(request)
    }

    pub async fn run(&self, client: &ApiClient) -> anyhow::Result<()> {
        let request = self.build()?;
        let response = client
            .send(&request)
            .await
            .with_context(|| format!("{} {} failed", request.method, request.path))?;
        super::print_response(&response);
        Ok(())
    }
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_owned(), v.to_owned()))
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))
}
