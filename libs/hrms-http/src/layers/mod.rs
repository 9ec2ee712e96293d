//! Tower layers for the HTTP client stack
//!
//! - [`UserAgentLayer`] - Adds a User-Agent header when the caller did not set one

mod user_agent;

pub use user_agent::{UserAgentLayer, UserAgentService};
