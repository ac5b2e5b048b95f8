//! One-shot query of the status endpoint.
//!
//! Unlike the watcher, which silently treats failures as "not distracted",
//! this command shows exactly what went wrong so the endpoint can be
//! debugged.

use crate::api::status::StatusClient;
use crate::libs::config::Config;
use crate::libs::messages::Message;
use crate::{msg_error, msg_success};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Status endpoint URL (defaults to the configured one)
    #[arg(long)]
    url: Option<String>,
}

pub async fn cmd(args: CheckArgs) -> Result<()> {
    let url = match args.url {
        Some(url) => url,
        None => Config::load_or_default().monitor.unwrap_or_default().status_url,
    };

    let client = StatusClient::new(url);
    match client.fetch().await {
        Ok(report) => msg_success!(Message::StatusEndpointReport {
            url: client.url().to_string(),
            alert: report.alert,
        }),
        Err(e) => msg_error!(Message::StatusEndpointFailed {
            url: client.url().to_string(),
            error: e.to_string(),
        }),
    }
    Ok(())
}
