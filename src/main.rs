use anyhow::Result;
use lookaway::commands::Cli;
use lookaway::libs::messages::macros::is_debug_mode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Optional overrides such as LOOKAWAY_STATUS_URL may live in a local .env
    let _ = dotenv::dotenv();

    if is_debug_mode() {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lookaway=debug")))
            .with_target(false)
            .init();
    }

    Cli::menu().await
}
