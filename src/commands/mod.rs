pub mod check;
pub mod init;
pub mod sounds;
pub mod stop;
pub mod watch;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Configuration initialization")]
    Init(init::InitArgs),
    #[command(about = "Watch for distraction and raise alerts")]
    Watch(watch::WatchArgs),
    #[command(about = "Stop the background watcher")]
    Stop,
    #[command(about = "Query the status endpoint once")]
    Check(check::CheckArgs),
    #[command(about = "List or play the alert sounds")]
    Sounds(sounds::SoundsArgs),
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub async fn menu() -> Result<()> {
        let cli = Self::parse();
        match cli.command {
            Commands::Init(args) => init::cmd(args),
            Commands::Watch(args) => watch::cmd(args).await,
            Commands::Stop => stop::cmd(),
            Commands::Check(args) => check::cmd(args).await,
            Commands::Sounds(args) => sounds::cmd(args).await,
        }
    }
}
