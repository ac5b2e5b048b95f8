//! # Lookaway - attention monitor for the command line
//!
//! Watches a distraction signal and raises an alert once the user has been
//! continuously distracted for longer than a configured threshold.
//!
//! ## Features
//!
//! - **Attention Monitor**: Accumulates uninterrupted distraction time against a threshold
//! - **Detection Sources**: Remote status endpoint polling or a keyboard simulation
//! - **Alerts**: Terminal banner, optional desktop notification and sound cue
//! - **Background Watcher**: Detached watcher process with PID-file lifecycle
//! - **Interactive Console**: Start, stop and re-tune the monitor while it runs
//!
//! ## Usage
//!
//! ```rust,no_run
//! use lookaway::commands::Cli;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Cli::menu().await
//! }
//! ```

pub mod api;
pub mod commands;
pub mod libs;
