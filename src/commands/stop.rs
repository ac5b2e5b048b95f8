use crate::libs::daemon;
use anyhow::Result;

/// Stops the background watcher started with `watch --background`.
pub fn cmd() -> Result<()> {
    daemon::stop()
}
