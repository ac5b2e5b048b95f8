//! Watch command: runs the attention monitor.
//!
//! In the foreground the watcher reads console commands from stdin and
//! stops on `quit`, Ctrl-C or SIGTERM. With `--background` a detached copy
//! of the process is started instead (see [`crate::libs::daemon`]); that copy
//! has no console and starts monitoring immediately.
//!
//! Settings are taken from the config file, then environment overrides,
//! then the flags given here.

use crate::api::status::StatusClient;
use crate::libs::alert::{AlertSound, DismissMode, NotifierOptions, TerminalNotifier};
use crate::libs::camera::CaptureDevice;
use crate::libs::config::{CameraConfig, Config, SourceKind};
use crate::libs::console::{self, ConsoleCommand};
use crate::libs::daemon;
use crate::libs::detection::{parse_key, KeyboardSource};
use crate::libs::messages::Message;
use crate::libs::threshold::Threshold;
use crate::libs::watcher::{Watcher, WatcherOptions};
use crate::{msg_info, msg_print, msg_success, msg_warning};
use anyhow::Result;
use clap::Args;
use std::time::Duration;
use tokio::sync::mpsc;

#[derive(Debug, Args, Default, Clone)]
pub struct WatchArgs {
    /// Detection source
    #[arg(long, value_enum)]
    pub source: Option<SourceKind>,

    /// Seconds of uninterrupted distraction before an alert
    #[arg(short, long)]
    pub threshold: Option<String>,

    /// Status endpoint URL for the remote source
    #[arg(long)]
    pub url: Option<String>,

    /// Milliseconds between polls
    #[arg(short, long)]
    pub interval: Option<u64>,

    /// Key that simulates a distraction while held (keyboard source)
    #[arg(long)]
    pub key: Option<String>,

    /// Alert sound
    #[arg(long, value_enum)]
    pub sound: Option<AlertSound>,

    /// Keep alerts visible until acknowledged with `ack`
    #[arg(long)]
    pub acknowledge: bool,

    /// Wait for `start` before monitoring
    #[arg(long)]
    pub paused: bool,

    /// Skip the capture device check
    #[arg(long)]
    pub no_camera: bool,

    /// Run as a detached background watcher
    #[arg(short, long)]
    pub background: bool,

    #[arg(long = "daemon-run", hide = true)]
    pub daemon_run: bool,
}

impl WatchArgs {
    /// Flags to pass on to a detached watcher.
    pub fn to_forwarded(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(source) = self.source {
            args.push("--source".to_string());
            args.push(format!("{:?}", source).to_lowercase());
        }
        if let Some(threshold) = &self.threshold {
            args.push("--threshold".to_string());
            args.push(threshold.clone());
        }
        if let Some(url) = &self.url {
            args.push("--url".to_string());
            args.push(url.clone());
        }
        if let Some(interval) = self.interval {
            args.push("--interval".to_string());
            args.push(interval.to_string());
        }
        if let Some(key) = &self.key {
            args.push("--key".to_string());
            args.push(key.clone());
        }
        if let Some(sound) = self.sound {
            args.push("--sound".to_string());
            args.push(sound.to_string());
        }
        if self.acknowledge {
            args.push("--acknowledge".to_string());
        }
        if self.no_camera {
            args.push("--no-camera".to_string());
        }
        args
    }
}

/// Effective settings of one watch run.
#[derive(Debug, Clone, PartialEq)]
pub struct WatchSettings {
    pub source: SourceKind,
    pub status_url: String,
    pub simulation_key: String,
    pub watcher: WatcherOptions,
    pub notifier: NotifierOptions,
    pub camera: CameraConfig,
}

impl WatchSettings {
    /// Merges the loaded configuration with command-line flags.
    pub fn resolve(config: Config, args: &WatchArgs) -> Self {
        let monitor = config.monitor.unwrap_or_default();
        let alert = config.alert.unwrap_or_default();
        let mut camera = config.camera.unwrap_or_default();
        if args.no_camera {
            camera.enabled = false;
        }

        let threshold = match &args.threshold {
            Some(raw) => Threshold::parse_lenient(raw),
            None => Threshold::from_secs(monitor.threshold),
        };
        let dismiss = if args.acknowledge { DismissMode::Acknowledge } else { alert.dismiss };

        WatchSettings {
            source: args.source.unwrap_or(monitor.source),
            status_url: args.url.clone().unwrap_or(monitor.status_url),
            simulation_key: args.key.clone().unwrap_or(monitor.simulation_key),
            watcher: WatcherOptions {
                threshold,
                poll_interval: Duration::from_millis(args.interval.unwrap_or(monitor.poll_interval).max(1)),
                dismiss,
                display_duration: Duration::from_secs(alert.display_duration),
                // a detached watcher has no console to start it from
                start_running: args.daemon_run || !args.paused,
            },
            notifier: NotifierOptions {
                sound: args.sound.unwrap_or(alert.sound),
                desktop_notification: alert.desktop_notification,
            },
            camera,
        }
    }
}

pub async fn cmd(args: WatchArgs) -> Result<()> {
    if args.background && !args.daemon_run {
        daemon::spawn(&args.to_forwarded())?;
        return Ok(());
    }

    let settings = WatchSettings::resolve(Config::load_or_default(), &args);
    let result = run(settings, !args.daemon_run).await;
    if args.daemon_run {
        daemon::release_pid_file()?;
    }
    result
}

async fn run(settings: WatchSettings, interactive: bool) -> Result<()> {
    if settings.camera.enabled {
        report_camera(&settings.camera);
    }

    let (tx, rx) = mpsc::channel::<ConsoleCommand>(16);
    if interactive {
        msg_print!(Message::ConsoleHint);
        console::spawn_stdin(tx);
    } else {
        drop(tx);
    }

    let notifier = TerminalNotifier::new(settings.notifier);
    match settings.source {
        SourceKind::Remote => {
            let source = StatusClient::new(settings.status_url);
            Watcher::new(source, notifier, settings.watcher).run(rx, daemon::shutdown_signal()).await?;
        }
        SourceKind::Keyboard => {
            let key = parse_key(&settings.simulation_key)?;
            msg_info!(Message::SimulationKeyHint(format!("{:?}", key)));
            let source = KeyboardSource::spawn(key);
            Watcher::new(source, notifier, settings.watcher).run(rx, daemon::shutdown_signal()).await?;
        }
    }
    Ok(())
}

/// Reports the capture device check once; the result never stops watching.
fn report_camera(camera: &CameraConfig) {
    match CaptureDevice::request(camera.device.as_deref()) {
        Ok(device) => msg_success!(Message::CameraGranted(device.path.display().to_string())),
        Err(e) => msg_warning!(Message::CameraUnavailable(e.to_string())),
    }
}
