//! Configuration management for lookaway.
//!
//! Settings live in a single JSON file in the per-user application data
//! directory and are grouped into optional modules:
//!
//! - **Monitor Config**: Threshold, poll interval and detection source
//! - **Alert Config**: Sound, dismissal mode and desktop notifications
//! - **Camera Config**: Capture device check at startup
//!
//! A missing file, or a missing module inside it, falls back to defaults, so
//! lookaway works without any setup. `lookaway init` runs an interactive
//! wizard that writes the file.
//!
//! ## Environment Overrides
//!
//! After the file is read, two environment variables take precedence (a
//! `.env` file in the working directory is loaded by `main`):
//!
//! - `LOOKAWAY_STATUS_URL` replaces `monitor.status_url`
//! - `LOOKAWAY_THRESHOLD` replaces `monitor.threshold`; malformed values
//!   disable alerts instead of failing
//!
//! ## Usage Examples
//!
//! ```rust,no_run
//! use lookaway::libs::config::Config;
//!
//! let config = Config::read()?;
//! let monitor = config.monitor.unwrap_or_default();
//! println!("Alert after {} seconds", monitor.threshold);
//! # Ok::<(), anyhow::Error>(())
//! ```

use super::data_storage::DataStorage;
use crate::api::status::DEFAULT_STATUS_URL;
use crate::libs::alert::{AlertSound, DismissMode, DEFAULT_DISPLAY_SECS};
use crate::libs::messages::Message;
use crate::libs::threshold::Threshold;
use crate::{msg_print, msg_warning};
use anyhow::Result;
use clap::ValueEnum;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, MultiSelect, Select};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::PathBuf;

/// Configuration file name inside the application data directory.
pub const CONFIG_FILE_NAME: &str = "config.json";

pub const ENV_STATUS_URL: &str = "LOOKAWAY_STATUS_URL";
pub const ENV_THRESHOLD: &str = "LOOKAWAY_THRESHOLD";

/// A configurable module offered by the setup wizard.
#[derive(Debug, Clone)]
pub struct ConfigModule {
    /// Identifier used to route the wizard
    pub key: String,
    /// Name shown in the module list
    pub name: String,
}

/// Where distraction signals come from.
#[derive(ValueEnum, Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    /// Poll the remote status endpoint
    #[default]
    Remote,
    /// Treat a held-down key as the distraction signal
    Keyboard,
}

/// Attention monitor settings.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct MonitorConfig {
    /// Seconds of uninterrupted distraction before an alert fires.
    ///
    /// `0` disables alerts.
    pub threshold: u64,

    /// Milliseconds between detection polls.
    pub poll_interval: u64,

    /// Detection source used by `lookaway watch`.
    pub source: SourceKind,

    /// Full URL of the remote status resource.
    pub status_url: String,

    /// Key that simulates a distraction while held (keyboard source).
    ///
    /// Uses rdev key names: `Space`, `KeyD`, `F9`, ...
    pub simulation_key: String,
}

/// Alert presentation settings.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct AlertConfig {
    pub sound: AlertSound,
    pub dismiss: DismissMode,
    /// Seconds an alert stays visible in `auto` dismiss mode.
    pub display_duration: u64,
    pub desktop_notification: bool,
}

/// Capture device check settings.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Check for a capture device when watching starts.
    pub enabled: bool,
    /// Explicit device path; autodetected when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<PathBuf>,
}

/// Root configuration object.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monitor: Option<MonitorConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert: Option<AlertConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera: Option<CameraConfig>,
}

impl Default for MonitorConfig {
    /// Five second threshold, one poll per second against the local
    /// status provider, Space as the simulation key.
    fn default() -> Self {
        MonitorConfig {
            threshold: 5,
            poll_interval: 1000,
            source: SourceKind::Remote,
            status_url: DEFAULT_STATUS_URL.to_string(),
            simulation_key: "Space".to_string(),
        }
    }
}

impl Default for AlertConfig {
    fn default() -> Self {
        AlertConfig {
            sound: AlertSound::Bell,
            dismiss: DismissMode::Auto,
            display_duration: DEFAULT_DISPLAY_SECS,
            desktop_notification: false,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        CameraConfig { enabled: true, device: None }
    }
}

impl Config {
    /// Path of the configuration file.
    pub fn path() -> Result<PathBuf> {
        DataStorage::new().get_path(CONFIG_FILE_NAME)
    }

    /// Reads the configuration file, returning defaults if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn read() -> Result<Config> {
        let config_file_path = Self::path()?;
        if !config_file_path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(config_file_path)?;
        let config: Config = serde_json::from_str(&config_str)?;
        Ok(config)
    }

    /// Reads the configuration file and applies environment overrides.
    ///
    /// A file that cannot be read or parsed is reported and replaced by
    /// defaults, so the watcher always comes up.
    pub fn load_or_default() -> Config {
        let mut config = Self::read().unwrap_or_else(|e| {
            msg_warning!(Message::ConfigReadFailed(e.to_string()));
            Config::default()
        });
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config
    }

    /// Applies `LOOKAWAY_*` overrides using `lookup` to resolve variables.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup(ENV_STATUS_URL);
        let threshold = lookup(ENV_THRESHOLD);
        if url.is_none() && threshold.is_none() {
            return;
        }

        let monitor = self.monitor.get_or_insert_with(MonitorConfig::default);
        if let Some(url) = url {
            monitor.status_url = url;
        }
        if let Some(raw) = threshold {
            monitor.threshold = Threshold::parse_lenient(&raw).as_secs();
        }
    }

    /// Writes the configuration as pretty-printed JSON.
    pub fn save(&self) -> Result<()> {
        let config_file = File::create(Self::path()?)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    /// Removes the configuration file. Returns false if there was none.
    pub fn delete() -> Result<bool> {
        let path = Self::path()?;
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(path)?;
        Ok(true)
    }

    /// Runs the interactive setup wizard, starting from the current values.
    pub fn init() -> Result<Self> {
        let mut config = Self::read().unwrap_or_default();

        let modules = vec![
            ConfigModule {
                key: "monitor".to_string(),
                name: "Monitor".to_string(),
            },
            ConfigModule {
                key: "alert".to_string(),
                name: "Alert".to_string(),
            },
            ConfigModule {
                key: "camera".to_string(),
                name: "Camera".to_string(),
            },
        ];

        let selected = MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptSelectModules.to_string())
            .items(&modules.iter().map(|module| &module.name).collect::<Vec<_>>())
            .interact()?;

        for &selection in &selected {
            match modules[selection].key.as_str() {
                "monitor" => config.monitor = Some(Self::init_monitor(config.monitor.clone().unwrap_or_default())?),
                "alert" => config.alert = Some(Self::init_alert(config.alert.clone().unwrap_or_default())?),
                "camera" => config.camera = Some(Self::init_camera(config.camera.clone().unwrap_or_default())?),
                _ => {}
            }
        }

        Ok(config)
    }

    fn init_monitor(default: MonitorConfig) -> Result<MonitorConfig> {
        msg_print!(Message::ConfigModuleMonitor);
        let theme = ColorfulTheme::default();

        let sources = SourceKind::value_variants();
        let source_index = Select::with_theme(&theme)
            .with_prompt(Message::PromptSource.to_string())
            .items(&sources.iter().map(|s| format!("{:?}", s)).collect::<Vec<_>>())
            .default(sources.iter().position(|s| *s == default.source).unwrap_or(0))
            .interact()?;

        Ok(MonitorConfig {
            threshold: Input::with_theme(&theme)
                .with_prompt(Message::PromptThreshold.to_string())
                .default(default.threshold)
                .interact_text()?,
            poll_interval: Input::with_theme(&theme)
                .with_prompt(Message::PromptPollInterval.to_string())
                .default(default.poll_interval)
                .interact_text()?,
            source: sources[source_index],
            status_url: Input::with_theme(&theme)
                .with_prompt(Message::PromptStatusUrl.to_string())
                .default(default.status_url)
                .interact_text()?,
            simulation_key: Input::with_theme(&theme)
                .with_prompt(Message::PromptSimulationKey.to_string())
                .default(default.simulation_key)
                .interact_text()?,
        })
    }

    fn init_alert(default: AlertConfig) -> Result<AlertConfig> {
        msg_print!(Message::ConfigModuleAlert);
        let theme = ColorfulTheme::default();

        let sounds = AlertSound::all();
        let sound_index = Select::with_theme(&theme)
            .with_prompt(Message::PromptSound.to_string())
            .items(&sounds.iter().map(|s| format!("{} ({})", s, s.description())).collect::<Vec<_>>())
            .default(sounds.iter().position(|s| *s == default.sound).unwrap_or(0))
            .interact()?;

        let acknowledge = Confirm::with_theme(&theme)
            .with_prompt(Message::PromptAcknowledge.to_string())
            .default(default.dismiss == DismissMode::Acknowledge)
            .interact()?;

        Ok(AlertConfig {
            sound: sounds[sound_index],
            dismiss: if acknowledge { DismissMode::Acknowledge } else { DismissMode::Auto },
            display_duration: Input::with_theme(&theme)
                .with_prompt(Message::PromptDisplayDuration.to_string())
                .default(default.display_duration)
                .interact_text()?,
            desktop_notification: Confirm::with_theme(&theme)
                .with_prompt(Message::PromptDesktopNotification.to_string())
                .default(default.desktop_notification)
                .interact()?,
        })
    }

    fn init_camera(default: CameraConfig) -> Result<CameraConfig> {
        msg_print!(Message::ConfigModuleCamera);
        let theme = ColorfulTheme::default();

        let enabled = Confirm::with_theme(&theme)
            .with_prompt(Message::PromptCameraCheck.to_string())
            .default(default.enabled)
            .interact()?;
        let device: String = Input::with_theme(&theme)
            .with_prompt(Message::PromptCameraDevice.to_string())
            .default(default.device.map(|p| p.display().to_string()).unwrap_or_default())
            .allow_empty(true)
            .interact_text()?;

        Ok(CameraConfig {
            enabled,
            device: Some(device.trim()).filter(|d| !d.is_empty()).map(PathBuf::from),
        })
    }
}
