//! Display implementation for lookaway messages.
//!
//! All user-facing text is defined here, in one match over [`Message`].
//! Messages are plain sentences without prefixes; the `msg_*!` macros add
//! the emoji that marks success, warnings and errors.

use super::types::Message;
use std::fmt::{Display, Formatter, Result};

const CONSOLE_HELP: &str = "Console commands:
  start            start monitoring
  stop             stop monitoring
  threshold <N>    alert after N seconds of distraction
  ack              dismiss the visible alert
  status           show the current state
  help             show this help
  quit             stop watching and exit";

impl Display for Message {
    fn fmt(&self, f: &mut Formatter) -> Result {
        let text = match self {
            // === MONITOR / WATCHER MESSAGES ===
            Message::WatcherRunning {
                source,
                threshold,
                poll_interval,
            } => format!(
                "Watching with the {} source (threshold: {}, poll interval: {}ms)",
                source, threshold, poll_interval
            ),
            Message::WatcherShuttingDown => "Shutting down the watcher...".to_string(),
            Message::WatcherStopped(alerts) => format!("Watcher stopped after {} alert(s)", alerts),
            Message::StatusLine(status) => format!("Status: {}", status),
            Message::StatusDetails {
                status,
                threshold,
                looking_away_for,
                alerts,
            } => {
                let window = match looking_away_for {
                    Some(secs) => format!("{}s", secs),
                    None => "-".to_string(),
                };
                format!(
                    "Status: {} | threshold: {} | looking away for: {} | alerts: {}",
                    status, threshold, window, alerts
                )
            }
            Message::ThresholdChanged(threshold) => format!("Threshold set to {}", threshold),
            Message::ThresholdInvalid(reason) => format!("Invalid threshold ({}); alerts are disabled until a valid one is set", reason),
            Message::PollStillInFlight => "Previous poll still running, skipping this tick".to_string(),
            Message::PollTaskFailed(error) => format!("Detection poll failed: {}", error),

            // === ALERT MESSAGES ===
            Message::AlertRaised { at, seconds } => format!("ALERT {}: you have been looking away for {}s", at, seconds),
            Message::AlertDismissed => "Alert dismissed".to_string(),
            Message::NoAlertToAcknowledge => "There is no alert to acknowledge".to_string(),
            Message::AlertNotificationTitle => "lookaway".to_string(),
            Message::AlertNotificationBody(seconds) => format!("Eyes up! You have been looking away for {}s.", seconds),
            Message::AlertSoundFailed(error) => format!("Failed to play alert sound: {}", error),
            Message::SystemSoundFailed(error) => format!("System sound unavailable ({}), using the terminal bell", error),
            Message::DesktopNotificationFailed(error) => format!("Failed to show desktop notification: {}", error),
            Message::SoundsHeader => "Alert sounds:".to_string(),
            Message::SoundEntry {
                name,
                description,
                selected,
            } => format!("{} {:<12} {}", if *selected { "*" } else { " " }, name, description),
            Message::SoundPlayed(name) => format!("Played '{}'", name),

            // === CONSOLE MESSAGES ===
            Message::ConsoleHint => "Type 'help' for console commands".to_string(),
            Message::ConsoleHelp => CONSOLE_HELP.to_string(),
            Message::ConsoleReadFailed(error) => format!("Failed to read console input: {}", error),
            Message::UnknownConsoleCommand(input) => format!("Unknown command '{}', type 'help' for the list", input),

            // === DETECTION SOURCE MESSAGES ===
            Message::StatusPollFailed(error) => format!("Status provider not reachable: {}", error),
            Message::StatusEndpointReport { url, alert } => format!("{} answered: alert = {}", url, alert),
            Message::StatusEndpointFailed { url, error } => format!("{} failed: {}", url, error),
            Message::KeyboardListenerFailed(error) => format!("Keyboard listener failed: {}. Retrying in 1 second...", error),
            Message::SimulationKeyHint(key) => format!("Hold {} to simulate looking away", key),
            Message::SimulationKeyDown(key) => format!("{} pressed", key),
            Message::SimulationKeyUp(key) => format!("{} released", key),

            // === CAMERA MESSAGES ===
            Message::CameraGranted(path) => format!("Capture device available: {}", path),
            Message::CameraUnavailable(reason) => format!("Camera check: {}. Monitoring continues.", reason),

            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved => "Configuration saved successfully".to_string(),
            Message::ConfigDeleted => "Configuration removed".to_string(),
            Message::ConfigFileNotFound => "Configuration file not found".to_string(),
            Message::ConfigReadFailed(error) => format!("Cannot read configuration ({}), using defaults", error),
            Message::ConfigModuleMonitor => "Monitor settings".to_string(),
            Message::ConfigModuleAlert => "Alert settings".to_string(),
            Message::ConfigModuleCamera => "Camera settings".to_string(),
            Message::PromptSelectModules => "Select modules to configure".to_string(),
            Message::PromptThreshold => "Alert after how many seconds of distraction (0 disables alerts)".to_string(),
            Message::PromptPollInterval => "Enter poll interval (milliseconds)".to_string(),
            Message::PromptSource => "Select detection source".to_string(),
            Message::PromptStatusUrl => "Enter the status endpoint URL".to_string(),
            Message::PromptSimulationKey => "Enter the simulation key (e.g. Space, KeyD, F9)".to_string(),
            Message::PromptSound => "Select alert sound".to_string(),
            Message::PromptAcknowledge => "Keep alerts visible until acknowledged?".to_string(),
            Message::PromptDisplayDuration => "Enter alert display duration (seconds)".to_string(),
            Message::PromptDesktopNotification => "Show desktop notifications?".to_string(),
            Message::PromptCameraCheck => "Check for a capture device on start?".to_string(),
            Message::PromptCameraDevice => "Capture device path (empty to autodetect)".to_string(),

            // === BACKGROUND WATCHER MESSAGES ===
            Message::BackgroundWatcherStarted(pid) => format!("Background watcher started with PID: {}", pid),
            Message::BackgroundWatcherStopped(pid) => format!("Background watcher (PID: {}) stopped", pid),
            Message::StoppingExistingWatcher(pid) => format!("Stopping existing watcher (PID: {})...", pid),
            Message::FailedToStopExistingWatcher(error) => format!("Failed to stop existing watcher: {}", error),
            Message::WatcherNotRunning => "Background watcher is not running".to_string(),
            Message::PidFileNotFound => "Background watcher is not running (PID file not found)".to_string(),
            Message::InvalidPidFileContent => "Invalid PID file content".to_string(),
            Message::StalePidFileRemoved(pid) => format!("No process with PID {}, removed stale PID file", pid),
            Message::ProcessTerminationFailed(code) => format!("Failed to terminate process, error code: {}", code),
            Message::DaemonModeNotSupported => "Background mode is not supported on this platform".to_string(),
            Message::ReceivedSigterm => "Received SIGTERM".to_string(),
            Message::ReceivedSigint => "Received SIGINT".to_string(),
            Message::ReceivedCtrlC => "Received Ctrl-C".to_string(),
            Message::SignalHandlerFailed(error) => format!("Failed to install signal handler: {}", error),
        };

        write!(f, "{}", text)
    }
}
