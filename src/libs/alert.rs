//! Alert presentation: indicator lifecycle, sounds and desktop notifications.
//!
//! When the monitor raises an [`AlertEvent`] the watcher shows an alert
//! indicator through an [`AlertSink`]. The indicator is cleared either
//! automatically after a fixed display duration or by an explicit
//! acknowledgement, depending on the configured [`DismissMode`].

use crate::libs::messages::Message;
use crate::libs::monitor::{AlertEvent, MonitorStatus};
use crate::{msg_debug, msg_info, msg_print, msg_warning};
use anyhow::Result;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;
use std::process::Command;
use std::time::Duration;
use tokio::time::Instant;

/// Seconds an alert stays on screen in [`DismissMode::Auto`].
pub const DEFAULT_DISPLAY_SECS: u64 = 3;

/// Gap between the two rings of [`AlertSound::DoubleBell`].
const DOUBLE_BELL_GAP: Duration = Duration::from_millis(250);

/// Audio cue played together with the alert indicator.
#[derive(ValueEnum, Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum AlertSound {
    /// No sound
    Off,
    /// Terminal bell
    #[default]
    Bell,
    /// Terminal bell rung twice
    DoubleBell,
    /// Platform notification sound
    System,
}

impl AlertSound {
    pub fn all() -> &'static [AlertSound] {
        &[AlertSound::Off, AlertSound::Bell, AlertSound::DoubleBell, AlertSound::System]
    }

    pub fn description(&self) -> &'static str {
        match self {
            AlertSound::Off => "no sound",
            AlertSound::Bell => "terminal bell",
            AlertSound::DoubleBell => "terminal bell, twice",
            AlertSound::System => "platform alert sound (falls back to the terminal bell)",
        }
    }

    /// Plays the sound. Blocks for the duration of the cue.
    pub fn play(&self) -> Result<()> {
        match self {
            AlertSound::Off => Ok(()),
            AlertSound::Bell => ring_bell(),
            AlertSound::DoubleBell => {
                ring_bell()?;
                std::thread::sleep(DOUBLE_BELL_GAP);
                ring_bell()
            }
            AlertSound::System => {
                if let Err(e) = play_system_sound() {
                    msg_debug!(Message::SystemSoundFailed(e.to_string()));
                    return ring_bell();
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for AlertSound {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = self.to_possible_value().map(|v| v.get_name().to_string()).unwrap_or_default();
        write!(f, "{}", name)
    }
}

fn ring_bell() -> Result<()> {
    let mut stdout = std::io::stdout();
    stdout.write_all(b"\x07")?;
    stdout.flush()?;
    Ok(())
}

fn play_system_sound() -> Result<()> {
    let mut command = if cfg!(target_os = "macos") {
        let mut c = Command::new("afplay");
        c.arg("/System/Library/Sounds/Glass.aiff");
        c
    } else if cfg!(target_os = "windows") {
        let mut c = Command::new("powershell");
        c.args(["-NoProfile", "-Command", "[console]::beep(880,300)"]);
        c
    } else {
        let mut c = Command::new("paplay");
        c.arg("/usr/share/sounds/freedesktop/stereo/bell.oga");
        c
    };
    let status = command.status()?;
    if !status.success() {
        anyhow::bail!("sound player exited with {}", status);
    }
    Ok(())
}

/// How a visible alert goes away.
#[derive(ValueEnum, Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DismissMode {
    /// Hide the alert after the display duration
    #[default]
    Auto,
    /// Keep the alert until it is acknowledged
    Acknowledge,
}

/// Visibility of the alert indicator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlertIndicator {
    shown_at: Option<Instant>,
    dismiss_at: Option<Instant>,
}

impl AlertIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the indicator visible. A new alert while one is visible
    /// restarts the display timer. A display duration too large to
    /// schedule leaves the alert up until it is acknowledged.
    pub fn show(&mut self, now: Instant, mode: DismissMode, display_for: Duration) {
        self.shown_at = Some(now);
        self.dismiss_at = match mode {
            DismissMode::Auto => now.checked_add(display_for),
            DismissMode::Acknowledge => None,
        };
    }

    /// Hides the indicator. Returns false if nothing was visible.
    pub fn dismiss(&mut self) -> bool {
        self.dismiss_at = None;
        self.shown_at.take().is_some()
    }

    pub fn is_visible(&self) -> bool {
        self.shown_at.is_some()
    }

    /// When an auto-dismissing indicator should be hidden.
    pub fn deadline(&self) -> Option<Instant> {
        self.dismiss_at
    }
}

/// Receives everything the watcher wants to show the user.
pub trait AlertSink: Send {
    /// Shows the alert indicator.
    fn raise(&mut self, event: &AlertEvent);

    /// Hides the alert indicator.
    fn dismiss(&mut self);

    /// The displayed monitor status changed.
    fn status_changed(&mut self, status: MonitorStatus);
}

/// Presentation settings for [`TerminalNotifier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotifierOptions {
    pub sound: AlertSound,
    pub desktop_notification: bool,
}

/// Sink that writes to the terminal and optionally to the desktop.
#[derive(Debug, Clone)]
pub struct TerminalNotifier {
    options: NotifierOptions,
}

impl TerminalNotifier {
    pub fn new(options: NotifierOptions) -> Self {
        Self { options }
    }
}

impl AlertSink for TerminalNotifier {
    fn raise(&mut self, event: &AlertEvent) {
        msg_warning!(
            Message::AlertRaised {
                at: event.triggered_at.format("%H:%M:%S").to_string(),
                seconds: event.distracted_for.as_secs(),
            },
            true
        );

        let sound = self.options.sound;
        if sound != AlertSound::Off {
            tokio::task::spawn_blocking(move || {
                if let Err(e) = sound.play() {
                    msg_debug!(Message::AlertSoundFailed(e.to_string()));
                }
            });
        }

        if self.options.desktop_notification {
            let body = Message::AlertNotificationBody(event.distracted_for.as_secs()).to_string();
            tokio::task::spawn_blocking(move || {
                if let Err(e) = send_desktop_notification(&body) {
                    msg_debug!(Message::DesktopNotificationFailed(e.to_string()));
                }
            });
        }
    }

    fn dismiss(&mut self) {
        msg_info!(Message::AlertDismissed);
    }

    fn status_changed(&mut self, status: MonitorStatus) {
        msg_print!(Message::StatusLine(status.to_string()));
    }
}

/// Shows a desktop notification with the platform's notifier.
pub fn send_desktop_notification(body: &str) -> Result<()> {
    let title = Message::AlertNotificationTitle.to_string();
    let mut command = if cfg!(target_os = "macos") {
        let mut c = Command::new("osascript");
        c.arg("-e").arg(format!(
            "display notification \"{}\" with title \"{}\"",
            body.replace('"', "\\\""),
            title.replace('"', "\\\"")
        ));
        c
    } else if cfg!(target_os = "windows") {
        let mut c = Command::new("msg");
        c.arg("*").arg(format!("{}: {}", title, body));
        c
    } else {
        let mut c = Command::new("notify-send");
        c.args(["--urgency=critical", &title, body]);
        c
    };
    let status = command.status()?;
    if !status.success() {
        anyhow::bail!("notifier exited with {}", status);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_indicator_has_deadline() {
        let now = Instant::now();
        let mut indicator = AlertIndicator::new();
        assert!(!indicator.is_visible());

        indicator.show(now, DismissMode::Auto, Duration::from_secs(DEFAULT_DISPLAY_SECS));
        assert!(indicator.is_visible());
        assert_eq!(indicator.deadline(), Some(now + Duration::from_secs(3)));

        assert!(indicator.dismiss());
        assert!(!indicator.is_visible());
        assert_eq!(indicator.deadline(), None);
        assert!(!indicator.dismiss());
    }

    #[test]
    fn acknowledge_indicator_waits_forever() {
        let mut indicator = AlertIndicator::new();
        indicator.show(Instant::now(), DismissMode::Acknowledge, Duration::from_secs(3));
        assert!(indicator.is_visible());
        assert_eq!(indicator.deadline(), None);
    }

    #[test]
    fn repeated_alert_restarts_display_timer() {
        let now = Instant::now();
        let later = now + Duration::from_secs(2);
        let mut indicator = AlertIndicator::new();
        indicator.show(now, DismissMode::Auto, Duration::from_secs(3));
        indicator.show(later, DismissMode::Auto, Duration::from_secs(3));
        assert_eq!(indicator.deadline(), Some(later + Duration::from_secs(3)));
    }

    #[test]
    fn unschedulable_display_duration_waits_for_ack() {
        let mut indicator = AlertIndicator::new();
        indicator.show(Instant::now(), DismissMode::Auto, Duration::MAX);
        assert!(indicator.is_visible());
        assert_eq!(indicator.deadline(), None);
        assert!(indicator.dismiss());
    }

    #[test]
    fn sound_names_match_config_values() {
        assert_eq!(AlertSound::DoubleBell.to_string(), "double-bell");
        assert_eq!(serde_json::to_string(&AlertSound::DoubleBell).unwrap(), "\"double-bell\"");
        assert_eq!(serde_json::from_str::<DismissMode>("\"acknowledge\"").unwrap(), DismissMode::Acknowledge);
        assert_eq!(AlertSound::all().len(), 4);
        assert!(AlertSound::Off.play().is_ok());
    }
}
