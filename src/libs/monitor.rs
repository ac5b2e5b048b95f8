//! Attention monitor state machine.
//!
//! The monitor owns a running flag, the start of the current distraction
//! window and the alert threshold. Every detection tick is folded into that
//! state; when an uninterrupted window reaches the threshold an
//! [`AlertEvent`] is produced and the window restarts from scratch.
//!
//! Time is always passed in by the caller, so the state machine itself is
//! deterministic and free of I/O. The async loop that feeds it lives in
//! [`crate::libs::watcher`].
//!
//! ## State Invariant
//!
//! `distraction_started_at` is `Some` exactly while the monitor is running
//! and the latest signal reported a distraction that has not yet produced an
//! alert. Stopping, a focused signal and a fired alert all clear it.

use crate::libs::detection::DetectionSignal;
use crate::libs::threshold::Threshold;
use chrono::{DateTime, Local};
use std::fmt;
use std::time::Duration;
use tokio::time::Instant;

/// Mutable state of the attention monitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorState {
    pub running: bool,
    pub distraction_started_at: Option<Instant>,
    pub threshold: Threshold,
}

impl MonitorState {
    pub fn new(threshold: Threshold) -> Self {
        Self {
            running: false,
            distraction_started_at: None,
            threshold,
        }
    }
}

/// Raised when a distraction window reaches the threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertEvent {
    pub triggered_at: DateTime<Local>,
    /// Length of the window that triggered the alert.
    pub distracted_for: Duration,
}

/// Coarse status shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorStatus {
    Stopped,
    Monitoring,
    LookingAway,
    Alerting,
}

impl fmt::Display for MonitorStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let text = match self {
            MonitorStatus::Stopped => "Stopped",
            MonitorStatus::Monitoring => "Monitoring...",
            MonitorStatus::LookingAway => "Looking away...",
            MonitorStatus::Alerting => "Distracted!",
        };
        write!(f, "{}", text)
    }
}

/// Decides when a stream of detection signals turns into an alert.
#[derive(Debug, Clone)]
pub struct AttentionMonitor {
    state: MonitorState,
}

impl AttentionMonitor {
    /// Creates a stopped monitor.
    pub fn new(threshold: Threshold) -> Self {
        Self {
            state: MonitorState::new(threshold),
        }
    }

    pub fn state(&self) -> &MonitorState {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    pub fn threshold(&self) -> Threshold {
        self.state.threshold
    }

    /// Starts monitoring from a focused state. Calling it again restarts the
    /// distraction window.
    pub fn start(&mut self) {
        self.state.running = true;
        self.state.distraction_started_at = None;
    }

    /// Stops monitoring and forgets any open distraction window.
    pub fn stop(&mut self) {
        self.state.running = false;
        self.state.distraction_started_at = None;
    }

    /// Replaces the threshold. An open distraction window is kept and
    /// measured against the new value on the next tick.
    pub fn set_threshold(&mut self, threshold: Threshold) {
        self.state.threshold = threshold;
    }

    /// Folds one detection tick into the state.
    ///
    /// Returns the alert when the current window reaches the threshold; the
    /// window is cleared at the same time so the next alert needs a fresh
    /// full window.
    pub fn on_tick(&mut self, signal: DetectionSignal, now: Instant) -> Option<AlertEvent> {
        if !self.state.running {
            return None;
        }

        if !signal.is_distracted {
            self.state.distraction_started_at = None;
            return None;
        }

        let started = *self.state.distraction_started_at.get_or_insert(now);
        let elapsed = now.saturating_duration_since(started);
        if self.state.threshold.is_reached(elapsed) {
            self.state.distraction_started_at = None;
            return Some(AlertEvent {
                triggered_at: Local::now(),
                distracted_for: elapsed,
            });
        }
        None
    }

    /// Length of the open distraction window, if any.
    pub fn elapsed(&self, now: Instant) -> Option<Duration> {
        self.state.distraction_started_at.map(|started| now.saturating_duration_since(started))
    }

    /// Status ignoring any alert that may currently be on screen.
    pub fn status(&self) -> MonitorStatus {
        match (self.state.running, self.state.distraction_started_at) {
            (false, _) => MonitorStatus::Stopped,
            (true, None) => MonitorStatus::Monitoring,
            (true, Some(_)) => MonitorStatus::LookingAway,
        }
    }
}
