//! Control loop that drives the attention monitor.
//!
//! A single task owns the [`AttentionMonitor`] and is the only place its
//! state changes. It multiplexes:
//!
//! - a periodic ticker that dispatches detection polls
//! - completed polls, applied to the monitor as they arrive
//! - console commands (start, stop, threshold changes, acknowledgements)
//! - the auto-dismiss deadline of a visible alert
//! - the shutdown future supplied by the caller
//!
//! Polls run as separate tasks so a slow status endpoint never delays the
//! ticker. At most one poll is in flight; ticks that find the previous poll
//! still running are skipped.

use crate::libs::alert::{AlertIndicator, AlertSink, DismissMode};
use crate::libs::console::ConsoleCommand;
use crate::libs::detection::{DetectionSignal, DetectionSource};
use crate::libs::messages::Message;
use crate::libs::monitor::{AlertEvent, AttentionMonitor, MonitorStatus};
use crate::libs::threshold::Threshold;
use crate::{msg_debug, msg_error, msg_info, msg_print, msg_warning};
use anyhow::Result;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio::time::{self, Instant, MissedTickBehavior};

/// Timing and behavior of a watcher run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatcherOptions {
    pub threshold: Threshold,
    pub poll_interval: Duration,
    pub dismiss: DismissMode,
    pub display_duration: Duration,
    /// Start monitoring immediately instead of waiting for `start`.
    pub start_running: bool,
}

impl Default for WatcherOptions {
    fn default() -> Self {
        Self {
            threshold: Threshold::default(),
            poll_interval: Duration::from_millis(1000),
            dismiss: DismissMode::Auto,
            display_duration: Duration::from_secs(crate::libs::alert::DEFAULT_DISPLAY_SECS),
            start_running: true,
        }
    }
}

/// Whether the loop keeps going after a command.
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Runs an [`AttentionMonitor`] against a detection source.
pub struct Watcher<S: DetectionSource, A: AlertSink> {
    monitor: AttentionMonitor,
    source: Arc<S>,
    sink: A,
    options: WatcherOptions,
    indicator: AlertIndicator,
    shown_status: Option<MonitorStatus>,
    alerts: usize,
}

impl<S: DetectionSource, A: AlertSink> Watcher<S, A> {
    pub fn new(source: S, sink: A, options: WatcherOptions) -> Self {
        let mut monitor = AttentionMonitor::new(options.threshold);
        if options.start_running {
            monitor.start();
        }
        Self {
            monitor,
            source: Arc::new(source),
            sink,
            options,
            indicator: AlertIndicator::new(),
            shown_status: None,
            alerts: 0,
        }
    }

    /// Runs until a `quit` command arrives or `shutdown` resolves, then
    /// returns the sink so callers can inspect what was presented.
    pub async fn run<F>(mut self, mut commands: mpsc::Receiver<ConsoleCommand>, shutdown: F) -> Result<A>
    where
        F: Future<Output = ()>,
    {
        msg_info!(Message::WatcherRunning {
            source: self.source.name().to_string(),
            threshold: self.monitor.threshold().to_string(),
            poll_interval: self.options.poll_interval.as_millis() as u64,
        });
        self.publish_status();

        let mut ticker = time::interval(self.options.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut polls: JoinSet<DetectionSignal> = JoinSet::new();
        let mut commands_open = true;
        tokio::pin!(shutdown);

        loop {
            let dismiss_at = self.indicator.deadline();

            tokio::select! {
                _ = &mut shutdown => {
                    msg_info!(Message::WatcherShuttingDown);
                    break;
                }
                _ = ticker.tick() => self.dispatch_poll(&mut polls),
                Some(joined) = polls.join_next() => match joined {
                    Ok(signal) => self.apply(signal, Instant::now()),
                    Err(e) => msg_error!(Message::PollTaskFailed(e.to_string())),
                },
                command = commands.recv(), if commands_open => match command {
                    Some(command) => {
                        if self.handle_command(command) == Flow::Quit {
                            break;
                        }
                    }
                    None => commands_open = false,
                },
                _ = time::sleep_until(dismiss_at.unwrap_or_else(Instant::now)), if dismiss_at.is_some() => {
                    self.dismiss_alert();
                }
            }
        }

        polls.abort_all();
        msg_info!(Message::WatcherStopped(self.alerts));
        Ok(self.sink)
    }

    fn dispatch_poll(&mut self, polls: &mut JoinSet<DetectionSignal>) {
        if !self.monitor.is_running() {
            return;
        }
        if !polls.is_empty() {
            msg_debug!(Message::PollStillInFlight);
            return;
        }
        let source = Arc::clone(&self.source);
        polls.spawn(async move { source.poll().await });
    }

    fn apply(&mut self, signal: DetectionSignal, now: Instant) {
        if let Some(event) = self.monitor.on_tick(signal, now) {
            self.raise(event, now);
        }
        self.publish_status();
    }

    fn raise(&mut self, event: AlertEvent, now: Instant) {
        self.alerts += 1;
        self.indicator.show(now, self.options.dismiss, self.options.display_duration);
        self.sink.raise(&event);
    }

    fn dismiss_alert(&mut self) {
        if self.indicator.dismiss() {
            self.sink.dismiss();
        }
        self.publish_status();
    }

    fn handle_command(&mut self, command: ConsoleCommand) -> Flow {
        match command {
            ConsoleCommand::Start => self.monitor.start(),
            ConsoleCommand::Stop => self.monitor.stop(),
            ConsoleCommand::Threshold(threshold) => {
                self.monitor.set_threshold(threshold);
                msg_info!(Message::ThresholdChanged(threshold.to_string()));
            }
            ConsoleCommand::Ack => {
                if self.indicator.is_visible() {
                    self.dismiss_alert();
                } else {
                    msg_info!(Message::NoAlertToAcknowledge);
                }
            }
            ConsoleCommand::Status => {
                let elapsed = self.monitor.elapsed(Instant::now()).map(|d| d.as_secs());
                msg_print!(Message::StatusDetails {
                    status: self.current_status().to_string(),
                    threshold: self.monitor.threshold().to_string(),
                    looking_away_for: elapsed,
                    alerts: self.alerts,
                });
            }
            ConsoleCommand::Help => msg_print!(Message::ConsoleHelp),
            ConsoleCommand::Quit => return Flow::Quit,
            ConsoleCommand::Unknown(input) => msg_warning!(Message::UnknownConsoleCommand(input)),
        }
        self.publish_status();
        Flow::Continue
    }

    fn current_status(&self) -> MonitorStatus {
        if self.indicator.is_visible() {
            MonitorStatus::Alerting
        } else {
            self.monitor.status()
        }
    }

    fn publish_status(&mut self) {
        let status = self.current_status();
        if self.shown_status != Some(status) {
            self.shown_status = Some(status);
            self.sink.status_changed(status);
        }
    }
}
