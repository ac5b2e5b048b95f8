#[cfg(test)]
mod tests {
    use lookaway::libs::alert::{AlertSink, DismissMode};
    use lookaway::libs::console::ConsoleCommand;
    use lookaway::libs::detection::{DetectionSignal, DetectionSource};
    use lookaway::libs::monitor::{AlertEvent, MonitorStatus};
    use lookaway::libs::threshold::Threshold;
    use lookaway::libs::watcher::{Watcher, WatcherOptions};
    use std::future::Future;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::mpsc;
    use tokio::time::{self, Duration, Instant};

    /// Replays a fixed list of signals, then repeats the last one.
    struct ScriptedSource {
        script: Vec<bool>,
        polls: Arc<AtomicUsize>,
        delay: Duration,
    }

    impl ScriptedSource {
        fn new(script: &[bool]) -> Self {
            Self {
                script: script.to_vec(),
                polls: Arc::new(AtomicUsize::new(0)),
                delay: Duration::ZERO,
            }
        }

        fn always(distracted: bool) -> Self {
            Self::new(&[distracted])
        }
    }

    impl DetectionSource for ScriptedSource {
        fn name(&self) -> &'static str {
            "scripted"
        }

        fn poll(&self) -> impl Future<Output = DetectionSignal> + Send {
            let index = self.polls.fetch_add(1, Ordering::SeqCst);
            let distracted = self.script.get(index).or(self.script.last()).copied().unwrap_or(false);
            let delay = self.delay;
            async move {
                if !delay.is_zero() {
                    time::sleep(delay).await;
                }
                DetectionSignal::new(distracted)
            }
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Seen {
        Raised { after: Duration, distracted_for: Duration },
        Dismissed { after: Duration },
        Status(MonitorStatus),
    }

    /// Records everything the watcher presents, with times relative to `origin`.
    struct RecordingSink {
        origin: Instant,
        seen: Vec<Seen>,
    }

    impl RecordingSink {
        fn new() -> Self {
            Self {
                origin: Instant::now(),
                seen: Vec::new(),
            }
        }

        fn raised(&self) -> Vec<(Duration, Duration)> {
            self.seen
                .iter()
                .filter_map(|seen| match seen {
                    Seen::Raised { after, distracted_for } => Some((*after, *distracted_for)),
                    _ => None,
                })
                .collect()
        }

        fn dismissed(&self) -> Vec<Duration> {
            self.seen
                .iter()
                .filter_map(|seen| match seen {
                    Seen::Dismissed { after } => Some(*after),
                    _ => None,
                })
                .collect()
        }

        fn statuses(&self) -> Vec<MonitorStatus> {
            self.seen
                .iter()
                .filter_map(|seen| match seen {
                    Seen::Status(status) => Some(*status),
                    _ => None,
                })
                .collect()
        }
    }

    impl AlertSink for RecordingSink {
        fn raise(&mut self, event: &AlertEvent) {
            self.seen.push(Seen::Raised {
                after: self.origin.elapsed(),
                distracted_for: event.distracted_for,
            });
        }

        fn dismiss(&mut self) {
            self.seen.push(Seen::Dismissed {
                after: self.origin.elapsed(),
            });
        }

        fn status_changed(&mut self, status: MonitorStatus) {
            self.seen.push(Seen::Status(status));
        }
    }

    fn options(threshold: u64) -> WatcherOptions {
        WatcherOptions {
            threshold: Threshold::from_secs(threshold),
            poll_interval: Duration::from_secs(1),
            ..Default::default()
        }
    }

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    fn shutdown_after(millis: u64) -> impl Future<Output = ()> {
        time::sleep(Duration::from_millis(millis))
    }

    #[tokio::test(start_paused = true)]
    async fn test_alert_fires_at_threshold_and_auto_dismisses() {
        let (_tx, rx) = mpsc::channel(4);
        let watcher = Watcher::new(ScriptedSource::always(true), RecordingSink::new(), options(3));

        let sink = watcher.run(rx, shutdown_after(6_500)).await.unwrap();

        let raised = sink.raised();
        assert_eq!(raised.len(), 1, "exactly one alert expected: {:?}", sink.seen);
        let (after, distracted_for) = raised[0];
        assert!(after >= secs(3) && after < secs(4), "alert raised at {:?}", after);
        assert_eq!(distracted_for, secs(3));

        let dismissed = sink.dismissed();
        assert_eq!(dismissed.len(), 1);
        assert_eq!(dismissed[0] - after, secs(3));

        assert_eq!(
            sink.statuses(),
            vec![
                MonitorStatus::Monitoring,
                MonitorStatus::LookingAway,
                MonitorStatus::Alerting,
                // the next window opened at t=4 while the alert was still up
                MonitorStatus::LookingAway,
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_focused_tick_resets_the_window() {
        let (_tx, rx) = mpsc::channel(4);
        let source = ScriptedSource::new(&[true, true, false, true, true, true, true]);
        let watcher = Watcher::new(source, RecordingSink::new(), options(3));

        let sink = watcher.run(rx, shutdown_after(6_500)).await.unwrap();

        let raised = sink.raised();
        assert_eq!(raised.len(), 1, "{:?}", sink.seen);
        assert!(raised[0].0 >= secs(6), "alert raised at {:?}", raised[0].0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_focused_source_never_alerts() {
        let (_tx, rx) = mpsc::channel(4);
        let watcher = Watcher::new(ScriptedSource::always(false), RecordingSink::new(), options(1));

        let sink = watcher.run(rx, shutdown_after(30_000)).await.unwrap();

        assert!(sink.raised().is_empty());
        assert_eq!(sink.statuses(), vec![MonitorStatus::Monitoring]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stopped_watcher_does_not_poll() {
        let (_tx, rx) = mpsc::channel(4);
        let source = ScriptedSource::always(true);
        let polls = Arc::clone(&source.polls);
        let watcher = Watcher::new(
            source,
            RecordingSink::new(),
            WatcherOptions {
                start_running: false,
                ..options(1)
            },
        );

        let sink = watcher.run(rx, shutdown_after(10_000)).await.unwrap();

        assert_eq!(polls.load(Ordering::SeqCst), 0);
        assert!(sink.raised().is_empty());
        assert_eq!(sink.statuses(), vec![MonitorStatus::Stopped]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_never_threshold_keeps_quiet() {
        let (_tx, rx) = mpsc::channel(4);
        let watcher = Watcher::new(
            ScriptedSource::always(true),
            RecordingSink::new(),
            WatcherOptions {
                threshold: Threshold::parse_lenient("soon"),
                ..options(1)
            },
        );

        let sink = watcher.run(rx, shutdown_after(60_000)).await.unwrap();

        assert!(sink.raised().is_empty());
        assert_eq!(sink.statuses().last(), Some(&MonitorStatus::LookingAway));
    }

    #[tokio::test(start_paused = true)]
    async fn test_console_start_and_threshold() {
        let (tx, rx) = mpsc::channel(4);
        tx.send(ConsoleCommand::Start).await.unwrap();
        tx.send(ConsoleCommand::Threshold(Threshold::from_secs(2))).await.unwrap();

        let watcher = Watcher::new(
            ScriptedSource::always(true),
            RecordingSink::new(),
            WatcherOptions {
                start_running: false,
                ..options(60)
            },
        );

        let sink = watcher.run(rx, shutdown_after(4_500)).await.unwrap();

        let raised = sink.raised();
        assert_eq!(raised.len(), 1, "{:?}", sink.seen);
        assert_eq!(raised[0].1, secs(2));
        assert_eq!(sink.statuses().first(), Some(&MonitorStatus::Stopped));
    }

    #[tokio::test(start_paused = true)]
    async fn test_console_stop_discards_window() {
        let (tx, rx) = mpsc::channel(4);
        tokio::spawn(async move {
            time::sleep(Duration::from_millis(2_500)).await;
            tx.send(ConsoleCommand::Stop).await.unwrap();
            time::sleep(secs(60)).await;
        });

        let watcher = Watcher::new(ScriptedSource::always(true), RecordingSink::new(), options(3));
        let sink = watcher.run(rx, shutdown_after(20_000)).await.unwrap();

        assert!(sink.raised().is_empty(), "{:?}", sink.seen);
        assert_eq!(sink.statuses().last(), Some(&MonitorStatus::Stopped));
    }

    #[tokio::test(start_paused = true)]
    async fn test_acknowledge_mode_waits_for_ack() {
        let (tx, rx) = mpsc::channel(4);
        tokio::spawn(async move {
            time::sleep(secs(8)).await;
            tx.send(ConsoleCommand::Ack).await.unwrap();
            time::sleep(secs(60)).await;
        });

        let source = ScriptedSource::new(&[true, true, true, true, false]);
        let watcher = Watcher::new(
            source,
            RecordingSink::new(),
            WatcherOptions {
                dismiss: DismissMode::Acknowledge,
                ..options(3)
            },
        );

        let sink = watcher.run(rx, shutdown_after(9_000)).await.unwrap();

        assert_eq!(sink.raised().len(), 1);
        let dismissed = sink.dismissed();
        assert_eq!(dismissed.len(), 1);
        assert!(dismissed[0] >= secs(8), "dismissed at {:?}", dismissed[0]);
        assert_eq!(sink.statuses().last(), Some(&MonitorStatus::Monitoring));
    }

    #[tokio::test(start_paused = true)]
    async fn test_huge_display_duration_keeps_alert_until_shutdown() {
        let (_tx, rx) = mpsc::channel(4);
        let watcher = Watcher::new(
            ScriptedSource::always(true),
            RecordingSink::new(),
            WatcherOptions {
                display_duration: Duration::MAX,
                ..options(3)
            },
        );

        let sink = watcher.run(rx, shutdown_after(10_000)).await.unwrap();

        assert!(!sink.raised().is_empty());
        assert!(sink.dismissed().is_empty());
        assert_eq!(sink.statuses().last(), Some(&MonitorStatus::Alerting));
    }

    #[tokio::test(start_paused = true)]
    async fn test_quit_command_ends_the_run() {
        let (tx, rx) = mpsc::channel(4);
        tx.send(ConsoleCommand::Quit).await.unwrap();

        let watcher = Watcher::new(ScriptedSource::always(true), RecordingSink::new(), options(1));
        let sink = watcher.run(rx, std::future::pending()).await.unwrap();

        assert!(sink.raised().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_poll_skips_ticks() {
        let (_tx, rx) = mpsc::channel(4);
        let mut source = ScriptedSource::always(false);
        source.delay = Duration::from_millis(2_500);
        let polls = Arc::clone(&source.polls);

        let watcher = Watcher::new(source, RecordingSink::new(), options(3));
        watcher.run(rx, shutdown_after(5_900)).await.unwrap();

        // t=0 and t=3 dispatch; t=1, t=2, t=4 and t=5 find a poll in flight
        assert_eq!(polls.load(Ordering::SeqCst), 2);
    }
}
