#[cfg(test)]
mod tests {
    use lookaway::api::status::{PollError, StatusClient};
    use lookaway::libs::alert::AlertSink;
    use lookaway::libs::detection::{DetectionSignal, DetectionSource};
    use lookaway::libs::monitor::{AlertEvent, MonitorStatus};
    use lookaway::libs::threshold::Threshold;
    use lookaway::libs::watcher::{Watcher, WatcherOptions};
    use reqwest::StatusCode;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::mpsc;

    /// Serves the same HTTP response to every connection and counts requests.
    async fn serve(status_line: &'static str, body: &'static str) -> (String, Arc<AtomicUsize>) {
        serve_with(move |_| (status_line, body)).await
    }

    /// Answers the n-th request (counting from 0) with `respond(n)`.
    async fn serve_with<F>(respond: F) -> (String, Arc<AtomicUsize>)
    where
        F: Fn(usize) -> (&'static str, &'static str) + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/status", listener.local_addr().unwrap());
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);

        tokio::spawn(async move {
            loop {
                let Ok((mut stream, _)) = listener.accept().await else {
                    break;
                };
                let (status_line, body) = respond(counter.fetch_add(1, Ordering::SeqCst));
                tokio::spawn(async move {
                    let mut request = Vec::new();
                    let mut buf = [0u8; 1024];
                    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                        match stream.read(&mut buf).await {
                            Ok(0) | Err(_) => return,
                            Ok(n) => request.extend_from_slice(&buf[..n]),
                        }
                    }
                    let response = format!(
                        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        status_line,
                        body.len(),
                        body
                    );
                    let _ = stream.write_all(response.as_bytes()).await;
                    let _ = stream.shutdown().await;
                });
            }
        });

        (url, hits)
    }

    /// URL of a port nothing listens on.
    async fn closed_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}/status", addr)
    }

    #[tokio::test]
    async fn test_alert_true_is_distracted() {
        let (url, hits) = serve("200 OK", r#"{"alert": true}"#).await;
        let client = StatusClient::new(url);

        assert!(client.fetch().await.unwrap().alert);
        assert_eq!(client.poll().await, DetectionSignal::DISTRACTED);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_alert_false_is_focused() {
        let (url, _) = serve("200 OK", r#"{"alert": false, "confidence": 0.93}"#).await;
        let client = StatusClient::new(url);

        assert!(!client.fetch().await.unwrap().alert);
        assert_eq!(client.poll().await, DetectionSignal::FOCUSED);
    }

    #[tokio::test]
    async fn test_malformed_body_is_a_decode_error() {
        let (url, _) = serve("200 OK", r#"{"alert": "yes"}"#).await;
        let client = StatusClient::new(url);

        assert!(matches!(client.fetch().await, Err(PollError::Decode(_))));
        assert_eq!(client.poll().await, DetectionSignal::FOCUSED);
    }

    #[tokio::test]
    async fn test_missing_field_is_a_decode_error() {
        let (url, _) = serve("200 OK", "{}").await;
        let client = StatusClient::new(url);

        assert!(matches!(client.fetch().await, Err(PollError::Decode(_))));
    }

    #[tokio::test]
    async fn test_server_error_is_reported_with_status() {
        let (url, _) = serve("500 Internal Server Error", r#"{"alert": true}"#).await;
        let client = StatusClient::new(url);

        match client.fetch().await {
            Err(PollError::HttpStatus(status)) => assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR),
            other => panic!("expected HTTP status error, got {:?}", other),
        }
        // an error status never counts as a distraction, whatever the body says
        assert_eq!(client.poll().await, DetectionSignal::FOCUSED);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_focused() {
        let client = StatusClient::new(closed_url().await);

        assert!(matches!(client.fetch().await, Err(PollError::Transport(_))));
        for _ in 0..3 {
            assert_eq!(client.poll().await, DetectionSignal::FOCUSED);
        }
    }

    struct CountingSink {
        alerts: usize,
    }

    impl AlertSink for CountingSink {
        fn raise(&mut self, _event: &AlertEvent) {
            self.alerts += 1;
        }

        fn dismiss(&mut self) {}

        fn status_changed(&mut self, _status: MonitorStatus) {}
    }

    #[tokio::test]
    async fn test_watcher_alerts_from_remote_source() {
        let (url, hits) = serve("200 OK", r#"{"alert": true}"#).await;
        let (_tx, rx) = mpsc::channel(1);
        let options = WatcherOptions {
            threshold: Threshold::from_secs(1),
            poll_interval: Duration::from_millis(100),
            ..Default::default()
        };

        let watcher = Watcher::new(StatusClient::new(url), CountingSink { alerts: 0 }, options);
        let sink = watcher.run(rx, tokio::time::sleep(Duration::from_millis(1_600))).await.unwrap();

        assert!(sink.alerts >= 1, "expected an alert after one second of alert=true");
        assert!(hits.load(Ordering::SeqCst) >= 5);
    }

    #[tokio::test]
    async fn test_watcher_stays_quiet_when_endpoint_is_down() {
        let (_tx, rx) = mpsc::channel(1);
        let options = WatcherOptions {
            threshold: Threshold::from_secs(1),
            poll_interval: Duration::from_millis(100),
            ..Default::default()
        };

        let watcher = Watcher::new(StatusClient::new(closed_url().await), CountingSink { alerts: 0 }, options);
        let sink = watcher.run(rx, tokio::time::sleep(Duration::from_millis(1_500))).await.unwrap();

        assert_eq!(sink.alerts, 0);
    }

    #[tokio::test]
    async fn test_watcher_keeps_polling_through_failures() {
        // five server errors, then a distraction report
        let (url, hits) = serve_with(|n| {
            if n < 5 {
                ("500 Internal Server Error", r#"{"alert": true}"#)
            } else {
                ("200 OK", r#"{"alert": true}"#)
            }
        })
        .await;
        let (_tx, rx) = mpsc::channel(1);
        let options = WatcherOptions {
            threshold: Threshold::from_secs(1),
            poll_interval: Duration::from_millis(100),
            ..Default::default()
        };

        let watcher = Watcher::new(StatusClient::new(url), CountingSink { alerts: 0 }, options);
        let sink = watcher.run(rx, tokio::time::sleep(Duration::from_millis(2_000))).await.unwrap();

        assert!(hits.load(Ordering::SeqCst) >= 10, "polling stopped after failures");
        assert!(sink.alerts >= 1, "alert=true after failed polls should still alert");
    }

    #[tokio::test]
    async fn test_failed_polls_do_not_slow_the_ticker() {
        let (url, hits) = serve("500 Internal Server Error", r#"{"alert": true}"#).await;
        let (_tx, rx) = mpsc::channel(1);
        let options = WatcherOptions {
            threshold: Threshold::from_secs(1),
            poll_interval: Duration::from_millis(100),
            ..Default::default()
        };

        let watcher = Watcher::new(StatusClient::new(url), CountingSink { alerts: 0 }, options);
        let sink = watcher.run(rx, tokio::time::sleep(Duration::from_millis(600))).await.unwrap();

        assert!(hits.load(Ordering::SeqCst) >= 5);
        assert_eq!(sink.alerts, 0);
    }
}
