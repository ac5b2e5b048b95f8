//! Detection sources for the attention monitor.
//!
//! A [`DetectionSource`] answers one question per tick: is the user
//! distracted right now? Two sources ship with the application:
//!
//! - [`crate::api::status::StatusClient`] asks a remote status endpoint
//! - [`KeyboardSource`] treats a held-down key as the distraction sensor
//!
//! Sources never fail from the monitor's point of view. Anything that goes
//! wrong while sampling is reported as [`DetectionSignal::FOCUSED`].

use crate::libs::messages::Message;
use crate::{msg_debug, msg_error};
use rdev::{listen, Event, EventType, Key};
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Outcome of sampling a detection source once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DetectionSignal {
    pub is_distracted: bool,
}

impl DetectionSignal {
    pub const FOCUSED: Self = Self { is_distracted: false };
    pub const DISTRACTED: Self = Self { is_distracted: true };

    pub fn new(is_distracted: bool) -> Self {
        Self { is_distracted }
    }
}

/// Anything that can be sampled for a distraction signal.
///
/// Implementations are shared between the control loop and the task that
/// runs each poll, so they must be `Send + Sync`.
pub trait DetectionSource: Send + Sync + 'static {
    /// Short name used in log output.
    fn name(&self) -> &'static str;

    /// Samples the source once.
    fn poll(&self) -> impl Future<Output = DetectionSignal> + Send;
}

#[derive(Debug, Error)]
#[error("unknown key '{0}', expected an rdev key name such as Space, KeyD or F9")]
pub struct UnknownKeyError(pub String);

/// Resolves a key name such as `Space`, `KeyD` or `F9`.
pub fn parse_key(name: &str) -> Result<Key, UnknownKeyError> {
    serde_json::from_value(serde_json::Value::String(name.trim().to_string())).map_err(|_| UnknownKeyError(name.to_string()))
}

/// Keyboard stand-in for a real sensor.
///
/// The user is considered distracted for as long as the configured key is
/// held down. The OS input hook is blocking, so it runs on a dedicated
/// thread and publishes the key state through an atomic flag.
#[derive(Debug, Clone)]
pub struct KeyboardSource {
    key: Key,
    held: Arc<AtomicBool>,
}

impl KeyboardSource {
    /// Creates a source without installing the input hook.
    pub fn new(key: Key) -> Self {
        Self {
            key,
            held: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Creates a source and starts listening for global key events.
    pub fn spawn(key: Key) -> Self {
        let source = Self::new(key);
        let listener = source.clone();
        std::thread::spawn(move || loop {
            let handler = listener.clone();
            match listen(move |event: Event| handler.handle_event(&event.event_type)) {
                Ok(()) => break,
                Err(e) => {
                    msg_error!(Message::KeyboardListenerFailed(format!("{:?}", e)));
                    std::thread::sleep(Duration::from_secs(1));
                }
            }
        });
        source
    }

    pub fn key(&self) -> Key {
        self.key
    }

    /// Applies a raw input event to the key state.
    pub fn handle_event(&self, event: &EventType) {
        match event {
            EventType::KeyPress(key) if *key == self.key => {
                if !self.held.swap(true, Ordering::SeqCst) {
                    msg_debug!(Message::SimulationKeyDown(format!("{:?}", key)));
                }
            }
            EventType::KeyRelease(key) if *key == self.key => {
                if self.held.swap(false, Ordering::SeqCst) {
                    msg_debug!(Message::SimulationKeyUp(format!("{:?}", key)));
                }
            }
            _ => {}
        }
    }

    pub fn is_held(&self) -> bool {
        self.held.load(Ordering::SeqCst)
    }
}

impl DetectionSource for KeyboardSource {
    fn name(&self) -> &'static str {
        "keyboard"
    }

    fn poll(&self) -> impl Future<Output = DetectionSignal> + Send {
        let signal = DetectionSignal::new(self.is_held());
        async move { signal }
    }
}
