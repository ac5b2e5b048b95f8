//! Core library modules for lookaway.
//!
//! - **Monitoring**: [`monitor`] evaluates ticks against a [`threshold`];
//!   [`watcher`] drives it from a [`detection`] source
//! - **Alerts**: [`alert`] shows, plays and dismisses alerts
//! - **Infrastructure**: [`config`], [`data_storage`], [`messages`], [`daemon`]
//! - **Interaction**: [`console`] commands and the [`camera`] check
//!
//! ```rust,no_run
//! use lookaway::libs::detection::DetectionSignal;
//! use lookaway::libs::monitor::AttentionMonitor;
//! use lookaway::libs::threshold::Threshold;
//! use tokio::time::Instant;
//!
//! let mut monitor = AttentionMonitor::new(Threshold::from_secs(3));
//! monitor.start();
//! let alert = monitor.on_tick(DetectionSignal::DISTRACTED, Instant::now());
//! assert!(alert.is_none());
//! ```

pub mod alert;
pub mod camera;
pub mod config;
pub mod console;
pub mod daemon;
pub mod data_storage;
pub mod detection;
pub mod messages;
pub mod monitor;
pub mod threshold;
pub mod watcher;
