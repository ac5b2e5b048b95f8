//! Clients for services lookaway talks to over the network.
//!
//! Currently a single read-only client for the distraction status endpoint,
//! which doubles as the remote [`crate::libs::detection::DetectionSource`].

pub mod status;

pub use status::{PollError, StatusClient, StatusReport};
