//! User-facing text.
//!
//! [`Message`] enumerates everything lookaway prints; its `Display` impl in
//! [`display`] holds the wording, and the macros in [`macros`] decide where
//! it goes.

pub mod display;
pub mod macros;
pub mod types;

pub use types::Message;
