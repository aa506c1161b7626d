//! Chromium page driver.
//!
//! Launches a Chromium process through the DevTools protocol and exposes one
//! page as a [`PageDriver`](feedpilot_action_primitives::PageDriver).

pub mod config;
pub mod error;
pub mod session;

pub use config::CdpConfig;
pub use error::{AdapterError, AdapterErrorKind};
pub use session::ChromiumSession;
