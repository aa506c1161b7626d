//! Page primitives for feedpilot
//!
//! This crate holds everything the engine does to or reads from a page:
//! - actuation: synthetic key press, "next" control click, viewport scroll
//! - observation: media state, page address and trusted-input activity
//! - toasts: transient notifications drawn inside the page
//! - the actuation gate that enforces minimum spacing between actuations
//!
//! All page access goes through the [`PageDriver`] seam so the primitives can
//! run against a live browser session or a recording double in tests.

mod driver;
pub mod errors;
mod gate;
mod primitives;
pub mod types;

pub use driver::PageDriver;
pub use errors::*;
pub use gate::ActuationGate;
pub use primitives::*;
pub use types::*;
