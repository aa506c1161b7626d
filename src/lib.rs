//! feedpilot CLI library: configuration and the bridges between the engine
//! and its collaborators (local store, in-page toast).

pub mod config;
pub mod sinks;

pub use config::Config;
pub use sinks::{EnabledFlag, PageToastSink, StoreCounterSink};
