//! Auto-advance decision engine.
//!
//! A fixed-rate tick reads the page, feeds the content identity into the
//! [`ContentTracker`], consults the [`InteractionSuppressor`] and decides
//! through one of two rules whether to advance the feed:
//!
//! - fallback: content has been on screen longer than the platform's stuck timeout
//! - completion: playing media has less than the trigger threshold left
//!
//! Both rules are limited to one advancement per content identity and share a
//! global minimum spacing between actuations.

pub mod evaluator;
pub mod metrics;
pub mod runner;
pub mod sinks;
pub mod state;
pub mod suppressor;
pub mod timer;
pub mod tracker;

pub use evaluator::{Evaluator, TickOutcome, Trigger};
pub use runner::{ControlMessage, ControlSender, EngineRunner};
pub use sinks::{CounterSink, NoopCounterSink, NoopNotificationSink, NotificationSink};
pub use state::EngineState;
pub use suppressor::InteractionSuppressor;
pub use timer::ScheduledTimeout;
pub use tracker::{ContentTracker, IdentityChange};
