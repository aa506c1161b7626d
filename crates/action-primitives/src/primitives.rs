//! Action primitives implementation
//!
//! Page operations the engine needs:
//! 1. key_press - dispatch a synthetic directional key
//! 2. click - click the first present "next" control
//! 3. scroll - scroll the viewport by one screen
//! 4. observe - read media state, page address and raw-input activity
//! 5. toast - show a transient notification inside the page

mod click;
mod key_press;
mod observe;
mod scroll;
mod toast;

pub use click::*;
pub use key_press::*;
pub use observe::*;
pub use scroll::*;
pub use toast::*;

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use chrono::Utc;
use feedpilot_policy_center::{AdvanceMethod, PlatformProfile};
use tracing::{debug, info};

use crate::{
    driver::PageDriver,
    errors::ActionError,
    types::{ActionReport, AdvanceOutcome},
};

/// Advancement actuator.
///
/// Performs the platform's configured method and reports what it attempted.
/// There is no success feedback: the page may ignore the action entirely.
#[async_trait]
pub trait Actuator: Send + Sync {
    async fn actuate(&self, profile: &PlatformProfile) -> Result<ActionReport, ActionError>;
}

/// Actuator that drives the page through a [`PageDriver`].
pub struct ScriptActuator {
    driver: Arc<dyn PageDriver>,
}

impl ScriptActuator {
    pub fn new(driver: Arc<dyn PageDriver>) -> Self {
        Self { driver }
    }

    pub fn driver(&self) -> &Arc<dyn PageDriver> {
        &self.driver
    }
}

#[async_trait]
impl Actuator for ScriptActuator {
    async fn actuate(&self, profile: &PlatformProfile) -> Result<ActionReport, ActionError> {
        let started_at = Utc::now();
        let start_instant = Instant::now();

        let outcome = match profile.advance_method {
            AdvanceMethod::SimulatedKey => {
                execute_key_press(self.driver.as_ref(), profile.advance_key).await?;
                AdvanceOutcome::KeyDispatched {
                    key: profile.advance_key,
                }
            }
            AdvanceMethod::PlatformSpecific => {
                match execute_click_first(self.driver.as_ref(), &profile.next_controls).await? {
                    Some(selector) => AdvanceOutcome::ControlClicked { selector },
                    None => {
                        debug!("no next control present; scrolling viewport");
                        execute_viewport_scroll(self.driver.as_ref()).await?;
                        AdvanceOutcome::ViewportScrolled
                    }
                }
            }
        };

        let latency_ms = start_instant.elapsed().as_millis() as u64;
        let report = ActionReport::new(started_at, latency_ms, outcome);
        info!(
            action_id = %report.action_id,
            outcome = ?report.outcome,
            latency_ms = latency_ms,
            "Actuation dispatched"
        );
        Ok(report)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use parking_lot::Mutex;
    use serde_json::Value;

    /// Driver that records scripts and answers from a queue.
    #[derive(Default)]
    pub struct RecordingDriver {
        pub scripts: Mutex<Vec<String>>,
        pub responses: Mutex<Vec<Result<Value, ActionError>>>,
    }

    impl RecordingDriver {
        pub fn answering(responses: Vec<Result<Value, ActionError>>) -> Arc<Self> {
            Arc::new(Self {
                scripts: Mutex::new(Vec::new()),
                responses: Mutex::new(responses),
            })
        }
    }

    #[async_trait]
    impl PageDriver for RecordingDriver {
        async fn evaluate(&self, script: &str) -> Result<Value, ActionError> {
            self.scripts.lock().push(script.to_string());
            let mut responses = self.responses.lock();
            if responses.is_empty() {
                Ok(Value::Bool(true))
            } else {
                responses.remove(0)
            }
        }
    }
}
