use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use feedpilot_action_primitives::{execute_show_toast, PageDriver};
use feedpilot_core_types::Platform;
use feedpilot_engine::{CounterSink, NotificationSink};
use feedpilot_state_center::LocalStore;
use tracing::{debug, warn};

/// Writes advancement counts to the local store, dropping failures.
pub struct StoreCounterSink {
    store: LocalStore,
}

impl StoreCounterSink {
    pub fn new(store: LocalStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CounterSink for StoreCounterSink {
    async fn increment_count(&self, platform: Platform, date: NaiveDate) {
        if let Err(err) = self.store.increment_count(platform, date).await {
            warn!(platform = %platform, "counter write dropped: {err}");
        }
    }
}

/// Shared enabled flag, mirrored from control messages.
#[derive(Clone, Debug)]
pub struct EnabledFlag(Arc<AtomicBool>);

impl EnabledFlag {
    pub fn new(enabled: bool) -> Self {
        Self(Arc::new(AtomicBool::new(enabled)))
    }

    pub fn get(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    pub fn set(&self, enabled: bool) {
        self.0.store(enabled, Ordering::Relaxed);
    }
}

/// Shows engine notifications as an in-page toast.
pub struct PageToastSink {
    driver: Arc<dyn PageDriver>,
    platform: Platform,
    duration: Duration,
    enabled: EnabledFlag,
}

impl PageToastSink {
    pub fn new(
        driver: Arc<dyn PageDriver>,
        platform: Platform,
        duration: Duration,
        enabled: EnabledFlag,
    ) -> Self {
        Self {
            driver,
            platform,
            duration,
            enabled,
        }
    }
}

#[async_trait]
impl NotificationSink for PageToastSink {
    async fn notify(&self, message: &str) {
        if !self.enabled.get() {
            debug!("toast skipped while disabled");
            return;
        }
        if let Err(err) =
            execute_show_toast(self.driver.as_ref(), self.platform, message, self.duration).await
        {
            warn!(platform = %self.platform, "toast failed: {err}");
        }
    }
}
