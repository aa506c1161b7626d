//! Receiving side of an advancement: the daily counter and the notification.
//!
//! Both are best effort. Implementations swallow and log their own failures;
//! nothing they do can stop the tick loop.

use async_trait::async_trait;
use chrono::NaiveDate;
use feedpilot_core_types::Platform;

#[async_trait]
pub trait CounterSink: Send + Sync {
    /// Add one advancement for `platform` to the counters for `date`.
    async fn increment_count(&self, platform: Platform, date: NaiveDate);
}

#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Show `message` briefly. Must do nothing while the engine is disabled.
    async fn notify(&self, message: &str);
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NoopCounterSink;

#[async_trait]
impl CounterSink for NoopCounterSink {
    async fn increment_count(&self, _platform: Platform, _date: NaiveDate) {}
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NoopNotificationSink;

#[async_trait]
impl NotificationSink for NoopNotificationSink {
    async fn notify(&self, _message: &str) {}
}
