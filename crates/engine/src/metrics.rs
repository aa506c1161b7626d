use once_cell::sync::Lazy;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::evaluator::Trigger;

#[derive(Default)]
struct Counters {
    ticks: AtomicU64,
    skipped_disabled: AtomicU64,
    skipped_suppressed: AtomicU64,
    observe_failures: AtomicU64,
    fallback_advances: AtomicU64,
    completion_advances: AtomicU64,
    actuation_failures: AtomicU64,
}

static COUNTERS: Lazy<Counters> = Lazy::new(Counters::default);

fn increment(counter: &AtomicU64) {
    counter.fetch_add(1, Ordering::Relaxed);
}

pub fn record_tick() {
    increment(&COUNTERS.ticks);
}

pub fn record_skipped_disabled() {
    increment(&COUNTERS.skipped_disabled);
}

pub fn record_skipped_suppressed() {
    increment(&COUNTERS.skipped_suppressed);
}

pub fn record_observe_failure() {
    increment(&COUNTERS.observe_failures);
}

pub fn record_advance(trigger: Trigger) {
    match trigger {
        Trigger::Fallback => increment(&COUNTERS.fallback_advances),
        Trigger::Completion => increment(&COUNTERS.completion_advances),
    }
}

pub fn record_actuation_failure() {
    increment(&COUNTERS.actuation_failures);
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct EngineMetricsSnapshot {
    pub ticks: u64,
    pub skipped_disabled: u64,
    pub skipped_suppressed: u64,
    pub observe_failures: u64,
    pub fallback_advances: u64,
    pub completion_advances: u64,
    pub actuation_failures: u64,
}

pub fn snapshot() -> EngineMetricsSnapshot {
    EngineMetricsSnapshot {
        ticks: COUNTERS.ticks.load(Ordering::Relaxed),
        skipped_disabled: COUNTERS.skipped_disabled.load(Ordering::Relaxed),
        skipped_suppressed: COUNTERS.skipped_suppressed.load(Ordering::Relaxed),
        observe_failures: COUNTERS.observe_failures.load(Ordering::Relaxed),
        fallback_advances: COUNTERS.fallback_advances.load(Ordering::Relaxed),
        completion_advances: COUNTERS.completion_advances.load(Ordering::Relaxed),
        actuation_failures: COUNTERS.actuation_failures.load(Ordering::Relaxed),
    }
}
