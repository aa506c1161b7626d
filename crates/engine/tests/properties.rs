use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use feedpilot_action_primitives::{
    ActionError, ActionReport, Actuator, AdvanceOutcome, MediaState, PageObservation,
};
use feedpilot_core_types::Platform;
use feedpilot_engine::{CounterSink, Evaluator, NotificationSink, TickOutcome, Trigger};
use feedpilot_policy_center::{builtin_profile, EngineTunables, PlatformProfile};
use parking_lot::Mutex;

#[derive(Default)]
struct RecordingActuator {
    calls: Mutex<usize>,
    fail: bool,
}

#[async_trait]
impl Actuator for RecordingActuator {
    async fn actuate(&self, _profile: &PlatformProfile) -> Result<ActionReport, ActionError> {
        *self.calls.lock() += 1;
        if self.fail {
            return Err(ActionError::CdpIo("target closed".into()));
        }
        Ok(ActionReport::new(Utc::now(), 0, AdvanceOutcome::ViewportScrolled))
    }
}

#[derive(Default)]
struct RecordingCounter {
    increments: Mutex<Vec<(Platform, NaiveDate)>>,
}

#[async_trait]
impl CounterSink for RecordingCounter {
    async fn increment_count(&self, platform: Platform, date: NaiveDate) {
        self.increments.lock().push((platform, date));
    }
}

#[derive(Default)]
struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

#[async_trait]
impl NotificationSink for RecordingNotifier {
    async fn notify(&self, message: &str) {
        self.messages.lock().push(message.to_string());
    }
}

struct Harness {
    t0: Instant,
    evaluator: Evaluator,
    actuator: Arc<RecordingActuator>,
    counter: Arc<RecordingCounter>,
    notifier: Arc<RecordingNotifier>,
}

impl Harness {
    fn new(platform: Platform) -> Self {
        Self::with_profile(platform, builtin_profile(platform), RecordingActuator::default())
    }

    fn with_profile(platform: Platform, profile: PlatformProfile, actuator: RecordingActuator) -> Self {
        let t0 = Instant::now();
        let actuator = Arc::new(actuator);
        let counter = Arc::new(RecordingCounter::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let evaluator = Evaluator::new(
            platform,
            profile,
            &EngineTunables::default(),
            true,
            actuator.clone(),
            counter.clone(),
            notifier.clone(),
            t0,
        );
        Self {
            t0,
            evaluator,
            actuator,
            counter,
            notifier,
        }
    }

    fn at(&self, ms: u64) -> Instant {
        self.t0 + Duration::from_millis(ms)
    }

    async fn tick(&mut self, ms: u64, observation: &PageObservation) -> TickOutcome {
        let now = self.at(ms);
        self.evaluator.tick(now, today(), observation).await
    }

    fn actuations(&self) -> usize {
        *self.actuator.calls.lock()
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 17).unwrap()
}

fn video(src: &str, duration: f64, current: f64, paused: bool) -> PageObservation {
    PageObservation {
        href: "https://www.youtube.com/shorts/x".into(),
        media: Some(MediaState {
            src: src.into(),
            duration: Some(duration),
            current_time: Some(current),
            paused,
        }),
        input_seq: 0,
        since_interaction_ms: None,
    }
}

fn no_media(href: &str) -> PageObservation {
    PageObservation {
        href: href.into(),
        ..PageObservation::default()
    }
}

#[tokio::test]
async fn disabled_or_suppressed_ticks_touch_nothing() {
    let mut h = Harness::new(Platform::YouTube);
    let ending = video("blob:a", 100.0, 99.95, false);

    h.evaluator.set_enabled(false);
    for ms in (0..1000).step_by(100) {
        assert!(matches!(h.tick(ms, &ending).await, TickOutcome::Disabled));
    }
    assert!(!h.evaluator.state().tracker.has_triggered());
    assert_eq!(h.evaluator.state().tracker.current_identity(), "");

    h.evaluator.set_enabled(true);
    h.evaluator.notify_interaction(h.at(1000));
    for ms in (1000..2000).step_by(100) {
        assert!(matches!(h.tick(ms, &ending).await, TickOutcome::Suppressed));
    }
    assert!(!h.evaluator.state().tracker.has_triggered());
    assert_eq!(h.actuations(), 0);

    assert_eq!(h.tick(2001, &ending).await.advanced(), Some(Trigger::Completion));
    assert_eq!(h.actuations(), 1);
}

#[tokio::test]
async fn identity_change_makes_new_trigger_eligible_same_tick() {
    let mut h = Harness::new(Platform::YouTube);
    assert!(h.tick(0, &video("blob:a", 100.0, 99.95, false)).await.advanced().is_some());
    assert!(h.evaluator.state().tracker.has_triggered());

    let outcome = h.tick(600, &video("blob:b", 100.0, 99.95, false)).await;
    assert_eq!(outcome.advanced(), Some(Trigger::Completion));
    assert_eq!(h.evaluator.state().tracker.current_identity(), "blob:b");
    assert_eq!(h.actuations(), 2);
}

#[tokio::test]
async fn one_actuation_per_identity() {
    let mut h = Harness::new(Platform::YouTube);
    let ending = video("blob:a", 100.0, 99.95, false);
    for i in 0..100u64 {
        h.tick(i * 100, &ending).await;
    }
    assert_eq!(h.actuations(), 1);
    assert_eq!(h.counter.increments.lock().len(), 1);
}

#[tokio::test]
async fn debounce_spans_identities() {
    let mut h = Harness::new(Platform::YouTube);
    h.tick(0, &video("blob:a", 100.0, 99.95, false)).await;
    let outcome = h.tick(300, &video("blob:b", 100.0, 99.95, false)).await;
    assert!(outcome.advanced().is_none());
    assert_eq!(h.actuations(), 1);

    // The second identity was never served, so it fires once spacing allows.
    assert!(h.tick(501, &video("blob:b", 100.0, 99.95, false)).await.advanced().is_some());
    assert_eq!(h.actuations(), 2);
}

#[tokio::test]
async fn fallback_fires_after_stuck_timeout() {
    let mut profile = builtin_profile(Platform::Instagram);
    profile.stuck_timeout_ms = Some(5000);
    let mut h = Harness::with_profile(Platform::Instagram, profile, RecordingActuator::default());
    let image_post = no_media("https://www.instagram.com/p/abc/");

    assert!(h.tick(0, &image_post).await.advanced().is_none());
    assert_eq!(
        h.evaluator.state().tracker.current_identity(),
        "https://www.instagram.com/p/abc/"
    );
    assert!(h.tick(4999, &image_post).await.advanced().is_none());
    assert_eq!(h.actuations(), 0);

    assert_eq!(h.tick(5001, &image_post).await.advanced(), Some(Trigger::Fallback));
    assert_eq!(h.tick(9000, &image_post).await.advanced(), None);
    assert_eq!(h.actuations(), 1);
    assert_eq!(
        h.counter.increments.lock().as_slice(),
        &[(Platform::Instagram, today())]
    );
    assert_eq!(h.notifier.messages.lock().as_slice(), &["⏭️ Next content".to_string()]);
}

#[tokio::test]
async fn identity_change_restarts_stuck_clock() {
    let mut profile = builtin_profile(Platform::Instagram);
    profile.stuck_timeout_ms = Some(5000);
    let mut h = Harness::with_profile(Platform::Instagram, profile, RecordingActuator::default());
    let first = no_media("https://www.instagram.com/p/first/");
    let second = no_media("https://www.instagram.com/p/second/");

    h.tick(0, &first).await;
    assert!(h.tick(3000, &second).await.advanced().is_none());
    assert_eq!(h.evaluator.state().tracker.content_started_at(), h.at(3000));

    assert!(h.tick(5001, &second).await.advanced().is_none());
    assert!(h.tick(8000, &second).await.advanced().is_none());
    assert_eq!(h.actuations(), 0);

    assert_eq!(h.tick(8001, &second).await.advanced(), Some(Trigger::Fallback));
    assert_eq!(h.actuations(), 1);
}

#[tokio::test]
async fn no_stuck_timeout_never_falls_back() {
    for platform in [Platform::YouTube, Platform::TikTok, Platform::Reddit] {
        let mut h = Harness::new(platform);
        let still = no_media("https://example.com/feed/item");
        for ms in (0..=600_000u64).step_by(1000) {
            assert!(h.tick(ms, &still).await.advanced().is_none(), "{platform} fired at {ms}ms");
        }
        assert_eq!(h.actuations(), 0);
        assert!(h.counter.increments.lock().is_empty());
    }
}

#[tokio::test]
async fn empty_source_media_rearms_fallback_for_blank_identity() {
    let mut h = Harness::new(Platform::Facebook);
    h.tick(0, &video("blob:a", 100.0, 10.0, false)).await;
    h.tick(1000, &no_media("https://www.facebook.com/reel/1")).await;
    assert_eq!(h.evaluator.state().tracker.current_identity(), "");

    assert_eq!(
        h.tick(9001, &no_media("https://www.facebook.com/reel/1")).await.advanced(),
        Some(Trigger::Fallback)
    );

    // An element without a source keeps the blank identity but is new media.
    let blank = video("", 100.0, 10.0, true);
    assert!(h.tick(9100, &blank).await.advanced().is_none());
    assert!(!h.evaluator.state().tracker.has_triggered());
    assert_eq!(h.tick(9700, &blank).await.advanced(), Some(Trigger::Fallback));
    assert_eq!(h.actuations(), 2);
}

#[tokio::test]
async fn fallback_wins_over_completion_on_the_same_tick() {
    let mut h = Harness::new(Platform::Facebook);
    h.tick(0, &video("blob:a", 100.0, 99.95, true)).await;
    assert_eq!(h.actuations(), 0);

    // Playback resumes right at the end once the stuck timeout has passed.
    let outcome = h.tick(8001, &video("blob:a", 100.0, 99.95, false)).await;
    assert_eq!(outcome.advanced(), Some(Trigger::Fallback));
    assert_eq!(h.actuations(), 1);
}

#[tokio::test]
async fn completion_requires_playing_media() {
    let mut h = Harness::new(Platform::YouTube);
    assert!(h.tick(0, &video("blob:a", 100.0, 99.95, true)).await.advanced().is_none());
    assert_eq!(h.actuations(), 0);

    let outcome = h.tick(100, &video("blob:a", 100.0, 99.95, false)).await;
    assert_eq!(outcome.advanced(), Some(Trigger::Completion));
    assert_eq!(h.actuations(), 1);
    assert_eq!(h.notifier.messages.lock().as_slice(), &["▶️ Next video".to_string()]);
}

#[tokio::test]
async fn unknown_duration_is_not_zero_remaining() {
    let mut h = Harness::new(Platform::YouTube);
    let mut loading = video("blob:a", 0.0, 0.0, false);
    loading.media.as_mut().unwrap().duration = None;
    assert!(h.tick(0, &loading).await.advanced().is_none());

    let zero = video("blob:a", 0.0, 0.0, false);
    assert!(h.tick(100, &zero).await.advanced().is_none());
    assert_eq!(h.actuations(), 0);
}

#[tokio::test]
async fn suppression_window_bounds() {
    let mut h = Harness::new(Platform::YouTube);
    h.evaluator.notify_interaction(h.at(0));
    assert!(h.evaluator.is_suppressed(h.at(0)));
    assert!(h.evaluator.is_suppressed(h.at(999)));
    assert!(!h.evaluator.is_suppressed(h.at(1001)));

    h.evaluator.notify_interaction(h.at(0));
    h.evaluator.notify_interaction(h.at(500));
    assert!(h.evaluator.is_suppressed(h.at(1200)));
    assert!(h.evaluator.is_suppressed(h.at(1499)));
    assert!(!h.evaluator.is_suppressed(h.at(1501)));
}

#[tokio::test]
async fn failed_actuation_spends_the_trigger() {
    let actuator = RecordingActuator {
        fail: true,
        ..RecordingActuator::default()
    };
    let mut h = Harness::with_profile(Platform::YouTube, builtin_profile(Platform::YouTube), actuator);
    let ending = video("blob:a", 100.0, 99.95, false);

    let outcome = h.tick(0, &ending).await;
    assert!(matches!(
        outcome,
        TickOutcome::Advanced {
            trigger: Trigger::Completion,
            report: None
        }
    ));
    h.tick(1000, &ending).await;
    assert_eq!(h.actuations(), 1);
    assert!(h.counter.increments.lock().is_empty());
    assert!(h.notifier.messages.lock().is_empty());
}
