//! Observe primitive - one read of the page per engine tick

use serde_json::Value;
use tracing::trace;

use crate::{
    driver::{js_literal, PageDriver},
    errors::ActionError,
    types::PageObservation,
};

/// Read the page address, the active media element and raw-input activity.
///
/// The first call installs passive listeners for trusted `wheel`,
/// `touchstart`, `touchmove` and `click` events. Synthetic events dispatched
/// by the actuator are untrusted and are not counted.
pub async fn execute_observe(
    driver: &dyn PageDriver,
    media_selector: &str,
) -> Result<PageObservation, ActionError> {
    let script = observe_script(media_selector)?;
    let value = driver.evaluate(&script).await?;
    parse_observation(value)
}

fn parse_observation(value: Value) -> Result<PageObservation, ActionError> {
    let observation: PageObservation = serde_json::from_value(value).map_err(|err| {
        ActionError::UnexpectedResponse(format!("malformed observation: {}", err))
    })?;
    trace!(
        href = %observation.href,
        has_media = observation.media.is_some(),
        input_seq = observation.input_seq,
        "page observed"
    );
    Ok(observation)
}

fn observe_script(media_selector: &str) -> Result<String, ActionError> {
    let selector = js_literal(media_selector)?;
    Ok(format!(
        r#"(() => {{
    const state = window.__feedpilot || (window.__feedpilot = {{ inputSeq: 0, lastInput: null, installed: false }});
    if (!state.installed) {{
        const onInput = (event) => {{
            if (!event.isTrusted) return;
            state.inputSeq += 1;
            state.lastInput = performance.now();
        }};
        for (const type of ['wheel', 'touchstart', 'touchmove', 'click']) {{
            window.addEventListener(type, onInput, {{ passive: true, capture: true }});
        }}
        state.installed = true;
    }}
    const finite = (n) => Number.isFinite(n) ? n : null;
    let media = null;
    let el = null;
    try {{ el = document.querySelector({selector}); }} catch (_) {{ el = null; }}
    if (el) {{
        media = {{
            src: el.currentSrc || el.src || '',
            duration: finite(el.duration),
            currentTime: finite(el.currentTime),
            paused: !!el.paused,
        }};
    }}
    return {{
        href: location.href,
        media,
        inputSeq: state.inputSeq,
        sinceInteractionMs: state.lastInput === null ? null : performance.now() - state.lastInput,
    }};
}})()"#,
        selector = selector,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::test_support::RecordingDriver;
    use serde_json::json;

    #[tokio::test]
    async fn parses_media_and_interaction_fields() {
        let driver = RecordingDriver::answering(vec![Ok(json!({
            "href": "https://www.youtube.com/shorts/abc",
            "media": { "src": "blob:1", "duration": 30.0, "currentTime": 29.95, "paused": false },
            "inputSeq": 4,
            "sinceInteractionMs": 120.5
        }))]);
        let observation = execute_observe(driver.as_ref(), "video").await.unwrap();
        let media = observation.media.unwrap();
        assert_eq!(media.src, "blob:1");
        assert!(media.remaining_secs().unwrap() < 0.1);
        assert_eq!(observation.input_seq, 4);
        assert_eq!(observation.since_interaction_ms, Some(120.5));
        assert!(driver.scripts.lock()[0].contains("document.querySelector(\"video\")"));
    }

    #[tokio::test]
    async fn null_duration_means_unknown() {
        let driver = RecordingDriver::answering(vec![Ok(json!({
            "href": "https://www.instagram.com/reels/x",
            "media": { "src": "", "duration": null, "currentTime": 0, "paused": true },
            "inputSeq": 0,
            "sinceInteractionMs": null
        }))]);
        let observation = execute_observe(driver.as_ref(), "video").await.unwrap();
        assert_eq!(observation.media.unwrap().remaining_secs(), None);
    }

    #[tokio::test]
    async fn non_object_result_is_rejected() {
        let driver = RecordingDriver::answering(vec![Ok(json!(true))]);
        let err = execute_observe(driver.as_ref(), "video").await.unwrap_err();
        assert!(matches!(err, ActionError::UnexpectedResponse(_)));
    }
}
