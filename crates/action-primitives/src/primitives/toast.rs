//! Toast primitive - transient in-page notification

use std::time::Duration;

use feedpilot_core_types::Platform;

use crate::{
    driver::{js_literal, PageDriver},
    errors::ActionError,
};

const TOAST_ELEMENT_ID: &str = "feedpilot-toast";

/// Background for a platform's toast.
pub fn toast_background(platform: Platform) -> &'static str {
    match platform {
        Platform::YouTube => "#FF0000",
        Platform::Instagram => {
            "linear-gradient(45deg, #f09433 0%, #e6683c 25%, #dc2743 50%, #cc2366 75%, #bc1888 100%)"
        }
        Platform::TikTok => "#000000",
        Platform::Facebook => "#1877F2",
        Platform::Reddit => "#FF4500",
        Platform::Unknown => "#333333",
    }
}

/// Show `message` at the top-right of the page for `duration`.
///
/// A toast already on screen is replaced.
pub async fn execute_show_toast(
    driver: &dyn PageDriver,
    platform: Platform,
    message: &str,
    duration: Duration,
) -> Result<(), ActionError> {
    let script = toast_script(platform, message, duration)?;
    driver.evaluate(&script).await?;
    Ok(())
}

fn toast_script(platform: Platform, message: &str, duration: Duration) -> Result<String, ActionError> {
    Ok(format!(
        r#"(() => {{
    const previous = document.getElementById({id});
    if (previous) previous.remove();
    const toast = document.createElement('div');
    toast.id = {id};
    toast.textContent = {message};
    Object.assign(toast.style, {{
        position: 'fixed', top: '20px', right: '20px', zIndex: '2147483647',
        padding: '10px 16px', borderRadius: '8px', color: '#FFFFFF',
        background: {background}, font: '600 14px system-ui, sans-serif',
        boxShadow: '0 4px 12px rgba(0,0,0,0.3)', pointerEvents: 'none',
    }});
    (document.body || document.documentElement).appendChild(toast);
    setTimeout(() => toast.remove(), {millis});
    return true;
}})()"#,
        id = js_literal(TOAST_ELEMENT_ID)?,
        message = js_literal(message)?,
        background = js_literal(toast_background(platform))?,
        millis = duration.as_millis(),
    ))
}
