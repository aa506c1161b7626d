//! Key press primitive - synthetic keyboard event on the document

use feedpilot_policy_center::AdvanceKey;
use tracing::debug;

use crate::{
    driver::{js_literal, PageDriver},
    errors::ActionError,
};

/// Dispatch a bubbling `keydown` for `key` so the page's own listeners react
/// as they would to a real key press.
pub async fn execute_key_press(driver: &dyn PageDriver, key: AdvanceKey) -> Result<(), ActionError> {
    debug!(key = %key, "dispatching synthetic keydown");
    let script = key_press_script(key)?;
    driver.evaluate(&script).await?;
    Ok(())
}

pub(crate) fn key_press_script(key: AdvanceKey) -> Result<String, ActionError> {
    let key_literal = js_literal(key.as_str())?;
    Ok(format!(
        "(() => {{\n            const event = new KeyboardEvent('keydown', {{ key: {key}, code: {key}, keyCode: {code}, which: {code}, bubbles: true }});\n            document.dispatchEvent(event);\n            return true;\n        }})()",
        key = key_literal,
        code = key.key_code(),
    ))
}
