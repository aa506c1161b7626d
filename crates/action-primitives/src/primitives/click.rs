//! Click primitive - click the first "next" control present on the page

use tracing::debug;

use crate::{driver::PageDriver, errors::ActionError};

/// Try `selectors` in order and click the first one that matches.
///
/// Returns the selector that was clicked, or `None` when no control exists.
pub async fn execute_click_first(
    driver: &dyn PageDriver,
    selectors: &[String],
) -> Result<Option<String>, ActionError> {
    if selectors.is_empty() {
        return Ok(None);
    }

    let script = click_first_script(selectors)?;
    let value = driver.evaluate(&script).await?;

    match value
        .get("status")
        .and_then(|v| v.as_str())
        .unwrap_or("unknown")
    {
        "clicked" => {
            let selector = value
                .get("selector")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string())
                .ok_or_else(|| {
                    ActionError::UnexpectedResponse("click result without selector".to_string())
                })?;
            debug!(selector = %selector, "clicked next control");
            Ok(Some(selector))
        }
        "missing" => Ok(None),
        other => Err(ActionError::UnexpectedResponse(format!(
            "unexpected click status: {}",
            other
        ))),
    }
}

fn click_first_script(selectors: &[String]) -> Result<String, ActionError> {
    let selectors_literal = serde_json::to_string(selectors)
        .map_err(|err| ActionError::Internal(format!("invalid selector encoding: {}", err)))?;
    Ok(format!(
        "(() => {{\n            for (const selector of {selectors}) {{\n                let el = null;\n                try {{ el = document.querySelector(selector); }} catch (_) {{ continue; }}\n                if (el) {{ el.click(); return {{ status: 'clicked', selector }}; }}\n            }}\n            return {{ status: 'missing' }};\n        }})()",
        selectors = selectors_literal,
    ))
}
