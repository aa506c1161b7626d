//! Scroll primitive - move the viewport down by one screen

use tracing::debug;

use crate::{driver::PageDriver, errors::ActionError};

const SCROLL_SCRIPT: &str =
    "(() => { window.scrollBy({ top: window.innerHeight, behavior: 'smooth' }); return true; })()";

/// Smoothly scroll the window by its own inner height.
pub async fn execute_viewport_scroll(driver: &dyn PageDriver) -> Result<(), ActionError> {
    debug!("scrolling one viewport");
    driver.evaluate(SCROLL_SCRIPT).await?;
    Ok(())
}
