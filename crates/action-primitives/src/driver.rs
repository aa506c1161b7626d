use async_trait::async_trait;
use serde_json::Value;

use crate::errors::ActionError;

/// Script-evaluation seam between the primitives and a live page.
///
/// Implementations evaluate `script` as an expression in the page's main
/// frame and return its JSON-serialisable result.
#[async_trait]
pub trait PageDriver: Send + Sync {
    async fn evaluate(&self, script: &str) -> Result<Value, ActionError>;
}

/// Encode `value` as a JavaScript string literal.
pub(crate) fn js_literal(value: &str) -> Result<String, ActionError> {
    serde_json::to_string(value)
        .map_err(|err| ActionError::Internal(format!("invalid literal encoding: {}", err)))
}
