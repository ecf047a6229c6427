/// Tool for configuring the sync webhook
///
/// This module implements the sync_configure MCP tool. It only persists the
/// URL; the server swaps its notification sink after a successful call.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::storage::{HabitStorage, SYNC_URL_KEY};
use crate::tools::ToolError;

/// Parameters for configuring sync
#[derive(Debug, Deserialize, JsonSchema)]
pub struct SyncConfigureParams {
    /// Webhook URL (http or https); omit or leave empty to turn sync off
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SyncConfigureResponse {
    pub success: bool,
    /// Stored URL, `None` when sync is off
    pub url: Option<String>,
    pub message: String,
}

fn validate_url(url: &str) -> Result<(), ToolError> {
    if url.starts_with("https://") || url.starts_with("http://") {
        Ok(())
    } else {
        Err(ToolError::InvalidParams(format!(
            "Sync URL must start with http:// or https://, got '{}'",
            url
        )))
    }
}

/// Store or clear the webhook URL
pub fn configure_sync<S: HabitStorage>(
    storage: &S,
    params: SyncConfigureParams,
) -> Result<SyncConfigureResponse, ToolError> {
    let url = params
        .url
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty());

    if let Some(url) = &url {
        validate_url(url)?;
    }
    storage.set_setting(SYNC_URL_KEY, url.as_deref())?;

    let message = match &url {
        Some(url) => format!("🔄 Sync enabled: changes will be posted to {}", url),
        None => "Sync disabled".to_string(),
    };
    Ok(SyncConfigureResponse {
        success: true,
        url,
        message,
    })
}
