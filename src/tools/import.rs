/// Tool for importing habits from the older list-based export
///
/// This module implements the habit_import MCP tool.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{import_legacy_json, HabitId};
use crate::storage::HabitStorage;
use crate::tools::ToolError;

/// Parameters for a legacy import
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ImportParams {
    /// JSON array of habits with `completedDates` lists
    pub json: String,
}

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub success: bool,
    pub imported: Vec<HabitId>,
    pub skipped: Vec<HabitId>,
    pub message: String,
}

/// Import list-format habits; ids already in use are skipped
pub fn import_habits<S: HabitStorage>(storage: &S, params: ImportParams) -> Result<ImportResponse, ToolError> {
    let mut store = storage.load_store()?;
    let summary = import_legacy_json(&mut store, &params.json)?;
    if !summary.imported.is_empty() {
        storage.save_store(&store)?;
    }

    let mut message = format!("📥 Imported {} habits", summary.imported.len());
    if !summary.skipped.is_empty() {
        let ids = summary
            .skipped
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        message.push_str(&format!(" (skipped ids already in use: {})", ids));
    }
    message.push_str(". Listed dates became successes; failures cannot be recovered from this format.");

    Ok(ImportResponse {
        success: true,
        imported: summary.imported,
        skipped: summary.skipped,
        message,
    })
}
