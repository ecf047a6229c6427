/// Tools for managing tags
///
/// This module implements the tag_list, tag_add and tag_remove MCP tools.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::UserTag;
use crate::storage::HabitStorage;
use crate::tools::ToolError;

/// Parameters naming a single tag
#[derive(Debug, Deserialize, JsonSchema)]
pub struct TagParams {
    /// Tag name (1 to 30 characters)
    pub name: String,
}

/// Parameters for listing tags (none)
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ListTagsParams {}

#[derive(Debug, Serialize)]
pub struct TagsResponse {
    pub success: bool,
    pub tags: Vec<UserTag>,
    pub message: String,
}

fn render(tags: &[UserTag]) -> String {
    tags.iter()
        .map(|t| format!("🏷️ {} (color {})", t.name, t.color_index))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn list_tags<S: HabitStorage>(storage: &S, _params: ListTagsParams) -> Result<TagsResponse, ToolError> {
    let store = storage.load_store()?;
    let message = render(&store.tags);
    Ok(TagsResponse {
        success: true,
        tags: store.tags,
        message,
    })
}

pub fn add_tag<S: HabitStorage>(storage: &S, params: TagParams) -> Result<TagsResponse, ToolError> {
    let mut store = storage.load_store()?;
    let name = store.add_tag(&params.name)?.name.clone();
    storage.save_store(&store)?;

    Ok(TagsResponse {
        success: true,
        message: format!("Added tag '{}'\n\n{}", name, render(&store.tags)),
        tags: store.tags,
    })
}

/// Remove a tag; habits filed under it keep the name
pub fn remove_tag<S: HabitStorage>(storage: &S, params: TagParams) -> Result<TagsResponse, ToolError> {
    let mut store = storage.load_store()?;
    let removed = store.remove_tag(&params.name)?;
    let still_used = store
        .habits
        .iter()
        .filter(|h| h.category == removed.name)
        .count();
    storage.save_store(&store)?;

    let mut message = format!("Removed tag '{}'", removed.name);
    if still_used > 0 {
        message.push_str(&format!(
            " ({} habits still carry the name and show the default style)",
            still_used
        ));
    }

    Ok(TagsResponse {
        success: true,
        tags: store.tags,
        message,
    })
}
