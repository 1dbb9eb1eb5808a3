//! Builds a [`CanonicalRecord`] from a raw webhook payload.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::classifier::{completion_shape, DEFAULT_STATUS_ALIASES};
use crate::error::{RelayError, Result};
use crate::extractor::{
    extract_date, extract_multi, extract_select, extract_text, property_bag, PropertyBag,
};
use crate::mapping::MappingTable;
use crate::record::{CanonicalRecord, Priority};

pub const DEFAULT_PROJECT_NAME: &str = "Unnamed Project";
pub const DEFAULT_DESCRIPTION: &str = "No description provided";
pub const DEFAULT_CATEGORY: &str = "general";

/// Base URL used to build a page link when the payload has none.
const NOTION_BASE_URL: &str = "https://notion.so";

/// Ordered alias lists for each canonical field.
///
/// Order matters: the first alias that resolves wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FieldAliases {
    pub project_name: Vec<String>,
    pub description: Vec<String>,
    pub completion_date: Vec<String>,
    pub team_members: Vec<String>,
    pub deliverables: Vec<String>,
    pub priority: Vec<String>,
    pub category: Vec<String>,
    /// Properties swept by the classifier's generic status check.
    pub status: Vec<String>,
}

fn owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

impl Default for FieldAliases {
    fn default() -> Self {
        Self {
            project_name: owned(&["Name", "Title", "Project Name", "name", "title"]),
            description: owned(&["Description", "Summary", "Details", "description"]),
            completion_date: owned(&["Completion Date", "Done Date", "End Date", "completion_date"]),
            team_members: owned(&["Team Members", "Assignees", "team", "assignees"]),
            deliverables: owned(&["Deliverables", "Tasks", "deliverables", "tasks"]),
            priority: owned(&["Priority", "priority"]),
            category: owned(&["Category", "Type", "category", "type"]),
            status: owned(DEFAULT_STATUS_ALIASES),
        }
    }
}

/// Result of normalizing one payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalized {
    /// Payload is not a completion event; nothing to forward.
    Skipped,
    /// Payload produced a record.
    Record(CanonicalRecord),
}

/// Normalizes `raw`, using today's UTC date as the completion default.
pub fn normalize(raw: &Value, aliases: &FieldAliases, mappings: &MappingTable) -> Result<Normalized> {
    normalize_on(raw, aliases, mappings, Utc::now().date_naive())
}

/// Normalizes `raw` with an explicit fallback completion date.
///
/// # Errors
/// Returns [`RelayError::Validation`] when a completion event carries no
/// resolvable project name.
pub fn normalize_on(
    raw: &Value,
    aliases: &FieldAliases,
    mappings: &MappingTable,
    today: NaiveDate,
) -> Result<Normalized> {
    let Some(shape) = completion_shape(raw, &aliases.status) else {
        debug!("Not a completion event, skipping");
        return Ok(Normalized::Skipped);
    };
    debug!(shape = ?shape, "Completion event detected");

    let empty = PropertyBag::new();
    let props = property_bag(raw).unwrap_or(&empty);

    let project_name = extract_text(props, &aliases.project_name)
        .ok_or_else(|| RelayError::Validation("Project name is required".to_string()))?;

    let source_id = raw
        .get("id")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let source_url = source_url(raw, &source_id);

    let priority = extract_select(props, &aliases.priority)
        .and_then(|p| mappings.canonical_priority(&p))
        .unwrap_or(Priority::Medium);

    Ok(Normalized::Record(CanonicalRecord {
        project_name,
        project_description: extract_text(props, &aliases.description)
            .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
        completion_date: extract_date(props, &aliases.completion_date)
            .unwrap_or_else(|| today.format("%Y-%m-%d").to_string()),
        team_members: extract_multi(props, &aliases.team_members),
        deliverables: extract_multi(props, &aliases.deliverables),
        source_id,
        source_url,
        priority,
        category: extract_select(props, &aliases.category)
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
    }))
}

fn source_url(raw: &Value, source_id: &str) -> String {
    match raw.get("url").and_then(Value::as_str) {
        Some(url) if !url.is_empty() => url.to_string(),
        _ if !source_id.is_empty() => format!("{}/{}", NOTION_BASE_URL, source_id),
        _ => String::new(),
    }
}
