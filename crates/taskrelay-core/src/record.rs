//! Canonical record emitted by the normalizer.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::normalizer::FieldAliases;

/// Priority of a canonical record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Urgent,
    High,
    #[default]
    Medium,
    Low,
    None,
}

impl Priority {
    /// Parses a priority label, ignoring case.
    ///
    /// Accepts both the canonical names (`urgent`, `none`) and the
    /// Notion-side labels (`Urgent`, `No priority`).
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "urgent" => Some(Priority::Urgent),
            "high" => Some(Priority::High),
            "medium" => Some(Priority::Medium),
            "low" => Some(Priority::Low),
            "none" | "no priority" => Some(Priority::None),
            _ => None,
        }
    }

    /// Returns the Notion-side label for this priority.
    pub fn label(&self) -> &'static str {
        match self {
            Priority::Urgent => "Urgent",
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
            Priority::None => "No priority",
        }
    }
}

/// Normalized project-completion record forwarded downstream.
///
/// Every field is populated; absent source values are replaced with
/// defaults by the normalizer so consumers never see `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalRecord {
    /// Never empty.
    pub project_name: String,
    pub project_description: String,
    /// ISO date, `YYYY-MM-DD` unless the source supplied a full timestamp.
    pub completion_date: String,
    pub team_members: Vec<String>,
    pub deliverables: Vec<String>,
    pub source_id: String,
    pub source_url: String,
    pub priority: Priority,
    pub category: String,
}

impl CanonicalRecord {
    /// Renders the record back into a Notion-shaped completion payload.
    ///
    /// Each field is written under the first alias of its list, so
    /// normalizing the result with the same `aliases` yields an equal
    /// record. Fields whose alias list is empty are left out.
    pub fn to_raw_event(&self, aliases: &FieldAliases) -> Value {
        let mut properties = Map::new();
        let status = aliases.status.first().map_or("Status", String::as_str);
        properties.insert(status.into(), json!({ "select": { "name": "Done" } }));

        let fields = [
            (&aliases.project_name, json!({ "title": [{ "plain_text": self.project_name }] })),
            (
                &aliases.description,
                json!({ "rich_text": [{ "plain_text": self.project_description }] }),
            ),
            (&aliases.completion_date, json!({ "date": { "start": self.completion_date } })),
            (&aliases.team_members, json!({ "multi_select": names(&self.team_members) })),
            (&aliases.deliverables, json!({ "multi_select": names(&self.deliverables) })),
            (&aliases.priority, json!({ "select": { "name": self.priority.label() } })),
            (&aliases.category, json!({ "select": { "name": self.category } })),
        ];
        for (list, value) in fields {
            if let Some(name) = list.first() {
                properties.insert(name.clone(), value);
            }
        }

        let mut raw = Map::new();
        if !self.source_id.is_empty() {
            raw.insert("id".into(), Value::String(self.source_id.clone()));
        }
        if !self.source_url.is_empty() {
            raw.insert("url".into(), Value::String(self.source_url.clone()));
        }
        raw.insert("properties".into(), Value::Object(properties));
        Value::Object(raw)
    }
}

fn names(values: &[String]) -> Vec<Value> {
    values.iter().map(|v| json!({ "name": v })).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CanonicalRecord {
        CanonicalRecord {
            project_name: "Launch".into(),
            project_description: "Ship it".into(),
            completion_date: "2024-05-01".into(),
            team_members: vec!["Ada".into()],
            deliverables: vec![],
            source_id: "abc".into(),
            source_url: "https://notion.so/abc".into(),
            priority: Priority::None,
            category: "general".into(),
        }
    }

    #[test]
    fn test_serializes_camel_case() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["projectName"], "Launch");
        assert_eq!(value["completionDate"], "2024-05-01");
        assert_eq!(value["teamMembers"], json!(["Ada"]));
        assert_eq!(value["deliverables"], json!([]));
        assert_eq!(value["sourceUrl"], "https://notion.so/abc");
        assert_eq!(value["priority"], "none");
    }

    #[test]
    fn test_priority_from_label() {
        assert_eq!(Priority::from_label("Urgent"), Some(Priority::Urgent));
        assert_eq!(Priority::from_label("HIGH"), Some(Priority::High));
        assert_eq!(Priority::from_label(" medium "), Some(Priority::Medium));
        assert_eq!(Priority::from_label("No priority"), Some(Priority::None));
        assert_eq!(Priority::from_label("none"), Some(Priority::None));
        assert_eq!(Priority::from_label("P1"), None);
    }

    #[test]
    fn test_priority_label_parses_back() {
        for p in [
            Priority::Urgent,
            Priority::High,
            Priority::Medium,
            Priority::Low,
            Priority::None,
        ] {
            assert_eq!(Priority::from_label(p.label()), Some(p));
        }
    }

    #[test]
    fn test_to_raw_event_omits_empty_ids() {
        let mut record = sample();
        record.source_id.clear();
        record.source_url.clear();

        let raw = record.to_raw_event(&FieldAliases::default());
        assert!(raw.get("id").is_none());
        assert!(raw.get("url").is_none());
        assert_eq!(raw["properties"]["Status"]["select"]["name"], "Done");
    }
}
