//! Status and priority translation between Linear and Notion.
//!
//! Linear is the source side: workflow state names and a numeric
//! priority scale (0 = none, 1 = urgent ... 4 = low). Notion is the
//! target side: select labels. Unknown values fall back to a fixed
//! default instead of failing, since either workspace can grow new
//! options before this table is updated.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::record::Priority;

/// Status used when a state name has no mapping.
pub const DEFAULT_STATUS: &str = "Backlog";

/// Notion priority label used when a Linear priority has no mapping.
pub const DEFAULT_PRIORITY_LABEL: &str = "No priority";

/// Linear priority used when a Notion label has no mapping.
pub const DEFAULT_PRIORITY_LEVEL: u8 = 0;

/// Bidirectional status/priority dictionaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MappingTable {
    /// Linear state -> Notion status.
    pub status: BTreeMap<String, String>,
    /// Notion status -> Linear state.
    pub status_reverse: BTreeMap<String, String>,
    /// Linear priority level -> Notion label.
    pub priority: BTreeMap<u8, String>,
    /// Notion label -> Linear priority level.
    pub priority_reverse: BTreeMap<String, u8>,
}

impl Default for MappingTable {
    fn default() -> Self {
        let status = [
            ("Backlog", "Backlog"),
            ("Todo", "Todo"),
            ("In Progress", "In Progress"),
            ("In Review", "In Review"),
            ("Done", "Done"),
            ("Canceled", "Cancelled"),
            ("Cancelled", "Cancelled"),
        ];
        let status_reverse = [
            ("Backlog", "Backlog"),
            ("Todo", "Todo"),
            ("In Progress", "In Progress"),
            ("In Review", "In Review"),
            ("Done", "Done"),
            ("Cancelled", "Canceled"),
        ];
        let priority = [
            (0, "No priority"),
            (1, "Urgent"),
            (2, "High"),
            (3, "Medium"),
            (4, "Low"),
        ];

        Self {
            status: pairs(status),
            status_reverse: pairs(status_reverse),
            priority: priority
                .iter()
                .map(|(level, label)| (*level, label.to_string()))
                .collect(),
            priority_reverse: priority
                .iter()
                .map(|(level, label)| (label.to_string(), *level))
                .collect(),
        }
    }
}

fn pairs<const N: usize>(entries: [(&str, &str); N]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

impl MappingTable {
    /// Linear state -> Notion status, defaulting to `Backlog`.
    pub fn to_target_status(&self, source_status: &str) -> &str {
        self.status
            .get(source_status)
            .map(String::as_str)
            .unwrap_or(DEFAULT_STATUS)
    }

    /// Notion status -> Linear state, defaulting to `Backlog`.
    pub fn to_source_status(&self, target_status: &str) -> &str {
        self.status_reverse
            .get(target_status)
            .map(String::as_str)
            .unwrap_or(DEFAULT_STATUS)
    }

    /// Linear priority level -> Notion label, defaulting to `No priority`.
    pub fn to_target_priority(&self, source_priority: u8) -> &str {
        self.priority
            .get(&source_priority)
            .map(String::as_str)
            .unwrap_or(DEFAULT_PRIORITY_LABEL)
    }

    /// Notion label -> Linear priority level, defaulting to 0.
    pub fn to_source_priority(&self, target_priority: &str) -> u8 {
        self.priority_reverse
            .get(target_priority)
            .copied()
            .unwrap_or(DEFAULT_PRIORITY_LEVEL)
    }

    /// Resolves a raw priority value to the canonical enum.
    ///
    /// Numeric values go through the Linear scale first; anything else
    /// is read as a label. The numeric path only resolves when the mapped
    /// label is one of the canonical names (`Urgent`, `No priority`, ...).
    pub fn canonical_priority(&self, raw: &str) -> Option<Priority> {
        let raw = raw.trim();
        let Ok(level) = raw.parse::<u8>() else {
            return Priority::from_label(raw);
        };

        let label = self.to_target_priority(level);
        let priority = Priority::from_label(label);
        if priority.is_none() {
            debug!(level, label, "Mapped priority label is not a canonical priority");
        }
        priority
    }

    /// Lists reverse-table keys that do not survive a round trip.
    ///
    /// For every target-side key `k`, `to_target(to_source(k))` must
    /// equal `k`. An empty result means the table is consistent.
    pub fn round_trip_violations(&self) -> Vec<String> {
        let mut violations = Vec::new();

        for key in self.status_reverse.keys() {
            if self.to_target_status(self.to_source_status(key)) != key {
                violations.push(format!("status '{}'", key));
            }
        }

        for key in self.priority_reverse.keys() {
            if self.to_target_priority(self.to_source_priority(key)) != key {
                violations.push(format!("priority '{}'", key));
            }
        }

        violations
    }
}
