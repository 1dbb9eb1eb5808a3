//! Completion-event detection.
//!
//! Webhooks reach us as flat page properties, wrapped under `data`, or
//! as a diff-style change list. Each known shape has its own predicate;
//! an event is a completion if any of them matches, checked in order.
//!
//! The first two shapes and the change list compare against `"Done"`
//! exactly. The alias sweep lowercases before comparing. The two rules
//! disagree on case sensitivity and are kept that way until the
//! intended behaviour is settled.

use serde_json::Value;

/// Status property aliases checked by the generic sweep.
pub const DEFAULT_STATUS_ALIASES: &[&str] = &["status", "Status", "state", "State"];

const DONE: &str = "Done";

/// Payload layouts that can carry a completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayloadShape {
    /// `properties.Status.{select,status}.name == "Done"`.
    FlatProperties,
    /// `data.properties.Status.{select,status}.name == "Done"`.
    WrappedData,
    /// `event_type == "page.updated"` with a `Status` change to `"Done"`.
    ChangeList,
    /// Any top-level status alias whose select/status name lowercases to `"done"`.
    StatusAliases,
}

impl PayloadShape {
    /// All shapes, in evaluation order.
    pub const ALL: [PayloadShape; 4] = [
        PayloadShape::FlatProperties,
        PayloadShape::WrappedData,
        PayloadShape::ChangeList,
        PayloadShape::StatusAliases,
    ];

    /// Returns true if `raw` carries a completion in this shape.
    pub fn matches<S: AsRef<str>>(self, raw: &Value, status_aliases: &[S]) -> bool {
        match self {
            PayloadShape::FlatProperties => {
                status_is_done(raw.pointer("/properties/Status"))
            }
            PayloadShape::WrappedData => {
                status_is_done(raw.pointer("/data/properties/Status"))
            }
            PayloadShape::ChangeList => change_list_is_done(raw),
            PayloadShape::StatusAliases => alias_sweep_is_done(raw, status_aliases),
        }
    }
}

/// Returns true if the payload represents a transition to "Done".
pub fn is_completion_event(raw: &Value) -> bool {
    completion_shape(raw, DEFAULT_STATUS_ALIASES).is_some()
}

/// Returns the first shape that reports a completion, if any.
pub fn completion_shape<S: AsRef<str>>(raw: &Value, status_aliases: &[S]) -> Option<PayloadShape> {
    PayloadShape::ALL
        .into_iter()
        .find(|shape| shape.matches(raw, status_aliases))
}

fn status_name(prop: &Value) -> impl Iterator<Item = &str> {
    ["/select/name", "/status/name"]
        .into_iter()
        .filter_map(move |ptr| prop.pointer(ptr).and_then(Value::as_str))
}

fn status_is_done(prop: Option<&Value>) -> bool {
    prop.is_some_and(|p| status_name(p).any(|name| name == DONE))
}

fn change_list_is_done(raw: &Value) -> bool {
    if raw.get("event_type").and_then(Value::as_str) != Some("page.updated") {
        return false;
    }

    raw.get("changes")
        .and_then(Value::as_array)
        .is_some_and(|changes| {
            changes.iter().any(|change| {
                change.get("property").and_then(Value::as_str) == Some("Status")
                    && change.pointer("/value/select/name").and_then(Value::as_str) == Some(DONE)
            })
        })
}

fn alias_sweep_is_done<S: AsRef<str>>(raw: &Value, aliases: &[S]) -> bool {
    let Some(bag) = raw.get("properties").and_then(Value::as_object) else {
        return false;
    };

    aliases
        .iter()
        .filter_map(|alias| bag.get(alias.as_ref()))
        .any(|prop| status_name(prop).any(|name| name.to_lowercase() == "done"))
}
