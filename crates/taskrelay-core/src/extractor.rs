//! Alias-tolerant property extraction.
//!
//! Source integrations name the same field differently ("Name",
//! "Project Name", "title") and store it in different property shapes.
//! Each extractor walks the alias list in order and, for each present
//! property, tries a fixed chain of shape resolvers. The first alias
//! that resolves to a non-empty value wins; later aliases are never
//! consulted, even if they would also resolve.

use serde_json::{Map, Value};

/// Named properties attached to a source item.
pub type PropertyBag = Map<String, Value>;

/// Resolves one property shape to a value.
type Resolver<T> = fn(&Value) -> Option<T>;

const TEXT_RESOLVERS: &[Resolver<String>] = &[title_text, rich_text, plain_text, raw_string];
const DATE_RESOLVERS: &[Resolver<String>] = &[date_start, direct_start];
const SELECT_RESOLVERS: &[Resolver<String>] = &[select_name, status_name];
const MULTI_RESOLVERS: &[Resolver<Vec<String>>] = &[multi_select_names, people_names, raw_array];

/// Returns the property bag of a raw event.
///
/// Looks at `properties`, then `data.properties`. Returns `None` when
/// neither is an object.
pub fn property_bag(raw: &Value) -> Option<&PropertyBag> {
    raw.get("properties")
        .and_then(Value::as_object)
        .or_else(|| {
            raw.get("data")
                .and_then(|d| d.get("properties"))
                .and_then(Value::as_object)
        })
}

/// Extracts a text value (title, rich text, plain text or raw string).
pub fn extract_text<S: AsRef<str>>(bag: &PropertyBag, aliases: &[S]) -> Option<String> {
    first_resolved(bag, aliases, TEXT_RESOLVERS)
}

/// Extracts a date value (`date.start` or `start`).
pub fn extract_date<S: AsRef<str>>(bag: &PropertyBag, aliases: &[S]) -> Option<String> {
    first_resolved(bag, aliases, DATE_RESOLVERS)
}

/// Extracts a single-select value (`select.name` or `status.name`).
pub fn extract_select<S: AsRef<str>>(bag: &PropertyBag, aliases: &[S]) -> Option<String> {
    first_resolved(bag, aliases, SELECT_RESOLVERS)
}

/// Extracts a multi-value property (multi-select, people or raw array).
///
/// Returns an empty vector when nothing resolves.
pub fn extract_multi<S: AsRef<str>>(bag: &PropertyBag, aliases: &[S]) -> Vec<String> {
    first_resolved(bag, aliases, MULTI_RESOLVERS).unwrap_or_default()
}

fn first_resolved<S: AsRef<str>, T>(
    bag: &PropertyBag,
    aliases: &[S],
    resolvers: &[Resolver<T>],
) -> Option<T> {
    aliases
        .iter()
        .filter_map(|alias| bag.get(alias.as_ref()))
        .find_map(|prop| resolvers.iter().find_map(|resolve| resolve(prop)))
}

fn non_empty(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn non_empty_list(values: Vec<String>) -> Option<Vec<String>> {
    if values.is_empty() {
        None
    } else {
        Some(values)
    }
}

fn title_text(prop: &Value) -> Option<String> {
    non_empty(prop.pointer("/title/0/plain_text"))
}

fn rich_text(prop: &Value) -> Option<String> {
    non_empty(prop.pointer("/rich_text/0/plain_text"))
}

fn plain_text(prop: &Value) -> Option<String> {
    non_empty(prop.get("plain_text"))
}

fn raw_string(prop: &Value) -> Option<String> {
    non_empty(Some(prop))
}

fn date_start(prop: &Value) -> Option<String> {
    non_empty(prop.pointer("/date/start"))
}

fn direct_start(prop: &Value) -> Option<String> {
    non_empty(prop.get("start"))
}

fn select_name(prop: &Value) -> Option<String> {
    non_empty(prop.pointer("/select/name"))
}

fn status_name(prop: &Value) -> Option<String> {
    non_empty(prop.pointer("/status/name"))
}

fn multi_select_names(prop: &Value) -> Option<Vec<String>> {
    let items = prop.get("multi_select")?.as_array()?;
    non_empty_list(items.iter().filter_map(|i| non_empty(i.get("name"))).collect())
}

fn people_names(prop: &Value) -> Option<Vec<String>> {
    let people = prop.get("people")?.as_array()?;
    non_empty_list(
        people
            .iter()
            .filter_map(|p| non_empty(p.get("name")).or_else(|| non_empty(p.get("email"))))
            .collect(),
    )
}

fn raw_array(prop: &Value) -> Option<Vec<String>> {
    let items = prop.as_array()?;
    non_empty_list(
        items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) if !s.is_empty() => Some(s.clone()),
                _ => non_empty(item.get("name")).or_else(|| non_empty(item.get("value"))),
            })
            .collect(),
    )
}
