use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::types::{AgingLists, Status, TicketId};

fn value_or_default<T: Default + DeserializeOwned>(value: Value) -> T {
    serde_json::from_value(value).unwrap_or_default()
}

fn object_entries(value: Value) -> impl Iterator<Item = (String, Value)> {
    match value {
        Value::Object(entries) => Some(entries),
        _ => None,
    }
    .into_iter()
    .flatten()
}

fn array_items<T: DeserializeOwned>(value: Value) -> Vec<T> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    }
}

/// Any value of the wrong shape (`null`, `"2"`, `-1`, `1.5`, ...) reads as
/// the type's default (zero for counts, empty for maps and strings).
pub fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + DeserializeOwned,
{
    Ok(value_or_default(Value::deserialize(deserializer)?))
}

/// Array whose malformed items are skipped; a non-array reads as empty.
pub fn lenient_seq<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(array_items(Value::deserialize(deserializer)?))
}

/// Object whose malformed values read as the default; a non-object reads as
/// empty. Key order is kept.
pub fn lenient_map<'de, D, T>(deserializer: D) -> Result<IndexMap<String, T>, D::Error>
where
    D: Deserializer<'de>,
    T: Default + DeserializeOwned,
{
    Ok(object_entries(Value::deserialize(deserializer)?)
        .map(|(key, value)| (key, value_or_default(value)))
        .collect())
}

/// `deptId -> aging key -> [ticket IDs]`, tolerant at every level. IDs that
/// are neither strings nor numbers are dropped.
pub fn lenient_aging_map<'de, D>(deserializer: D) -> Result<IndexMap<String, AgingLists>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(object_entries(Value::deserialize(deserializer)?)
        .map(|(department, lists)| {
            let lists: AgingLists = object_entries(lists)
                .map(|(key, ids)| (key, array_items::<TicketId>(ids)))
                .collect();
            (department, lists)
        })
        .collect())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StatusEntry {
    Bare(Status),
    Option { value: Status },
}

/// Accept selected statuses either as plain keys (`"open"`) or as dropdown
/// option objects (`{ "value": "open" }`).
pub fn status_options<'de, D>(deserializer: D) -> Result<Vec<Status>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = Option::<Vec<StatusEntry>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(entries
        .into_iter()
        .map(|entry| match entry {
            StatusEntry::Bare(status) | StatusEntry::Option { value: status } => status,
        })
        .collect())
}
