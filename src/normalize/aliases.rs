//! Ordered alias lookups over loosely-keyed source records.

use serde_json::Value;

use crate::event::SourceRecord;

/// Keys probed, in order, when a stored file reference is an object.
const FILE_OBJECT_KEYS: &[&str] = &["filename", "fileName", "path", "url", "name"];

/// First alias whose value is present and non-empty, with the alias that hit.
pub fn first_non_empty<'a, I, S>(
    source: &'a SourceRecord,
    aliases: I,
) -> Option<(String, &'a Value)>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    aliases.into_iter().find_map(|alias| {
        let alias = alias.as_ref();
        source
            .get(alias)
            .filter(|value| value_text(value).is_some())
            .map(|value| (alias.to_string(), value))
    })
}

pub fn first_text<I, S>(source: &SourceRecord, aliases: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    first_non_empty(source, aliases).and_then(|(_, value)| value_text(value))
}

/// Joins name parts (given, father's, grandfather's) found under their own
/// alias lists. `None` when no part is present.
pub fn joined_parts(source: &SourceRecord, parts: &[&[&str]]) -> Option<String> {
    let found: Vec<String> = parts
        .iter()
        .filter_map(|aliases| first_text(source, aliases.iter()))
        .collect();
    if found.is_empty() {
        None
    } else {
        Some(found.join(" "))
    }
}

/// Display text of a source value. Blank strings, nulls and booleans count
/// as absent; arrays yield their first usable element.
pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => items.iter().find_map(value_text),
        Value::Object(map) => FILE_OBJECT_KEYS
            .iter()
            .find_map(|key| map.get(*key).and_then(value_text))
            // Date objects have no display text of their own but still count.
            .or_else(|| map.contains_key("year").then(|| Value::Object(map.clone()).to_string())),
        Value::Null | Value::Bool(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> SourceRecord {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn earlier_alias_wins() {
        let source = record(json!({"birthPlace": "B", "childBirthPlace": "A"}));
        let (alias, value) = first_non_empty(&source, ["childBirthPlace", "birthPlace"]).unwrap();
        assert_eq!(alias, "childBirthPlace");
        assert_eq!(value, "A");
    }

    #[test]
    fn blank_values_fall_through() {
        let source = record(json!({"a": "  ", "b": null, "c": false, "d": 7}));
        assert_eq!(first_text(&source, ["a", "b", "c", "d"]).as_deref(), Some("7"));
        assert_eq!(first_text(&source, ["a", "missing"]), None);
    }

    #[test]
    fn file_objects_and_arrays() {
        let source = record(json!({
            "photo": {"filename": "groomPhoto-1.jpg", "size": 10},
            "gallery": ["", "second.png"]
        }));
        assert_eq!(first_text(&source, ["photo"]).as_deref(), Some("groomPhoto-1.jpg"));
        assert_eq!(first_text(&source, ["gallery"]).as_deref(), Some("second.png"));
    }

    #[test]
    fn name_parts_join_with_spaces() {
        let source = record(json!({"firstName": "Abebe", "lastName": "Bikila"}));
        let parts: &[&[&str]] = &[&["firstName"], &["middleName"], &["lastName"]];
        assert_eq!(joined_parts(&source, parts).as_deref(), Some("Abebe Bikila"));
        assert_eq!(joined_parts(&record(json!({})), parts), None);
    }
}
