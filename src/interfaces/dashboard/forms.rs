//! HTML form decoding
//!
//! Browsers send a multi-select as the same key repeated, so forms are taken
//! as raw key/value pairs and folded into the same JSON shape the API
//! accepts before deserializing.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::domain::inspection::InspectionDraft;

const MULTI_SELECT_FIELDS: &[&str] = &["hvac_type", "power_source"];

pub fn draft_from_pairs(pairs: Vec<(String, String)>) -> Result<InspectionDraft, serde_json::Error> {
    let mut object = Map::new();
    for field in MULTI_SELECT_FIELDS {
        object.insert(field.to_string(), Value::Array(Vec::new()));
    }

    for (key, value) in pairs {
        match object.get_mut(&key) {
            Some(Value::Array(items)) => items.push(Value::String(value)),
            _ => {
                object.insert(key, Value::String(value));
            }
        }
    }

    InspectionDraft::deserialize(Value::Object(object))
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn repeated_keys_become_multi_select() {
        let draft = draft_from_pairs(pairs(&[
            ("building_name", "Stores"),
            ("hvac_type", "Split"),
            ("hvac_type", "Cassette"),
            ("sprinkler", "Yes"),
        ]))
        .unwrap();

        assert_eq!(draft.building_name, "Stores");
        assert_eq!(draft.hvac_type, vec!["Split", "Cassette"]);
        assert!(draft.power_source.is_empty());
        assert_eq!(draft.sprinkler, "Yes");
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let draft = draft_from_pairs(pairs(&[("csrf", "x"), ("zone", "West")])).unwrap();
        assert_eq!(draft.zone, "West");
    }
}
