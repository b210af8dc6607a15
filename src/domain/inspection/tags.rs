//! Multi-select tag sets
//!
//! Stored as `", "`-delimited text. Decoding also accepts the PostgreSQL
//! array literal form (`{"Window","Split"}`) found in older exports.

use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Serialize, Serializer};

pub const TAG_DELIMITER: &str = ", ";

/// Set of enumerated tags, iterated in declaration order of `T`.
///
/// Rows written by older tooling may hold labels outside `T`; those are kept
/// verbatim after the known tags so they survive a read and re-encode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSet<T: Ord> {
    tags: BTreeSet<T>,
    unrecognized: Vec<String>,
}

impl<T: Ord> Default for TagSet<T> {
    fn default() -> Self {
        Self {
            tags: BTreeSet::new(),
            unrecognized: Vec::new(),
        }
    }
}

impl<T: Ord + Copy> TagSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, tag: T) -> bool {
        self.tags.insert(tag)
    }

    pub fn contains(&self, tag: &T) -> bool {
        self.tags.contains(tag)
    }

    pub fn len(&self) -> usize {
        self.tags.len() + self.unrecognized.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty() && self.unrecognized.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.tags.iter()
    }

    /// Stored labels that match no known tag.
    pub fn unrecognized(&self) -> &[String] {
        &self.unrecognized
    }
}

impl<T: Ord> FromIterator<T> for TagSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            tags: iter.into_iter().collect(),
            unrecognized: Vec::new(),
        }
    }
}

impl<T> TagSet<T>
where
    T: Ord + Copy + FromStr<Err = String> + std::fmt::Display,
{
    /// Parse raw tag labels. Blank entries are ignored, duplicates collapse.
    pub fn parse<S: AsRef<str>>(raw: &[S]) -> Result<Self, String> {
        let mut set = Self::new();
        for label in raw {
            let label = label.as_ref().trim();
            if label.is_empty() {
                continue;
            }
            let tag = label
                .parse::<T>()
                .map_err(|allowed| format!("unknown value '{}', {}", label, allowed))?;
            set.insert(tag);
        }
        Ok(set)
    }

    /// Storage form: labels joined with `", "`; empty set is the empty string.
    pub fn encode(&self) -> String {
        self.labels().join(TAG_DELIMITER)
    }

    /// Read stored text. Unknown labels are kept rather than rejected.
    pub fn decode(stored: &str) -> Self {
        let mut set = Self::new();
        for label in split_delimited(stored) {
            match label.parse::<T>() {
                Ok(tag) => {
                    set.insert(tag);
                }
                Err(_) if !set.unrecognized.contains(&label) => set.unrecognized.push(label),
                Err(_) => {}
            }
        }
        set
    }

    pub fn labels(&self) -> Vec<String> {
        self.tags
            .iter()
            .map(ToString::to_string)
            .chain(self.unrecognized.iter().cloned())
            .collect()
    }
}

/// Split delimited tag text into trimmed labels, tolerating array-literal
/// braces and quoting.
pub fn split_delimited(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();
    let inner = trimmed
        .strip_prefix('{')
        .and_then(|s| s.strip_suffix('}'))
        .unwrap_or(trimmed);

    inner
        .split(',')
        .map(|part| part.trim().trim_matches('"').trim().to_string())
        .filter(|part| !part.is_empty())
        .collect()
}

impl<T> Serialize for TagSet<T>
where
    T: Ord + Copy + FromStr<Err = String> + std::fmt::Display,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.labels())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::inspection::{HvacType, PowerSource};

    #[test]
    fn encode_is_declaration_ordered_and_deduplicated() {
        let set = TagSet::<HvacType>::parse(&["Other", "Window", "window", "Split"]).unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(set.encode(), "Window, Split, Other");
    }

    #[test]
    fn decode_accepts_delimited_and_array_literal() {
        let a = TagSet::<PowerSource>::decode("220V, 110V");
        let b = TagSet::<PowerSource>::decode("{\"110V\",\"220V\"}");
        assert_eq!(a, b);
        assert!(a.contains(&PowerSource::V110));
    }

    #[test]
    fn empty_text_is_empty_set() {
        assert!(TagSet::<PowerSource>::decode("").is_empty());
        assert!(TagSet::<PowerSource>::decode("{}").is_empty());
        assert_eq!(TagSet::<PowerSource>::new().encode(), "");
    }

    #[test]
    fn unknown_tag_is_rejected() {
        let err = TagSet::<PowerSource>::parse(&["110V", "600V"]).unwrap_err();
        assert!(err.starts_with("unknown value '600V'"), "{err}");
    }

    #[test]
    fn decode_keeps_unknown_labels_verbatim() {
        let set = TagSet::<HvacType>::decode("Window Unit, Split, Window Unit");
        assert!(set.contains(&HvacType::Split));
        assert_eq!(set.unrecognized(), ["Window Unit".to_string()]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.encode(), "Split, Window Unit");
        assert_eq!(
            serde_json::to_string(&set).unwrap(),
            r#"["Split","Window Unit"]"#
        );
    }

    #[test]
    fn serializes_as_list() {
        let set: TagSet<HvacType> = [HvacType::FreeStanding, HvacType::Cassette]
            .into_iter()
            .collect();
        assert_eq!(
            serde_json::to_string(&set).unwrap(),
            r#"["Cassette","Free Standing"]"#
        );
    }
}
