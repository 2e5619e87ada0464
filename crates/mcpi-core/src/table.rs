//! Ordered name → id tables loaded from flat JSON objects

use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use std::fmt;

/// A fixed list of `(name, id)` pairs in file order.
///
/// Several names may map to the same id; reverse lookup returns the first.
#[derive(Debug, Clone, Default)]
pub struct NameTable {
    entries: Vec<(String, u32)>,
}

impl NameTable {
    /// Parse a flat `{ "NAME": id }` JSON object.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn id(&self, name: &str) -> Option<u32> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, id)| *id)
    }

    pub fn name(&self, id: u32) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, i)| *i == id)
            .map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.entries.iter().map(|(n, id)| (n.as_str(), *id))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'de> Deserialize<'de> for NameTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = NameTable;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a flat map of names to non-negative integer ids")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<NameTable, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((name, id)) = map.next_entry::<String, u32>()? {
                    entries.push((name, id));
                }
                Ok(NameTable { entries })
            }
        }

        deserializer.deserialize_map(TableVisitor)
    }
}
