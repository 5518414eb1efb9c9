//! Ordered source-weight table.
//!
//! Weights are applied in the order the YAML mapping declares them, so the
//! table keeps its entries in a `Vec` instead of a hash map.

use serde::de::{Error, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Mapping from source name to a percentage weight, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeightTable {
    entries: Vec<(String, f64)>,
}

impl WeightTable {
    /// Build a table from `(source, weight)` pairs, keeping their order.
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(name, pct)| (name.into(), pct))
                .collect(),
        }
    }

    /// Iterate over `(source, weight)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(name, pct)| (name.as_str(), *pct))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all weights.
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, pct)| pct).sum()
    }
}

impl Serialize for WeightTable {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(self.entries.iter().map(|(name, pct)| (name, pct)))
    }
}

impl<'de> Deserialize<'de> for WeightTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct WeightTableVisitor;

        impl<'de> Visitor<'de> for WeightTableVisitor {
            type Value = WeightTable;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of source name to weight")
            }

            fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut entries: Vec<(String, f64)> =
                    Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((name, pct)) = map.next_entry::<String, f64>()? {
                    if entries.iter().any(|(existing, _)| *existing == name) {
                        return Err(M::Error::custom(format!(
                            "duplicate source weight: {name}"
                        )));
                    }
                    entries.push((name, pct));
                }
                Ok(WeightTable { entries })
            }
        }

        deserializer.deserialize_map(WeightTableVisitor)
    }
}
