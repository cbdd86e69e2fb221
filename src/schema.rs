//! Light Record Schema
//!
//! Compact projection of a plant record, keyed by abbreviated field names
//! (`f, c, g, sp, t, z, a, r, m, l, s, ph, d, p, v, tg, cv`).
//!
//! Every field is optional. Missing keys, `null`, blank strings and empty
//! lists all decode to the same empty value, so nothing downstream has to
//! tell them apart. `m` (maintenance) arrives either as a single string or
//! as a list and is normalized to a list here.

use std::fmt;

use rustc_hash::FxHashMap;
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One plant in the light dataset
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct LightRecord {
    #[serde(rename = "f", default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,

    #[serde(rename = "c", default, deserialize_with = "string_list", skip_serializing_if = "Vec::is_empty")]
    pub common_names: Vec<String>,

    #[serde(rename = "cv", default, deserialize_with = "string_list", skip_serializing_if = "Vec::is_empty")]
    pub cultivars: Vec<String>,

    #[serde(rename = "g", default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub genus: Option<String>,

    #[serde(rename = "sp", default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub species: Option<String>,

    /// Plant types (tag-like, order carries no meaning)
    #[serde(rename = "t", default, deserialize_with = "string_list", skip_serializing_if = "Vec::is_empty")]
    pub plant_types: Vec<String>,

    /// USDA hardiness zones, e.g. "7b"
    #[serde(rename = "z", default, deserialize_with = "string_list", skip_serializing_if = "Vec::is_empty")]
    pub hardiness_zones: Vec<String>,

    #[serde(rename = "a", default, deserialize_with = "string_list", skip_serializing_if = "Vec::is_empty")]
    pub attracts: Vec<String>,

    #[serde(rename = "r", default, deserialize_with = "string_list", skip_serializing_if = "Vec::is_empty")]
    pub resistances: Vec<String>,

    #[serde(rename = "v", default, deserialize_with = "string_list", skip_serializing_if = "Vec::is_empty")]
    pub additional_value: Vec<String>,

    #[serde(rename = "m", default, deserialize_with = "string_list", skip_serializing_if = "Vec::is_empty")]
    pub maintenance: Vec<String>,

    /// Free-text light phrases, not an enum
    #[serde(rename = "l", default, deserialize_with = "string_list", skip_serializing_if = "Vec::is_empty")]
    pub light: Vec<String>,

    #[serde(rename = "s", default, deserialize_with = "string_list", skip_serializing_if = "Vec::is_empty")]
    pub soil_texture: Vec<String>,

    #[serde(rename = "ph", default, deserialize_with = "string_list", skip_serializing_if = "Vec::is_empty")]
    pub soil_ph: Vec<String>,

    #[serde(rename = "d", default, deserialize_with = "string_list", skip_serializing_if = "Vec::is_empty")]
    pub soil_drainage: Vec<String>,

    #[serde(rename = "p", default, deserialize_with = "string_list", skip_serializing_if = "Vec::is_empty")]
    pub problems: Vec<String>,

    #[serde(rename = "tg", default, deserialize_with = "string_list", skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl LightRecord {
    pub fn has_problems(&self) -> bool {
        !self.problems.is_empty()
    }
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.trim().is_empty()))
}

/// Accepts `null`, a scalar, or a list of scalars; always yields a list.
fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| scalar_text(item).transpose())
            .collect::<Result<Vec<_>, _>>()
            .map_err(de::Error::custom),
        scalar => Ok(scalar_text(scalar).map_err(de::Error::custom)?.into_iter().collect()),
    }
}

fn scalar_text(value: Value) -> Result<Option<String>, &'static str> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        _ => Err("expected a string or a list of strings"),
    }
}

/// A record together with its canonical key
#[derive(Debug, Clone, PartialEq)]
pub struct PlantEntry {
    pub key: String,
    pub record: LightRecord,
}

/// The whole light dataset in document order
///
/// Positions (`usize`) are stable for the life of the dataset and are what
/// the search index and filters pass around instead of keys.
#[derive(Debug, Clone, Default)]
pub struct LightDataset {
    entries: Vec<PlantEntry>,
    positions: FxHashMap<String, usize>,
}

impl LightDataset {
    /// Build from (key, record) pairs. A repeated key keeps its first
    /// position and takes the later record.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, LightRecord)>,
    {
        let mut dataset = LightDataset::default();
        for (key, record) in entries {
            dataset.insert(key, record);
        }
        dataset
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    fn insert(&mut self, key: String, record: LightRecord) {
        match self.positions.get(&key) {
            Some(&pos) => self.entries[pos].record = record,
            None => {
                self.positions.insert(key.clone(), self.entries.len());
                self.entries.push(PlantEntry { key, record });
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[PlantEntry] {
        &self.entries
    }

    pub fn entry(&self, pos: usize) -> Option<&PlantEntry> {
        self.entries.get(pos)
    }

    pub fn position(&self, key: &str) -> Option<usize> {
        self.positions.get(key).copied()
    }

    pub fn get(&self, key: &str) -> Option<&LightRecord> {
        self.position(key).map(|pos| &self.entries[pos].record)
    }
}

impl<'de> Deserialize<'de> for LightDataset {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DatasetVisitor;

        impl<'de> Visitor<'de> for DatasetVisitor {
            type Value = LightDataset;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object mapping plant keys to light records")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut dataset = LightDataset {
                    entries: Vec::with_capacity(map.size_hint().unwrap_or(0)),
                    positions: FxHashMap::default(),
                };
                while let Some((key, record)) = map.next_entry::<String, LightRecord>()? {
                    dataset.insert(key, record);
                }
                Ok(dataset)
            }
        }

        deserializer.deserialize_map(DatasetVisitor)
    }
}
