//! Detail View Projector
//!
//! Maps a full detail record onto a fixed allow-list of (key, label) pairs,
//! grouped into display sections. Keys outside the list are never rendered.
//! Fields whose value is absent, null, an empty collection, or blank after
//! formatting are omitted.

use serde::Serialize;
use serde_json::Value;

use crate::loader::FullRecord;

/// One allow-listed attribute of a full record
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
}

const fn field(key: &'static str, label: &'static str) -> FieldSpec {
    FieldSpec { key, label }
}

/// A titled group of fields, in display order
#[derive(Debug, Clone, Copy)]
pub struct SectionSpec {
    pub title: &'static str,
    pub fields: &'static [FieldSpec],
}

pub static DETAIL_SECTIONS: &[SectionSpec] = &[
    SectionSpec {
        title: "Basic Information",
        fields: &[
            field("family", "Family"),
            field("genus", "Genus"),
            field("species", "Species"),
            field("life-cycle", "Life Cycle"),
            field("plant-type", "Plant Type"),
            field("country-or-region-of-origin", "Origin"),
        ],
    },
    SectionSpec {
        title: "Cultivars",
        fields: &[field("cultivars", "Cultivars")],
    },
    SectionSpec {
        title: "Growth Characteristics",
        fields: &[
            field("dimensions", "Dimensions"),
            field("habit/form", "Habit/Form"),
            field("growth-rate", "Growth Rate"),
            field("texture", "Texture"),
            field("woody-plant-leaf-characteristics", "Woody Plant Leaf Characteristics"),
        ],
    },
    SectionSpec {
        title: "Growing Conditions",
        fields: &[
            field("usda-plant-hardiness-zone", "USDA Hardiness Zones"),
            field("light", "Light Requirements"),
            field("soil-texture", "Soil Texture"),
            field("soil-ph", "Soil pH"),
            field("soil-drainage", "Soil Drainage"),
            field("available-space-to-plant", "Available Space Needed"),
        ],
    },
    SectionSpec {
        title: "Flowers",
        fields: &[
            field("flower-color", "Flower Color"),
            field("flower-bloom-time", "Bloom Time"),
            field("flower-shape", "Flower Shape"),
            field("flower-size", "Flower Size"),
            field("flower-petals", "Flower Petals"),
            field("flower-inflorescence", "Inflorescence"),
            field("flower-value-to-gardener", "Value to Gardener"),
            field("flower-description", "Description"),
        ],
    },
    SectionSpec {
        title: "Foliage",
        fields: &[
            field("leaf-color", "Leaf Color"),
            field("leaf-type", "Leaf Type"),
            field("leaf-arrangement", "Leaf Arrangement"),
            field("leaf-shape", "Leaf Shape"),
            field("leaf-margin", "Leaf Margin"),
            field("leaf-length", "Leaf Length"),
            field("leaf-width", "Leaf Width"),
            field("hairs-present", "Hairs Present"),
            field("leaf-description", "Description"),
        ],
    },
    SectionSpec {
        title: "Stems",
        fields: &[
            field("stem-color", "Stem Color"),
            field("stem-is-aromatic", "Aromatic"),
            field("stem-description", "Description"),
        ],
    },
    SectionSpec {
        title: "Fruit",
        fields: &[
            field("fruit-color", "Fruit Color"),
            field("fruit-type", "Fruit Type"),
            field("display/harvest-time", "Display/Harvest Time"),
        ],
    },
    SectionSpec {
        title: "Landscape & Wildlife",
        fields: &[
            field("maintenance", "Maintenance"),
            field("landscape-location", "Landscape Location"),
            field("landscape-theme", "Landscape Theme"),
            field("design-feature", "Design Feature"),
            field("attracts", "Attracts"),
            field("wildlife-value", "Wildlife Value"),
            field("play-value", "Play Value"),
            field("resistance-to-challenges", "Resistance"),
            field("problems", "Problems"),
            field("tags", "Tags"),
        ],
    },
];

/// All allow-listed fields in display order, ignoring sections
pub fn all_fields() -> impl Iterator<Item = &'static FieldSpec> {
    DETAIL_SECTIONS.iter().flat_map(|section| section.fields.iter())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailField {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailSection {
    pub title: &'static str,
    pub fields: Vec<DetailField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reference {
    pub url: String,
    pub referenced: Option<String>,
}

/// Everything the detail pane shows for one plant
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailView {
    pub title: Option<String>,
    pub common_names: Option<String>,
    pub sections: Vec<DetailSection>,
    pub references: Vec<Reference>,
}

impl DetailView {
    pub fn project(record: &FullRecord) -> Self {
        let title = first_present(record, &["full-name", "fullName"]);
        let common_names = first_present(record, &["common-names", "commonNames"]);

        let sections = DETAIL_SECTIONS
            .iter()
            .map(|section| DetailSection {
                title: section.title,
                fields: project_fields(record, section.fields),
            })
            .filter(|section| !section.fields.is_empty())
            .collect();

        Self {
            title,
            common_names,
            sections,
            references: references(record),
        }
    }

    pub fn field_count(&self) -> usize {
        self.sections.iter().map(|s| s.fields.len()).sum()
    }
}

/// Labeled, formatted values for the fields present in `record`
pub fn project_fields<'a, I>(record: &FullRecord, fields: I) -> Vec<DetailField>
where
    I: IntoIterator<Item = &'a FieldSpec>,
{
    fields
        .into_iter()
        .filter_map(|spec| {
            let value = record.get(spec.key).and_then(format_value)?;
            Some(DetailField { label: spec.label, value })
        })
        .collect()
}

/// Display text for a value, or `None` when there is nothing to show
pub fn format_value(value: &Value) -> Option<String> {
    let text = match value {
        Value::Null => return None,
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(items) if items.is_empty() => return None,
        Value::Array(items) => items.iter().map(element_text).collect::<Vec<_>>().join(", "),
        Value::Object(map) if map.is_empty() => return None,
        Value::Object(_) => value.to_string(),
    };

    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

fn element_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

fn first_present(record: &FullRecord, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| record.get(*key).and_then(format_value))
}

fn references(record: &FullRecord) -> Vec<Reference> {
    let Some(Value::Array(items)) = record.get("references") else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            let url = item.get("url")?.as_str()?.trim();
            if url.is_empty() {
                return None;
            }
            let referenced = item
                .get("referenced")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string);
            Some(Reference { url: url.to_string(), referenced })
        })
        .collect()
}
