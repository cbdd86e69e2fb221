//! Facet Filter Engine
//!
//! Four multi-select facets (type, zone, light, maintenance) plus the
//! problem-plant toggle. A plant passes a facet when at least one of its
//! values is selected; a plant with no values for a facet never passes it,
//! and an empty selection passes nothing. "All" is the concrete universe
//! captured at load time, not a wildcard.
//!
//! Problem plants use the include toggle: on, every plant passes; off, only
//! plants with no listed problems pass.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::schema::{LightDataset, LightRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facet {
    Type,
    Zone,
    Light,
    Maintenance,
}

impl Facet {
    pub const ALL: [Facet; 4] = [Facet::Type, Facet::Zone, Facet::Light, Facet::Maintenance];

    pub fn label(self) -> &'static str {
        match self {
            Facet::Type => "Plant Type",
            Facet::Zone => "Hardiness Zone",
            Facet::Light => "Light",
            Facet::Maintenance => "Maintenance",
        }
    }

    /// The record's values for this facet
    pub fn values(self, record: &LightRecord) -> &[String] {
        match self {
            Facet::Type => &record.plant_types,
            Facet::Zone => &record.hardiness_zones,
            Facet::Light => &record.light,
            Facet::Maintenance => &record.maintenance,
        }
    }

    pub fn compare(self, a: &str, b: &str) -> Ordering {
        match self {
            Facet::Type => compare_types(a, b),
            Facet::Zone => compare_zones(a, b),
            Facet::Light => compare_light(a, b),
            Facet::Maintenance => compare_maintenance(a, b),
        }
    }

    /// Stable sort in this facet's display order
    pub fn sort(self, values: &mut [String]) {
        values.sort_by(|a, b| self.compare(a, b));
    }
}

// ============================================================================
// Sort orders
// ============================================================================

/// Parse `<integer><optional single letter>`, e.g. "7b" -> (7, Some('b'))
pub fn parse_zone(zone: &str) -> Option<(u32, Option<char>)> {
    let zone = zone.trim();
    let digits_end = zone
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(zone.len());
    if digits_end == 0 {
        return None;
    }
    let number = zone[..digits_end].parse().ok()?;

    let mut rest = zone[digits_end..].chars();
    match (rest.next(), rest.next()) {
        (None, _) => Some((number, None)),
        (Some(letter), None) if letter.is_ascii_alphabetic() => {
            Some((number, Some(letter.to_ascii_lowercase())))
        }
        _ => None,
    }
}

/// Ascending by number, then letter; unparseable zones sort last and keep
/// their relative order.
pub fn compare_zones(a: &str, b: &str) -> Ordering {
    match (parse_zone(a), parse_zone(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Known light phrases, short form and the dataset's descriptive form
static LIGHT_RANKS: &[(&str, u8)] = &[
    ("full sun", 0),
    ("full sun (6 or more hours of direct sunlight a day)", 0),
    ("partial shade", 1),
    ("partial shade (direct sunlight only part of the day, 2-6 hours)", 1),
    ("dappled", 2),
    ("dappled shade", 2),
    ("dappled sunlight", 2),
    ("dappled sunlight (shade through upper canopy all day)", 2),
    ("deep shade", 3),
    ("deep shade (less than 2 hours to no direct sunlight)", 3),
];

static MAINTENANCE_RANKS: &[(&str, u8)] = &[("low", 0), ("medium", 1), ("high", 2)];

fn rank(table: &[(&str, u8)], value: &str) -> Option<u8> {
    let lowered = value.trim().to_lowercase();
    table
        .iter()
        .find(|(phrase, _)| *phrase == lowered)
        .map(|(_, rank)| *rank)
}

fn compare_ranked(table: &[(&str, u8)], a: &str, b: &str) -> Ordering {
    match (rank(table, a), rank(table, b)) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

pub fn compare_light(a: &str, b: &str) -> Ordering {
    compare_ranked(LIGHT_RANKS, a, b)
}

pub fn compare_maintenance(a: &str, b: &str) -> Ordering {
    compare_ranked(MAINTENANCE_RANKS, a, b)
}

/// Case-insensitive alphabetical, ties broken case-sensitively
pub fn compare_types(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

// ============================================================================
// Universes
// ============================================================================

/// Every value seen per facet across the dataset, in display order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FacetUniverse {
    pub types: Vec<String>,
    pub zones: Vec<String>,
    pub light: Vec<String>,
    pub maintenance: Vec<String>,
    /// Not a selectable facet; listed for display
    pub problems: Vec<String>,
}

impl FacetUniverse {
    pub fn from_dataset(dataset: &LightDataset) -> Self {
        let records = || dataset.entries().iter().map(|e| &e.record);

        let sorted_values = |facet: Facet| {
            let mut values = distinct(records().flat_map(|r| facet.values(r)));
            facet.sort(&mut values);
            values
        };

        let mut problems = distinct(records().flat_map(|r| r.problems.iter()));
        problems.sort();

        Self {
            types: sorted_values(Facet::Type),
            zones: sorted_values(Facet::Zone),
            light: sorted_values(Facet::Light),
            maintenance: sorted_values(Facet::Maintenance),
            problems,
        }
    }

    pub fn values(&self, facet: Facet) -> &[String] {
        match facet {
            Facet::Type => &self.types,
            Facet::Zone => &self.zones,
            Facet::Light => &self.light,
            Facet::Maintenance => &self.maintenance,
        }
    }
}

/// Distinct values in first-seen order
fn distinct<'a>(values: impl Iterator<Item = &'a String>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut out = Vec::new();
    for value in values {
        if seen.insert(value.as_str()) {
            out.push(value.clone());
        }
    }
    out
}

// ============================================================================
// Selection
// ============================================================================

/// Currently selected values per facet, plus the problem-plant toggle
///
/// Operations return a new selection; the original is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetSelection {
    types: BTreeSet<String>,
    zones: BTreeSet<String>,
    light: BTreeSet<String>,
    maintenance: BTreeSet<String>,
    /// Facets with no values anywhere in the dataset; they never filter
    unrestricted: BTreeSet<Facet>,
    include_problem_plants: bool,
}

impl FacetSelection {
    /// Everything in the universe selected, problem plants included
    pub fn all(universe: &FacetUniverse) -> Self {
        let set = |facet: Facet| -> BTreeSet<String> { universe.values(facet).iter().cloned().collect() };
        Self {
            types: set(Facet::Type),
            zones: set(Facet::Zone),
            light: set(Facet::Light),
            maintenance: set(Facet::Maintenance),
            unrestricted: Facet::ALL
                .into_iter()
                .filter(|&facet| universe.values(facet).is_empty())
                .collect(),
            include_problem_plants: true,
        }
    }

    pub fn selected(&self, facet: Facet) -> &BTreeSet<String> {
        match facet {
            Facet::Type => &self.types,
            Facet::Zone => &self.zones,
            Facet::Light => &self.light,
            Facet::Maintenance => &self.maintenance,
        }
    }

    fn selected_mut(&mut self, facet: Facet) -> &mut BTreeSet<String> {
        match facet {
            Facet::Type => &mut self.types,
            Facet::Zone => &mut self.zones,
            Facet::Light => &mut self.light,
            Facet::Maintenance => &mut self.maintenance,
        }
    }

    pub fn include_problem_plants(&self) -> bool {
        self.include_problem_plants
    }

    pub fn toggled(&self, facet: Facet, value: &str) -> Self {
        let mut next = self.clone();
        let set = next.selected_mut(facet);
        if !set.remove(value) {
            set.insert(value.to_string());
        }
        next
    }

    pub fn with_all(&self, facet: Facet, universe: &FacetUniverse) -> Self {
        self.with_values(facet, universe.values(facet).iter().cloned())
    }

    pub fn cleared(&self, facet: Facet) -> Self {
        self.with_values(facet, std::iter::empty())
    }

    pub fn with_values<I>(&self, facet: Facet, values: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut next = self.clone();
        *next.selected_mut(facet) = values.into_iter().collect();
        next
    }

    pub fn with_problem_plants(&self, include: bool) -> Self {
        Self { include_problem_plants: include, ..self.clone() }
    }

    pub fn facet_matches(&self, facet: Facet, record: &LightRecord) -> bool {
        if self.unrestricted.contains(&facet) {
            return true;
        }
        let selected = self.selected(facet);
        !selected.is_empty() && facet.values(record).iter().any(|v| selected.contains(v))
    }

    pub fn problems_pass(&self, record: &LightRecord) -> bool {
        self.include_problem_plants || !record.has_problems()
    }

    /// Conjunction of every facet predicate and the problem policy
    pub fn matches(&self, record: &LightRecord) -> bool {
        Facet::ALL.iter().all(|&facet| self.facet_matches(facet, record)) && self.problems_pass(record)
    }
}
