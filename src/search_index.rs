//! FST-based Search Index for Plant Lookup
//!
//! Forward (prefix) tokenized inverted index over one searchable text blob
//! per plant. Every distinct token is a key in an `fst::Map` whose value
//! points into a postings table of dataset positions, so a query token
//! expands to all indexed tokens it prefixes with a single automaton walk.
//!
//! Tokens are lowercase runs of alphanumeric characters; blobs and queries go
//! through the same tokenizer. A multi-word query matches plants that have a
//! prefix hit for every query token.

use std::time::Instant;

use fst::automaton::Str;
use fst::{Automaton, IntoStreamer, Map, MapBuilder, Streamer};
use rustc_hash::FxHashSet;
use serde::Serialize;
use smallvec::SmallVec;

use crate::schema::{LightDataset, LightRecord};

/// Result of a text query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchMatch {
    /// No text filter (absent, empty, or whitespace-only query)
    All,
    /// Dataset positions of the plants that matched
    Only(FxHashSet<usize>),
}

impl SearchMatch {
    pub fn contains(&self, pos: usize) -> bool {
        match self {
            SearchMatch::All => true,
            SearchMatch::Only(hits) => hits.contains(&pos),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, SearchMatch::All)
    }
}

/// Prefix search index, built once per dataset
pub struct SearchIndex {
    /// FST mapping token -> offset into `postings`
    fst_map: Map<Vec<u8>>,
    /// Ascending dataset positions per token
    postings: Vec<Vec<u32>>,
    plant_count: usize,
    fst_size: usize,
}

impl SearchIndex {
    pub fn build(dataset: &LightDataset) -> Result<Self, fst::Error> {
        tracing::info!("Building FST search index...");
        let start = Instant::now();

        let mut search_terms: Vec<(String, u32)> = Vec::new(); // (token, position)
        for (pos, entry) in dataset.entries().iter().enumerate() {
            let blob = searchable_text(&entry.key, &entry.record);
            for token in tokenize(&blob) {
                search_terms.push((token, pos as u32));
            }
        }

        // FST keys must be inserted in lexicographic order; sorting the
        // pairs also leaves each token's positions ascending.
        search_terms.sort_unstable();
        search_terms.dedup();

        let mut builder = MapBuilder::memory();
        let mut postings: Vec<Vec<u32>> = Vec::new();
        let mut last_term: Option<String> = None;
        for (term, pos) in search_terms {
            if last_term.as_deref() == Some(term.as_str()) {
                if let Some(list) = postings.last_mut() {
                    list.push(pos);
                }
                continue;
            }
            builder.insert(term.as_bytes(), postings.len() as u64)?;
            postings.push(vec![pos]);
            last_term = Some(term);
        }

        let fst_bytes = builder.into_inner()?;
        let fst_size = fst_bytes.len();
        let fst_map = Map::new(fst_bytes)?;

        tracing::info!(
            "FST search index built in {:?} ({} plants, {} unique tokens, {} bytes)",
            start.elapsed(),
            dataset.len(),
            postings.len(),
            fst_size
        );

        Ok(Self {
            fst_map,
            postings,
            plant_count: dataset.len(),
            fst_size,
        })
    }

    /// Prefix search over all query tokens (AND across tokens)
    pub fn search(&self, query: Option<&str>) -> SearchMatch {
        let Some(q) = query.filter(|q| !q.trim().is_empty()) else {
            return SearchMatch::All;
        };
        let tokens: SmallVec<[String; 4]> = tokenize(q).collect();
        if tokens.is_empty() {
            tracing::debug!("Search {:?} has no indexable tokens", q);
            return SearchMatch::Only(FxHashSet::default());
        }

        let mut result: Option<FxHashSet<usize>> = None;
        for token in &tokens {
            let hits = self.prefix_hits(token);
            let narrowed = match result {
                None => hits,
                Some(prev) => prev.into_iter().filter(|pos| hits.contains(pos)).collect(),
            };
            if narrowed.is_empty() {
                tracing::debug!("Search {:?}: token {:?} eliminated all plants", query, token);
                return SearchMatch::Only(narrowed);
            }
            result = Some(narrowed);
        }

        SearchMatch::Only(result.unwrap_or_default())
    }

    /// Union of postings for every indexed token starting with `prefix`
    fn prefix_hits(&self, prefix: &str) -> FxHashSet<usize> {
        let automaton = Str::new(prefix).starts_with();
        let mut stream = self.fst_map.search(automaton).into_stream();

        let mut hits = FxHashSet::default();
        while let Some((_term, offset)) = stream.next() {
            if let Some(list) = self.postings.get(offset as usize) {
                hits.extend(list.iter().map(|&pos| pos as usize));
            }
        }
        hits
    }

    pub fn stats(&self) -> SearchIndexStats {
        SearchIndexStats {
            plant_count: self.plant_count,
            term_count: self.postings.len(),
            fst_bytes: self.fst_size,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchIndexStats {
    pub plant_count: usize,
    pub term_count: usize,
    pub fst_bytes: usize,
}

/// The text a plant is searchable by: key, names, and every descriptive
/// list field, blank values skipped, joined by single spaces.
pub fn searchable_text(key: &str, record: &LightRecord) -> String {
    let scalars = [
        Some(key),
        record.full_name.as_deref(),
        record.genus.as_deref(),
        record.species.as_deref(),
    ];
    let lists = [
        &record.common_names,
        &record.cultivars,
        &record.tags,
        &record.soil_texture,
        &record.soil_ph,
        &record.soil_drainage,
        &record.problems,
        &record.attracts,
        &record.resistances,
        &record.additional_value,
    ];

    scalars
        .into_iter()
        .flatten()
        .chain(lists.into_iter().flatten().map(String::as_str))
        .filter(|s| !s.trim().is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lowercase, then split on anything that is not alphanumeric
pub fn tokenize(text: &str) -> impl Iterator<Item = String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect::<Vec<_>>()
        .into_iter()
}
