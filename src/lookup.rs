//! Bidirectional mapping between team abbreviations and the column indices
//! used by the win matrix and the bitset-based pick state.

use rustc_hash::FxHashMap;
use std::ops::Index;

use crate::domain::TeamSet;

/// Teams in sorted-abbreviation order, resolvable both ways. The ordering is
/// what makes candidate iteration and tie-breaking deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamLookup {
    abbr_to_index: FxHashMap<String, usize>,
    index_to_abbr: Vec<String>,
}
impl TeamLookup {
    /// Builds a lookup from an arbitrary collection of abbreviations,
    /// deduplicating and sorting lexicographically.
    pub fn from_unsorted<I, S>(abbrs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut index_to_abbr: Vec<String> = abbrs.into_iter().map(Into::into).collect();
        index_to_abbr.sort();
        index_to_abbr.dedup();

        let mut abbr_to_index =
            FxHashMap::with_capacity_and_hasher(index_to_abbr.len(), Default::default());
        for (index, abbr) in index_to_abbr.iter().enumerate() {
            abbr_to_index.insert(abbr.clone(), index);
        }
        Self {
            abbr_to_index,
            index_to_abbr,
        }
    }

    pub fn index_of(&self, abbr: &str) -> Option<usize> {
        self.abbr_to_index.get(abbr).copied()
    }

    pub fn abbr_at(&self, index: usize) -> Option<&str> {
        self.index_to_abbr.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.index_to_abbr.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index_to_abbr.is_empty()
    }

    pub fn abbrs(&self) -> &[String] {
        &self.index_to_abbr
    }

    /// Resolves abbreviations into a column bitset; unknown teams are
    /// silently ignored.
    pub fn set_of<'a>(&self, abbrs: impl IntoIterator<Item = &'a str>) -> TeamSet {
        abbrs
            .into_iter()
            .filter_map(|abbr| self.index_of(abbr))
            .collect()
    }
}

impl Index<usize> for TeamLookup {
    type Output = str;

    fn index(&self, index: usize) -> &Self::Output {
        self.abbr_at(index)
            .unwrap_or_else(|| panic!("no team at index {index}"))
    }
}
