use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Inverted index over holding names: lowercase word to the ordered list
/// of positions (into the store's holding list) whose names contain it.
///
/// Insertion is incremental. Removal rebuilds every token list so that
/// positions past the removed one shift down by one; that walk is
/// O(index size), a known limitation we accept at the holding counts a
/// single investor reaches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordIndex {
    entries: HashMap<String, Vec<usize>>,
}

impl KeywordIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Split a name into index tokens: whitespace-delimited, lowercased.
    pub fn tokenize(name: &str) -> impl Iterator<Item = String> + '_ {
        name.split_whitespace().map(str::to_lowercase)
    }

    /// Record that the holding at `position` carries `name`.
    pub fn insert(&mut self, name: &str, position: usize) {
        for token in Self::tokenize(name) {
            self.entries.entry(token).or_default().push(position);
        }
    }

    /// Drop `position` from every token list and shift every position past
    /// it down by one. Tokens left with no positions are deleted outright,
    /// so the index never answers with a stale or out-of-range position.
    pub fn remove(&mut self, position: usize) {
        let mut rebuilt = HashMap::with_capacity(self.entries.len());
        for (token, positions) in self.entries.drain() {
            let updated: Vec<usize> = positions
                .into_iter()
                .filter(|&p| p != position)
                .map(|p| if p > position { p - 1 } else { p })
                .collect();
            if !updated.is_empty() {
                rebuilt.insert(token, updated);
            }
        }
        self.entries = rebuilt;
    }

    /// Positions recorded for a single token. An unknown token yields an
    /// empty slice, not a failure.
    #[must_use]
    pub fn positions(&self, token: &str) -> &[usize] {
        self.entries
            .get(&token.to_lowercase())
            .map_or(&[], Vec::as_slice)
    }

    /// Positions of holdings whose names contain every token of
    /// `keywords`: the first token's list intersected with each further
    /// token's list. A token absent from the index contributes the empty
    /// set, so the whole result is empty. Returned in ascending store
    /// order, deduplicated.
    #[must_use]
    pub fn matching_positions(&self, keywords: &str) -> Vec<usize> {
        let mut result: Option<Vec<usize>> = None;
        for token in Self::tokenize(keywords) {
            // Explicit empty list for unknown tokens.
            let list = self.entries.get(&token).cloned().unwrap_or_default();
            result = Some(match result {
                None => list,
                Some(current) => current.into_iter().filter(|p| list.contains(p)).collect(),
            });
        }

        let mut positions = result.unwrap_or_default();
        positions.sort_unstable();
        positions.dedup();
        positions
    }

    /// Whether the token appears in any indexed name.
    #[must_use]
    pub fn contains(&self, token: &str) -> bool {
        self.entries.contains_key(&token.to_lowercase())
    }

    /// Number of distinct tokens indexed.
    #[must_use]
    pub fn token_count(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(token, positions)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[usize])> {
        self.entries
            .iter()
            .map(|(token, positions)| (token.as_str(), positions.as_slice()))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
