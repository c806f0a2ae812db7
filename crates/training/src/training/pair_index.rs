//! Pair index over the unique-token table.
//!
//! Three co-maintained structures keyed by adjacent symbol-id pairs: the
//! pair frequency map (weighted by token multiplicity), and the pair->token
//! multiset that lets a merge enumerate affected tokens instead of scanning
//! the whole table. Keys are present iff their count is strictly positive;
//! the frequency map's key set gates membership in the pair queue.

use ahash::AHashMap;
use bytebpe_core::{BpeError, Pair, Result, SymbolId};
use std::hash::Hash;

/// Outcome of applying a frequency delta to one pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountChange {
    /// The pair was absent and is now present with this count
    Inserted(u64),
    /// The pair was present and now has this count
    Updated(u64),
    /// The delta drove the count to zero; the pair was removed
    Removed,
}

/// The training corpus representation: unique tokens with fixed
/// frequencies and evolving symbol vectors, plus the pair cross-indices.
#[derive(Debug, Default)]
pub struct PairIndex {
    /// Current symbol vector of each unique token
    tokens: Vec<Vec<SymbolId>>,
    /// Fixed multiplicity of each unique token
    token_freqs: Vec<u64>,
    /// Pair -> total adjacency count across the corpus
    pair_counts: AHashMap<Pair, u64>,
    /// Pair -> (token index -> occurrences in that token's current vector)
    pair_tokens: AHashMap<Pair, AHashMap<usize, i64>>,
}

impl PairIndex {
    /// Create a new empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new index with token capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            tokens: Vec::with_capacity(capacity),
            token_freqs: Vec::with_capacity(capacity),
            pair_counts: AHashMap::new(),
            pair_tokens: AHashMap::new(),
        }
    }

    /// Append a unique token and index its adjacent pairs.
    ///
    /// Returns the token's index in the unique-token table.
    pub fn insert_token(&mut self, symbols: Vec<SymbolId>, freq: u64) -> Result<usize> {
        let token_index = self.tokens.len();

        for window in symbols.windows(2) {
            let pair = (window[0], window[1]);
            *self.pair_counts.entry(pair).or_insert(0) += freq;
            self.add_occurrence(pair, token_index)?;
        }

        self.tokens.push(symbols);
        self.token_freqs.push(freq);

        Ok(token_index)
    }

    /// Number of unique tokens.
    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    /// Current symbol vector of a token.
    pub fn token(&self, index: usize) -> &[SymbolId] {
        &self.tokens[index]
    }

    /// Fixed multiplicity of a token.
    pub fn token_freq(&self, index: usize) -> u64 {
        self.token_freqs[index]
    }

    /// Replace a token's stored vector after a merge rewrote it.
    pub fn replace_token(&mut self, index: usize, symbols: Vec<SymbolId>) {
        self.tokens[index] = symbols;
    }

    /// The pair frequency map.
    pub fn pair_counts(&self) -> &AHashMap<Pair, u64> {
        &self.pair_counts
    }

    /// Indices of the tokens whose current vector contains `pair`.
    pub fn affected_tokens(&self, pair: Pair) -> Vec<usize> {
        self.pair_tokens
            .get(&pair)
            .map(|inner| inner.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Record one more occurrence of `pair` inside token `token_index`.
    pub fn add_occurrence(&mut self, pair: Pair, token_index: usize) -> Result<()> {
        let inner = self.pair_tokens.entry(pair).or_default();
        increment(inner, token_index, 1)?;
        Ok(())
    }

    /// Remove one occurrence of `pair` from token `token_index`.
    ///
    /// The occurrence must have been recorded; a missing entry means the
    /// cross-indices have diverged and is fatal.
    pub fn remove_occurrence(&mut self, pair: Pair, token_index: usize) -> Result<()> {
        let inner = self.pair_tokens.get_mut(&pair).ok_or_else(|| {
            BpeError::InvariantBroken(format!(
                "pair ({}, {}) missing from the token index",
                pair.0, pair.1
            ))
        })?;
        if !inner.contains_key(&token_index) {
            return Err(BpeError::InvariantBroken(format!(
                "token {} missing from the index of pair ({}, {})",
                token_index, pair.0, pair.1
            )));
        }

        increment(inner, token_index, -1)?;
        if inner.is_empty() {
            self.pair_tokens.remove(&pair);
        }

        Ok(())
    }

    /// Remove a pair from the frequency map, returning its count.
    pub fn remove_pair(&mut self, pair: Pair) -> Option<u64> {
        self.pair_counts.remove(&pair)
    }

    /// Apply a nonzero frequency delta to a pair.
    ///
    /// Inserting an absent pair requires a positive delta, and an existing
    /// count may not go negative; either case means the per-merge delta map
    /// disagrees with the index.
    pub fn apply_count_delta(&mut self, pair: Pair, delta: i64) -> Result<CountChange> {
        if delta == 0 {
            return Err(BpeError::InvalidArgument(
                "cannot apply a zero frequency delta".into(),
            ));
        }

        let Some(&current) = self.pair_counts.get(&pair) else {
            if delta < 0 {
                return Err(BpeError::InvariantBroken(format!(
                    "negative delta {} for absent pair ({}, {})",
                    delta, pair.0, pair.1
                )));
            }
            self.pair_counts.insert(pair, delta as u64);
            return Ok(CountChange::Inserted(delta as u64));
        };

        let next = current as i64 + delta;
        if next < 0 {
            return Err(BpeError::InvariantBroken(format!(
                "count of pair ({}, {}) would drop to {}",
                pair.0, pair.1, next
            )));
        }
        if next == 0 {
            self.pair_counts.remove(&pair);
            return Ok(CountChange::Removed);
        }

        self.pair_counts.insert(pair, next as u64);
        Ok(CountChange::Updated(next as u64))
    }

    /// Recompute the pair frequency map from the token vectors.
    ///
    /// Exhaustive and slow; used by tests to check that the incrementally
    /// maintained counts stay exact across merges.
    #[cfg(test)]
    pub(crate) fn recount(&self) -> AHashMap<Pair, u64> {
        let mut counts: AHashMap<Pair, u64> = AHashMap::new();
        for (symbols, &freq) in self.tokens.iter().zip(self.token_freqs.iter()) {
            for window in symbols.windows(2) {
                *counts.entry((window[0], window[1])).or_insert(0) += freq;
            }
        }
        counts
    }
}

/// Increment a counter entry, erasing it the moment it reaches zero.
///
/// A zero increment denotes programmer error.
pub(crate) fn increment<K>(counter: &mut AHashMap<K, i64>, key: K, value: i64) -> Result<()>
where
    K: Eq + Hash,
{
    if value == 0 {
        return Err(BpeError::InvalidArgument(
            "cannot increment a counter by zero".into(),
        ));
    }

    use std::collections::hash_map::Entry;
    match counter.entry(key) {
        Entry::Occupied(mut entry) => {
            *entry.get_mut() += value;
            if *entry.get() == 0 {
                entry.remove();
            }
        }
        Entry::Vacant(entry) => {
            entry.insert(value);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytebpe_core::{encoding::substitute_pair, Symbol, SymbolTable};

    fn abab_index() -> (SymbolTable, PairIndex) {
        let mut table = SymbolTable::new();
        table.push(Symbol::Internal(b'a')).unwrap();
        table.push(Symbol::Internal(b'b')).unwrap();
        table.push(Symbol::Final(b'b')).unwrap();

        let mut index = PairIndex::new();
        let symbols = table.base_symbols(b"abab").unwrap();
        index.insert_token(symbols, 2).unwrap();

        (table, index)
    }

    #[test]
    fn test_insert_token_counts_pairs() {
        let (_, index) = abab_index();

        // "abab" -> [0, 1, 0, 2] with freq 2
        assert_eq!(index.pair_counts()[&(0, 1)], 2);
        assert_eq!(index.pair_counts()[&(1, 0)], 2);
        assert_eq!(index.pair_counts()[&(0, 2)], 2);
        assert_eq!(index.pair_counts().len(), 3);
        assert_eq!(index.affected_tokens((0, 1)), vec![0]);
    }

    #[test]
    fn test_multiset_tracks_occurrences_not_multiplicity() {
        let mut index = PairIndex::new();
        // [7, 7, 7] holds the pair (7, 7) twice, with token freq 5
        index.insert_token(vec![7, 7, 7], 5).unwrap();

        assert_eq!(index.pair_counts()[&(7, 7)], 10);
        index.remove_occurrence((7, 7), 0).unwrap();
        assert_eq!(index.affected_tokens((7, 7)), vec![0]);
        index.remove_occurrence((7, 7), 0).unwrap();
        assert!(index.affected_tokens((7, 7)).is_empty());
    }

    #[test]
    fn test_remove_occurrence_missing_is_fatal() {
        let (_, mut index) = abab_index();

        let err = index.remove_occurrence((5, 6), 0).unwrap_err();
        assert!(matches!(err, BpeError::InvariantBroken(_)));

        let err = index.remove_occurrence((0, 1), 9).unwrap_err();
        assert!(matches!(err, BpeError::InvariantBroken(_)));
    }

    #[test]
    fn test_apply_count_delta() {
        let (_, mut index) = abab_index();

        assert_eq!(
            index.apply_count_delta((0, 1), -2).unwrap(),
            CountChange::Removed
        );
        assert_eq!(
            index.apply_count_delta((1, 0), 3).unwrap(),
            CountChange::Updated(5)
        );
        assert_eq!(
            index.apply_count_delta((9, 9), 4).unwrap(),
            CountChange::Inserted(4)
        );
        assert!(index.apply_count_delta((8, 8), 0).is_err());
        assert!(matches!(
            index.apply_count_delta((8, 8), -1).unwrap_err(),
            BpeError::InvariantBroken(_)
        ));
    }

    #[test]
    fn test_counts_stay_exact_across_a_merge() {
        let (_, mut index) = abab_index();

        // merge (1, 0) into symbol 3 by hand, the way the trainer does
        let old = index.token(0).to_vec();
        let new = substitute_pair(&old, (1, 0), 3);
        let freq = index.token_freq(0) as i64;

        let mut delta: AHashMap<Pair, i64> = AHashMap::new();
        for w in new.windows(2) {
            increment(&mut delta, (w[0], w[1]), freq).unwrap();
            index.add_occurrence((w[0], w[1]), 0).unwrap();
        }
        for w in old.windows(2) {
            increment(&mut delta, (w[0], w[1]), -freq).unwrap();
            index.remove_occurrence((w[0], w[1]), 0).unwrap();
        }
        index.replace_token(0, new);

        let count = index.remove_pair((1, 0)).unwrap();
        assert_eq!(delta.remove(&(1, 0)).unwrap() + count as i64, 0);

        for (pair, d) in delta {
            index.apply_count_delta(pair, d).unwrap();
        }

        assert_eq!(index.pair_counts(), &index.recount());
    }

    #[test]
    fn test_increment_erases_zeros() {
        let mut counter: AHashMap<u32, i64> = AHashMap::new();
        increment(&mut counter, 1, 2).unwrap();
        increment(&mut counter, 1, -2).unwrap();
        assert!(!counter.contains_key(&1));

        assert!(increment(&mut counter, 1, 0).is_err());
    }
}
