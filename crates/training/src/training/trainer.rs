//! The BPE merge loop.
//!
//! Training pops the most frequent adjacent pair, appends a new symbol for
//! it, rewrites every affected token, and feeds the resulting frequency
//! deltas back into the pair index and the queue, keeping the selection
//! exact for the next iteration.

use crate::training::corpus::scan_corpus;
use crate::training::pair_index::{increment, CountChange, PairIndex};
use crate::training::phase_bar;
use ahash::AHashMap;
use bytebpe_core::{
    encoding::substitute_pair, BpeError, Pair, PairCandidate, PairQueue, Result, Symbol,
    SymbolTable,
};
use std::path::Path;

/// BPE trainer.
///
/// Learns a symbol table from a corpus by iteratively merging the most
/// frequent adjacent symbol pair until the table reaches the target
/// vocabulary size or no pair is left.
#[derive(Debug, Clone)]
pub struct BpeTrainer {
    /// Target vocabulary size, base symbols included
    vocab_size: usize,
}

impl BpeTrainer {
    /// Create a trainer with the given target vocabulary size.
    pub fn new(vocab_size: usize) -> Self {
        Self { vocab_size }
    }

    /// Train a symbol table from the corpus at `path`.
    ///
    /// When the target size is at or below the base vocabulary size the
    /// table holds exactly the base symbols; when the corpus runs out of
    /// pairs early the table stops short of the target. Neither is an
    /// error.
    pub fn train(&self, path: &Path) -> Result<SymbolTable> {
        self.train_with(path, |_| ())
    }

    /// Training loop with a hook invoked after every merge, over the index
    /// that merge just updated.
    fn train_with(
        &self,
        path: &Path,
        mut after_merge: impl FnMut(&PairIndex),
    ) -> Result<SymbolTable> {
        let stats = scan_corpus(path)?;

        let mut table = SymbolTable::with_capacity(self.vocab_size);
        for &byte in &stats.internal_bytes {
            table.push(Symbol::Internal(byte))?;
        }
        for &byte in &stats.final_bytes {
            table.push(Symbol::Final(byte))?;
        }

        let bar = phase_bar(stats.token_counts.len() as u64, "indexing byte pairs");
        let mut index = PairIndex::with_capacity(stats.token_counts.len());
        for (token, &freq) in &stats.token_counts {
            index.insert_token(table.base_symbols(token)?, freq)?;
            bar.inc(1);
        }
        bar.finish();

        let bar = phase_bar(index.pair_counts().len() as u64, "building heap");
        let mut queue = PairQueue::with_capacity(index.pair_counts().len());
        for (&pair, &count) in index.pair_counts() {
            queue.push(pair, count);
            bar.inc(1);
        }
        bar.finish();

        let base_size = table.len();
        let bar = phase_bar(
            self.vocab_size.saturating_sub(base_size) as u64,
            "creating new symbols",
        );
        while table.len() < self.vocab_size {
            let Some(candidate) = queue.pop() else {
                break;
            };
            merge(&mut table, &mut index, &mut queue, candidate)?;
            after_merge(&index);
            bar.inc(1);
        }
        bar.finish();

        Ok(table)
    }
}

/// Apply one merge: allocate the new symbol, rewrite affected tokens, and
/// propagate the frequency deltas to the index and the queue.
fn merge(
    table: &mut SymbolTable,
    index: &mut PairIndex,
    queue: &mut PairQueue,
    candidate: PairCandidate,
) -> Result<()> {
    let pair = candidate.pair;
    let new_symbol = table.push(Symbol::Pair(pair.0, pair.1))?;

    let mut delta: AHashMap<Pair, i64> = AHashMap::new();
    for token_index in index.affected_tokens(pair) {
        let freq = index.token_freq(token_index) as i64;
        let old = index.token(token_index).to_vec();
        let new = substitute_pair(&old, pair, new_symbol);

        for window in new.windows(2) {
            let new_pair = (window[0], window[1]);
            increment(&mut delta, new_pair, freq)?;
            index.add_occurrence(new_pair, token_index)?;
        }
        for window in old.windows(2) {
            let old_pair = (window[0], window[1]);
            increment(&mut delta, old_pair, -freq)?;
            index.remove_occurrence(old_pair, token_index)?;
        }

        index.replace_token(token_index, new);
    }

    // The merged pair vanishes from every affected token, so its delta must
    // cancel its count exactly; it leaves both the map and the queue.
    let pair_delta = delta.remove(&pair).unwrap_or(0);
    let pair_count = index.remove_pair(pair).unwrap_or(0);
    if pair_delta + pair_count as i64 != 0 {
        return Err(BpeError::InvariantBroken(format!(
            "merged pair ({}, {}) has residual count {} after delta {}",
            pair.0, pair.1, pair_count, pair_delta
        )));
    }

    for (changed, change) in delta {
        match index.apply_count_delta(changed, change)? {
            CountChange::Inserted(count) => queue.push(changed, count),
            CountChange::Updated(count) => queue.update(changed, count),
            CountChange::Removed => queue.remove(changed),
        }
    }

    Ok(())
}
