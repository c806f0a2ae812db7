//! Bytebpe-training - BPE training infrastructure
//!
//! This crate learns a symbol table from a corpus of whitespace-separated
//! byte tokens: it ingests the corpus, builds the pair cross-indices, and
//! runs the priority-driven merge loop.
//!
//! # Example
//!
//! ```rust,ignore
//! use bytebpe_training::BpeTrainer;
//!
//! let table = BpeTrainer::new(320).train("path/to/corpus.txt".as_ref())?;
//! ```

pub use bytebpe_core::{BpeError, Result};

pub mod training;
pub use training::{count_lines, scan_corpus, BpeTrainer, CorpusStats, PairIndex};
