//! The high-level BPE object.
//!
//! `ByteBpe` owns a trained symbol table and ties together training,
//! persistence, and the encoder/decoder behind one surface.

use bytebpe_core::{encoding, BpeError, Result, SymbolId, SymbolTable};
use bytebpe_training::BpeTrainer;
use std::path::Path;

use crate::io;

/// A learned (or loaded) BPE vocabulary.
///
/// Created empty; populated by [`learn`](ByteBpe::learn) or
/// [`load`](ByteBpe::load); read-only thereafter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ByteBpe {
    table: SymbolTable,
}

impl ByteBpe {
    /// Create an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Train from scratch on the corpus at `path`, clearing any prior
    /// state.
    pub fn learn(&mut self, path: &Path, vocab_size: usize) -> Result<()> {
        self.table = BpeTrainer::new(vocab_size).train(path)?;
        Ok(())
    }

    /// Save the model to `path` in the line-oriented text format.
    pub fn save(&self, path: &Path) -> Result<()> {
        io::write_model(&self.table, path)
    }

    /// Load a previously saved model from `path`.
    ///
    /// Refuses to replace a non-empty model unless `overwrite` is set. A
    /// failed load leaves the current model untouched.
    pub fn load(&mut self, path: &Path, overwrite: bool) -> Result<()> {
        if !self.table.is_empty() && !overwrite {
            return Err(BpeError::OverwriteRefused);
        }
        self.table = io::read_model(path)?;
        Ok(())
    }

    /// Encode one token into symbol ids.
    pub fn encode_token(&self, token: &[u8]) -> Result<Vec<SymbolId>> {
        encoding::encode_token(&self.table, token)
    }

    /// Encode a space-separated line into symbol ids.
    pub fn encode_line(&self, line: &[u8]) -> Result<Vec<SymbolId>> {
        encoding::encode_line(&self.table, line)
    }

    /// Decode symbol ids back to bytes.
    pub fn decode(&self, ids: &[SymbolId]) -> Result<Vec<u8>> {
        encoding::decode(&self.table, ids)
    }

    /// Number of symbols in the vocabulary.
    pub fn vocab_size(&self) -> usize {
        self.table.len()
    }

    /// Check whether the model has been trained or loaded.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// The underlying symbol table.
    pub fn table(&self) -> &SymbolTable {
        &self.table
    }
}
