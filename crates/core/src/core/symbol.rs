//! Symbol table storage and lookup.
//!
//! This module provides the append-only symbol table that backs both training
//! and inference, together with its reverse mapping and the pre-rendered byte
//! strings used by the decoder.

use crate::error::{BpeError, Result};
use ahash::AHashMap;

/// Identifier of a symbol; its index in the table.
pub type SymbolId = u32;

/// An ordered adjacency of two symbol ids within a token's symbol vector.
pub type Pair = (SymbolId, SymbolId);

/// A vocabulary entry.
///
/// Atomic bytes are split into two disjoint namespaces depending on whether
/// the byte occurs before the end of a token or as its last byte; the same
/// byte value may therefore hold two distinct ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    /// An atomic byte occurring strictly before the last byte of a token
    Internal(u8),
    /// An atomic byte occurring as the last byte of a token
    Final(u8),
    /// The in-order concatenation of two earlier symbols
    Pair(SymbolId, SymbolId),
}

/// Append-only indexed list of symbols.
///
/// The index of a symbol is its id. Entries are immutable once written; the
/// table grows only by appending. The reverse mapping and the rendered byte
/// strings are maintained on every append, so they are always consistent
/// with the table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolTable {
    /// Symbols in id order
    symbols: Vec<Symbol>,
    /// Reverse mapping: symbol -> smallest id carrying it
    reverse: AHashMap<Symbol, SymbolId>,
    /// Decoded byte string of each symbol, computed bottom-up
    rendered: Vec<Vec<u8>>,
}

impl SymbolTable {
    /// Create a new empty symbol table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new symbol table with capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            symbols: Vec::with_capacity(capacity),
            reverse: AHashMap::with_capacity(capacity),
            rendered: Vec::with_capacity(capacity),
        }
    }

    /// Append a symbol and return its id.
    ///
    /// A `Pair` symbol must reference ids strictly below the id being
    /// assigned; the table stays acyclic and topologically ordered by
    /// construction.
    pub fn push(&mut self, symbol: Symbol) -> Result<SymbolId> {
        let id = self.symbols.len() as SymbolId;

        let rendered = match symbol {
            Symbol::Internal(byte) => vec![byte],
            Symbol::Final(byte) => vec![byte, b' '],
            Symbol::Pair(left, right) => {
                if left >= id || right >= id {
                    return Err(BpeError::InvalidArgument(format!(
                        "pair symbol {} references undefined id ({}, {})",
                        id, left, right
                    )));
                }
                let mut text = self.rendered[left as usize].clone();
                text.extend_from_slice(&self.rendered[right as usize]);
                text
            }
        };

        self.symbols.push(symbol);
        self.rendered.push(rendered);
        // Duplicate values (possible in loaded files) keep the smallest id.
        self.reverse.entry(symbol).or_insert(id);

        Ok(id)
    }

    /// Get the id of a symbol, if present.
    ///
    /// When the same symbol value occurs at several ids, the smallest id is
    /// returned.
    #[inline]
    pub fn lookup(&self, symbol: Symbol) -> Option<SymbolId> {
        self.reverse.get(&symbol).copied()
    }

    /// Get the symbol stored at an id.
    #[inline]
    pub fn get(&self, id: SymbolId) -> Option<Symbol> {
        self.symbols.get(id as usize).copied()
    }

    /// Get the decoded byte string of a symbol.
    #[inline]
    pub fn rendered(&self, id: SymbolId) -> Option<&[u8]> {
        self.rendered.get(id as usize).map(|text| text.as_slice())
    }

    /// Iterate over the symbols in id order.
    pub fn iter(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.symbols.iter().copied()
    }

    /// Get the number of symbols.
    #[inline]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Check if the table is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Build the base symbol vector of a raw token.
    ///
    /// All bytes except the last map to their `Internal` symbol, the last
    /// byte to its `Final` symbol. A byte absent from the table was never
    /// seen during training and is surfaced as [`BpeError::UnknownByte`].
    /// The empty token has an empty vector.
    pub fn base_symbols(&self, token: &[u8]) -> Result<Vec<SymbolId>> {
        let Some((&last, body)) = token.split_last() else {
            return Ok(Vec::new());
        };

        let mut symbols = Vec::with_capacity(token.len());
        for &byte in body {
            symbols.push(
                self.lookup(Symbol::Internal(byte))
                    .ok_or(BpeError::UnknownByte(byte))?,
            );
        }
        symbols.push(
            self.lookup(Symbol::Final(last))
                .ok_or(BpeError::UnknownByte(last))?,
        );

        Ok(symbols)
    }
}
