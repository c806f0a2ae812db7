//! Bytebpe-core - Core BPE data structures and algorithms
//!
//! This crate provides the fundamental pieces of byte-pair encoding over
//! whitespace-separated tokens: the append-only symbol table with its
//! reverse mapping and pre-rendered byte strings, the frequency-keyed pair
//! queue used during training, and the inference encoder and decoder.
//!
//! # Example
//!
//! ```rust
//! use bytebpe_core::{Symbol, SymbolTable};
//!
//! let mut table = SymbolTable::new();
//! table.push(Symbol::Internal(b'a')).unwrap();
//! table.push(Symbol::Final(b'b')).unwrap();
//! table.push(Symbol::Pair(0, 1)).unwrap();
//!
//! assert_eq!(table.rendered(2), Some(&b"ab "[..]));
//! ```

pub mod error;
pub use error::{BpeError, Result};

pub mod core;
pub use core::{Pair, PairCandidate, PairQueue, Symbol, SymbolId, SymbolTable};

pub mod encoding;
pub use encoding::{decode, encode_line, encode_token, substitute_pair};
