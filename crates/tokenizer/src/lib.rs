//! Bytebpe - whitespace-token byte-pair encoding
//!
//! Learns a subword vocabulary over whitespace-separated tokens, persists
//! it in a line-oriented text format, and applies it to new input.
//!
//! # Example
//!
//! ```rust,ignore
//! use bytebpe::ByteBpe;
//!
//! let mut model = ByteBpe::new();
//! model.learn("corpus.txt".as_ref(), 320)?;
//! model.save("model.bpe".as_ref())?;
//!
//! let ids = model.encode_line(b"some input")?;
//! let bytes = model.decode(&ids)?;
//! ```

pub use bytebpe_core::{BpeError, Result, Symbol, SymbolId, SymbolTable};

pub mod io;

pub mod tokenizer;
pub use tokenizer::ByteBpe;
