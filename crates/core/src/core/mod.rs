//! Core BPE data structures.

pub mod priority;
pub mod symbol;

pub use priority::{PairCandidate, PairQueue};
pub use symbol::{Pair, Symbol, SymbolId, SymbolTable};
