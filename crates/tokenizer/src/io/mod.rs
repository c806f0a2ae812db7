//! Model-file persistence.
//!
//! The on-disk format is line-oriented text, one symbol per line in id
//! order, forward-compatible only by appending new type codes.

pub mod load;
pub mod save;

pub use load::read_model;
pub use save::write_model;

#[cfg(test)]
mod tests {
    use super::*;
    use bytebpe_core::{Symbol, SymbolTable};

    #[test]
    fn test_save_load_round_trip() {
        let mut table = SymbolTable::new();
        table.push(Symbol::Internal(b'a')).unwrap();
        table.push(Symbol::Internal(b'b')).unwrap();
        table.push(Symbol::Final(b'b')).unwrap();
        table.push(Symbol::Pair(1, 0)).unwrap();
        table.push(Symbol::Pair(3, 2)).unwrap();

        let path = std::env::temp_dir().join("bytebpe_io_roundtrip.bpe");
        write_model(&table, &path).unwrap();
        let loaded = read_model(&path).unwrap();

        // element-wise equality covers symbols, reverse map, and rendered
        // strings, since SymbolTable compares all three
        assert_eq!(loaded, table);
        std::fs::remove_file(path).ok();
    }
}
