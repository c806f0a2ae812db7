//! Saving trained models.

use bytebpe_core::{BpeError, Result, Symbol, SymbolTable};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write a symbol table as one line per symbol, in id order.
///
/// Atomic symbols serialise as `<byte> <type>` with type 0 for internal and 1
/// for final; pairs as `<left> <right> 2`. Fields are space-separated
/// decimal integers and every record ends with a newline.
pub fn write_model(table: &SymbolTable, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|source| BpeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);

    for symbol in table.iter() {
        let record = match symbol {
            Symbol::Internal(byte) => writeln!(writer, "{} 0", byte),
            Symbol::Final(byte) => writeln!(writer, "{} 1", byte),
            Symbol::Pair(left, right) => writeln!(writer, "{} {} 2", left, right),
        };
        record.map_err(|source| BpeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    }

    writer.flush().map_err(|source| BpeError::Io {
        path: path.to_path_buf(),
        source,
    })
}
