//! Loading saved models.

use bytebpe_core::{BpeError, Result, Symbol, SymbolId, SymbolTable};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Parse a saved model into a fresh symbol table.
///
/// Each line must hold either `<byte> <type>` with type 0 or 1, or
/// `<left> <right> 2` where both ids are strictly less than the id of the
/// line being parsed. Anything else is a malformed file. The returned
/// table has its reverse mapping and rendered strings rebuilt.
pub fn read_model(path: &Path) -> Result<SymbolTable> {
    let file = File::open(path).map_err(|source| BpeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);

    let mut table = SymbolTable::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| BpeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let symbol = parse_record(&line, table.len() as SymbolId, index + 1)?;
        table.push(symbol)?;
    }

    Ok(table)
}

fn parse_record(line: &str, id: SymbolId, line_number: usize) -> Result<Symbol> {
    let malformed = |reason: String| BpeError::MalformedModel {
        line: line_number,
        reason,
    };

    let fields: Vec<&str> = line.split_whitespace().collect();
    match fields.as_slice() {
        [value, kind] => {
            let byte: u8 = value
                .parse()
                .map_err(|_| malformed(format!("invalid byte value '{}'", value)))?;
            match *kind {
                "0" => Ok(Symbol::Internal(byte)),
                "1" => Ok(Symbol::Final(byte)),
                other => Err(malformed(format!("invalid type code '{}'", other))),
            }
        }
        [left, right, kind] => {
            if *kind != "2" {
                return Err(malformed(format!("invalid type code '{}'", kind)));
            }
            let left: SymbolId = left
                .parse()
                .map_err(|_| malformed(format!("invalid symbol id '{}'", left)))?;
            let right: SymbolId = right
                .parse()
                .map_err(|_| malformed(format!("invalid symbol id '{}'", right)))?;
            if left >= id || right >= id {
                return Err(malformed(format!(
                    "pair ({}, {}) references an id not defined before symbol {}",
                    left, right, id
                )));
            }
            Ok(Symbol::Pair(left, right))
        }
        _ => Err(malformed(format!(
            "expected 2 or 3 fields, found {}",
            fields.len()
        ))),
    }
}
