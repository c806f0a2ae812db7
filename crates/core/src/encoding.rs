//! Applying a trained symbol table to new input.
//!
//! Encoding replays the learned merges in training order: within a token,
//! the known pair with the smallest symbol id (the merge learned earliest)
//! is substituted first. Decoding concatenates the table's pre-rendered
//! byte strings.

use crate::core::symbol::{Pair, Symbol, SymbolId, SymbolTable};
use crate::error::{BpeError, Result};

/// Replace every non-overlapping occurrence of `pair` with `replacement`.
///
/// Occurrences are consumed greedily left to right: after a match the scan
/// resumes past both elements, so `l r r` becomes `s r` and `l l r` becomes
/// `l s`. Vectors of length 1 come back unchanged.
pub fn substitute_pair(symbols: &[SymbolId], pair: Pair, replacement: SymbolId) -> Vec<SymbolId> {
    let mut out = Vec::with_capacity(symbols.len());
    let mut i = 0;

    while i < symbols.len() {
        if i + 1 < symbols.len() && (symbols[i], symbols[i + 1]) == pair {
            out.push(replacement);
            i += 2;
        } else {
            out.push(symbols[i]);
            i += 1;
        }
    }

    out
}

/// Encode a single token into symbol ids.
///
/// The base vector maps every byte except the last to its `Internal` symbol
/// and the last byte to its `Final` symbol; merges are then applied in
/// training order until none is applicable or the vector has collapsed to a
/// single symbol. Bytes unseen during training surface as
/// [`BpeError::UnknownByte`]. The empty token encodes to an empty vector.
pub fn encode_token(table: &SymbolTable, token: &[u8]) -> Result<Vec<SymbolId>> {
    let mut symbols = table.base_symbols(token)?;

    while symbols.len() > 1 {
        let mut best: Option<(SymbolId, Pair)> = None;

        for window in symbols.windows(2) {
            let pair = (window[0], window[1]);
            if let Some(id) = table.lookup(Symbol::Pair(pair.0, pair.1)) {
                if best.map_or(true, |(best_id, _)| id < best_id) {
                    best = Some((id, pair));
                }
            }
        }

        let Some((id, pair)) = best else { break };
        symbols = substitute_pair(&symbols, pair, id);
    }

    Ok(symbols)
}

/// Encode a line by splitting on ASCII space and concatenating the
/// per-token encodings in order. Empty segments produced by consecutive
/// spaces are skipped.
pub fn encode_line(table: &SymbolTable, line: &[u8]) -> Result<Vec<SymbolId>> {
    let mut encoded = Vec::new();

    for token in line.split(|&byte| byte == b' ') {
        if token.is_empty() {
            continue;
        }
        encoded.extend(encode_token(table, token)?);
    }

    Ok(encoded)
}

/// Decode a sequence of symbol ids back to bytes.
///
/// `Final` symbols render with a trailing space, so a sequence of
/// well-formed tokens decodes whitespace-separated with a trailing space
/// after the last token. No trimming is performed.
pub fn decode(table: &SymbolTable, ids: &[SymbolId]) -> Result<Vec<u8>> {
    let mut decoded = Vec::new();

    for &id in ids {
        let text = table.rendered(id).ok_or(BpeError::UnknownSymbolId(id))?;
        decoded.extend_from_slice(text);
    }

    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_abab() -> SymbolTable {
        // Vocabulary learned from "abab abab": base symbols plus the merges
        // (1,0) -> 3, (3,2) -> 4, (0,4) -> 5.
        let mut table = SymbolTable::new();
        table.push(Symbol::Internal(b'a')).unwrap();
        table.push(Symbol::Internal(b'b')).unwrap();
        table.push(Symbol::Final(b'b')).unwrap();
        table.push(Symbol::Pair(1, 0)).unwrap();
        table.push(Symbol::Pair(3, 2)).unwrap();
        table.push(Symbol::Pair(0, 4)).unwrap();
        table
    }

    #[test]
    fn test_substitute_is_greedy_left_to_right() {
        // l r r -> s r
        assert_eq!(substitute_pair(&[0, 1, 1], (0, 1), 9), vec![9, 1]);
        // l l r -> l s
        assert_eq!(substitute_pair(&[0, 0, 1], (0, 1), 9), vec![0, 9]);
        // every non-overlapping occurrence goes in one pass
        assert_eq!(substitute_pair(&[0, 1, 0, 1], (0, 1), 9), vec![9, 9]);
        // a a a with pair (a, a) consumes the first two only
        assert_eq!(substitute_pair(&[7, 7, 7], (7, 7), 9), vec![9, 7]);
    }

    #[test]
    fn test_substitute_leaves_short_vectors() {
        assert_eq!(substitute_pair(&[4], (0, 1), 9), vec![4]);
        assert_eq!(substitute_pair(&[], (0, 1), 9), Vec::<SymbolId>::new());
    }

    #[test]
    fn test_encode_token_applies_merges_in_id_order() {
        let table = table_abab();
        // [0,1,0,2] -> (1,0)=3 -> [0,3,2] -> (3,2)=4 -> [0,4] -> (0,4)=5
        assert_eq!(encode_token(&table, b"abab").unwrap(), vec![5]);
    }

    #[test]
    fn test_encode_token_without_applicable_merge() {
        let mut table = SymbolTable::new();
        table.push(Symbol::Final(b'a')).unwrap();
        table.push(Symbol::Final(b'b')).unwrap();

        assert_eq!(encode_token(&table, b"a").unwrap(), vec![0]);
        assert_eq!(
            encode_token(&table, b"").unwrap(),
            Vec::<SymbolId>::new()
        );
    }

    #[test]
    fn test_encode_token_unknown_byte() {
        let table = table_abab();
        let err = encode_token(&table, b"abx").unwrap_err();
        assert!(matches!(err, BpeError::UnknownByte(b'x')));
    }

    #[test]
    fn test_encode_line_splits_on_space() {
        let mut table = SymbolTable::new();
        table.push(Symbol::Final(b'a')).unwrap();
        table.push(Symbol::Final(b'b')).unwrap();
        table.push(Symbol::Final(b'c')).unwrap();

        assert_eq!(encode_line(&table, b"a b c").unwrap(), vec![0, 1, 2]);
        // consecutive spaces collapse
        assert_eq!(encode_line(&table, b"a  b   c").unwrap(), vec![0, 1, 2]);
        assert_eq!(encode_line(&table, b"").unwrap(), Vec::<SymbolId>::new());
    }

    #[test]
    fn test_decode_concatenates_rendered_strings() {
        let table = table_abab();
        assert_eq!(decode(&table, &[5]).unwrap(), b"abab ".to_vec());
        assert_eq!(decode(&table, &[0, 3, 2]).unwrap(), b"abab ".to_vec());
    }

    #[test]
    fn test_decode_unknown_id() {
        let table = table_abab();
        let err = decode(&table, &[0, 99]).unwrap_err();
        assert!(matches!(err, BpeError::UnknownSymbolId(99)));
    }

    #[test]
    fn test_encode_decode_round_trip() {
        let mut table = SymbolTable::new();
        table.push(Symbol::Internal(b'a')).unwrap();
        table.push(Symbol::Internal(b'b')).unwrap();
        table.push(Symbol::Final(b'a')).unwrap();
        table.push(Symbol::Final(b'b')).unwrap();

        let encoded = encode_line(&table, b"ab  ba").unwrap();
        // internal runs of spaces collapse to one, trailing space appended
        assert_eq!(decode(&table, &encoded).unwrap(), b"ab ba ".to_vec());
    }
}
