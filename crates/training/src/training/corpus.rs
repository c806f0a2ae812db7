//! Corpus ingestion.
//!
//! The corpus is an uninterpreted byte stream split on `\n` into lines and
//! on ASCII space into tokens. It is scanned twice: a first pass counts
//! lines to size the progress indicator, a second pass tallies token
//! multiplicities and collects the base byte sets.

use crate::training::phase_bar;
use ahash::{AHashMap, AHashSet};
use bytebpe_core::{BpeError, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Everything the trainer needs from one scan of the corpus.
#[derive(Debug, Clone)]
pub struct CorpusStats {
    /// Multiplicity of every distinct token
    pub token_counts: AHashMap<Vec<u8>, u64>,
    /// Bytes seen before the last position of some token, ascending
    pub internal_bytes: Vec<u8>,
    /// Bytes seen at the last position of some token, ascending
    pub final_bytes: Vec<u8>,
    /// Number of lines in the corpus
    pub line_count: usize,
}

/// Count the lines of a file.
pub fn count_lines(path: &Path) -> Result<usize> {
    let file = open(path)?;
    let mut reader = BufReader::new(file);

    let mut line = Vec::new();
    let mut count = 0;
    loop {
        line.clear();
        if read_line(&mut reader, &mut line, path)? == 0 {
            break;
        }
        count += 1;
    }

    Ok(count)
}

/// Tokenise the corpus and collect token multiplicities and base byte sets.
///
/// Lines are split on ASCII space; the terminating newline is stripped
/// before splitting and never counts as a byte of the last token. Empty
/// tokens produced by consecutive, leading, or trailing spaces are skipped.
pub fn scan_corpus(path: &Path) -> Result<CorpusStats> {
    let line_count = count_lines(path)?;

    let file = open(path)?;
    let mut reader = BufReader::new(file);
    let bar = phase_bar(line_count as u64, "indexing tokens");

    let mut token_counts: AHashMap<Vec<u8>, u64> = AHashMap::new();
    let mut internal: AHashSet<u8> = AHashSet::new();
    let mut fin: AHashSet<u8> = AHashSet::new();

    let mut line = Vec::new();
    loop {
        line.clear();
        if read_line(&mut reader, &mut line, path)? == 0 {
            break;
        }
        if line.last() == Some(&b'\n') {
            line.pop();
        }

        for token in line.split(|&byte| byte == b' ') {
            let Some((&last, body)) = token.split_last() else {
                continue;
            };

            *token_counts.entry(token.to_vec()).or_insert(0) += 1;
            for &byte in body {
                internal.insert(byte);
            }
            fin.insert(last);
        }

        bar.inc(1);
    }
    bar.finish();

    let mut internal_bytes: Vec<u8> = internal.into_iter().collect();
    internal_bytes.sort_unstable();
    let mut final_bytes: Vec<u8> = fin.into_iter().collect();
    final_bytes.sort_unstable();

    Ok(CorpusStats {
        token_counts,
        internal_bytes,
        final_bytes,
        line_count,
    })
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| BpeError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn read_line(reader: &mut BufReader<File>, line: &mut Vec<u8>, path: &Path) -> Result<usize> {
    reader.read_until(b'\n', line).map_err(|source| BpeError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_corpus(name: &str, contents: &[u8]) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(contents).unwrap();
        path
    }

    #[test]
    fn test_count_lines() {
        let path = write_corpus("bytebpe_corpus_lines.txt", b"a b\nc d\ne\n");
        assert_eq!(count_lines(&path).unwrap(), 3);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_scan_counts_tokens() {
        let path = write_corpus("bytebpe_corpus_scan.txt", b"ab ab cd\nab\n");
        let stats = scan_corpus(&path).unwrap();

        assert_eq!(stats.line_count, 2);
        assert_eq!(stats.token_counts.len(), 2);
        assert_eq!(stats.token_counts[&b"ab".to_vec()], 3);
        assert_eq!(stats.token_counts[&b"cd".to_vec()], 1);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_scan_splits_byte_roles() {
        let path = write_corpus("bytebpe_corpus_roles.txt", b"ab ba b\n");
        let stats = scan_corpus(&path).unwrap();

        // internal: first byte of "ab" and of "ba"; final: last of each token
        assert_eq!(stats.internal_bytes, vec![b'a', b'b']);
        assert_eq!(stats.final_bytes, vec![b'a', b'b']);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_scan_skips_empty_tokens() {
        let path = write_corpus("bytebpe_corpus_empty.txt", b"a  b\n\n c \n");
        let stats = scan_corpus(&path).unwrap();

        assert_eq!(stats.token_counts.len(), 3);
        assert!(!stats.token_counts.contains_key(&Vec::new()));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_newline_is_a_terminator_not_a_token_byte() {
        let path = write_corpus("bytebpe_corpus_newline.txt", b"ab\n");
        let stats = scan_corpus(&path).unwrap();

        assert_eq!(stats.final_bytes, vec![b'b']);
        assert!(!stats.token_counts.contains_key(&b"ab\n".to_vec()));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_missing_file() {
        let err = scan_corpus(Path::new("/nonexistent/bytebpe.txt")).unwrap_err();
        assert!(matches!(err, BpeError::Io { .. }));
    }
}
