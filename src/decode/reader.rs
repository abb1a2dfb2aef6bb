//! Parsing of a Huffman artifact back into its dictionary and original bytes.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use bitvec::prelude::*;
use log::{debug, info};

use crate::decode::bit_reader::BitReader;
use crate::decode::trie::CodeTrie;
use crate::encode::normalize::strip_sentinel;
use crate::format::{Code, EncodingDictionary, Header, Symbol};
use crate::utils::error::{ArtifactError, Result};

/// A dictionary entry recovered from an artifact, in positional order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryEntry {
    pub symbol: Symbol,
    pub code: Code,
}

/// A fully decoded artifact.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub header: Header,
    pub entries: Vec<DictionaryEntry>,
    pub data: Vec<u8>,
}

impl Artifact {
    /// Rebuilds the encoding dictionary the artifact was written with.
    pub fn dictionary(&self) -> Result<EncodingDictionary> {
        EncodingDictionary::from_entries(
            self.header.symbol_width as usize,
            self.entries
                .iter()
                .map(|entry| (entry.symbol.clone(), entry.code.clone())),
        )
    }

    #[inline]
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

/// Reads an artifact from any `Read` source.
pub struct ArtifactReader<R: Read> {
    reader: R,
}

impl<R: Read> ArtifactReader<R> {
    #[inline]
    pub fn new(reader: R) -> Self {
        ArtifactReader { reader }
    }

    /// Reads the whole artifact and decodes its payload.
    ///
    /// Nothing is returned unless exactly `original_length` bytes decode.
    pub fn read(mut self) -> Result<Artifact> {
        let header = Header::read_from(&mut self.reader)?;
        let n = header.symbol_width as usize;
        let width = header.code_width as usize;
        debug!(
            "artifact header: original_length={}, n={}, S={}, W={}",
            header.original_length, n, header.dictionary_size, width
        );

        let keys = self.read_section(header.keys_len(), "dictionary keys")?;
        let codes = self.read_section(header.codes_len(), "dictionary codes")?;

        // Both sections are fully read, so `S` is backed by real bytes here.
        let mut entries = Vec::with_capacity(header.dictionary_size as usize);
        let mut seen = HashSet::with_capacity(header.dictionary_size as usize);
        let mut trie = CodeTrie::new();
        let code_bits = codes.view_bits::<Msb0>();
        for (i, key) in keys.chunks_exact(n).enumerate() {
            if !seen.insert(key) {
                return Err(ArtifactError::format(format!(
                    "dictionary key {} appears more than once",
                    Symbol::from(key)
                )));
            }
            let fixed = &code_bits[i * width..(i + 1) * width];
            let code = strip_sentinel(fixed).ok_or_else(|| {
                ArtifactError::format(format!("dictionary code {} has no sentinel bit", i))
            })?;
            if let Err(j) = trie.insert(code.bits(), i) {
                return Err(ArtifactError::format(format!(
                    "dictionary codes {} and {} are not prefix-free",
                    j, i
                )));
            }
            entries.push(DictionaryEntry {
                symbol: Symbol::from(key),
                code,
            });
        }

        let mut payload = Vec::new();
        self.reader.read_to_end(&mut payload)?;

        let data = decode_payload(&header, &entries, &trie, &payload)?;
        info!(
            "read artifact: {} bytes from {} dictionary entries and {} payload bytes",
            data.len(),
            entries.len(),
            payload.len()
        );

        Ok(Artifact {
            header,
            entries,
            data,
        })
    }

    /// Reads exactly `len` bytes without trusting `len` for the allocation.
    fn read_section(&mut self, len: u64, section: &'static str) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.reader
            .by_ref()
            .take(len)
            .read_to_end(&mut buf)
            .map_err(ArtifactError::truncated(section))?;
        if (buf.len() as u64) < len {
            return Err(ArtifactError::format(format!("truncated {}", section)));
        }
        Ok(buf)
    }
}

/// Opens and decodes the artifact at `path`.
pub fn read_path<P: AsRef<Path>>(path: P) -> Result<Artifact> {
    let file = File::open(path.as_ref())?;
    ArtifactReader::new(BufReader::new(file)).read()
}

/// Decodes symbols until exactly `original_length` bytes are produced.
///
/// Pad bits after the last code are never looked at. The final symbol is
/// cut short when the stream length is not a multiple of `n`.
///
/// A sole zero-length code consumes no bits, so output size is bounded only
/// by `original_length`, never by the payload: a 12-byte artifact may
/// legitimately expand to 4 GiB. Callers reading untrusted artifacts should
/// check `Header::original_length` first.
fn decode_payload(
    header: &Header,
    entries: &[DictionaryEntry],
    trie: &CodeTrie,
    payload: &[u8],
) -> Result<Vec<u8>> {
    let original_length = header.original_length as usize;
    let mut reader = BitReader::new(payload);
    let mut out = Vec::new();
    while out.len() < original_length {
        let index = trie.decode_next(&mut reader).map_err(|err| match err {
            ArtifactError::Format(msg) => ArtifactError::format(format!(
                "{} after {} of {} bytes",
                msg,
                out.len(),
                original_length
            )),
            other => other,
        })?;
        let symbol = entries[index].symbol.as_bytes();
        let take = symbol.len().min(original_length - out.len());
        out.extend_from_slice(&symbol[..take]);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: [u8; 16] = [
        0, 0, 0, 4, 1, 0, 0, 0, 3, 3, 0x41, 0x42, 0x43, 0b0101_1011, 0b1000_0000, 0b0101_1000,
    ];

    #[test]
    fn test_decode_example() {
        let artifact = ArtifactReader::new(&EXAMPLE[..]).read().unwrap();
        assert_eq!(artifact.header.original_length, 4);
        assert_eq!(artifact.header.code_width, 3);
        assert_eq!(artifact.data, vec![0x41, 0x42, 0x43, 0x41]);

        let codes: Vec<String> = artifact.entries.iter().map(|e| e.code.to_string()).collect();
        assert_eq!(codes, vec!["0", "10", "11"]);

        let dict = artifact.dictionary().unwrap();
        assert_eq!(dict.get(&[0x42]), Some(&"10".parse().unwrap()));
    }

    #[test]
    fn test_trailing_bytes_ignored() {
        let mut bytes = EXAMPLE.to_vec();
        bytes.extend_from_slice(&[0xff, 0xff]);
        let artifact = ArtifactReader::new(&bytes[..]).read().unwrap();
        assert_eq!(artifact.data, vec![0x41, 0x42, 0x43, 0x41]);
    }

    #[test]
    fn test_truncated_sections() {
        for (cut, section) in [(12, "dictionary keys"), (14, "dictionary codes")] {
            match ArtifactReader::new(&EXAMPLE[..cut]).read() {
                Err(ArtifactError::Format(msg)) => assert_eq!(msg, format!("truncated {}", section)),
                other => panic!("unexpected result: {:?}", other),
            }
        }
    }

    #[test]
    fn test_payload_exhausted() {
        let mut bytes = EXAMPLE.to_vec();
        bytes[3] = 9; // claims 9 bytes, payload holds at most 8 codes
        assert!(matches!(
            ArtifactReader::new(&bytes[..]).read(),
            Err(ArtifactError::Format(_))
        ));
    }

    #[test]
    fn test_missing_sentinel() {
        let mut bytes = EXAMPLE.to_vec();
        bytes[13] = 0b0001_1011; // first fixed code becomes 000
        match ArtifactReader::new(&bytes[..]).read() {
            Err(ArtifactError::Format(msg)) => assert!(msg.contains("sentinel")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_key() {
        let mut bytes = EXAMPLE.to_vec();
        bytes[11] = 0x41;
        assert!(matches!(
            ArtifactReader::new(&bytes[..]).read(),
            Err(ArtifactError::Format(_))
        ));
    }

    #[test]
    fn test_code_section_pad_bits_ignored() {
        let mut bytes = EXAMPLE.to_vec();
        bytes[14] |= 0x7f; // 7 pad bits after the last fixed code
        let artifact = ArtifactReader::new(&bytes[..]).read().unwrap();
        assert_eq!(artifact.data, vec![0x41, 0x42, 0x43, 0x41]);
        let codes: Vec<String> = artifact.entries.iter().map(|e| e.code.to_string()).collect();
        assert_eq!(codes, vec!["0", "10", "11"]);
    }

    #[test]
    fn test_conflicting_codes_rejected() {
        // S=2, W=3, fixed codes 010 and 101 recover "0" and "01".
        let bytes = [0u8, 0, 0, 1, 1, 0, 0, 0, 2, 3, 0x41, 0x42, 0b0101_0100, 0];
        match ArtifactReader::new(&bytes[..]).read() {
            Err(ArtifactError::Format(msg)) => assert!(msg.contains("not prefix-free"), "{}", msg),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_empty_code_expands_without_payload() {
        // S=1, W=1, sole code is the empty code; no payload bytes at all.
        let bytes = [0u8, 0x01, 0x86, 0xa0, 1, 0, 0, 0, 1, 1, 0x7a, 0b1000_0000];
        let artifact = ArtifactReader::new(&bytes[..]).read().unwrap();
        assert_eq!(artifact.header.original_length, 100_000);
        assert_eq!(artifact.data.len(), 100_000);
        assert!(artifact.data.iter().all(|&b| b == 0x7a));
    }

    #[test]
    fn test_huge_dictionary_claim_is_truncation() {
        let bytes = [0u8, 0, 0, 0, 1, 0xff, 0xff, 0xff, 0xff, 0xff];
        assert!(matches!(
            ArtifactReader::new(&bytes[..]).read(),
            Err(ArtifactError::Format(_))
        ));
    }
}
