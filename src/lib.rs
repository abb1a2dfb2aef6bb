//! # Huffman Artifact Library
//!
//! Persists a Huffman-coded byte stream as a single self-describing binary
//! artifact and reads it back.
//!
//! The dictionary of prefix-free codes is built elsewhere; this crate
//! stores it in a fixed-width, self-delimiting form followed by the
//! bit-packed payload.
//!
//! This library is organized into several modules:
//! - `utils`: Error handling
//! - `format`: Symbols, codes, the dictionary and the fixed header layout
//! - `encode`: Code normalization, bit packing and the artifact writer
//! - `decode`: Code trie, bit reader and the artifact reader
//!
//! ```
//! use huffman_artifact::{decode, encode, Code, EncodingDictionary, Symbol};
//!
//! let dictionary = EncodingDictionary::from_entries(
//!     1,
//!     [(b'A', "0"), (b'B', "10"), (b'C', "11")]
//!         .into_iter()
//!         .map(|(s, c)| (Symbol::new(vec![s]), c.parse::<Code>().unwrap())),
//! )?;
//! let artifact = encode(&dictionary, b"ABCA", 1)?;
//! assert_eq!(decode(&artifact)?, b"ABCA");
//! # Ok::<(), huffman_artifact::ArtifactError>(())
//! ```

// Re-export commonly used types at the crate root
pub use utils::error::{ArtifactError, Result};

pub mod utils {
    pub mod error;
}

pub mod decode;
pub mod encode;
pub mod format;

// Public API exports
pub use decode::{read_path, Artifact, ArtifactReader, DictionaryEntry};
pub use encode::{ArtifactWriter, ReplaceMode, WriterOptions};
pub use format::{Code, EncodingDictionary, Header, Symbol, TailPolicy};

/// Encodes `data` with `dictionary` into an in-memory artifact using default options.
pub fn encode(dictionary: &EncodingDictionary, data: &[u8], symbol_width: usize) -> Result<Vec<u8>> {
    ArtifactWriter::new(dictionary, data, symbol_width).write_to(Vec::new())
}

/// Decodes an in-memory artifact back into the original bytes.
pub fn decode(artifact: &[u8]) -> Result<Vec<u8>> {
    Ok(ArtifactReader::new(artifact).read()?.into_data())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode() {
        let dictionary = EncodingDictionary::from_entries(
            2,
            vec![
                (Symbol::new(vec![0x00, 0x00]), "1".parse().unwrap()),
                (Symbol::new(vec![0xff, 0x00]), "01".parse().unwrap()),
                (Symbol::new(vec![0x00, 0xff]), "00".parse().unwrap()),
            ],
        )
        .unwrap();
        let data = [0x00, 0x00, 0xff, 0x00, 0x00, 0xff, 0x00, 0x00];
        let artifact = encode(&dictionary, &data, 2).unwrap();
        assert_eq!(decode(&artifact).unwrap(), data);
    }
}
