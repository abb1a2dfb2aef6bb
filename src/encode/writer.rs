//! Serialization of a dictionary and byte stream into a Huffman artifact.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use log::{debug, info};
use tempfile::NamedTempFile;

use crate::encode::bit_packer::BitPacker;
use crate::encode::block_writer::BlockWriter;
use crate::encode::normalize::{normalize, NormalizedDictionary};
use crate::format::constants::DEFAULT_BLOCK_SIZE;
use crate::format::symbol::validate_symbol_width;
use crate::format::{EncodingDictionary, Header, Symbol, SymbolChunks, TailPolicy};
use crate::utils::error::{ArtifactError, Result};

/// How an existing file at the destination is replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReplaceMode {
    /// Delete the destination, then write it in place. A failed write can
    /// leave no file or a truncated one.
    #[default]
    RemoveFirst,
    /// Write a temporary file next to the destination and rename it over
    /// the destination once complete. A failed write leaves the old file.
    AtomicRename,
}

/// Options controlling how an artifact is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriterOptions {
    /// Output is handed to the sink in blocks of this many bytes.
    pub block_size: usize,
    /// Handling of a stream whose length is not a multiple of `n`.
    pub tail_policy: TailPolicy,
    pub replace_mode: ReplaceMode,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            tail_policy: TailPolicy::Reject,
            replace_mode: ReplaceMode::RemoveFirst,
        }
    }
}

impl WriterOptions {
    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    pub fn with_tail_policy(mut self, tail_policy: TailPolicy) -> Self {
        self.tail_policy = tail_policy;
        self
    }

    pub fn with_replace_mode(mut self, replace_mode: ReplaceMode) -> Self {
        self.replace_mode = replace_mode;
        self
    }
}

/// Writes `data`, coded with `dictionary` in `symbol_width`-byte symbols.
///
/// The dictionary and data are borrowed read-only for the duration of the
/// write.
pub struct ArtifactWriter<'a> {
    dictionary: &'a EncodingDictionary,
    data: &'a [u8],
    symbol_width: usize,
    options: WriterOptions,
}

impl<'a> ArtifactWriter<'a> {
    pub fn new(dictionary: &'a EncodingDictionary, data: &'a [u8], symbol_width: usize) -> Self {
        Self {
            dictionary,
            data,
            symbol_width,
            options: WriterOptions::default(),
        }
    }

    pub fn with_options(mut self, options: WriterOptions) -> Self {
        self.options = options;
        self
    }

    #[inline]
    pub fn options(&self) -> &WriterOptions {
        &self.options
    }

    /// Writes the complete artifact to `sink` and returns the sink.
    ///
    /// All parameter validation happens before the first byte is emitted.
    pub fn write_to<W: Write>(&self, sink: W) -> Result<W> {
        let (header, normalized) = self.prepare()?;
        // Validates the tail before any output.
        let chunks = SymbolChunks::new(self.data, self.symbol_width, self.options.tail_policy)?;

        let mut packer = BitPacker::new(BlockWriter::new(sink, self.options.block_size)?);

        header.write_to(packer.aligned()?)?;

        for entry in normalized.entries() {
            packer.write_bytes(entry.symbol.as_bytes())?;
        }

        for entry in normalized.entries() {
            packer.push_bits(entry.fixed.bits())?;
        }
        packer.align()?;
        let dictionary_bits = packer.bits_written();
        debug!(
            "wrote dictionary: {} keys, {} bytes of keys and codes",
            normalized.len(),
            dictionary_bits / 8
        );

        for (i, chunk) in chunks.enumerate() {
            let entry = normalized.lookup(&chunk).ok_or_else(|| ArtifactError::UnknownSymbol {
                offset: i * self.symbol_width,
                symbol: Symbol::from(&*chunk).to_string(),
            })?;
            packer.push_bits(entry.code.bits())?;
        }
        let payload_bits = packer.bits_written() - dictionary_bits;
        let sink = packer.finish()?;

        info!(
            "wrote artifact: original_length={}, n={}, S={}, W={}, payload {} bits",
            header.original_length,
            header.symbol_width,
            header.dictionary_size,
            header.code_width,
            payload_bits
        );
        Ok(sink)
    }

    /// Writes the artifact to a file, replacing any existing one according to
    /// [`WriterOptions::replace_mode`].
    pub fn write_to_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        match self.options.replace_mode {
            ReplaceMode::RemoveFirst => {
                match fs::remove_file(path) {
                    Ok(()) => debug!("removed existing artifact at {}", path.display()),
                    Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                    Err(e) => return Err(e.into()),
                }
                let file = File::create(path)?;
                self.write_to(file)?;
            }
            ReplaceMode::AtomicRename => {
                let dir = match path.parent() {
                    Some(parent) if !parent.as_os_str().is_empty() => parent,
                    _ => Path::new("."),
                };
                let mut temp = NamedTempFile::new_in(dir)?;
                self.write_to(temp.as_file_mut())?;
                temp.as_file().sync_all()?;
                temp.persist(path).map_err(|e| e.error)?;
                debug!("renamed temporary artifact into {}", path.display());
            }
        }
        Ok(())
    }

    fn prepare(&self) -> Result<(Header, NormalizedDictionary<'a>)> {
        let symbol_width = validate_symbol_width(self.symbol_width)?;
        if self.dictionary.symbol_width() != self.symbol_width {
            return Err(ArtifactError::config(format!(
                "dictionary keys are {} bytes but symbol width is {}",
                self.dictionary.symbol_width(),
                self.symbol_width
            )));
        }
        let original_length = u32::try_from(self.data.len()).map_err(|_| {
            ArtifactError::config(format!(
                "input of {} bytes exceeds the 4-byte length field",
                self.data.len()
            ))
        })?;

        let normalized = normalize(self.dictionary)?;
        let dictionary_size = u32::try_from(normalized.len()).map_err(|_| {
            ArtifactError::config(format!(
                "dictionary of {} entries exceeds the 4-byte size field",
                normalized.len()
            ))
        })?;

        let header = Header {
            original_length,
            symbol_width,
            dictionary_size,
            code_width: normalized.code_width(),
        };
        Ok((header, normalized))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::Code;

    fn example_dictionary() -> EncodingDictionary {
        EncodingDictionary::from_entries(
            1,
            [(0x41u8, "0"), (0x42, "10"), (0x43, "11")]
                .iter()
                .map(|&(sym, code)| (Symbol::new(vec![sym]), code.parse::<Code>().unwrap())),
        )
        .unwrap()
    }

    #[test]
    fn test_example_layout() {
        let dict = example_dictionary();
        let data = [0x41, 0x42, 0x43, 0x41];
        let out = ArtifactWriter::new(&dict, &data, 1).write_to(Vec::new()).unwrap();
        assert_eq!(
            out,
            vec![
                0, 0, 0, 4, // original length
                1, // n
                0, 0, 0, 3, // S
                3, // W
                0x41, 0x42, 0x43, // keys
                0b0101_1011, 0b1000_0000, // 010 110 111, padded
                0b0101_1000, // payload 0 10 11 0, padded
            ]
        );
    }

    #[test]
    fn test_small_blocks_produce_same_bytes() {
        let dict = example_dictionary();
        let data: Vec<u8> = b"ABCABBCCA".repeat(50);
        let default = ArtifactWriter::new(&dict, &data, 1).write_to(Vec::new()).unwrap();
        let tiny = ArtifactWriter::new(&dict, &data, 1)
            .with_options(WriterOptions::default().with_block_size(1))
            .write_to(Vec::new())
            .unwrap();
        assert_eq!(default, tiny);
    }

    #[test]
    fn test_unknown_symbol() {
        let dict = example_dictionary();
        let data = [0x41, 0x44];
        match ArtifactWriter::new(&dict, &data, 1).write_to(Vec::new()) {
            Err(ArtifactError::UnknownSymbol { offset, symbol }) => {
                assert_eq!(offset, 1);
                assert_eq!(symbol, "44");
            }
            other => panic!("unexpected result: {:?}", other.map(|v| v.len())),
        }
    }

    #[test]
    fn test_configuration_errors() {
        let dict = example_dictionary();
        let data = [0x41, 0x42];

        let err = ArtifactWriter::new(&dict, &data, 2).write_to(Vec::new()).unwrap_err();
        assert!(matches!(err, ArtifactError::Config(_)));

        let err = ArtifactWriter::new(&dict, &data, 0).write_to(Vec::new()).unwrap_err();
        assert!(matches!(err, ArtifactError::Config(_)));

        let err = ArtifactWriter::new(&dict, &data, 1)
            .with_options(WriterOptions::default().with_block_size(0))
            .write_to(Vec::new())
            .unwrap_err();
        assert!(matches!(err, ArtifactError::Config(_)));

        let empty = EncodingDictionary::new(1).unwrap();
        let err = ArtifactWriter::new(&empty, &data, 1).write_to(Vec::new()).unwrap_err();
        assert!(matches!(err, ArtifactError::Config(_)));
    }

    #[test]
    fn test_tail_policy() {
        let dict = EncodingDictionary::from_entries(
            2,
            vec![
                (Symbol::new(vec![1, 2]), "0".parse().unwrap()),
                (Symbol::new(vec![3, 0]), "1".parse().unwrap()),
            ],
        )
        .unwrap();
        let data = [1, 2, 3];

        let err = ArtifactWriter::new(&dict, &data, 2).write_to(Vec::new()).unwrap_err();
        assert!(matches!(err, ArtifactError::Config(_)));

        let out = ArtifactWriter::new(&dict, &data, 2)
            .with_options(WriterOptions::default().with_tail_policy(TailPolicy::ZeroPad))
            .write_to(Vec::new())
            .unwrap();
        // header(10) + keys(4) + codes(1) + payload(1)
        assert_eq!(out.len(), 16);
        assert_eq!(&out[0..4], &[0, 0, 0, 3]);
        assert_eq!(out[15], 0b0100_0000);
    }

    #[test]
    fn test_nothing_written_on_configuration_error() {
        let dict = example_dictionary();
        let data = [0x41, 0x42];
        let mut sink = Vec::new();
        let result = ArtifactWriter::new(&dict, &data, 3).write_to(&mut sink);
        assert!(result.is_err());
        assert!(sink.is_empty());
    }
}
