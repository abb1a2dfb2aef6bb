use std::io::{self, Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::utils::error::{ArtifactError, Result};

/// The fixed 10-byte header at the start of every artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Byte count of the original stream.
    pub original_length: u32,
    /// Bytes per symbol (`n`).
    pub symbol_width: u8,
    /// Number of dictionary entries (`S`).
    pub dictionary_size: u32,
    /// Fixed code width in bits (`W`).
    pub code_width: u8,
}

impl Header {
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_u32::<BigEndian>(self.original_length)?;
        writer.write_u8(self.symbol_width)?;
        writer.write_u32::<BigEndian>(self.dictionary_size)?;
        writer.write_u8(self.code_width)?;
        Ok(())
    }

    /// Reads and sanity-checks a header.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let original_length = reader
            .read_u32::<BigEndian>()
            .map_err(ArtifactError::truncated("header"))?;
        let symbol_width = reader.read_u8().map_err(ArtifactError::truncated("header"))?;
        let dictionary_size = reader
            .read_u32::<BigEndian>()
            .map_err(ArtifactError::truncated("header"))?;
        let code_width = reader.read_u8().map_err(ArtifactError::truncated("header"))?;

        if symbol_width == 0 {
            return Err(ArtifactError::format("symbol width is zero"));
        }
        if dictionary_size == 0 {
            return Err(ArtifactError::format("dictionary is empty"));
        }
        if code_width == 0 {
            return Err(ArtifactError::format("code width is zero"));
        }

        Ok(Header {
            original_length,
            symbol_width,
            dictionary_size,
            code_width,
        })
    }

    /// Size in bytes of the dictionary key section.
    #[inline]
    pub fn keys_len(&self) -> u64 {
        self.dictionary_size as u64 * self.symbol_width as u64
    }

    /// Size in bytes of the fixed-width code section, including padding.
    #[inline]
    pub fn codes_len(&self) -> u64 {
        (self.dictionary_size as u64 * self.code_width as u64).div_ceil(8)
    }
}
