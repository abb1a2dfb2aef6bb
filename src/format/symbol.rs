//! Grouping of a raw byte stream into fixed-size symbols.

use std::borrow::{Borrow, Cow};
use std::fmt;

use crate::utils::error::{ArtifactError, Result};

/// An `n`-byte block of the original stream, compared and hashed by raw content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(Vec<u8>);

impl Symbol {
    #[inline]
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Symbol(bytes.into())
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Borrow<[u8]> for Symbol {
    fn borrow(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Symbol {
    fn from(bytes: Vec<u8>) -> Self {
        Symbol(bytes)
    }
}

impl From<&[u8]> for Symbol {
    fn from(bytes: &[u8]) -> Self {
        Symbol(bytes.to_vec())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

/// What to do when the stream length is not a multiple of the symbol width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TailPolicy {
    /// Refuse the input.
    #[default]
    Reject,
    /// Right-pad the final chunk with `0x00` up to `n` bytes.
    ZeroPad,
}

/// Checks `1 <= n <= 255` and returns it as the header byte.
pub fn validate_symbol_width(n: usize) -> Result<u8> {
    u8::try_from(n)
        .ok()
        .filter(|&w| w >= 1)
        .ok_or_else(|| {
            ArtifactError::config(format!("symbol width must be in 1..=255, got {}", n))
        })
}

/// Iterator over the consecutive `n`-byte symbols of a stream.
///
/// Slicing is purely positional. A short final chunk is only ever yielded
/// under [`TailPolicy::ZeroPad`], already padded to `n` bytes.
#[derive(Debug, Clone)]
pub struct SymbolChunks<'a> {
    data: &'a [u8],
    width: usize,
    offset: usize,
}

impl<'a> SymbolChunks<'a> {
    pub fn new(data: &'a [u8], width: usize, policy: TailPolicy) -> Result<Self> {
        validate_symbol_width(width)?;
        let tail = data.len() % width;
        if tail != 0 && policy == TailPolicy::Reject {
            return Err(ArtifactError::config(format!(
                "input length {} is not a multiple of symbol width {} ({} trailing bytes)",
                data.len(),
                width,
                tail
            )));
        }
        Ok(SymbolChunks {
            data,
            width,
            offset: 0,
        })
    }

    /// Byte offset of the next chunk in the original stream.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl<'a> Iterator for SymbolChunks<'a> {
    type Item = Cow<'a, [u8]>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.offset >= self.data.len() {
            return None;
        }
        let end = self.offset + self.width;
        let chunk = if end <= self.data.len() {
            Cow::Borrowed(&self.data[self.offset..end])
        } else {
            let mut padded = self.data[self.offset..].to_vec();
            padded.resize(self.width, 0);
            Cow::Owned(padded)
        };
        self.offset = end;
        Some(chunk)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.data.len().saturating_sub(self.offset).div_ceil(self.width);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SymbolChunks<'_> {}
