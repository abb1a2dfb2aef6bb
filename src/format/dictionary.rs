use std::collections::HashMap;

use crate::format::code::Code;
use crate::format::symbol::{validate_symbol_width, Symbol};
use crate::utils::error::{ArtifactError, Result};

/// Mapping from `n`-byte symbols to their prefix-free codes.
///
/// Built by an upstream frequency/tree stage and handed to the writer
/// read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodingDictionary {
    symbol_width: usize,
    codes: HashMap<Symbol, Code>,
}

impl EncodingDictionary {
    pub fn new(symbol_width: usize) -> Result<Self> {
        validate_symbol_width(symbol_width)?;
        Ok(EncodingDictionary {
            symbol_width,
            codes: HashMap::new(),
        })
    }

    /// Builds a dictionary from `(symbol, code)` pairs.
    pub fn from_entries<I>(symbol_width: usize, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Symbol, Code)>,
    {
        let mut dictionary = Self::new(symbol_width)?;
        for (symbol, code) in entries {
            dictionary.insert(symbol, code)?;
        }
        Ok(dictionary)
    }

    /// Inserts an entry, returning the code it replaced.
    ///
    /// The symbol must be exactly `symbol_width` bytes long.
    pub fn insert(&mut self, symbol: Symbol, code: Code) -> Result<Option<Code>> {
        if symbol.len() != self.symbol_width {
            return Err(ArtifactError::invariant(format!(
                "symbol {} is {} bytes, expected {}",
                symbol,
                symbol.len(),
                self.symbol_width
            )));
        }
        Ok(self.codes.insert(symbol, code))
    }

    #[inline]
    pub fn symbol_width(&self) -> usize {
        self.symbol_width
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    #[inline]
    pub fn get(&self, symbol: &[u8]) -> Option<&Code> {
        self.codes.get(symbol)
    }

    /// Length of the longest code, `None` for an empty dictionary.
    pub fn max_code_len(&self) -> Option<usize> {
        self.codes.values().map(Code::len).max()
    }

    /// One stable ordering of all entries (ascending symbol bytes).
    ///
    /// Every positional section of an artifact is derived from a single
    /// snapshot so keys and codes cannot drift apart.
    pub fn snapshot(&self) -> Vec<(&Symbol, &Code)> {
        let mut entries: Vec<_> = self.codes.iter().collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries
    }
}
