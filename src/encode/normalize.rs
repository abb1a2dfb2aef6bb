//! Conversion of variable-length codes into fixed-width, self-delimiting codes.
//!
//! A code `c` is stored in `W = max_len + 1` bits as `W - len(c) - 1` zero
//! bits, a sentinel `1` bit, then `c` itself:
//!
//! | code  | W = 4 |
//! |-------|-------|
//! | `000` | `1000` |
//! | `011` | `1011` |
//! | `10`  | `0110` |
//!
//! Everything before the sentinel is zero, so the first `1` bit of the fixed
//! form is always the sentinel and the code is whatever follows it.

use std::collections::HashMap;

use bitvec::prelude::*;
use log::debug;

use crate::decode::trie::CodeTrie;
use crate::format::constants::MAX_CODE_LEN;
use crate::format::{Code, EncodingDictionary, Symbol};
use crate::utils::error::{ArtifactError, Result};

/// A code padded to exactly `W` bits behind a sentinel bit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedWidthCode(BitVec<u8, Msb0>);

impl FixedWidthCode {
    pub fn from_code(code: &Code, width: usize) -> Result<Self> {
        if code.len() >= width {
            return Err(ArtifactError::invariant(format!(
                "code of {} bits does not fit fixed width {}",
                code.len(),
                width
            )));
        }
        let mut bits = BitVec::repeat(false, width - code.len() - 1);
        bits.push(true);
        bits.extend_from_bitslice(code.bits());
        Ok(FixedWidthCode(bits))
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn bits(&self) -> &BitSlice<u8, Msb0> {
        &self.0
    }

    /// Recovers the original code.
    pub fn strip(&self) -> Code {
        strip_sentinel(&self.0).unwrap_or_default()
    }
}

/// Returns the bits following the first `1` bit, or `None` if there is none.
pub fn strip_sentinel(bits: &BitSlice<u8, Msb0>) -> Option<Code> {
    let sentinel = bits.first_one()?;
    Some(Code::from(&bits[sentinel + 1..]))
}

/// One dictionary entry with both code forms.
#[derive(Debug, Clone)]
pub struct NormalizedEntry<'a> {
    pub symbol: &'a Symbol,
    pub code: &'a Code,
    pub fixed: FixedWidthCode,
}

/// A dictionary snapshot in the single order used for every artifact section.
#[derive(Debug)]
pub struct NormalizedDictionary<'a> {
    code_width: u8,
    entries: Vec<NormalizedEntry<'a>>,
    index: HashMap<&'a [u8], usize>,
}

impl<'a> NormalizedDictionary<'a> {
    /// Fixed code width `W` in bits.
    #[inline]
    pub fn code_width(&self) -> u8 {
        self.code_width
    }

    #[inline]
    pub fn entries(&self) -> &[NormalizedEntry<'a>] {
        &self.entries
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn lookup(&self, symbol: &[u8]) -> Option<&NormalizedEntry<'a>> {
        self.index.get(symbol).map(|&i| &self.entries[i])
    }
}

/// Snapshots `dictionary` once and computes every entry's fixed-width form.
///
/// Rejects empty dictionaries, codes too long for a one-byte `W`, and code
/// sets that are not prefix-free.
pub fn normalize(dictionary: &EncodingDictionary) -> Result<NormalizedDictionary<'_>> {
    let max_len = dictionary
        .max_code_len()
        .ok_or_else(|| ArtifactError::config("dictionary is empty"))?;
    if max_len > MAX_CODE_LEN {
        return Err(ArtifactError::config(format!(
            "longest code is {} bits; at most {} fit a one-byte code width",
            max_len, MAX_CODE_LEN
        )));
    }
    let width = max_len + 1;

    let snapshot = dictionary.snapshot();
    let mut trie = CodeTrie::new();
    let mut entries: Vec<NormalizedEntry<'_>> = Vec::with_capacity(snapshot.len());
    let mut index = HashMap::with_capacity(snapshot.len());
    for (i, (symbol, code)) in snapshot.into_iter().enumerate() {
        if let Err(j) = trie.insert(code.bits(), i) {
            return Err(ArtifactError::config(format!(
                "dictionary is not prefix-free: code {:?} of symbol {} conflicts with {:?} of symbol {}",
                code.to_string(),
                symbol,
                entries[j].code.to_string(),
                entries[j].symbol
            )));
        }
        let fixed = FixedWidthCode::from_code(code, width)?;
        debug_assert_eq!(fixed.width(), width);
        index.insert(symbol.as_bytes(), i);
        entries.push(NormalizedEntry {
            symbol,
            code,
            fixed,
        });
    }

    debug!(
        "normalized {} codes to fixed width {} (longest code {} bits)",
        entries.len(),
        width,
        max_len
    );

    Ok(NormalizedDictionary {
        code_width: width as u8,
        entries,
        index,
    })
}
