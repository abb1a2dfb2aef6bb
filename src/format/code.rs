use std::fmt;
use std::str::FromStr;

use bitvec::prelude::*;

use crate::utils::error::{ArtifactError, Result};

/// A variable-length prefix-free bit code, most significant bit first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Code(BitVec<u8, Msb0>);

impl Code {
    #[inline]
    pub fn new(bits: BitVec<u8, Msb0>) -> Self {
        Code(bits)
    }

    /// Number of bits in the code.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn bits(&self) -> &BitSlice<u8, Msb0> {
        &self.0
    }
}

impl From<BitVec<u8, Msb0>> for Code {
    fn from(bits: BitVec<u8, Msb0>) -> Self {
        Code(bits)
    }
}

impl From<&BitSlice<u8, Msb0>> for Code {
    fn from(bits: &BitSlice<u8, Msb0>) -> Self {
        Code(bits.to_bitvec())
    }
}

impl FromIterator<bool> for Code {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Code(iter.into_iter().collect())
    }
}

impl FromStr for Code {
    type Err = ArtifactError;

    /// Parses a string of `'0'` and `'1'` characters.
    fn from_str(s: &str) -> Result<Self> {
        s.chars()
            .map(|c| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                other => Err(ArtifactError::config(format!(
                    "invalid character {:?} in code {:?}",
                    other, s
                ))),
            })
            .collect()
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.0.iter().by_vals() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}
