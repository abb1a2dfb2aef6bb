use bitvec::prelude::*;

/// Sequential MSB-first bit cursor over a byte slice.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    bits: &'a BitSlice<u8, Msb0>,
    position: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bits: bytes.view_bits::<Msb0>(),
            position: 0,
        }
    }

    #[inline]
    pub fn read_bit(&mut self) -> Option<bool> {
        let bit = self.bits.get(self.position).map(|b| *b)?;
        self.position += 1;
        Some(bit)
    }

    /// Returns the next `count` bits as a slice, or `None` if fewer remain.
    pub fn read_bits(&mut self, count: usize) -> Option<&'a BitSlice<u8, Msb0>> {
        let end = self.position.checked_add(count)?;
        let slice = self.bits.get(self.position..end)?;
        self.position = end;
        Some(slice)
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.bits.len() - self.position
    }
}
