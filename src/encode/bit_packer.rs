//! MSB-first bit accumulation on top of a [`BlockWriter`].

use std::io::{self, Write};

use bitvec::prelude::*;

use crate::encode::block_writer::BlockWriter;

/// Packs individual bits into bytes, most significant bit first.
pub struct BitPacker<W: Write> {
    out: BlockWriter<W>,
    byte: u8,   // bits of the byte being built, right-aligned
    scount: u8, // number of bits in `byte` (0-7)
    bits_written: u64,
}

impl<W: Write> BitPacker<W> {
    pub fn new(out: BlockWriter<W>) -> Self {
        Self {
            out,
            byte: 0,
            scount: 0,
            bits_written: 0,
        }
    }

    #[inline]
    pub fn push_bit(&mut self, bit: bool) -> io::Result<()> {
        self.byte = (self.byte << 1) | bit as u8;
        self.scount += 1;
        self.bits_written += 1;
        if self.scount == 8 {
            self.out.write_byte(self.byte)?;
            self.byte = 0;
            self.scount = 0;
        }
        Ok(())
    }

    pub fn push_bits(&mut self, bits: &BitSlice<u8, Msb0>) -> io::Result<()> {
        for bit in bits.iter().by_vals() {
            self.push_bit(bit)?;
        }
        Ok(())
    }

    /// Zero-pads the pending byte, if any. Returns the number of pad bits.
    pub fn align(&mut self) -> io::Result<u8> {
        if self.scount == 0 {
            return Ok(0);
        }
        let pad = 8 - self.scount;
        self.out.write_byte(self.byte << pad)?;
        self.byte = 0;
        self.scount = 0;
        self.bits_written += pad as u64;
        Ok(pad)
    }

    #[inline]
    pub fn is_aligned(&self) -> bool {
        self.scount == 0
    }

    /// Total bits emitted so far, padding included.
    #[inline]
    pub fn bits_written(&self) -> u64 {
        self.bits_written
    }

    /// Aligns and returns the underlying byte writer for whole-byte output.
    pub fn aligned(&mut self) -> io::Result<&mut BlockWriter<W>> {
        self.align()?;
        Ok(&mut self.out)
    }

    /// Writes raw bytes at the next byte boundary.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.aligned()?.write_all(bytes)?;
        self.bits_written += bytes.len() as u64 * 8;
        Ok(())
    }

    /// Pads the final byte, commits all buffered blocks and returns the sink.
    pub fn finish(mut self) -> io::Result<W> {
        self.align()?;
        self.out.finish()
    }
}
