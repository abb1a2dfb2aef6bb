/// Size of the fixed header in bytes.
pub const HEADER_LEN: usize = 10;

/// Flush granularity of the block writer.
pub const DEFAULT_BLOCK_SIZE: usize = 2048;

/// `W` is stored in a single byte.
pub const MAX_CODE_WIDTH: usize = u8::MAX as usize;

/// Longest code whose fixed-width form still fits in `MAX_CODE_WIDTH` bits.
///
/// A 254-bit code gives `W = 255`, which still fits the one-byte field, so it
/// is accepted. Only codes of 255 bits or more are rejected, one bit looser
/// than a reading that also refuses 254-bit codes.
pub const MAX_CODE_LEN: usize = MAX_CODE_WIDTH - 1;
