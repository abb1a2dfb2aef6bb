//! Data model and fixed binary layout of a Huffman artifact.
//!
//! Layout (all integers big-endian, unsigned):
//!
//! | Offset   | Size            | Field                                   |
//! |----------|-----------------|-----------------------------------------|
//! | 0        | 4               | original length in bytes                |
//! | 4        | 1               | `n`, bytes per symbol                   |
//! | 5        | 4               | `S`, dictionary size                    |
//! | 9        | 1               | `W`, fixed code width in bits           |
//! | 10       | `S * n`         | dictionary keys                         |
//! | 10+S*n   | `ceil(S*W / 8)` | fixed-width codes, zero-padded          |
//! | ...      | rest            | payload codes, zero-padded              |

pub mod code;
pub mod constants;
pub mod dictionary;
pub mod header;
pub mod symbol;

pub use code::Code;
pub use dictionary::EncodingDictionary;
pub use header::Header;
pub use symbol::{Symbol, SymbolChunks, TailPolicy};
