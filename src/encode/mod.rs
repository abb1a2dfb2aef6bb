pub mod bit_packer;
pub mod block_writer;
pub mod normalize;
pub mod writer;

// Re-export commonly used encoding functionality
pub use normalize::{normalize, FixedWidthCode, NormalizedDictionary};
pub use writer::{ArtifactWriter, ReplaceMode, WriterOptions};

pub use crate::utils::error::{ArtifactError, Result};
