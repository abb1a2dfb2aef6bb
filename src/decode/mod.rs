pub mod bit_reader;
pub mod reader;
pub mod trie;

pub use reader::{read_path, Artifact, ArtifactReader, DictionaryEntry};
