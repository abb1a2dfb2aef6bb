//! Binary trie over prefix-free codes, used for greedy bit-by-bit decoding.

use bitvec::prelude::*;

use crate::decode::bit_reader::BitReader;
use crate::utils::error::{ArtifactError, Result};

#[derive(Debug, Clone, Copy, Default)]
struct Node {
    children: [Option<u32>; 2],
    leaf: Option<usize>,
}

/// Arena-backed binary trie. Leaves carry the index of a dictionary entry.
#[derive(Debug, Clone)]
pub struct CodeTrie {
    nodes: Vec<Node>,
}

impl Default for CodeTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeTrie {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::default()],
        }
    }

    /// Inserts `code` mapping to `value`.
    ///
    /// Fails with the value of an already inserted entry if the new code
    /// duplicates it, is prefixed by it, or prefixes it.
    pub fn insert(&mut self, code: &BitSlice<u8, Msb0>, value: usize) -> std::result::Result<(), usize> {
        let mut node = 0usize;
        for bit in code.iter().by_vals() {
            if let Some(existing) = self.nodes[node].leaf {
                return Err(existing);
            }
            let slot = bit as usize;
            node = match self.nodes[node].children[slot] {
                Some(child) => child as usize,
                None => {
                    let child = self.nodes.len();
                    self.nodes.push(Node::default());
                    self.nodes[node].children[slot] = Some(child as u32);
                    child
                }
            };
        }
        if let Some(existing) = self.nodes[node].leaf {
            return Err(existing);
        }
        if self.nodes[node].children.iter().any(Option::is_some) {
            return Err(self.first_leaf_below(node));
        }
        self.nodes[node].leaf = Some(value);
        Ok(())
    }

    /// Consumes bits until a leaf is reached and returns its value.
    pub fn decode_next(&self, reader: &mut BitReader<'_>) -> Result<usize> {
        let start = reader.position();
        let mut node = 0usize;
        loop {
            if let Some(value) = self.nodes[node].leaf {
                return Ok(value);
            }
            let bit = reader.read_bit().ok_or_else(|| {
                ArtifactError::format(format!(
                    "payload exhausted inside a code starting at bit {}",
                    start
                ))
            })?;
            node = self.nodes[node].children[bit as usize].ok_or_else(|| {
                ArtifactError::format(format!(
                    "no dictionary code matches payload bits {}..{}",
                    start,
                    reader.position()
                ))
            })? as usize;
        }
    }

    // Nodes are only created on the way to a leaf, so any path downward ends in one.
    fn first_leaf_below(&self, mut node: usize) -> usize {
        loop {
            if let Some(value) = self.nodes[node].leaf {
                return value;
            }
            node = self.nodes[node]
                .children
                .iter()
                .flatten()
                .next()
                .map(|&child| child as usize)
                .unwrap_or(0);
        }
    }
}
