//! DNA sequence buffer
//!
//! This module provides the sequence type that every search strategy mutates
//! through explicit copies.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SequenceError;
use crate::sequence::window::Window;

/// The four nucleotides, in the order used for single-position candidates
pub const ALPHABET: [u8; 4] = *b"ATGC";

/// A DNA sequence over the `ACGT` alphabet
///
/// Sequences are plain values: snapshots are taken with `clone()` and never
/// share storage.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sequence {
    bases: Vec<u8>,
}

impl Sequence {
    /// Create a sequence from text, upper-casing it and checking every symbol
    pub fn new(text: &str) -> Result<Self, SequenceError> {
        let bases: Vec<u8> = text.bytes().map(|b| b.to_ascii_uppercase()).collect();
        if let Some(position) = bases.iter().position(|b| !ALPHABET.contains(b)) {
            return Err(SequenceError::InvalidNucleotide {
                position,
                symbol: text[position..].chars().next().unwrap_or('?'),
            });
        }
        Ok(Self { bases })
    }

    /// Wrap raw bytes without checking them against the alphabet
    pub fn from_bytes_unchecked(bases: Vec<u8>) -> Self {
        Self { bases }
    }

    /// Length of the sequence
    pub fn len(&self) -> usize {
        self.bases.len()
    }

    /// Check if the sequence is empty
    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }

    /// The raw bases
    pub fn as_bytes(&self) -> &[u8] {
        &self.bases
    }

    /// Mutable access to the raw bases
    pub fn as_mut_bytes(&mut self) -> &mut [u8] {
        &mut self.bases
    }

    /// Consume the sequence and return its bases
    pub fn into_bytes(self) -> Vec<u8> {
        self.bases
    }

    /// The bases covered by a window
    ///
    /// # Panics
    /// Panics if the window exceeds the sequence.
    pub fn slice(&self, window: Window) -> &[u8] {
        &self.bases[window.range()]
    }

    /// Window covering the whole sequence
    pub fn full_window(&self) -> Window {
        Window::full(self.len())
    }

    /// Build a window checked against this sequence
    pub fn window(&self, start: usize, end: usize) -> Result<Window, SequenceError> {
        Window::checked(start, end, self.len())
    }

    /// Number of positions at which two equally long sequences differ
    pub fn differences(&self, other: &Sequence) -> Result<usize, SequenceError> {
        crate::sequence::utils::sequences_differences(&self.bases, &other.bases)
    }
}

impl FromStr for Sequence {
    type Err = SequenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.bases))
    }
}

impl AsRef<[u8]> for Sequence {
    fn as_ref(&self) -> &[u8] {
        &self.bases
    }
}
