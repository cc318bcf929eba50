//! Nucleotide sequences
//!
//! This module provides the sequence buffer, half-open windows over it, and
//! sequence-level helpers (complements, GC content, differences).

pub mod dna;
pub mod utils;
pub mod window;

pub use dna::{Sequence, ALPHABET};
pub use window::Window;

pub mod prelude {
    pub use super::dna::*;
    pub use super::utils::*;
    pub use super::window::*;
}
