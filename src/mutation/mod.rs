//! Mutation space and sequence mutation
//!
//! This module computes which loci of a sequence may change, and to what,
//! and applies batches of mutations to sequence copies.

pub mod mutator;
pub mod space;

pub use mutator::{apply, apply_in_place};
pub use space::{Combinations, Locus, Mutation, MutationSpace};

pub mod prelude {
    pub use super::mutator::*;
    pub use super::space::*;
}
