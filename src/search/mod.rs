//! Search strategies
//!
//! Exhaustive enumeration and random hill-climbing over a problem's mutation
//! space, and the localized solver that decomposes a failing constraint into
//! small sub-problems solved by either.

pub mod exhaustive;
pub mod localized;
pub mod random;

pub use exhaustive::ExhaustiveSearch;
pub use localized::LocalizedSolver;
pub use random::{RandomSearch, RandomSearchConfig};

use crate::error::SearchStrategy;
use crate::sequence::Sequence;
use crate::specification::traits::Constraint;

/// Result of a successful search
#[derive(Clone, Debug, PartialEq)]
pub struct SearchOutcome {
    /// A sequence satisfying every constraint of the problem
    pub sequence: Sequence,
    /// Strategy that found it
    pub strategy: SearchStrategy,
    /// Candidate sequences evaluated
    pub evaluations: usize,
    /// Aggregate violation score after each accepted step, starting with the
    /// initial state (random search only)
    pub accepted_scores: Vec<f64>,
}

/// Aggregate violation of a sequence and whether every constraint passes
pub(crate) fn assess(constraints: &[Box<dyn Constraint>], sequence: &Sequence) -> (f64, bool) {
    constraints
        .iter()
        .map(|c| c.evaluate(sequence))
        .fold((0.0, true), |(score, passes), e| {
            (score + e.violation(), passes && e.passes)
        })
}

pub mod prelude {
    pub use super::exhaustive::*;
    pub use super::localized::*;
    pub use super::random::*;
    pub use super::SearchOutcome;
}
