//! Exhaustive search
//!
//! Enumerates the full mutation space and returns the first variant that
//! satisfies every constraint. Only tractable on small spaces; callers check
//! [`MutationSpace::size`](crate::mutation::MutationSpace::size) first.

use tracing::debug;

use crate::error::{ChiselError, SearchStrategy};
use crate::mutation::apply;
use crate::problem::Problem;
use crate::search::SearchOutcome;

/// First-fit enumeration of a problem's mutation space
#[derive(Clone, Copy, Debug, Default)]
pub struct ExhaustiveSearch;

impl ExhaustiveSearch {
    /// Create the strategy
    pub fn new() -> Self {
        Self
    }

    /// Search the whole mutation space of `problem`
    ///
    /// The unmodified sequence is tried first. Fails with
    /// [`ChiselError::SearchExhausted`] when no combination passes.
    pub fn search(&self, problem: &Problem) -> Result<SearchOutcome, ChiselError> {
        let space = problem.mutation_space()?;
        let mut evaluations = 0;

        for combination in space.combinations() {
            let candidate = apply(problem.sequence(), &combination);
            evaluations += 1;
            if problem
                .constraints()
                .iter()
                .all(|c| c.evaluate(&candidate).passes)
            {
                debug!(evaluations, size = %space.size(), "exhaustive search succeeded");
                return Ok(SearchOutcome {
                    sequence: candidate,
                    strategy: SearchStrategy::Exhaustive,
                    evaluations,
                    accepted_scores: Vec::new(),
                });
            }
        }

        Err(ChiselError::SearchExhausted {
            strategy: SearchStrategy::Exhaustive,
            evaluations,
        })
    }
}
