//! Randomized search
//!
//! Greedy hill-climbing on the aggregate violation score. Each iteration
//! applies a batch of random mutations to a copy of the current sequence and
//! keeps the copy when the score does not get worse.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{ChiselError, SearchStrategy};
use crate::mutation::apply;
use crate::problem::Problem;
use crate::search::{assess, SearchOutcome};
use crate::sequence::Sequence;

/// Budget of a randomized search
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RandomSearchConfig {
    /// Iterations before giving up
    pub max_iterations: usize,
    /// Random mutations applied per iteration
    pub mutations_per_step: usize,
}

impl Default for RandomSearchConfig {
    fn default() -> Self {
        Self {
            max_iterations: 1_000,
            mutations_per_step: 3,
        }
    }
}

/// Tie-tolerant hill-climbing over a problem's mutation space
#[derive(Clone, Debug, Default)]
pub struct RandomSearch {
    config: RandomSearchConfig,
}

impl RandomSearch {
    /// Create a search with the given budget
    pub fn new(max_iterations: usize, mutations_per_step: usize) -> Self {
        Self {
            config: RandomSearchConfig {
                max_iterations,
                mutations_per_step,
            },
        }
    }

    /// Create a search from a configuration
    pub fn with_config(config: RandomSearchConfig) -> Self {
        Self { config }
    }

    /// Current configuration
    pub fn config(&self) -> &RandomSearchConfig {
        &self.config
    }

    /// Climb from the problem's sequence towards zero violation
    pub fn search<R: Rng>(&self, problem: &Problem, rng: &mut R) -> Result<SearchOutcome, ChiselError> {
        let climb = self.climb(problem, rng)?;
        if climb.passes {
            debug!(
                evaluations = climb.evaluations,
                accepted = climb.accepted_scores.len() - 1,
                "random search succeeded"
            );
            return Ok(SearchOutcome {
                sequence: climb.sequence,
                strategy: SearchStrategy::Random,
                evaluations: climb.evaluations,
                accepted_scores: climb.accepted_scores,
            });
        }

        Err(ChiselError::SearchExhausted {
            strategy: SearchStrategy::Random,
            evaluations: climb.evaluations,
        })
    }

    /// Run the hill-climb and return where it stopped, passing or not
    ///
    /// Stops early once every constraint passes or when the mutation space
    /// is empty.
    pub fn climb<R: Rng>(&self, problem: &Problem, rng: &mut R) -> Result<Climb, ChiselError> {
        let space = problem.mutation_space()?;
        let constraints = problem.constraints();

        let mut current = problem.sequence().clone();
        let (mut score, mut passes) = assess(constraints, &current);
        let mut evaluations = 1;
        let mut accepted_scores = vec![score];

        for iteration in 0..self.config.max_iterations {
            if passes || space.is_empty() {
                break;
            }

            let batch = space.random_batch(self.config.mutations_per_step, rng);
            let candidate = apply(&current, &batch);
            let (new_score, new_passes) = assess(constraints, &candidate);
            evaluations += 1;

            if new_score <= score {
                trace!(iteration, score = new_score, "accepted");
                current = candidate;
                score = new_score;
                passes = new_passes;
                accepted_scores.push(score);
            } else {
                trace!(iteration, score = new_score, current = score, "rejected");
            }
        }

        Ok(Climb {
            sequence: current,
            passes,
            evaluations,
            accepted_scores,
        })
    }
}

/// Final state of a hill-climb
#[derive(Clone, Debug, PartialEq)]
pub struct Climb {
    /// Last accepted sequence
    pub sequence: Sequence,
    /// Whether every constraint passes on it
    pub passes: bool,
    /// Candidate sequences evaluated
    pub evaluations: usize,
    /// Aggregate violation after each accepted step, starting with the
    /// initial state
    pub accepted_scores: Vec<f64>,
}
