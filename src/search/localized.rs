//! Localized solver
//!
//! Fixes a failing constraint one violation window at a time. Each window
//! becomes a sub-problem on a copy of the sequence where only the window and
//! a margin around it may change; the sub-problem is searched exhaustively
//! when its mutation space is small, randomly otherwise, and the result is
//! copied back into the parent.

use rand::Rng;
use tracing::debug;

use crate::diagnostics::LocalizationStats;
use crate::error::{ChiselError, ChiselResult};
use crate::problem::{Problem, ResolveConfig};
use crate::search::{ExhaustiveSearch, RandomSearch};
use crate::sequence::Window;
use crate::specification::constraints::DoNotModify;
use crate::specification::traits::Constraint;

/// Solves one constraint of a problem by decomposition into windows
#[derive(Clone, Debug)]
pub struct LocalizedSolver {
    /// Positions on each side of a violation window that may change
    pub margin: usize,
    /// Mutation spaces at least this large are searched randomly
    pub randomization_threshold: u64,
    /// Iteration budget of each random search
    pub max_random_iterations: usize,
    /// Maximum violation windows handled per call
    pub max_windows: Option<usize>,
}

impl Default for LocalizedSolver {
    fn default() -> Self {
        Self::from_config(&ResolveConfig::default())
    }
}

impl LocalizedSolver {
    /// Create a solver with the localization settings of a configuration
    pub fn from_config(config: &ResolveConfig) -> Self {
        Self {
            margin: config.margin,
            randomization_threshold: config.randomization_threshold,
            max_random_iterations: config.max_random_iterations,
            max_windows: config.max_windows_per_constraint,
        }
    }

    /// Solve constraint `index` of `problem`, editing its sequence in place
    ///
    /// A passing constraint is left alone. Windows are handled in the order
    /// the evaluation reports them, each one seeing the edits of the previous
    /// ones. The first failing sub-search aborts the call; edits from windows
    /// already solved are kept.
    pub fn solve<R: Rng>(
        &self,
        problem: &mut Problem,
        index: usize,
        rng: &mut R,
    ) -> ChiselResult<LocalizationStats> {
        let mut stats = LocalizationStats::default();
        let Some(constraint) = problem.constraints().get(index) else {
            return Err(ChiselError::Configuration(format!(
                "no constraint at index {index}"
            )));
        };

        let evaluation = constraint.evaluate(problem.sequence());
        if evaluation.passes {
            return Ok(stats);
        }
        if evaluation.windows.is_empty() {
            return Err(ChiselError::NotLocalizable {
                constraint: constraint.label(),
                message: evaluation.message,
            });
        }

        let limit = self.max_windows.unwrap_or(usize::MAX);
        for window in evaluation.windows.into_iter().take(limit) {
            let child = self.sub_problem(problem, index, window);
            let size = child.mutation_space_size()?;

            let outcome = if size < u128::from(self.randomization_threshold) {
                debug!(%window, size = %size, strategy = "exhaustive", "solving window");
                ExhaustiveSearch::new().search(&child)?
            } else {
                debug!(%window, size = %size, strategy = "random", "solving window");
                RandomSearch::new(self.max_random_iterations, 1).search(&child, rng)?
            };

            stats.record_search(outcome.strategy, outcome.evaluations);
            problem.replace_sequence(outcome.sequence);
        }

        Ok(stats)
    }

    /// Sub-problem confined to `window` plus the margin
    fn sub_problem(&self, problem: &Problem, index: usize, window: Window) -> Problem {
        let sequence = problem.sequence();
        let length = sequence.len();
        let margin = window.expand(self.margin, length);

        let mut constraints: Vec<Box<dyn Constraint>> = vec![
            Box::new(DoNotModify::new(Window::new(0, margin.start))),
            Box::new(DoNotModify::new(Window::new(margin.end, length))),
            problem.constraints()[index].localized(window),
        ];
        // Constraints already broken inside the window are left for a later loop
        constraints.extend(
            problem
                .constraints()
                .iter()
                .enumerate()
                .filter(|&(i, _)| i != index)
                .map(|(_, c)| c.localized(window))
                .filter(|c| c.evaluate(sequence).passes),
        );

        Problem::new(sequence.clone(), constraints, Vec::new())
    }
}
