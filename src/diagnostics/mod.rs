//! Diagnostics and statistics
//!
//! This module provides statistics collected while resolving constraints and
//! optimizing objectives.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::SearchStrategy;

/// Statistics for one localized solve (one constraint, all its windows)
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LocalizationStats {
    /// Violation windows turned into sub-problems
    pub windows: usize,
    /// Sub-problems searched exhaustively
    pub exhaustive_runs: usize,
    /// Sub-problems searched randomly
    pub random_runs: usize,
    /// Constraint evaluation passes performed by the searches
    pub evaluations: usize,
}

impl LocalizationStats {
    /// Record one solved sub-problem
    pub fn record_search(&mut self, strategy: SearchStrategy, evaluations: usize) {
        self.windows += 1;
        self.evaluations += evaluations;
        match strategy {
            SearchStrategy::Exhaustive => self.exhaustive_runs += 1,
            SearchStrategy::Random => self.random_runs += 1,
        }
    }
}

/// Statistics for one evaluate-then-localize loop
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LoopStats {
    /// Loop number, starting at 0
    pub index: usize,
    /// Constraints failing when the loop started
    pub failing: usize,
    /// Aggregate violation score when the loop started
    pub violation: f64,
}

/// Statistics for a whole resolution run
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolutionReport {
    /// Per-loop statistics
    pub loops: Vec<LoopStats>,
    /// Violation windows turned into sub-problems
    pub windows_solved: usize,
    /// Sub-problems searched exhaustively
    pub exhaustive_runs: usize,
    /// Sub-problems searched randomly
    pub random_runs: usize,
    /// Searches that gave up, to be retried in a later loop
    pub exhausted_searches: usize,
    /// Constraint evaluation passes performed
    pub evaluations: usize,
    /// Positions that differ from the sequence before resolution
    pub edits: usize,
    /// Total runtime in milliseconds
    pub total_runtime_ms: f64,
}

impl ResolutionReport {
    /// Create an empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the start of a loop
    pub fn record_loop(&mut self, stats: LoopStats) {
        self.loops.push(stats);
    }

    /// Fold in the statistics of a localized solve
    pub fn absorb(&mut self, stats: &LocalizationStats) {
        self.windows_solved += stats.windows;
        self.exhaustive_runs += stats.exhaustive_runs;
        self.random_runs += stats.random_runs;
        self.evaluations += stats.evaluations;
    }

    /// Record a search that gave up
    pub fn record_exhausted(&mut self, evaluations: usize) {
        self.exhausted_searches += 1;
        self.evaluations += evaluations;
    }

    /// Number of loops that had failing constraints to solve
    pub fn num_loops(&self) -> usize {
        self.loops.iter().filter(|l| l.failing > 0).count()
    }

    /// Set the total runtime
    pub fn set_runtime(&mut self, duration: Duration) {
        self.total_runtime_ms = duration.as_secs_f64() * 1000.0;
    }

    /// Get a summary of the run
    pub fn summary(&self) -> String {
        format!(
            "Resolution Summary:\n\
             - Loops: {}\n\
             - Windows solved: {} ({} exhaustive, {} random, {} exhausted)\n\
             - Evaluations: {}\n\
             - Edits: {}\n\
             - Runtime: {:.2}ms",
            self.num_loops(),
            self.windows_solved,
            self.exhaustive_runs,
            self.random_runs,
            self.exhausted_searches,
            self.evaluations,
            self.edits,
            self.total_runtime_ms
        )
    }
}

/// Statistics for an objective optimization run
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OptimizationReport {
    /// Iterations performed
    pub iterations: usize,
    /// Mutation batches accepted
    pub accepted: usize,
    /// Weighted objective score before optimization
    pub initial_score: f64,
    /// Weighted objective score after optimization
    pub final_score: f64,
    /// Total runtime in milliseconds
    pub total_runtime_ms: f64,
}

impl OptimizationReport {
    /// Improvement of the weighted objective score
    pub fn improvement(&self) -> f64 {
        self.final_score - self.initial_score
    }

    /// Set the total runtime
    pub fn set_runtime(&mut self, duration: Duration) {
        self.total_runtime_ms = duration.as_secs_f64() * 1000.0;
    }
}

pub mod prelude {
    pub use super::{LocalizationStats, LoopStats, OptimizationReport, ResolutionReport};
}
