//! Constraint resolution
//!
//! Repeats "evaluate every constraint, then solve each failing one by
//! localization" until everything passes or the loop budget runs out.

use std::time::Instant;

use rand::Rng;
use tracing::{info, info_span, warn};

use crate::diagnostics::{LoopStats, ResolutionReport};
use crate::error::{ChiselError, ChiselResult, UnresolvedConstraint};
use crate::problem::{Problem, ResolveConfig};
use crate::search::LocalizedSolver;
use crate::sequence::Sequence;
use crate::specification::evaluation::aggregate_violation;

impl Problem {
    /// Edit the sequence until every constraint passes
    ///
    /// Uses a generator seeded from `config.seed`, or from entropy when no
    /// seed is set.
    pub fn resolve(&mut self, config: &ResolveConfig) -> ChiselResult<ResolutionReport> {
        let mut rng = config.rng();
        self.resolve_with_rng(config, &mut rng)
    }

    /// Edit the sequence until every constraint passes, drawing from `rng`
    ///
    /// The failing constraints are collected once at the start of each loop
    /// and solved in declaration order. A search that gives up is logged and
    /// retried in the next loop; conflicts and unlocalizable constraints end
    /// the run. Edits are kept even when resolution fails.
    pub fn resolve_with_rng<R: Rng>(
        &mut self,
        config: &ResolveConfig,
        rng: &mut R,
    ) -> ChiselResult<ResolutionReport> {
        config.validate()?;
        let _span = info_span!("resolve", length = self.sequence().len()).entered();
        let start_time = Instant::now();
        let start_sequence = self.sequence().clone();
        let solver = LocalizedSolver::from_config(config);
        let mut report = ResolutionReport::new();

        for index in 0..config.max_loops {
            let evaluations = self.all_constraints_evaluations();
            let failing: Vec<usize> = evaluations
                .iter()
                .enumerate()
                .filter(|(_, e)| !e.passes)
                .map(|(i, _)| i)
                .collect();
            let violation = aggregate_violation(&evaluations);
            report.record_loop(LoopStats {
                index,
                failing: failing.len(),
                violation,
            });

            if failing.is_empty() {
                return Ok(self.finish(report, &start_sequence, start_time));
            }
            info!(loop_index = index, failing = failing.len(), violation, "solving failing constraints");

            for constraint in failing {
                match solver.solve(self, constraint, rng) {
                    Ok(stats) => report.absorb(&stats),
                    Err(ChiselError::SearchExhausted {
                        strategy,
                        evaluations,
                    }) => {
                        warn!(
                            constraint = %self.constraints()[constraint].label(),
                            %strategy,
                            evaluations,
                            "search exhausted, retrying next loop"
                        );
                        report.record_exhausted(evaluations);
                    }
                    Err(err) => return Err(err),
                }
            }
        }

        let failing: Vec<UnresolvedConstraint> = self
            .constraints()
            .iter()
            .map(|c| (c.label(), c.evaluate(self.sequence())))
            .filter(|(_, e)| !e.passes)
            .map(|(constraint, e)| UnresolvedConstraint {
                constraint,
                message: e.message,
            })
            .collect();

        if failing.is_empty() {
            return Ok(self.finish(report, &start_sequence, start_time));
        }

        warn!(loops = config.max_loops, failing = failing.len(), "resolution failed");
        Err(ChiselError::Unresolved {
            loops: config.max_loops,
            failing,
        })
    }

    fn finish(
        &self,
        mut report: ResolutionReport,
        start_sequence: &Sequence,
        start_time: Instant,
    ) -> ResolutionReport {
        report.edits = self.sequence().differences(start_sequence).unwrap_or(0);
        report.set_runtime(start_time.elapsed());
        info!(
            loops = report.num_loops(),
            edits = report.edits,
            evaluations = report.evaluations,
            "all constraints pass"
        );
        report
    }
}
