//! Objective optimization
//!
//! Greedy random hill-climbing on the weighted objective total, restricted to
//! sequences that keep every constraint satisfied.

use std::time::Instant;

use rand::Rng;
use tracing::{info, info_span, trace};

use crate::diagnostics::OptimizationReport;
use crate::error::{ChiselError, ChiselResult, UnresolvedConstraint};
use crate::mutation::apply;
use crate::problem::{OptimizeConfig, Problem};
use crate::specification::objectives::total_objective_score;

impl Problem {
    /// Improve the objectives while keeping every constraint satisfied
    pub fn optimize(&mut self, config: &OptimizeConfig) -> ChiselResult<OptimizationReport> {
        let mut rng = config.rng();
        self.optimize_with_rng(config, &mut rng)
    }

    /// Improve the objectives, drawing from `rng`
    ///
    /// All constraints must pass beforehand (resolve first). A mutated
    /// sequence is kept when every constraint still passes and the weighted
    /// objective total does not decrease.
    pub fn optimize_with_rng<R: Rng>(
        &mut self,
        config: &OptimizeConfig,
        rng: &mut R,
    ) -> ChiselResult<OptimizationReport> {
        config.validate()?;
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
        if !failing.is_empty() {
            return Err(ChiselError::Unresolved { loops: 0, failing });
        }

        let _span = info_span!("optimize", length = self.sequence().len()).entered();
        let start_time = Instant::now();
        let space = self.mutation_space()?;

        let mut score = self.objective_score();
        let mut report = OptimizationReport {
            initial_score: score,
            ..OptimizationReport::default()
        };

        if !space.is_empty() {
            for iteration in 0..config.max_iterations {
                report.iterations += 1;
                let batch = space.random_batch(config.mutations_per_step, rng);
                let candidate = apply(self.sequence(), &batch);
                if !self.constraints().iter().all(|c| c.evaluate(&candidate).passes) {
                    continue;
                }
                let candidate_score = total_objective_score(self.objectives(), &candidate);
                if candidate_score >= score {
                    trace!(iteration, score = candidate_score, "accepted");
                    score = candidate_score;
                    report.accepted += 1;
                    self.replace_sequence(candidate);
                }
            }
        }

        report.final_score = score;
        report.set_runtime(start_time.elapsed());
        info!(
            iterations = report.iterations,
            accepted = report.accepted,
            improvement = report.improvement(),
            "optimization finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biotables::translate;
    use crate::sequence::{Sequence, Window};
    use crate::specification::constraints::{AvoidPattern, DoNotModify, EnforceTranslation};
    use crate::specification::objectives::{MinimizeDifferences, TargetGcContent};
    use crate::specification::traits::{Constraint, Objective};

    #[test]
    fn test_requires_passing_constraints() {
        let constraints: Vec<Box<dyn Constraint>> =
            vec![Box::new(AvoidPattern::new("GATG").unwrap())];
        let mut problem = Problem::from_text("AGATGA", constraints, vec![]).unwrap();
        let err = problem.optimize(&OptimizeConfig::new().with_seed(0)).unwrap_err();
        assert!(matches!(err, ChiselError::Unresolved { loops: 0, .. }));
    }

    #[test]
    fn test_score_never_decreases() {
        let objectives: Vec<Box<dyn Objective>> = vec![Box::new(TargetGcContent::new(0.5))];
        let mut problem = Problem::from_text("AAAAAAAAAAAAAAAAAAAA", vec![], objectives).unwrap();
        let report = problem
            .optimize(&OptimizeConfig::new().with_seed(7).with_max_iterations(500))
            .unwrap();
        assert_eq!(report.iterations, 500);
        assert!(report.final_score >= report.initial_score);
        assert!(report.improvement() > 0.0);
        assert_eq!(report.final_score, problem.objective_score());
    }

    #[test]
    fn test_constraints_kept_while_optimizing() {
        let sequence = Sequence::new("ATGAAAGAACTGCATTAA").unwrap();
        let protein = translate(sequence.as_bytes()).unwrap();
        let constraints: Vec<Box<dyn Constraint>> = vec![
            Box::new(EnforceTranslation::preserving(&sequence, sequence.full_window()).unwrap()),
            Box::new(AvoidPattern::new("GAAG").unwrap()),
        ];
        let objectives: Vec<Box<dyn Objective>> = vec![Box::new(TargetGcContent::new(0.6))];
        let mut problem = Problem::new(sequence, constraints, objectives);
        problem
            .optimize(&OptimizeConfig::new().with_seed(11).with_max_iterations(300))
            .unwrap();
        assert!(problem.all_constraints_pass());
        assert_eq!(translate(problem.sequence().as_bytes()).unwrap(), protein);
    }

    #[test]
    fn test_frozen_sequence_is_unchanged() {
        let constraints: Vec<Box<dyn Constraint>> =
            vec![Box::new(DoNotModify::new(Window::new(0, 4)))];
        let objectives: Vec<Box<dyn Objective>> = vec![Box::new(MinimizeDifferences::new(
            Sequence::new("GGGG").unwrap(),
        ))];
        let mut problem = Problem::from_text("ATAT", constraints, objectives).unwrap();
        let report = problem.optimize(&OptimizeConfig::new().with_seed(1)).unwrap();
        assert_eq!(report.iterations, 0);
        assert_eq!(report.improvement(), 0.0);
        assert_eq!(problem.sequence().to_string(), "ATAT");
    }
}
