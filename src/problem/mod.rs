//! Sequence design problems
//!
//! A [`Problem`] owns a sequence together with the constraints it must
//! satisfy and the objectives it should maximize. Resolution and
//! optimization edit the owned sequence in place.

pub mod config;
mod optimize;
mod resolve;

pub use config::{OptimizeConfig, ResolveConfig};

use std::fmt::Write;

use crate::error::{ChiselResult, ConflictError};
use crate::mutation::MutationSpace;
use crate::sequence::Sequence;
use crate::specification::evaluation::{aggregate_violation, Evaluation};
use crate::specification::objectives::total_objective_score;
use crate::specification::traits::{Constraint, Objective};

/// A sequence with its constraints and objectives
#[derive(Debug)]
pub struct Problem {
    sequence: Sequence,
    original_sequence: Sequence,
    constraints: Vec<Box<dyn Constraint>>,
    objectives: Vec<Box<dyn Objective>>,
}

impl Problem {
    /// Create a problem; the given sequence is remembered as the original
    pub fn new(
        sequence: Sequence,
        constraints: Vec<Box<dyn Constraint>>,
        objectives: Vec<Box<dyn Objective>>,
    ) -> Self {
        Self {
            original_sequence: sequence.clone(),
            sequence,
            constraints,
            objectives,
        }
    }

    /// Create a problem from raw sequence text
    pub fn from_text(
        text: &str,
        constraints: Vec<Box<dyn Constraint>>,
        objectives: Vec<Box<dyn Objective>>,
    ) -> ChiselResult<Self> {
        Ok(Self::new(Sequence::new(text)?, constraints, objectives))
    }

    /// Current sequence
    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    /// Sequence the problem was created with
    pub fn original_sequence(&self) -> &Sequence {
        &self.original_sequence
    }

    /// Replace the current sequence, keeping the original
    pub fn set_sequence(&mut self, text: &str) -> ChiselResult<()> {
        self.sequence = Sequence::new(text)?;
        Ok(())
    }

    pub(crate) fn replace_sequence(&mut self, sequence: Sequence) {
        self.sequence = sequence;
    }

    /// Constraints, in declaration order
    pub fn constraints(&self) -> &[Box<dyn Constraint>] {
        &self.constraints
    }

    /// Objectives, in declaration order
    pub fn objectives(&self) -> &[Box<dyn Objective>] {
        &self.objectives
    }

    /// Evaluate every constraint against the current sequence
    pub fn all_constraints_evaluations(&self) -> Vec<Evaluation> {
        self.constraints
            .iter()
            .map(|c| c.evaluate(&self.sequence))
            .collect()
    }

    /// Check if every constraint passes
    pub fn all_constraints_pass(&self) -> bool {
        self.constraints
            .iter()
            .all(|c| c.evaluate(&self.sequence).passes)
    }

    /// Sum of scores of the failing constraints
    pub fn violation_score(&self) -> f64 {
        aggregate_violation(&self.all_constraints_evaluations())
    }

    /// Evaluate every objective against the current sequence
    pub fn all_objectives_evaluations(&self) -> Vec<Evaluation> {
        self.objectives
            .iter()
            .map(|o| o.evaluate(&self.sequence))
            .collect()
    }

    /// Boost-weighted sum of objective scores
    pub fn objective_score(&self) -> f64 {
        total_objective_score(&self.objectives, &self.sequence)
    }

    /// Mutation space of the current sequence under the constraints
    pub fn mutation_space(&self) -> Result<MutationSpace, ConflictError> {
        MutationSpace::build(&self.sequence, &self.constraints)
    }

    /// Number of sequence variants reachable by the mutation space
    pub fn mutation_space_size(&self) -> Result<u128, ConflictError> {
        Ok(self.mutation_space()?.size())
    }

    /// Positions that differ from the original sequence
    pub fn number_of_edits(&self) -> ChiselResult<usize> {
        Ok(self.sequence.differences(&self.original_sequence)?)
    }

    /// One line per constraint, under a SUCCESS or FAILURE header
    pub fn constraints_text_summary(&self, failed_only: bool) -> String {
        let evaluations = self.all_constraints_evaluations();
        let failed = evaluations.iter().filter(|e| !e.passes).count();

        let mut summary = if failed == 0 {
            "===> SUCCESS - all constraints evaluations pass\n".to_string()
        } else {
            format!("===> FAILURE: {failed} constraints evaluations failed\n")
        };
        for (constraint, evaluation) in self.constraints.iter().zip(&evaluations) {
            if failed_only && evaluation.passes {
                continue;
            }
            let status = if evaluation.passes { "PASS" } else { "FAIL" };
            let _ = writeln!(
                summary,
                "{} {status} | score {:.2} | {}",
                constraint.label(),
                evaluation.score,
                evaluation.message
            );
        }
        summary
    }

    /// One line per objective, under a header with the weighted total
    pub fn objectives_text_summary(&self) -> String {
        let mut summary = format!("===> TOTAL OBJECTIVES SCORE: {:.2}\n", self.objective_score());
        for (objective, evaluation) in self.objectives.iter().zip(self.all_objectives_evaluations()) {
            let _ = writeln!(
                summary,
                "{} | score {:.2} (boost {}) | {}",
                objective.label(),
                evaluation.score,
                objective.boost(),
                evaluation.message
            );
        }
        summary
    }
}

pub mod prelude {
    pub use super::config::{OptimizeConfig, ResolveConfig};
    pub use super::Problem;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChiselError;
    use crate::sequence::Window;
    use crate::specification::constraints::{AvoidPattern, DoNotModify, EnforceTranslation};
    use crate::specification::objectives::TargetGcContent;

    fn pattern_problem() -> Problem {
        let constraints: Vec<Box<dyn Constraint>> = vec![
            Box::new(DoNotModify::new(Window::new(0, 3))),
            Box::new(AvoidPattern::new("GATG").unwrap()),
        ];
        Problem::from_text("ATGATGATG", constraints, vec![]).unwrap()
    }

    #[test]
    fn test_from_text_rejects_invalid() {
        let err = Problem::from_text("ATGX", vec![], vec![]).unwrap_err();
        assert!(matches!(err, ChiselError::Sequence(_)));
    }

    #[test]
    fn test_evaluations_in_declaration_order() {
        let problem = pattern_problem();
        let evaluations = problem.all_constraints_evaluations();
        assert_eq!(evaluations.len(), 2);
        assert!(evaluations[0].passes);
        assert!(!evaluations[1].passes);
        assert_eq!(evaluations[1].windows, vec![Window::new(2, 6), Window::new(5, 9)]);
        assert!(!problem.all_constraints_pass());
        assert_eq!(problem.violation_score(), 2.0);
    }

    #[test]
    fn test_mutation_space_size() {
        let problem = pattern_problem();
        // Six free positions, five choices each
        assert_eq!(problem.mutation_space_size().unwrap(), 15_625);
    }

    #[test]
    fn test_conflicting_space() {
        let constraints: Vec<Box<dyn Constraint>> = vec![
            Box::new(DoNotModify::new(Window::new(0, 3))),
            Box::new(EnforceTranslation::new(Window::new(0, 3), "W").unwrap()),
        ];
        let problem = Problem::from_text("AAA", constraints, vec![]).unwrap();
        assert!(problem.mutation_space().is_err());
    }

    #[test]
    fn test_number_of_edits() {
        let mut problem = pattern_problem();
        assert_eq!(problem.number_of_edits().unwrap(), 0);
        problem.set_sequence("ATGATAATC").unwrap();
        assert_eq!(problem.number_of_edits().unwrap(), 2);
        assert_eq!(problem.original_sequence().to_string(), "ATGATGATG");
        assert!(problem.set_sequence("ATGN").is_err());
    }

    #[test]
    fn test_constraints_summary() {
        let problem = pattern_problem();
        let summary = problem.constraints_text_summary(false);
        assert!(summary.starts_with("===> FAILURE: 1 constraints evaluations failed"));
        assert!(summary.contains("DoNotModify[0, 3) PASS"));
        assert!(summary.contains("AvoidPattern(GATG) FAIL"));

        let failed = problem.constraints_text_summary(true);
        assert!(!failed.contains("DoNotModify"));

        let solved = Problem::from_text("ATGC", vec![], vec![]).unwrap();
        assert!(solved
            .constraints_text_summary(false)
            .starts_with("===> SUCCESS"));
    }

    #[test]
    fn test_objectives_summary() {
        let objectives: Vec<Box<dyn Objective>> = vec![Box::new(TargetGcContent::new(0.5))];
        let problem = Problem::from_text("GGGG", vec![], objectives).unwrap();
        assert_eq!(problem.objective_score(), -0.5);
        let summary = problem.objectives_text_summary();
        assert!(summary.starts_with("===> TOTAL OBJECTIVES SCORE: -0.50"));
    }
}
