//! Constraint and objective traits
//!
//! Both traits evaluate a sequence snapshot without side effects. Constraints
//! can also be localized to a window and may declare how they shape the
//! mutation space.

use std::fmt::Debug;

use crate::sequence::{Sequence, Window};
use crate::specification::evaluation::Evaluation;

/// How a constraint restricts the mutation space
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MutationRole<'a> {
    /// The constraint does not restrict which positions may change
    Unconstrained,
    /// Positions of the window must keep their current bases
    Frozen(Window),
    /// Codons of the window must keep encoding `protein`
    Translation {
        /// Codon-aligned coding window
        window: Window,
        /// One residue per codon of the window
        protein: &'a [u8],
        /// Codons overlapping this window must be able to encode their
        /// residue; the others may be left as they are
        scope: Window,
    },
}

/// A hard constraint on a sequence
///
/// Evaluation must be pure: evaluating twice against the same sequence yields
/// the same evaluation.
pub trait Constraint: Debug + Send + Sync {
    /// Evaluate the constraint against a sequence
    fn evaluate(&self, sequence: &Sequence) -> Evaluation;

    /// A copy of this constraint scoped to `window`
    ///
    /// Constraints with nothing to check inside the window return an
    /// [`AlwaysPass`](crate::specification::constraints::AlwaysPass).
    fn localized(&self, window: Window) -> Box<dyn Constraint>;

    /// How this constraint shapes the mutation space
    fn mutation_role(&self) -> MutationRole<'_> {
        MutationRole::Unconstrained
    }

    /// Short label for summaries and errors
    fn label(&self) -> String;
}

/// A soft objective to maximize
pub trait Objective: Debug + Send + Sync {
    /// Evaluate the objective; higher scores are better
    fn evaluate(&self, sequence: &Sequence) -> Evaluation;

    /// Weight of this objective in the total score
    fn boost(&self) -> f64 {
        1.0
    }

    /// Short label for summaries
    fn label(&self) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct LengthAtLeast(usize);

    impl Constraint for LengthAtLeast {
        fn evaluate(&self, sequence: &Sequence) -> Evaluation {
            if sequence.len() >= self.0 {
                Evaluation::pass("long enough")
            } else {
                Evaluation::fail((self.0 - sequence.len()) as f64, vec![], "too short")
            }
        }

        fn localized(&self, _window: Window) -> Box<dyn Constraint> {
            Box::new(LengthAtLeast(self.0))
        }

        fn label(&self) -> String {
            format!("LengthAtLeast({})", self.0)
        }
    }

    #[test]
    fn test_default_mutation_role() {
        let constraint = LengthAtLeast(3);
        assert_eq!(constraint.mutation_role(), MutationRole::Unconstrained);
    }

    #[test]
    fn test_trait_object_evaluation() {
        let constraints: Vec<Box<dyn Constraint>> = vec![Box::new(LengthAtLeast(5))];
        let seq = Sequence::new("ATG").unwrap();
        let evaluation = constraints[0].evaluate(&seq);
        assert!(!evaluation.passes);
        assert_eq!(evaluation.score, 2.0);
        assert_eq!(constraints[0].localized(Window::new(0, 1)).label(), "LengthAtLeast(5)");
    }
}
