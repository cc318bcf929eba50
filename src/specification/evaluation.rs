//! Evaluation results

use serde::{Deserialize, Serialize};

use crate::sequence::Window;

/// Result of evaluating a constraint or objective against a sequence
///
/// Constraints report `score == 0.0` when passing and a positive severity
/// when failing. Objectives always pass and report a score where higher is
/// better.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Whether the constraint is satisfied
    pub passes: bool,
    /// Severity (constraints) or quality (objectives)
    pub score: f64,
    /// Windows where an edit could resolve the violation
    pub windows: Vec<Window>,
    /// Human-readable diagnostic
    pub message: String,
}

impl Evaluation {
    /// A passing constraint evaluation
    pub fn pass(message: impl Into<String>) -> Self {
        Self {
            passes: true,
            score: 0.0,
            windows: Vec::new(),
            message: message.into(),
        }
    }

    /// A failing constraint evaluation
    pub fn fail(score: f64, windows: Vec<Window>, message: impl Into<String>) -> Self {
        Self {
            passes: false,
            score,
            windows,
            message: message.into(),
        }
    }

    /// An objective evaluation
    pub fn objective(score: f64, windows: Vec<Window>, message: impl Into<String>) -> Self {
        Self {
            passes: true,
            score,
            windows,
            message: message.into(),
        }
    }

    /// Contribution to the aggregate violation score
    pub fn violation(&self) -> f64 {
        if self.passes {
            0.0
        } else {
            self.score
        }
    }
}

/// Sum of scores over failing evaluations
pub fn aggregate_violation<'a>(evaluations: impl IntoIterator<Item = &'a Evaluation>) -> f64 {
    evaluations.into_iter().map(Evaluation::violation).sum()
}
