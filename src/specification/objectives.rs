//! Built-in objectives
//!
//! Objectives score a sequence (higher is better). Each carries a `boost`
//! weight used when objectives are summed.

use std::collections::HashMap;

use crate::sequence::utils::gc_content;
use crate::sequence::{Sequence, Window};
use crate::specification::evaluation::Evaluation;
use crate::specification::traits::Objective;

/// Minimize k-mers that occur more than once
///
/// Score is `-(k * non_unique_kmers / length)`, where `non_unique_kmers`
/// counts every occurrence of a repeated k-mer.
#[derive(Clone, Debug, PartialEq)]
pub struct MinimizeNonUniqueKmers {
    /// K-mer length
    pub k: usize,
    /// Weight in the total score
    pub boost: f64,
}

impl MinimizeNonUniqueKmers {
    /// Create the objective for k-mers of length `k`
    pub fn new(k: usize) -> Self {
        assert!(k > 0, "k must be positive");
        Self { k, boost: 1.0 }
    }

    /// Set the weight
    pub fn with_boost(mut self, boost: f64) -> Self {
        self.boost = boost;
        self
    }
}

impl Objective for MinimizeNonUniqueKmers {
    fn evaluate(&self, sequence: &Sequence) -> Evaluation {
        let bases = sequence.as_bytes();
        if bases.len() < self.k {
            return Evaluation::objective(0.0, Vec::new(), "Sequence shorter than k");
        }
        let mut counts: HashMap<&[u8], usize> = HashMap::new();
        for kmer in bases.windows(self.k) {
            *counts.entry(kmer).or_insert(0) += 1;
        }
        let non_unique: usize = counts.values().filter(|&&c| c > 1).sum();
        let score = -(self.k as f64 * non_unique as f64) / bases.len() as f64;
        Evaluation::objective(
            score,
            vec![sequence.full_window()],
            format!("Score: {score:.2} ({non_unique} non-unique {}-mers)", self.k),
        )
    }

    fn boost(&self) -> f64 {
        self.boost
    }

    fn label(&self) -> String {
        format!("MinimizeNonUniqueKmers(k={})", self.k)
    }
}

/// Bring GC content close to a target
#[derive(Clone, Debug, PartialEq)]
pub struct TargetGcContent {
    /// Target GC fraction
    pub target: f64,
    /// Optional region; the whole sequence otherwise
    pub region: Option<Window>,
    /// Weight in the total score
    pub boost: f64,
}

impl TargetGcContent {
    /// Create the objective for a target fraction in `[0, 1]`
    pub fn new(target: f64) -> Self {
        assert!((0.0..=1.0).contains(&target), "Target must be in [0, 1]");
        Self {
            target,
            region: None,
            boost: 1.0,
        }
    }

    /// Restrict to a region
    pub fn in_region(mut self, region: Window) -> Self {
        self.region = Some(region);
        self
    }

    /// Set the weight
    pub fn with_boost(mut self, boost: f64) -> Self {
        self.boost = boost;
        self
    }
}

impl Objective for TargetGcContent {
    fn evaluate(&self, sequence: &Sequence) -> Evaluation {
        let length = sequence.len();
        let region = self
            .region
            .map(|r| Window::new(r.start.min(length), r.end.min(length)))
            .unwrap_or_else(|| sequence.full_window());
        let gc = gc_content(sequence.slice(region));
        Evaluation::objective(
            -(gc - self.target).abs(),
            vec![region],
            format!("GC {:.1}% (target {:.1}%)", gc * 100.0, self.target * 100.0),
        )
    }

    fn boost(&self) -> f64 {
        self.boost
    }

    fn label(&self) -> String {
        format!("TargetGcContent({:.2})", self.target)
    }
}

/// Penalize every edit relative to a reference sequence
#[derive(Clone, Debug, PartialEq)]
pub struct MinimizeDifferences {
    /// Sequence to stay close to
    pub reference: Sequence,
    /// Weight in the total score
    pub boost: f64,
}

impl MinimizeDifferences {
    /// Create the objective
    pub fn new(reference: Sequence) -> Self {
        Self {
            reference,
            boost: 1.0,
        }
    }

    /// Set the weight
    pub fn with_boost(mut self, boost: f64) -> Self {
        self.boost = boost;
        self
    }
}

impl Objective for MinimizeDifferences {
    fn evaluate(&self, sequence: &Sequence) -> Evaluation {
        let edits = sequence
            .differences(&self.reference)
            .unwrap_or_else(|_| self.reference.len().max(sequence.len()));
        Evaluation::objective(
            -(edits as f64),
            vec![sequence.full_window()],
            format!("{edits} edit(s) from reference"),
        )
    }

    fn boost(&self) -> f64 {
        self.boost
    }

    fn label(&self) -> String {
        "MinimizeDifferences".to_string()
    }
}

/// Weighted sum of objective scores
pub fn total_objective_score(objectives: &[Box<dyn Objective>], sequence: &Sequence) -> f64 {
    objectives
        .iter()
        .map(|o| o.boost() * o.evaluate(sequence).score)
        .sum()
}
