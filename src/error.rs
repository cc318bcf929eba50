//! Error types for chisel-evo
//!
//! This module defines all error types used throughout the library.

use std::fmt;

use thiserror::Error;

use crate::sequence::Window;

/// Error type for sequence and window operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SequenceError {
    /// A symbol outside the `ACGT` alphabet was found
    #[error("Invalid nucleotide {symbol:?} at position {position}")]
    InvalidNucleotide { position: usize, symbol: char },

    /// A window does not fit in the sequence
    #[error("Window [{start}, {end}) is out of bounds for a sequence of length {length}")]
    WindowOutOfBounds {
        start: usize,
        end: usize,
        length: usize,
    },

    /// Two sequences were compared positionally with different lengths
    #[error("Length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// A coding window whose length is not a multiple of three
    #[error("Window of length {0} is not a whole number of codons")]
    NotCodonAligned(usize),

    /// A protein and its coding window disagree in length
    #[error("Protein of {residues} residues cannot be encoded by {codons} codons")]
    ProteinLengthMismatch { residues: usize, codons: usize },

    /// No codon encodes this residue in the genetic code
    #[error("Unknown amino acid: {0:?}")]
    UnknownAminoAcid(char),

    /// A pattern could not be compiled
    #[error("Invalid pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

/// A translation requirement that contradicts the immutable positions of a codon
#[derive(Debug, Error, Clone, PartialEq)]
#[error(
    "Translation constraint clashes with immutable positions: no codon for {amino_acid:?} \
     agrees with the frozen bases of codon {codon}"
)]
pub struct ConflictError {
    /// The codon whose candidate set became empty
    pub codon: Window,
    /// The residue the codon must encode
    pub amino_acid: char,
}

/// Which search strategy gave up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStrategy {
    /// Full enumeration of the mutation space
    Exhaustive,
    /// Greedy random hill-climbing
    Random,
}

impl fmt::Display for SearchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exhaustive => write!(f, "exhaustive"),
            Self::Random => write!(f, "random"),
        }
    }
}

/// A constraint that was still failing when resolution stopped
#[derive(Debug, Clone, PartialEq)]
pub struct UnresolvedConstraint {
    /// Label of the constraint
    pub constraint: String,
    /// Diagnostic of its last evaluation
    pub message: String,
}

impl fmt::Display for UnresolvedConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.constraint, self.message)
    }
}

/// Top-level error type for resolution and optimization
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ChiselError {
    /// Sequence error
    #[error("Sequence error: {0}")]
    Sequence(#[from] SequenceError),

    /// Mutation space could not be built
    #[error("Conflict: {0}")]
    Conflict(#[from] ConflictError),

    /// A search strategy ran out of candidates or iterations
    #[error("The {strategy} search found no satisfying sequence after {evaluations} evaluations")]
    SearchExhausted {
        strategy: SearchStrategy,
        evaluations: usize,
    },

    /// A failing constraint reported no violation window
    #[error("Constraint {constraint} fails but reports no violation window ({message})")]
    NotLocalizable { constraint: String, message: String },

    /// The loop budget ran out with constraints still failing
    #[error(
        "Could not solve all constraints in {loops} loops: {}",
        .failing.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
    )]
    Unresolved {
        loops: usize,
        failing: Vec<UnresolvedConstraint>,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// Configuration (de)serialization failed
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for ChiselError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type alias for resolution operations
pub type ChiselResult<T> = Result<T, ChiselError>;
