//! # chisel-evo
//!
//! Constraint-driven DNA sequence design.
//!
//! A [`Problem`](problem::Problem) pairs a nucleotide sequence with hard
//! constraints (frozen regions, preserved translations, forbidden patterns,
//! GC bounds) and soft objectives. Resolution edits the sequence until every
//! constraint passes by solving each violation in a small window around it;
//! optimization then climbs the objectives without breaking a constraint.
//!
//! ## Core Concepts
//!
//! - **Mutation space**: which positions or codons may change, and to what
//! - **Localization**: each violation window becomes a sub-problem with the
//!   rest of the sequence frozen
//! - **Search**: small sub-problems are enumerated, large ones hill-climbed
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use chisel_evo::prelude::*;
//!
//! let sequence = Sequence::new("ATGAAAGGATCCAAAGAACTGCATTATTAA")?;
//! let constraints: Vec<Box<dyn Constraint>> = vec![
//!     Box::new(EnforceTranslation::preserving(&sequence, sequence.full_window())?),
//!     Box::new(AvoidPattern::new("GGATCC")?),
//! ];
//! let mut problem = Problem::new(sequence, constraints, vec![]);
//!
//! let report = problem.resolve(&ResolveConfig::new().with_seed(42))?;
//! println!("{}", report.summary());
//! println!("{}", problem.sequence());
//! ```
//!
//! Random searches are only reproducible with a seed; without one the
//! generator is seeded from entropy.

pub mod biotables;
pub mod diagnostics;
pub mod error;
pub mod mutation;
pub mod problem;
pub mod search;
pub mod sequence;
pub mod specification;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::biotables::{reverse_translate, synonymous_codons, translate};
    pub use crate::diagnostics::prelude::*;
    pub use crate::error::*;
    pub use crate::mutation::prelude::*;
    pub use crate::problem::prelude::*;
    pub use crate::search::prelude::*;
    pub use crate::sequence::prelude::*;
    pub use crate::specification::prelude::*;
}
