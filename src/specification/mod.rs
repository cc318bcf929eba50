//! Constraints and objectives
//!
//! This module defines the evaluation contract shared by hard constraints and
//! soft objectives, plus the built-in catalog of both.

pub mod constraints;
pub mod evaluation;
pub mod objectives;
pub mod traits;

pub mod prelude {
    pub use super::constraints::*;
    pub use super::evaluation::*;
    pub use super::objectives::*;
    pub use super::traits::*;
}
