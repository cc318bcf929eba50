//! Mutation space
//!
//! For every locus of a sequence (a single position, or a codon governed by
//! a translation constraint), the list of values it may take.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::biotables::synonymous_codons;
use crate::error::ConflictError;
use crate::sequence::{Sequence, Window, ALPHABET};
use crate::specification::traits::{Constraint, MutationRole};

/// An addressable site of the sequence
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Locus {
    /// A single position (one-base substitution)
    Position(usize),
    /// A window replaced as a whole (codon substitution)
    Span(Window),
}

impl Locus {
    /// Positions covered by this locus
    pub fn window(&self) -> Window {
        match *self {
            Locus::Position(p) => Window::new(p, p + 1),
            Locus::Span(w) => w,
        }
    }
}

impl fmt::Display for Locus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locus::Position(p) => write!(f, "{p}"),
            Locus::Span(w) => write!(f, "{w}"),
        }
    }
}

/// A value to write at a locus
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mutation {
    /// Where to write
    pub locus: Locus,
    /// What to write (one base per covered position)
    pub value: Vec<u8>,
}

impl Mutation {
    /// Create a mutation
    pub fn new(locus: Locus, value: impl Into<Vec<u8>>) -> Self {
        Self {
            locus,
            value: value.into(),
        }
    }
}

/// Loci of a sequence with their alternative values, in a fixed order
///
/// Codon loci come first (constraint declaration order, then codon order),
/// followed by free positions in increasing order. Loci never overlap.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MutationSpace {
    loci: Vec<(Locus, Vec<Vec<u8>>)>,
}

impl MutationSpace {
    /// Compute the mutation space of a sequence under a set of constraints
    ///
    /// Fails when a translation constraint cannot be reconciled with the
    /// frozen positions of a codon inside its scope. An irreconcilable codon
    /// outside the scope keeps its current bases and gets no locus.
    pub fn build(
        sequence: &Sequence,
        constraints: &[Box<dyn Constraint>],
    ) -> Result<Self, ConflictError> {
        let length = sequence.len();
        let mut frozen = vec![false; length];
        for constraint in constraints {
            if let MutationRole::Frozen(window) = constraint.mutation_role() {
                let end = window.end.min(length);
                for flag in frozen.iter_mut().take(end).skip(window.start) {
                    *flag = true;
                }
            }
        }

        let mut free: Vec<bool> = frozen.iter().map(|f| !f).collect();
        let mut loci = Vec::new();

        for constraint in constraints {
            let MutationRole::Translation {
                window,
                protein,
                scope,
            } = constraint.mutation_role()
            else {
                continue;
            };
            for (i, &residue) in protein.iter().enumerate() {
                let start = window.start + 3 * i;
                let codon = Window::new(start, start + 3);
                if codon.end > length {
                    break;
                }
                let conflict = || ConflictError {
                    codon,
                    amino_acid: residue as char,
                };
                let current = sequence.slice(codon);
                let locked: Vec<usize> = (0..3).filter(|&j| !free[start + j]).collect();

                let mut candidates: Vec<Vec<u8>> = synonymous_codons(residue)
                    .map_err(|_| conflict())?
                    .iter()
                    .map(|c| c.as_bytes())
                    .filter(|c| locked.iter().all(|&j| c[j] == current[j]))
                    .map(<[u8]>::to_vec)
                    .collect();
                if candidates.is_empty() {
                    if codon.overlaps(&scope) {
                        return Err(conflict());
                    }
                    for flag in &mut free[codon.range()] {
                        *flag = false;
                    }
                    continue;
                }

                // A codon sharing positions with an earlier codon locus stays
                // as it is, which keeps loci disjoint.
                let claimed = locked.iter().any(|&j| !frozen[start + j]);
                for flag in &mut free[codon.range()] {
                    *flag = false;
                }
                if claimed {
                    continue;
                }

                candidates.retain(|c| c.as_slice() != current);
                if !candidates.is_empty() {
                    loci.push((Locus::Span(codon), candidates));
                }
            }
        }

        for (position, _) in free.iter().enumerate().filter(|(_, &f)| f) {
            let candidates = ALPHABET.iter().map(|&b| vec![b]).collect();
            loci.push((Locus::Position(position), candidates));
        }

        Ok(Self { loci })
    }

    /// Number of loci
    pub fn len(&self) -> usize {
        self.loci.len()
    }

    /// Check if no locus may change
    pub fn is_empty(&self) -> bool {
        self.loci.is_empty()
    }

    /// Loci and their candidate values, in order
    pub fn loci(&self) -> impl Iterator<Item = (&Locus, &[Vec<u8>])> {
        self.loci.iter().map(|(l, c)| (l, c.as_slice()))
    }

    /// Candidate values at a locus, if it belongs to the space
    pub fn candidates(&self, locus: &Locus) -> Option<&[Vec<u8>]> {
        self.loci
            .iter()
            .find(|(l, _)| l == locus)
            .map(|(_, c)| c.as_slice())
    }

    /// Number of combinations, counting "no mutation" at every locus
    ///
    /// Saturates at `u128::MAX`.
    pub fn size(&self) -> u128 {
        self.loci
            .iter()
            .fold(1u128, |acc, (_, c)| acc.saturating_mul(c.len() as u128 + 1))
    }

    /// Iterate over every combination, the all-no-op one first
    pub fn combinations(&self) -> Combinations<'_> {
        Combinations {
            space: self,
            indices: vec![0; self.loci.len()],
            done: false,
        }
    }

    /// A uniformly random locus with a uniformly random candidate value
    pub fn random_mutation<R: Rng>(&self, rng: &mut R) -> Option<Mutation> {
        if self.loci.is_empty() {
            return None;
        }
        let (locus, candidates) = &self.loci[rng.gen_range(0..self.loci.len())];
        let value = candidates[rng.gen_range(0..candidates.len())].clone();
        Some(Mutation {
            locus: *locus,
            value,
        })
    }

    /// `count` independent random mutations (loci drawn with replacement)
    pub fn random_batch<R: Rng>(&self, count: usize, rng: &mut R) -> Vec<Option<Mutation>> {
        (0..count).map(|_| self.random_mutation(rng)).collect()
    }
}

/// Iterator over the Cartesian product of a mutation space
///
/// Each locus offers "no mutation" first; the last locus varies fastest.
pub struct Combinations<'a> {
    space: &'a MutationSpace,
    indices: Vec<usize>,
    done: bool,
}

impl Iterator for Combinations<'_> {
    type Item = Vec<Option<Mutation>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let combination = self
            .indices
            .iter()
            .zip(&self.space.loci)
            .map(|(&choice, (locus, candidates))| {
                (choice > 0).then(|| Mutation {
                    locus: *locus,
                    value: candidates[choice - 1].clone(),
                })
            })
            .collect();

        // Odometer increment, carrying towards the first locus
        self.done = true;
        for (index, (_, candidates)) in self.indices.iter_mut().zip(&self.space.loci).rev() {
            if *index < candidates.len() {
                *index += 1;
                self.done = false;
                break;
            }
            *index = 0;
        }

        Some(combination)
    }
}
