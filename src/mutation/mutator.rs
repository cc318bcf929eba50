//! Sequence mutator
//!
//! Applies mutations to a working copy. Values are written as given: the
//! mutator does not check them against the alphabet.

use crate::mutation::space::{Locus, Mutation};
use crate::sequence::Sequence;

/// Write one mutation into a buffer
///
/// Writes falling outside the buffer are dropped.
pub fn apply_in_place(buffer: &mut Sequence, mutation: &Mutation) {
    let bases = buffer.as_mut_bytes();
    match mutation.locus {
        Locus::Position(position) => {
            if let (Some(slot), Some(&value)) = (bases.get_mut(position), mutation.value.first()) {
                *slot = value;
            }
        }
        Locus::Span(window) => {
            for (slot, &value) in bases
                .iter_mut()
                .skip(window.start)
                .take(window.len())
                .zip(&mutation.value)
            {
                *slot = value;
            }
        }
    }
}

/// Apply mutations in order to a copy of `sequence`
///
/// `None` entries are no-ops. A later mutation overwrites an earlier one on
/// shared positions. The input sequence is left untouched.
pub fn apply(sequence: &Sequence, mutations: &[Option<Mutation>]) -> Sequence {
    let mut buffer = sequence.clone();
    for mutation in mutations.iter().flatten() {
        apply_in_place(&mut buffer, mutation);
    }
    buffer
}
