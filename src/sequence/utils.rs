//! Sequence-level helpers
//!
//! Complements, GC content, positional differences and random sequences.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::SequenceError;
use crate::sequence::dna::{Sequence, ALPHABET};
use crate::sequence::window::Window;

/// Residues drawn by [`random_protein_sequence`] between the start and stop
const RANDOM_RESIDUES: &[u8] = b"ACEDGFIHKLNQPSRTWVY";

/// Complement of a single base (non-nucleotide bytes are left unchanged)
pub fn complement_base(base: u8) -> u8 {
    match base {
        b'A' => b'T',
        b'T' => b'A',
        b'G' => b'C',
        b'C' => b'G',
        other => other,
    }
}

/// Complement of a sequence, e.g. `ATGCCG` -> `TACGGC`
pub fn complement(bases: &[u8]) -> Vec<u8> {
    bases.iter().map(|&b| complement_base(b)).collect()
}

/// Reverse complement of a sequence, e.g. `ATGCCG` -> `CGGCAT`
pub fn reverse_complement(bases: &[u8]) -> Vec<u8> {
    bases.iter().rev().map(|&b| complement_base(b)).collect()
}

/// Check if a sequence equals its own reverse complement
pub fn is_palindromic(bases: &[u8]) -> bool {
    reverse_complement(bases) == bases
}

/// Proportion of `G` and `C` bases, 0.0 for an empty slice
pub fn gc_content(bases: &[u8]) -> f64 {
    if bases.is_empty() {
        return 0.0;
    }
    let gc = bases.iter().filter(|&&b| b == b'G' || b == b'C').count();
    gc as f64 / bases.len() as f64
}

/// GC content of every sliding window of `window_size` bases
///
/// The i-th value covers `[i, i + window_size)`. Empty when the sequence is
/// shorter than the window.
pub fn sliding_gc_content(bases: &[u8], window_size: usize) -> Vec<f64> {
    if window_size == 0 || bases.len() < window_size {
        return Vec::new();
    }
    let is_gc = |b: u8| (b == b'G' || b == b'C') as usize;
    let mut count: usize = bases[..window_size].iter().map(|&b| is_gc(b)).sum();
    let mut values = Vec::with_capacity(bases.len() - window_size + 1);
    values.push(count as f64 / window_size as f64);
    for i in window_size..bases.len() {
        count = count + is_gc(bases[i]) - is_gc(bases[i - window_size]);
        values.push(count as f64 / window_size as f64);
    }
    values
}

fn check_same_length(a: &[u8], b: &[u8]) -> Result<(), SequenceError> {
    if a.len() != b.len() {
        return Err(SequenceError::LengthMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }
    Ok(())
}

/// Number of positions at which two sequences differ
pub fn sequences_differences(a: &[u8], b: &[u8]) -> Result<usize, SequenceError> {
    check_same_length(a, b)?;
    Ok(a.iter().zip(b).filter(|(x, y)| x != y).count())
}

/// Maximal runs of differing positions between two sequences
pub fn sequences_differences_segments(a: &[u8], b: &[u8]) -> Result<Vec<Window>, SequenceError> {
    check_same_length(a, b)?;
    let mut segments = Vec::new();
    let mut run_start: Option<usize> = None;
    for (i, (x, y)) in a.iter().zip(b).enumerate() {
        match (x != y, run_start) {
            (true, None) => run_start = Some(i),
            (false, Some(start)) => {
                segments.push(Window::new(start, i));
                run_start = None;
            }
            _ => {}
        }
    }
    if let Some(start) = run_start {
        segments.push(Window::new(start, a.len()));
    }
    Ok(segments)
}

/// Random DNA sequence with equiprobable bases
pub fn random_dna_sequence<R: Rng>(length: usize, rng: &mut R) -> Sequence {
    let bases = (0..length)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())])
        .collect();
    Sequence::from_bytes_unchecked(bases)
}

/// Random protein `M...*` of `length` residues (start and stop included)
pub fn random_protein_sequence<R: Rng>(length: usize, rng: &mut R) -> String {
    assert!(length >= 2, "A protein needs room for its start and stop");
    let mut protein = String::with_capacity(length);
    protein.push('M');
    for _ in 0..length - 2 {
        let residue = RANDOM_RESIDUES.choose(rng).copied().unwrap_or(b'A');
        protein.push(residue as char);
    }
    protein.push('*');
    protein
}

/// Group sorted indices into clusters
///
/// Consecutive indices join the current group while their gap stays below
/// `max_gap` and their distance to the group's first index stays below
/// `max_group_spread`.
pub fn group_nearby_indices(
    indices: &[usize],
    max_gap: Option<usize>,
    max_group_spread: Option<usize>,
) -> Vec<Vec<usize>> {
    let mut sorted = indices.to_vec();
    sorted.sort_unstable();

    let mut groups: Vec<Vec<usize>> = Vec::new();
    for index in sorted {
        let joins = groups.last().is_some_and(|group| {
            let gap_ok = max_gap.map_or(true, |g| index - group[group.len() - 1] < g);
            let spread_ok = max_group_spread.map_or(true, |s| index - group[0] < s);
            gap_ok && spread_ok
        });
        match groups.last_mut() {
            Some(group) if joins => group.push(index),
            _ => groups.push(vec![index]),
        }
    }
    groups
}
