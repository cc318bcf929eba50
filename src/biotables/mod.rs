//! Genetic code tables
//!
//! The standard genetic code, reverse lookups from residues to synonymous
//! codons, and IUPAC nucleotide patterns.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::error::SequenceError;

/// Residue emitted for a codon outside the table
pub const UNKNOWN_RESIDUE: u8 = b'X';

/// Standard genetic code as (residue, synonymous codons)
///
/// The first codon of each entry is the one [`reverse_translate`] picks.
pub const STANDARD_CODE: [(u8, &[&str]); 21] = [
    (b'A', &["GCT", "GCC", "GCA", "GCG"]),
    (b'C', &["TGT", "TGC"]),
    (b'D', &["GAT", "GAC"]),
    (b'E', &["GAA", "GAG"]),
    (b'F', &["TTT", "TTC"]),
    (b'G', &["GGT", "GGC", "GGA", "GGG"]),
    (b'H', &["CAT", "CAC"]),
    (b'I', &["ATT", "ATC", "ATA"]),
    (b'K', &["AAA", "AAG"]),
    (b'L', &["TTA", "TTG", "CTT", "CTC", "CTA", "CTG"]),
    (b'M', &["ATG"]),
    (b'N', &["AAT", "AAC"]),
    (b'P', &["CCT", "CCC", "CCA", "CCG"]),
    (b'Q', &["CAA", "CAG"]),
    (b'R', &["CGT", "CGC", "CGA", "CGG", "AGA", "AGG"]),
    (b'S', &["TCT", "TCC", "TCA", "TCG", "AGT", "AGC"]),
    (b'T', &["ACT", "ACC", "ACA", "ACG"]),
    (b'V', &["GTT", "GTC", "GTA", "GTG"]),
    (b'W', &["TGG"]),
    (b'Y', &["TAT", "TAC"]),
    (b'*', &["TAA", "TAG", "TGA"]),
];

fn codon_table() -> &'static HashMap<[u8; 3], u8> {
    static TABLE: OnceLock<HashMap<[u8; 3], u8>> = OnceLock::new();
    TABLE.get_or_init(|| {
        STANDARD_CODE
            .iter()
            .flat_map(|(residue, codons)| {
                codons.iter().map(move |codon| {
                    let b = codon.as_bytes();
                    ([b[0], b[1], b[2]], *residue)
                })
            })
            .collect()
    })
}

/// Residue encoded by a single codon, [`UNKNOWN_RESIDUE`] if none
pub fn translate_codon(codon: &[u8]) -> u8 {
    match codon {
        [a, b, c] => codon_table()
            .get(&[*a, *b, *c])
            .copied()
            .unwrap_or(UNKNOWN_RESIDUE),
        _ => UNKNOWN_RESIDUE,
    }
}

/// Translate a coding sequence into residues (`*` marks stop codons)
pub fn translate(bases: &[u8]) -> Result<Vec<u8>, SequenceError> {
    if bases.len() % 3 != 0 {
        return Err(SequenceError::NotCodonAligned(bases.len()));
    }
    Ok(bases.chunks_exact(3).map(translate_codon).collect())
}

/// All codons encoding a residue, in table order
pub fn synonymous_codons(residue: u8) -> Result<&'static [&'static str], SequenceError> {
    let residue = residue.to_ascii_uppercase();
    STANDARD_CODE
        .iter()
        .find(|(r, _)| *r == residue)
        .map(|(_, codons)| *codons)
        .ok_or(SequenceError::UnknownAminoAcid(residue as char))
}

/// A coding sequence for the protein, using the first codon of each residue
pub fn reverse_translate(protein: &str) -> Result<String, SequenceError> {
    protein
        .bytes()
        .map(|residue| synonymous_codons(residue).map(|codons| codons[0]))
        .collect()
}

/// Regular expression matching an IUPAC nucleotide pattern
///
/// For instance `ATTNN` becomes `ATT[ATGC][ATGC]`.
pub fn dna_pattern_to_regex(pattern: &str) -> Result<String, SequenceError> {
    pattern
        .chars()
        .map(|symbol| {
            let class = match symbol.to_ascii_uppercase() {
                'A' => "A",
                'C' => "C",
                'G' => "G",
                'T' => "T",
                'N' => "[ATGC]",
                'R' => "[AG]",
                'Y' => "[CT]",
                'S' => "[GC]",
                'W' => "[AT]",
                'K' => "[GT]",
                'M' => "[AC]",
                'B' => "[CGT]",
                'D' => "[AGT]",
                'H' => "[ACT]",
                'V' => "[ACG]",
                other => {
                    return Err(SequenceError::InvalidPattern {
                        pattern: pattern.to_string(),
                        reason: format!("unknown IUPAC symbol {other:?}"),
                    })
                }
            };
            Ok(class)
        })
        .collect()
}

/// Reverse complement of an IUPAC nucleotide pattern
pub fn reverse_complement_pattern(pattern: &str) -> Result<String, SequenceError> {
    pattern
        .chars()
        .rev()
        .map(|symbol| {
            let complement = match symbol.to_ascii_uppercase() {
                'A' => 'T',
                'T' => 'A',
                'G' => 'C',
                'C' => 'G',
                'R' => 'Y',
                'Y' => 'R',
                'K' => 'M',
                'M' => 'K',
                'B' => 'V',
                'V' => 'B',
                'D' => 'H',
                'H' => 'D',
                same @ ('N' | 'S' | 'W') => same,
                other => {
                    return Err(SequenceError::InvalidPattern {
                        pattern: pattern.to_string(),
                        reason: format!("unknown IUPAC symbol {other:?}"),
                    })
                }
            };
            Ok(complement)
        })
        .collect()
}
