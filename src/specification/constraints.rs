//! Built-in constraints
//!
//! This module provides the constraints most sequence designs need: frozen
//! regions, preserved translations, forbidden patterns and GC bounds.

use regex::bytes::Regex;

use crate::biotables::{dna_pattern_to_regex, reverse_complement_pattern, translate, translate_codon};
use crate::error::SequenceError;
use crate::sequence::utils::{gc_content, sequences_differences_segments, sliding_gc_content};
use crate::sequence::window::merge_windows;
use crate::sequence::{Sequence, Window};
use crate::specification::evaluation::Evaluation;
use crate::specification::traits::{Constraint, MutationRole};

/// Constraint satisfied by every sequence
///
/// Produced when a constraint is localized to a window it has nothing to say
/// about.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AlwaysPass;

impl Constraint for AlwaysPass {
    fn evaluate(&self, _sequence: &Sequence) -> Evaluation {
        Evaluation::pass("Out of scope")
    }

    fn localized(&self, _window: Window) -> Box<dyn Constraint> {
        Box::new(AlwaysPass)
    }

    fn label(&self) -> String {
        "AlwaysPass".to_string()
    }
}

/// Forbid any change inside a window
///
/// The window is frozen in the mutation space. When built with a reference,
/// evaluation also reports positions that differ from it.
#[derive(Clone, Debug, PartialEq)]
pub struct DoNotModify {
    window: Window,
    reference: Option<Vec<u8>>,
}

impl DoNotModify {
    /// Freeze a window
    pub fn new(window: Window) -> Self {
        Self {
            window,
            reference: None,
        }
    }

    /// Freeze a window and remember its current content
    pub fn with_reference(window: Window, sequence: &Sequence) -> Result<Self, SequenceError> {
        let window = sequence.window(window.start, window.end)?;
        Ok(Self {
            window,
            reference: Some(sequence.slice(window).to_vec()),
        })
    }

    /// The frozen window
    pub fn window(&self) -> Window {
        self.window
    }
}

impl Constraint for DoNotModify {
    fn evaluate(&self, sequence: &Sequence) -> Evaluation {
        let Some(reference) = &self.reference else {
            return Evaluation::pass(format!("{} is frozen", self.window));
        };
        if self.window.end > sequence.len() {
            return Evaluation::fail(
                reference.len() as f64,
                Vec::new(),
                format!("{} exceeds the sequence", self.window),
            );
        }
        let segments = sequences_differences_segments(reference, sequence.slice(self.window))
            .unwrap_or_default();
        if segments.is_empty() {
            return Evaluation::pass(format!("{} unchanged", self.window));
        }
        let changed: usize = segments.iter().map(Window::len).sum();
        let windows = segments
            .iter()
            .map(|s| Window::new(s.start + self.window.start, s.end + self.window.start))
            .collect();
        Evaluation::fail(
            changed as f64,
            windows,
            format!("{changed} position(s) modified in {}", self.window),
        )
    }

    fn localized(&self, _window: Window) -> Box<dyn Constraint> {
        // Immutability holds everywhere, whatever the sub-problem.
        Box::new(self.clone())
    }

    fn mutation_role(&self) -> MutationRole<'_> {
        MutationRole::Frozen(self.window)
    }

    fn label(&self) -> String {
        format!("DoNotModify{}", self.window)
    }
}

/// Require a coding window to translate to a given protein
///
/// Localization narrows which codons are checked but keeps the whole coding
/// window in the mutation space, so codons near a sub-problem keep changing
/// only synonymously. Codons outside the localized scope that cannot encode
/// their residue are left untouched rather than reported as conflicts.
#[derive(Clone, Debug, PartialEq)]
pub struct EnforceTranslation {
    window: Window,
    protein: Vec<u8>,
    scope: Window,
}

impl EnforceTranslation {
    /// Require `window` to encode `protein` (one residue per codon)
    pub fn new(window: Window, protein: &str) -> Result<Self, SequenceError> {
        if window.len() % 3 != 0 {
            return Err(SequenceError::NotCodonAligned(window.len()));
        }
        let protein: Vec<u8> = protein.bytes().map(|b| b.to_ascii_uppercase()).collect();
        if protein.len() * 3 != window.len() {
            return Err(SequenceError::ProteinLengthMismatch {
                residues: protein.len(),
                codons: window.len() / 3,
            });
        }
        for &residue in &protein {
            crate::biotables::synonymous_codons(residue)?;
        }
        Ok(Self {
            window,
            protein,
            scope: window,
        })
    }

    /// Require `window` to keep encoding its current translation
    pub fn preserving(sequence: &Sequence, window: Window) -> Result<Self, SequenceError> {
        let window = sequence.window(window.start, window.end)?;
        let protein = translate(sequence.slice(window))?;
        Ok(Self {
            window,
            protein,
            scope: window,
        })
    }

    /// The coding window
    pub fn window(&self) -> Window {
        self.window
    }

    /// The required protein
    pub fn protein(&self) -> &[u8] {
        &self.protein
    }

    fn codons(&self) -> impl Iterator<Item = (usize, Window)> + '_ {
        (0..self.protein.len()).map(move |i| {
            let start = self.window.start + 3 * i;
            (i, Window::new(start, start + 3))
        })
    }
}

impl Constraint for EnforceTranslation {
    fn evaluate(&self, sequence: &Sequence) -> Evaluation {
        if self.window.end > sequence.len() {
            return Evaluation::fail(
                self.protein.len() as f64,
                Vec::new(),
                format!("Coding window {} exceeds the sequence", self.window),
            );
        }
        let mismatches: Vec<Window> = self
            .codons()
            .filter(|(_, codon)| codon.overlaps(&self.scope))
            .filter(|(i, codon)| translate_codon(sequence.slice(*codon)) != self.protein[*i])
            .map(|(_, codon)| codon)
            .collect();

        if mismatches.is_empty() {
            Evaluation::pass(format!("Translation preserved over {}", self.scope))
        } else {
            let count = mismatches.len();
            Evaluation::fail(
                count as f64,
                mismatches,
                format!("{count} codon(s) do not encode the expected residue"),
            )
        }
    }

    fn localized(&self, window: Window) -> Box<dyn Constraint> {
        let scope = self
            .scope
            .overlap(&window)
            .unwrap_or_else(|| Window::new(self.window.start, self.window.start));
        Box::new(Self {
            scope,
            ..self.clone()
        })
    }

    fn mutation_role(&self) -> MutationRole<'_> {
        MutationRole::Translation {
            window: self.window,
            protein: &self.protein,
            scope: self.scope,
        }
    }

    fn label(&self) -> String {
        format!("EnforceTranslation{}", self.window)
    }
}

/// Forbid occurrences of an IUPAC pattern
///
/// Occurrences may overlap. Each occurrence is a violation window and the
/// score is the number of occurrences.
#[derive(Clone, Debug)]
pub struct AvoidPattern {
    pattern: String,
    forward: Regex,
    reverse: Option<Regex>,
    scope: Option<Window>,
}

fn compile_pattern(pattern: &str) -> Result<Regex, SequenceError> {
    Regex::new(&dna_pattern_to_regex(pattern)?).map_err(|e| SequenceError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}

fn overlapping_matches(regex: &Regex, bases: &[u8], hits: &mut Vec<Window>) {
    let mut start = 0;
    while start < bases.len() {
        match regex.find_at(bases, start) {
            Some(m) => {
                hits.push(Window::new(m.start(), m.end()));
                start = m.start() + 1;
            }
            None => break,
        }
    }
}

impl AvoidPattern {
    /// Forbid a pattern on the forward strand
    pub fn new(pattern: &str) -> Result<Self, SequenceError> {
        if pattern.is_empty() {
            return Err(SequenceError::InvalidPattern {
                pattern: String::new(),
                reason: "empty pattern".to_string(),
            });
        }
        let pattern = pattern.to_ascii_uppercase();
        Ok(Self {
            forward: compile_pattern(&pattern)?,
            pattern,
            reverse: None,
            scope: None,
        })
    }

    /// Also forbid the reverse complement of the pattern
    pub fn with_reverse_complement(mut self) -> Result<Self, SequenceError> {
        let reverse = reverse_complement_pattern(&self.pattern)?;
        if reverse != self.pattern {
            self.reverse = Some(compile_pattern(&reverse)?);
        }
        Ok(self)
    }

    /// The forbidden pattern
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// All occurrences in a sequence, sorted by position
    pub fn matches(&self, bases: &[u8]) -> Vec<Window> {
        let mut hits = Vec::new();
        overlapping_matches(&self.forward, bases, &mut hits);
        if let Some(reverse) = &self.reverse {
            overlapping_matches(reverse, bases, &mut hits);
        }
        hits.sort_unstable();
        hits.dedup();
        hits
    }
}

impl Constraint for AvoidPattern {
    fn evaluate(&self, sequence: &Sequence) -> Evaluation {
        let mut hits = self.matches(sequence.as_bytes());
        if let Some(scope) = self.scope {
            hits.retain(|hit| hit.overlaps(&scope));
        }
        if hits.is_empty() {
            return Evaluation::pass(format!("No match of {}", self.pattern));
        }
        let count = hits.len();
        Evaluation::fail(
            count as f64,
            hits,
            format!("{count} match(es) of {}", self.pattern),
        )
    }

    fn localized(&self, window: Window) -> Box<dyn Constraint> {
        let scope = match self.scope {
            Some(scope) => scope.overlap(&window),
            None => Some(window),
        };
        match scope {
            Some(scope) => Box::new(Self {
                scope: Some(scope),
                ..self.clone()
            }),
            None => Box::new(AlwaysPass),
        }
    }

    fn label(&self) -> String {
        format!("AvoidPattern({})", self.pattern)
    }
}

/// Keep GC content within bounds, globally or over every sliding window
#[derive(Clone, Debug, PartialEq)]
pub struct EnforceGcContent {
    mini: f64,
    maxi: f64,
    window_size: Option<usize>,
    scope: Option<Window>,
}

impl EnforceGcContent {
    /// Bound the GC content to `[mini, maxi]` (fractions in `[0, 1]`)
    pub fn new(mini: f64, maxi: f64) -> Self {
        assert!(
            (0.0..=1.0).contains(&mini) && (0.0..=1.0).contains(&maxi) && mini <= maxi,
            "GC bounds must satisfy 0 <= mini <= maxi <= 1"
        );
        Self {
            mini,
            maxi,
            window_size: None,
            scope: None,
        }
    }

    /// Check every sliding window of `size` bases instead of the whole region
    pub fn with_window(mut self, size: usize) -> Self {
        assert!(size > 0, "Window size must be positive");
        self.window_size = Some(size);
        self
    }

    /// Restrict the constraint to a region
    pub fn in_region(mut self, region: Window) -> Self {
        self.scope = Some(region);
        self
    }

    fn deviation(&self, gc: f64) -> f64 {
        if gc < self.mini {
            self.mini - gc
        } else if gc > self.maxi {
            gc - self.maxi
        } else {
            0.0
        }
    }

    fn region(&self, length: usize) -> Window {
        match self.scope {
            Some(scope) => Window::new(scope.start.min(length), scope.end.min(length)),
            None => Window::full(length),
        }
    }
}

impl Constraint for EnforceGcContent {
    fn evaluate(&self, sequence: &Sequence) -> Evaluation {
        let region = self.region(sequence.len());
        let bases = sequence.slice(region);

        match self.window_size {
            Some(size) if size <= region.len() => {
                let mut score = 0.0;
                let mut failing = Vec::new();
                for (i, gc) in sliding_gc_content(bases, size).into_iter().enumerate() {
                    let deviation = self.deviation(gc);
                    if deviation > 0.0 {
                        score += deviation * size as f64;
                        failing.push(Window::new(region.start + i, region.start + i + size));
                    }
                }
                if failing.is_empty() {
                    return Evaluation::pass(format!("All {size}bp windows within bounds"));
                }
                let windows = merge_windows(&failing);
                Evaluation::fail(
                    score,
                    windows,
                    format!("{} {size}bp window(s) out of bounds", failing.len()),
                )
            }
            _ => {
                let gc = gc_content(bases);
                let deviation = self.deviation(gc);
                let message = format!(
                    "GC content {:.1}% (bounds {:.1}%-{:.1}%)",
                    gc * 100.0,
                    self.mini * 100.0,
                    self.maxi * 100.0
                );
                if deviation > 0.0 {
                    Evaluation::fail(deviation * region.len() as f64, vec![region], message)
                } else {
                    Evaluation::pass(message)
                }
            }
        }
    }

    fn localized(&self, window: Window) -> Box<dyn Constraint> {
        let reach = match self.window_size {
            Some(size) => window.expand(size - 1, usize::MAX),
            None => window,
        };
        let scope = match self.scope {
            Some(scope) => scope.overlap(&reach),
            None => Some(reach),
        };
        match scope {
            Some(scope) => Box::new(Self {
                scope: Some(scope),
                ..self.clone()
            }),
            None => Box::new(AlwaysPass),
        }
    }

    fn label(&self) -> String {
        match self.window_size {
            Some(size) => format!(
                "EnforceGcContent({:.2}-{:.2}, {size}bp)",
                self.mini, self.maxi
            ),
            None => format!("EnforceGcContent({:.2}-{:.2})", self.mini, self.maxi),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(text: &str) -> Sequence {
        Sequence::new(text).unwrap()
    }

    #[test]
    fn test_always_pass() {
        let evaluation = AlwaysPass.evaluate(&seq("ATGC"));
        assert!(evaluation.passes);
        assert_eq!(evaluation.score, 0.0);
    }

    #[test]
    fn test_do_not_modify_reports_changes() {
        let original = seq("ATGCATGC");
        let constraint = DoNotModify::with_reference(Window::new(2, 6), &original).unwrap();
        assert!(constraint.evaluate(&original).passes);

        let edited = seq("ATGGTTGC");
        let evaluation = constraint.evaluate(&edited);
        assert!(!evaluation.passes);
        assert_eq!(evaluation.score, 2.0);
        assert_eq!(evaluation.windows, vec![Window::new(3, 5)]);
    }

    #[test]
    fn test_do_not_modify_role_and_localization() {
        let constraint = DoNotModify::new(Window::new(0, 10));
        assert_eq!(constraint.mutation_role(), MutationRole::Frozen(Window::new(0, 10)));
        let localized = constraint.localized(Window::new(40, 50));
        assert_eq!(localized.mutation_role(), MutationRole::Frozen(Window::new(0, 10)));
    }

    #[test]
    fn test_enforce_translation_validation() {
        assert_eq!(
            EnforceTranslation::new(Window::new(0, 4), "M").unwrap_err(),
            SequenceError::NotCodonAligned(4)
        );
        assert_eq!(
            EnforceTranslation::new(Window::new(0, 6), "M").unwrap_err(),
            SequenceError::ProteinLengthMismatch {
                residues: 1,
                codons: 2
            }
        );
        assert!(EnforceTranslation::new(Window::new(0, 3), "J").is_err());
    }

    #[test]
    fn test_enforce_translation_reports_codons() {
        let constraint = EnforceTranslation::new(Window::new(0, 9), "MKG").unwrap();
        assert!(constraint.evaluate(&seq("ATGAAAGGC")).passes);

        let evaluation = constraint.evaluate(&seq("ATGAACGGC"));
        assert!(!evaluation.passes);
        assert_eq!(evaluation.score, 1.0);
        assert_eq!(evaluation.windows, vec![Window::new(3, 6)]);
    }

    #[test]
    fn test_enforce_translation_localized_scope() {
        let sequence = seq("ATGAACGGC");
        let constraint = EnforceTranslation::new(Window::new(0, 9), "MKG").unwrap();

        // Only the third codon is checked, but the whole window stays coding
        let localized = constraint.localized(Window::new(6, 9));
        assert!(localized.evaluate(&sequence).passes);
        assert!(matches!(
            localized.mutation_role(),
            MutationRole::Translation { window, scope, .. }
                if window == Window::new(0, 9) && scope == Window::new(6, 9)
        ));

        let outside = constraint.localized(Window::new(20, 25));
        assert!(outside.evaluate(&sequence).passes);
    }

    #[test]
    fn test_preserving_translation() {
        let sequence = seq("ATGAAATAA");
        let constraint = EnforceTranslation::preserving(&sequence, sequence.full_window()).unwrap();
        assert_eq!(constraint.protein(), b"MK*");
        assert!(constraint.evaluate(&sequence).passes);
    }

    #[test]
    fn test_avoid_pattern_overlapping_matches() {
        let constraint = AvoidPattern::new("GATG").unwrap();
        let evaluation = constraint.evaluate(&seq("ATGATGATG"));
        assert!(!evaluation.passes);
        assert_eq!(evaluation.score, 2.0);
        assert_eq!(evaluation.windows, vec![Window::new(2, 6), Window::new(5, 9)]);
    }

    #[test]
    fn test_avoid_pattern_iupac_and_reverse() {
        let constraint = AvoidPattern::new("GGNCC").unwrap();
        assert_eq!(constraint.matches(b"AAGGACCAA"), vec![Window::new(2, 7)]);

        let stranded = AvoidPattern::new("GATG")
            .unwrap()
            .with_reverse_complement()
            .unwrap();
        assert_eq!(stranded.matches(b"AACATCAA"), vec![Window::new(2, 6)]);
        assert!(AvoidPattern::new("").is_err());
    }

    #[test]
    fn test_avoid_pattern_localized() {
        let sequence = seq("GATGAAAAAAAAGATG");
        let constraint = AvoidPattern::new("GATG").unwrap();

        let localized = constraint.localized(Window::new(0, 4));
        let evaluation = localized.evaluate(&sequence);
        assert_eq!(evaluation.windows, vec![Window::new(0, 4)]);

        let clean = constraint.localized(Window::new(6, 9));
        assert!(clean.evaluate(&sequence).passes);
    }

    #[test]
    fn test_gc_content_global() {
        let constraint = EnforceGcContent::new(0.4, 0.6);
        assert!(constraint.evaluate(&seq("ATGCATGC")).passes);

        let evaluation = constraint.evaluate(&seq("GGGGGGGA"));
        assert!(!evaluation.passes);
        assert_eq!(evaluation.windows, vec![Window::new(0, 8)]);
        assert!(evaluation.score > 0.0);
    }

    #[test]
    fn test_gc_content_sliding() {
        let constraint = EnforceGcContent::new(0.0, 0.75).with_window(4);
        let evaluation = constraint.evaluate(&seq("ATATATGCGCGCAT"));
        assert!(!evaluation.passes);
        // Windows of pure GC lie in [6, 12)
        assert_eq!(evaluation.windows, vec![Window::new(6, 12)]);
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let sequence = seq("ATGATGATGGGGCCCATG");
        let constraints: Vec<Box<dyn Constraint>> = vec![
            Box::new(AvoidPattern::new("GATG").unwrap()),
            Box::new(EnforceGcContent::new(0.3, 0.5).with_window(6)),
            Box::new(EnforceTranslation::preserving(&sequence, Window::new(0, 18)).unwrap()),
        ];
        for constraint in &constraints {
            assert_eq!(constraint.evaluate(&sequence), constraint.evaluate(&sequence));
        }
    }
}
