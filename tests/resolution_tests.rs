//! End-to-end resolution scenarios

use chisel_evo::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn boxed<C: Constraint + 'static>(constraint: C) -> Box<dyn Constraint> {
    Box::new(constraint)
}

#[derive(Debug)]
struct FailsEverywhere;

impl Constraint for FailsEverywhere {
    fn evaluate(&self, _sequence: &Sequence) -> Evaluation {
        Evaluation::fail(1.0, vec![], "fails without a location")
    }

    fn localized(&self, _window: Window) -> Box<dyn Constraint> {
        Box::new(FailsEverywhere)
    }

    fn label(&self) -> String {
        "FailsEverywhere".to_string()
    }
}

#[test]
fn test_exhaustive_search_breaks_repeated_pattern() {
    let problem = Problem::from_text(
        "ATGATGATG",
        vec![boxed(AvoidPattern::new("GATG").unwrap())],
        vec![],
    )
    .unwrap();

    let outcome = ExhaustiveSearch::new().search(&problem).unwrap();

    // Position 5 is shared by both occurrences; 125 variants of positions
    // 6..9 are tried before it changes
    assert_eq!(outcome.sequence.to_string(), "ATGATAATG");
    assert_eq!(outcome.evaluations, 126);
    assert_eq!(outcome.sequence.differences(problem.sequence()).unwrap(), 1);
}

#[test]
fn test_resolve_coding_sequence_with_site() {
    let sequence = Sequence::new("ATGAAAGGATCCAAAGAACTGCATTATTAA").unwrap();
    assert_eq!(sequence.len(), 30);
    let protein = translate(sequence.as_bytes()).unwrap();
    let constraints = vec![
        boxed(EnforceTranslation::preserving(&sequence, sequence.full_window()).unwrap()),
        boxed(AvoidPattern::new("GGATCC").unwrap()),
    ];
    let mut problem = Problem::new(sequence, constraints, vec![]);

    let report = problem
        .resolve(&ResolveConfig::new().with_max_loops(3).with_seed(123))
        .unwrap();

    assert!(problem.all_constraints_pass());
    assert_eq!(translate(problem.sequence().as_bytes()).unwrap(), protein);
    assert_eq!(problem.sequence().to_string(), "ATGAAAGGATCTAAAGAACTGCATTATTAA");
    assert_eq!(report.edits, 1);
    assert_eq!(report.num_loops(), 1);
    assert_eq!(report.exhaustive_runs, 1);
}

#[test]
fn test_resolve_two_sites_in_coding_sequence() {
    let sequence = Sequence::new("ATGGAATTCAAAGGATCCTAA").unwrap();
    let protein = translate(sequence.as_bytes()).unwrap();
    let constraints = vec![
        boxed(EnforceTranslation::preserving(&sequence, sequence.full_window()).unwrap()),
        boxed(AvoidPattern::new("GAATTC").unwrap()),
        boxed(AvoidPattern::new("GGATCC").unwrap()),
    ];
    let mut problem = Problem::new(sequence, constraints, vec![]);

    problem.resolve(&ResolveConfig::new().with_seed(5)).unwrap();

    assert!(problem.all_constraints_pass());
    assert_eq!(translate(problem.sequence().as_bytes()).unwrap(), protein);
    assert!(problem.constraints_text_summary(false).starts_with("===> SUCCESS"));
}

#[test]
fn test_fully_frozen_sequence() {
    let problem = Problem::from_text(
        "ATGCATGC",
        vec![boxed(DoNotModify::new(Window::new(0, 8)))],
        vec![],
    )
    .unwrap();

    let space = problem.mutation_space().unwrap();
    assert!(space.is_empty());

    let outcome = ExhaustiveSearch::new().search(&problem).unwrap();
    assert_eq!(outcome.evaluations, 1);
    assert_eq!(outcome.sequence, *problem.sequence());
}

#[test]
fn test_resolve_translation_to_new_protein() {
    let mut problem = Problem::from_text(
        &"AAA".repeat(10),
        vec![boxed(EnforceTranslation::new(Window::new(0, 30), "WWWWWWWWWW").unwrap())],
        vec![],
    )
    .unwrap();

    let report = problem.resolve(&ResolveConfig::new().with_seed(0)).unwrap();

    // Tryptophan has a single codon
    assert_eq!(problem.sequence().to_string(), "TGG".repeat(10));
    assert_eq!(report.num_loops(), 1);
    assert_eq!(report.windows_solved, 10);
    assert_eq!(report.edits, 30);
}

#[test]
fn test_resolve_mistranslated_codons_at_both_ends() {
    let text = format!("AAA{}AAA", "GGT".repeat(8));
    let mut problem = Problem::from_text(
        &text,
        vec![boxed(
            EnforceTranslation::new(Window::new(0, 30), "FGGGGGGGGF").unwrap(),
        )],
        vec![],
    )
    .unwrap();

    problem
        .resolve(&ResolveConfig::new().with_seed(0).with_max_loops(10))
        .unwrap();

    assert!(problem.all_constraints_pass());
    assert_eq!(
        translate(problem.sequence().as_bytes()).unwrap(),
        b"FGGGGGGGGF".to_vec()
    );
    assert_eq!(problem.sequence().to_string(), format!("TTT{}TTT", "GGT".repeat(8)));
}

#[test]
fn test_conflict_is_fatal() {
    let mut problem = Problem::from_text(
        "AAACCCGGG",
        vec![
            boxed(DoNotModify::new(Window::new(0, 3))),
            boxed(EnforceTranslation::new(Window::new(0, 3), "W").unwrap()),
        ],
        vec![],
    )
    .unwrap();

    let err = problem.resolve(&ResolveConfig::new().with_seed(0)).unwrap_err();
    assert_eq!(
        err,
        ChiselError::Conflict(ConflictError {
            codon: Window::new(0, 3),
            amino_acid: 'W',
        })
    );
}

#[test]
fn test_not_localizable_is_fatal() {
    let mut problem =
        Problem::from_text("ATGCATGC", vec![boxed(FailsEverywhere)], vec![]).unwrap();
    let err = problem.resolve(&ResolveConfig::new().with_seed(0)).unwrap_err();
    assert_eq!(
        err,
        ChiselError::NotLocalizable {
            constraint: "FailsEverywhere".to_string(),
            message: "fails without a location".to_string(),
        }
    );
}

#[test]
fn test_infeasible_problem_is_unresolved() {
    // The start codon has no synonym, so ATG cannot be avoided
    let sequence = Sequence::new("ATGAAATAA").unwrap();
    let constraints = vec![
        boxed(EnforceTranslation::preserving(&sequence, sequence.full_window()).unwrap()),
        boxed(AvoidPattern::new("ATG").unwrap()),
    ];
    let mut problem = Problem::new(sequence, constraints, vec![]);

    let err = problem.resolve(&ResolveConfig::new().with_seed(8)).unwrap_err();
    match &err {
        ChiselError::Unresolved { loops, failing } => {
            assert_eq!(*loops, 3);
            assert_eq!(failing.len(), 1);
            assert_eq!(failing[0].constraint, "AvoidPattern(ATG)");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().starts_with("Could not solve all constraints in 3 loops"));
    assert_eq!(translate(problem.sequence().as_bytes()).unwrap(), b"MK*".to_vec());
}

#[test]
fn test_window_bound_spreads_work_over_loops() {
    let mut problem = Problem::from_text(
        "AAGATGAAAAAAAAAAAAAAAAGATGAA",
        vec![boxed(AvoidPattern::new("GATG").unwrap())],
        vec![],
    )
    .unwrap();
    let config = ResolveConfig::new()
        .with_margin(0)
        .with_max_windows_per_constraint(1)
        .with_seed(0);

    let report = problem.resolve(&config).unwrap();

    assert_eq!(problem.sequence().to_string(), "AAGATAAAAAAAAAAAAAAAAAGATAAA");
    assert_eq!(report.num_loops(), 2);
    assert_eq!(report.windows_solved, 2);
    assert_eq!(report.edits, 2);
}

#[test]
fn test_resolve_from_json_config() {
    let config = ResolveConfig::from_json_str(r#"{"seed": 7, "max_loops": 4}"#).unwrap();
    assert_eq!(config.margin, 5);

    let mut problem = Problem::from_text(
        "ATGATGATGATGATGATGATGATG",
        vec![boxed(AvoidPattern::new("GATG").unwrap())],
        vec![],
    )
    .unwrap();
    let report = problem.resolve(&config).unwrap();
    assert!(problem.all_constraints_pass());

    let json = serde_json::to_string(&report).unwrap();
    assert!(json.contains("\"windows_solved\""));
}

#[test]
fn test_seeded_resolution_is_reproducible() {
    let run = || {
        let mut problem = Problem::from_text(
            "GCGCGCGCGCGCGCGCGCGCATATATATAT",
            vec![boxed(EnforceGcContent::new(0.3, 0.7).with_window(10))],
            vec![],
        )
        .unwrap();
        problem
            .resolve(&ResolveConfig::new().with_seed(99).with_max_loops(6))
            .map(|_| problem.sequence().to_string())
    };
    assert_eq!(run(), run());
}

#[test]
fn test_resolve_then_optimize() {
    let sequence = Sequence::new("ATGAAAGGATCCAAAGAACTGCATTATTAA").unwrap();
    let constraints = vec![
        boxed(EnforceTranslation::preserving(&sequence, sequence.full_window()).unwrap()),
        boxed(AvoidPattern::new("GGATCC").unwrap()),
    ];
    let objectives: Vec<Box<dyn Objective>> = vec![Box::new(TargetGcContent::new(0.5))];
    let mut problem = Problem::new(sequence, constraints, objectives);
    let mut rng = StdRng::seed_from_u64(21);

    problem
        .resolve_with_rng(&ResolveConfig::new(), &mut rng)
        .unwrap();
    let report = problem
        .optimize_with_rng(&OptimizeConfig::new().with_max_iterations(400), &mut rng)
        .unwrap();

    assert!(problem.all_constraints_pass());
    assert!(report.final_score >= report.initial_score);
}
