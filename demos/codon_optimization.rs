//! Synonymous Codon Optimization
//!
//! This example reverse-translates a random protein, removes a restriction
//! site with synonymous codon changes only, and then tunes GC content and
//! k-mer uniqueness without touching the encoded protein.

use chisel_evo::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_target(false).init();

    println!("=== Synonymous Codon Optimization ===\n");

    let mut rng = StdRng::seed_from_u64(7);
    let protein = random_protein_sequence(60, &mut rng);
    let sequence = Sequence::new(&format!("{}GGATCC", reverse_translate(&protein)?))?;
    let coding = Window::new(0, protein.len() * 3);
    println!("Protein: {protein}");

    let constraints: Vec<Box<dyn Constraint>> = vec![
        Box::new(EnforceTranslation::preserving(&sequence, coding)?),
        Box::new(AvoidPattern::new("GGATCC")?.with_reverse_complement()?),
    ];
    let objectives: Vec<Box<dyn Objective>> = vec![
        Box::new(TargetGcContent::new(0.5)),
        Box::new(MinimizeNonUniqueKmers::new(8).with_boost(2.0)),
    ];
    let mut problem = Problem::new(sequence, constraints, objectives);

    let resolution = problem.resolve_with_rng(&ResolveConfig::new(), &mut rng)?;
    println!("{}\n", resolution.summary());

    let optimization = problem.optimize_with_rng(
        &OptimizeConfig::new().with_max_iterations(2_000),
        &mut rng,
    )?;
    println!(
        "Optimization: {} iterations, {} accepted, score {:.3} -> {:.3}",
        optimization.iterations,
        optimization.accepted,
        optimization.initial_score,
        optimization.final_score
    );

    println!("\n{}", problem.objectives_text_summary());
    println!("{}", problem.constraints_text_summary(false));

    let translated = translate(&problem.sequence().as_bytes()[coding.range()])?;
    assert_eq!(String::from_utf8_lossy(&translated), protein);
    println!("Final sequence:\n{}", problem.sequence());

    Ok(())
}
