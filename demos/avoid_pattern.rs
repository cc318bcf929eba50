//! Restriction Site Removal
//!
//! This example removes restriction sites from a random sequence while
//! keeping a region frozen, then prints the resolution statistics.
//!
//! Run with `RUST_LOG=debug` to see each violation window being solved.

use chisel_evo::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== Restriction Site Removal ===\n");

    // Random background with sites planted at known positions
    let mut rng = StdRng::seed_from_u64(42);
    let background = random_dna_sequence(300, &mut rng).to_string();
    let text = format!(
        "{}GAATTC{}GGATCC{}GAATTC{}",
        &background[..60],
        &background[60..150],
        &background[150..240],
        &background[240..]
    );

    let constraints: Vec<Box<dyn Constraint>> = vec![
        // The promoter region must stay as it is
        Box::new(DoNotModify::new(Window::new(0, 40))),
        Box::new(AvoidPattern::new("GAATTC")?),
        Box::new(AvoidPattern::new("GGATCC")?),
        Box::new(EnforceGcContent::new(0.3, 0.7).with_window(50)),
    ];
    let mut problem = Problem::from_text(&text, constraints, vec![])?;

    println!("Before:\n{}", problem.constraints_text_summary(false));

    let config = ResolveConfig::new().with_seed(42).with_max_loops(6);
    let report = problem.resolve(&config)?;

    println!("After:\n{}", problem.constraints_text_summary(false));
    println!("{}", report.summary());
    println!("\nEdits: {}", problem.number_of_edits()?);
    println!("Final sequence:\n{}", problem.sequence());

    Ok(())
}
