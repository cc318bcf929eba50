//! Configuration for resolution and optimization

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::error::ChiselError;

/// Configuration for [`Problem::resolve`](crate::problem::Problem::resolve)
///
/// Without a seed, random searches draw from entropy and results vary from
/// run to run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveConfig {
    /// Maximum number of evaluate-then-localize loops
    pub max_loops: usize,
    /// Sub-problems whose mutation space is smaller than this are searched
    /// exhaustively, larger ones randomly
    pub randomization_threshold: u64,
    /// Iteration budget of each random search
    pub max_random_iterations: usize,
    /// Positions around a violation window that sub-problems may change
    pub margin: usize,
    /// Maximum violation windows solved per constraint and loop
    pub max_windows_per_constraint: Option<usize>,
    /// Seed for the random number generator
    pub seed: Option<u64>,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            max_loops: 3,
            randomization_threshold: 10_000,
            max_random_iterations: 1_000,
            margin: 5,
            max_windows_per_constraint: None,
            seed: None,
        }
    }
}

impl ResolveConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the loop budget
    pub fn with_max_loops(mut self, loops: usize) -> Self {
        self.max_loops = loops;
        self
    }

    /// Set the exhaustive/random threshold
    pub fn with_randomization_threshold(mut self, threshold: u64) -> Self {
        self.randomization_threshold = threshold;
        self
    }

    /// Set the random search budget
    pub fn with_max_random_iterations(mut self, iterations: usize) -> Self {
        self.max_random_iterations = iterations;
        self
    }

    /// Set the margin around violation windows
    pub fn with_margin(mut self, margin: usize) -> Self {
        self.margin = margin;
        self
    }

    /// Bound the windows solved per constraint and loop
    pub fn with_max_windows_per_constraint(mut self, windows: usize) -> Self {
        self.max_windows_per_constraint = Some(windows);
        self
    }

    /// Seed the random number generator
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check the configuration for unusable values
    pub fn validate(&self) -> Result<(), ChiselError> {
        if self.max_loops == 0 {
            return Err(ChiselError::Configuration(
                "max_loops must be at least 1".to_string(),
            ));
        }
        if self.max_random_iterations == 0 {
            return Err(ChiselError::Configuration(
                "max_random_iterations must be at least 1".to_string(),
            ));
        }
        if self.max_windows_per_constraint == Some(0) {
            return Err(ChiselError::Configuration(
                "max_windows_per_constraint must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Random number generator for this configuration
    pub fn rng(&self) -> StdRng {
        seeded_rng(self.seed)
    }

    /// Parse a configuration from JSON; missing fields take default values
    pub fn from_json_str(json: &str) -> Result<Self, ChiselError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to JSON
    pub fn to_json_string(&self) -> Result<String, ChiselError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Configuration for [`Problem::optimize`](crate::problem::Problem::optimize)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizeConfig {
    /// Number of hill-climbing iterations
    pub max_iterations: usize,
    /// Random mutations tried per iteration
    pub mutations_per_step: usize,
    /// Seed for the random number generator
    pub seed: Option<u64>,
}

impl Default for OptimizeConfig {
    fn default() -> Self {
        Self {
            max_iterations: 1_000,
            mutations_per_step: 2,
            seed: None,
        }
    }
}

impl OptimizeConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the iteration budget
    pub fn with_max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = iterations;
        self
    }

    /// Set the batch size
    pub fn with_mutations_per_step(mut self, count: usize) -> Self {
        self.mutations_per_step = count;
        self
    }

    /// Seed the random number generator
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check the configuration for unusable values
    pub fn validate(&self) -> Result<(), ChiselError> {
        if self.mutations_per_step == 0 {
            return Err(ChiselError::Configuration(
                "mutations_per_step must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Random number generator for this configuration
    pub fn rng(&self) -> StdRng {
        seeded_rng(self.seed)
    }
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
