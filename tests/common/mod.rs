//! Common test utilities for colmax integration tests.
#![allow(dead_code)]

use colmax::{
    run_local, AllReduceStrategy, Config, ConfigBuilder, MatrixInput, PipelineOutcome,
    SentinelPolicy, VerbosityLevel,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// The 3x4 matrix from the worked example: maxima [7, 9, 8, 9], counts [2, 2, 2, 2]
pub fn scenario_input() -> MatrixInput {
    MatrixInput::new(3, 4, vec![1, 5, 3, 9, 7, 2, 8, 4, 6, 9, 1, 0])
}

/// Seeded random input with entries in `[low, high)`
pub fn random_input(rows: usize, cols: usize, low: i32, high: i32, seed: u64) -> MatrixInput {
    let mut rng = StdRng::seed_from_u64(seed);
    let data = (0..rows * cols).map(|_| rng.gen_range(low..high)).collect();
    MatrixInput::new(rows, cols, data)
}

/// Overwrite one random entry per column with `value`, returning the rows chosen
pub fn plant_column_maximum(input: &mut MatrixInput, value: i32, seed: u64) -> Vec<usize> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..input.cols)
        .map(|j| {
            let i = rng.gen_range(0..input.rows);
            input.data[i * input.cols + j] = value;
            i
        })
        .collect()
}

/// Configuration for `ranks` local ranks
pub fn config(ranks: usize, strategy: AllReduceStrategy, sentinel: SentinelPolicy) -> Config {
    ConfigBuilder::new()
        .num_ranks(ranks)
        .strategy(strategy)
        .sentinel(sentinel)
        .verbosity(VerbosityLevel::Warning)
        .build()
        .expect("valid test config")
}

/// Run the pipeline and return the root's counts alongside every rank's outcome
pub fn run(input: &MatrixInput, config: &Config) -> (Vec<i32>, Vec<PipelineOutcome>) {
    let outcomes = run_local(input, config).expect("pipeline run");
    let counts = outcomes[0].counts.clone().expect("root counts");
    (counts, outcomes)
}
