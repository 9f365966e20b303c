//! Column-maximum counter
//!
//! Generates a seeded random matrix, runs the distributed count on a group
//! of in-process ranks and prints what the root rank ends up with.
//!
//! # Usage
//!
//! ```bash
//! # 4 ranks, 1000x300 matrix, hand-rolled tree all-reduce
//! colmax --ranks 4 --rows 1000 --cols 300
//!
//! # Compare against the single-process reference
//! colmax --rows 50 --cols 7 --low -20 --high 20 --sentinel minimum --sequential
//!
//! # Settings from a file, flags override
//! colmax --config colmax.toml --strategy library -vv
//! ```
//!
//! `COLMAX_NUM_RANKS`, `COLMAX_STRATEGY`, `COLMAX_SENTINEL` and
//! `COLMAX_VERBOSITY` override the config file; flags override both.

use anyhow::{bail, Context, Result};
use clap::Parser;
use colmax::sequential;
use colmax::{
    init_logging, random_matrix, run_local, AllReduceStrategy, Config, MatrixInput, SentinelPolicy,
    VerbosityLevel, DEFAULT_VALUE_HIGH, DEFAULT_VALUE_LOW,
};
use std::path::{Path, PathBuf};

/// Count matrix entries strictly below their column maximum across local ranks
#[derive(Parser, Debug)]
#[command(name = "colmax")]
#[command(version)]
struct Args {
    /// Number of ranks (0 = one per CPU)
    #[arg(short = 'n', long)]
    ranks: Option<usize>,

    /// Matrix rows
    #[arg(short, long, default_value_t = 100)]
    rows: usize,

    /// Matrix columns
    #[arg(short, long, default_value_t = 10)]
    cols: usize,

    /// Seed for the random matrix
    #[arg(short, long, default_value_t = 0)]
    seed: u64,

    /// Smallest generated value
    #[arg(long, default_value_t = DEFAULT_VALUE_LOW, allow_negative_numbers = true)]
    low: i32,

    /// One past the largest generated value
    #[arg(long, default_value_t = DEFAULT_VALUE_HIGH, allow_negative_numbers = true)]
    high: i32,

    /// All-reduce implementation: tree or library
    #[arg(long)]
    strategy: Option<AllReduceStrategy>,

    /// Fill value for unowned columns: zero or minimum
    #[arg(long)]
    sentinel: Option<SentinelPolicy>,

    /// Load settings from a .toml or .json file (default: ./colmax.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the effective settings to a .toml or .json file
    #[arg(long)]
    save_config: Option<PathBuf>,

    /// Also run the single-process reference and compare
    #[arg(long)]
    sequential: bool,

    /// Increase logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = resolve_config(&args)?;
    init_logging(config.verbosity);

    if let Some(path) = &args.save_config {
        config
            .save_to_file(path)
            .with_context(|| format!("failed to save config to {}", path.display()))?;
    }

    let matrix = random_matrix(args.rows, args.cols, args.low, args.high, args.seed)
        .context("failed to generate the input matrix")?;
    let input = MatrixInput::from_matrix(&matrix);

    let outcomes = run_local(&input, &config).context("distributed run failed")?;
    let root = outcomes.first().context("no ranks ran")?;
    let counts = root.counts.as_ref().context("root rank returned no counts")?;

    println!(
        "ranks: {}  matrix: {}x{}  strategy: {}  sentinel: {}",
        outcomes.len(),
        args.rows,
        args.cols,
        config.strategy,
        config.sentinel
    );
    println!("maxima: {:?}", root.reduced);
    println!("counts: {:?}", counts);

    if args.sequential {
        let reference = sequential::count_below_column_max(&input)?;
        println!("sequential counts: {:?}", reference.counts);

        if &reference.counts != counts || reference.maxima != root.reduced {
            let clamped = config.sentinel == SentinelPolicy::Zero && args.low < 0;
            if !clamped {
                bail!("distributed result differs from the sequential reference");
            }
            log::warn!("results differ: zero sentinel clamps negative column maxima to 0");
        }
    }

    Ok(())
}

fn resolve_config(args: &Args) -> Result<Config> {
    let mut config = Config::discover(args.config.as_deref(), Path::new("."))
        .context("failed to load config")?;
    config.apply_environment_overrides()?;

    if let Some(ranks) = args.ranks {
        config.num_ranks = ranks;
    }
    if let Some(strategy) = args.strategy {
        config.strategy = strategy;
    }
    if let Some(sentinel) = args.sentinel {
        config.sentinel = sentinel;
    }
    if args.verbose > 0 {
        config.verbosity = VerbosityLevel::from_occurrences(args.verbose);
    }

    config.validate()?;
    Ok(config)
}
