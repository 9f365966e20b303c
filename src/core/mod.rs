//! Core infrastructure for colmax.
//!
//! - [`types`]: rank and value aliases, strategy and sentinel enumerations
//! - [`constants`]: message tags, the root rank, configuration defaults
//! - [`error`]: the crate error type and `Result` alias
//!
//! ```rust
//! use colmax::core::{
//!     types::{AllReduceStrategy, SentinelPolicy},
//!     constants::ROOT_RANK,
//!     error::{ColmaxError, Result},
//! };
//!
//! let strategy: AllReduceStrategy = "library".parse()?;
//! assert_eq!(strategy, AllReduceStrategy::Library);
//! assert_eq!(SentinelPolicy::default().fill_value(), 0);
//! assert_eq!(ROOT_RANK, 0);
//! # Ok::<(), ColmaxError>(())
//! ```

pub mod constants;
pub mod error;
pub mod types;

pub use constants::*;
pub use error::{ColmaxError, Result};
pub use types::*;

/// Initialize the logging subsystem.
///
/// `RUST_LOG` wins when it is set; otherwise `verbosity` picks the level.
/// Calling this more than once is harmless.
pub fn init_logging(verbosity: VerbosityLevel) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(verbosity.to_level_filter());
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }

    // Ignore if already initialized
    if builder.try_init().is_ok() {
        log::debug!("Logging initialized at {}", verbosity);
    }
}
