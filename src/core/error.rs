//! Error handling and error types for colmax.
//!
//! Every fallible operation in the crate returns [`Result`], so errors from
//! configuration, input validation and the messaging layer all propagate
//! through one enum.

use std::io;
use thiserror::Error;

/// Main error type for the colmax library.
#[derive(Error, Debug)]
pub enum ColmaxError {
    /// Configuration and input validation errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Invalid input parameters
    #[error("Invalid parameter: {parameter} = {value}, {reason}")]
    InvalidParameter {
        parameter: String,
        value: String,
        reason: String,
    },

    /// Dimension mismatch errors
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: String, actual: String },

    /// A peer rank that does not exist in the process group
    #[error("Rank out of range: rank {rank}, group size {size}")]
    RankOutOfRange { rank: usize, size: usize },

    /// Point-to-point or collective messaging failures
    #[error("Communication error: {message}")]
    Communication { message: String },

    /// File I/O errors
    #[error("I/O error: {source}")]
    IO {
        #[from]
        source: io::Error,
    },

    /// JSON serialization errors
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    /// TOML parsing errors
    #[error("TOML parse error: {source}")]
    TomlDe {
        #[from]
        source: toml::de::Error,
    },

    /// TOML serialization errors
    #[error("TOML serialization error: {source}")]
    TomlSer {
        #[from]
        source: toml::ser::Error,
    },

    /// Internal library errors (should not occur in normal usage)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Type alias for Results using ColmaxError
pub type Result<T> = std::result::Result<T, ColmaxError>;

impl ColmaxError {
    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        ColmaxError::Config {
            message: message.into(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter<P, V, R>(parameter: P, value: V, reason: R) -> Self
    where
        P: Into<String>,
        V: Into<String>,
        R: Into<String>,
    {
        ColmaxError::InvalidParameter {
            parameter: parameter.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a dimension mismatch error
    pub fn dimension_mismatch<E, A>(expected: E, actual: A) -> Self
    where
        E: Into<String>,
        A: Into<String>,
    {
        ColmaxError::DimensionMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create a rank out of range error
    pub fn rank_out_of_range(rank: usize, size: usize) -> Self {
        ColmaxError::RankOutOfRange { rank, size }
    }

    /// Create a communication error
    pub fn communication<S: Into<String>>(message: S) -> Self {
        ColmaxError::Communication {
            message: message.into(),
        }
    }

    /// Create an internal error (should be used sparingly)
    pub fn internal<S: Into<String>>(message: S) -> Self {
        ColmaxError::Internal {
            message: message.into(),
        }
    }

    /// Whether retrying the same call could plausibly succeed.
    ///
    /// Nothing in a collective is retried, so only I/O on config files
    /// qualifies.
    pub fn is_recoverable(&self) -> bool {
        match self {
            ColmaxError::Config { .. } => false,
            ColmaxError::InvalidParameter { .. } => false,
            ColmaxError::DimensionMismatch { .. } => false,
            ColmaxError::RankOutOfRange { .. } => false,
            ColmaxError::Communication { .. } => false,
            ColmaxError::IO { .. } => true,
            ColmaxError::Json { .. } => false,
            ColmaxError::TomlDe { .. } => false,
            ColmaxError::TomlSer { .. } => false,
            ColmaxError::Internal { .. } => false,
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            ColmaxError::Config { .. } => "config",
            ColmaxError::InvalidParameter { .. } => "invalid_parameter",
            ColmaxError::DimensionMismatch { .. } => "dimension_mismatch",
            ColmaxError::RankOutOfRange { .. } => "rank_out_of_range",
            ColmaxError::Communication { .. } => "communication",
            ColmaxError::IO { .. } => "io",
            ColmaxError::Json { .. } => "json",
            ColmaxError::TomlDe { .. } => "toml",
            ColmaxError::TomlSer { .. } => "toml",
            ColmaxError::Internal { .. } => "internal",
        }
    }
}

/// Build a [`ColmaxError::Config`] from a message or format string.
#[macro_export]
macro_rules! config_error {
    ($msg:expr) => {
        $crate::core::error::ColmaxError::config($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::core::error::ColmaxError::config(format!($fmt, $($arg)*))
    };
}

/// Build a [`ColmaxError::Communication`] from a message or format string.
#[macro_export]
macro_rules! communication_error {
    ($msg:expr) => {
        $crate::core::error::ColmaxError::communication($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::core::error::ColmaxError::communication(format!($fmt, $($arg)*))
    };
}

/// Return early with `$err` unless `$cond` holds.
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $err:expr) => {
        if !($cond) {
            return Err($err.into());
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = ColmaxError::config("rows must be positive");
        assert_eq!(err.category(), "config");
        assert!(!err.is_recoverable());

        let err = ColmaxError::communication("peer hung up");
        assert_eq!(err.category(), "communication");
    }

    #[test]
    fn test_error_macros() {
        let err = config_error!("bad input");
        assert!(matches!(err, ColmaxError::Config { .. }));

        let err = communication_error!("rank {} disconnected", 3);
        assert!(matches!(err, ColmaxError::Communication { .. }));
        assert!(err.to_string().contains("rank 3 disconnected"));
    }

    #[test]
    fn test_ensure_macro() {
        fn check(cols: usize) -> Result<usize> {
            ensure!(cols > 0, config_error!("cols must be positive"));
            Ok(cols)
        }
        assert_eq!(check(4).unwrap(), 4);
        assert!(matches!(check(0), Err(ColmaxError::Config { .. })));
    }

    #[test]
    fn test_parameter_errors() {
        let err = ColmaxError::invalid_parameter("num_ranks", "0", "must be positive");
        assert_eq!(err.category(), "invalid_parameter");
        assert!(err.to_string().contains("num_ranks = 0"));
    }

    #[test]
    fn test_rank_out_of_range_display() {
        let err = ColmaxError::rank_out_of_range(5, 4);
        assert_eq!(err.to_string(), "Rank out of range: rank 5, group size 4");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: ColmaxError = io_err.into();
        assert!(matches!(err, ColmaxError::IO { .. }));
        assert_eq!(err.category(), "io");
        assert!(err.is_recoverable());
    }
}
