//! Core data types for colmax.
//!
//! Rank and value aliases shared by the messaging layer and the matrix
//! kernels, plus the small enumerations that select pipeline behaviour.

use crate::core::error::ColmaxError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Position of a process inside a process group, `0..size`.
pub type Rank = usize;

/// Message tag used to match a send with its receive.
pub type Tag = i32;

/// Matrix element and reduction value type.
pub type Value = i32;

/// Which all-reduce implementation combines the partial column maxima.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AllReduceStrategy {
    /// Hand-rolled binary-tree reduce and broadcast over point-to-point messages
    Tree,
    /// The process group's own `all_reduce_max` collective
    Library,
}

impl Default for AllReduceStrategy {
    fn default() -> Self {
        AllReduceStrategy::Tree
    }
}

impl fmt::Display for AllReduceStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllReduceStrategy::Tree => write!(f, "tree"),
            AllReduceStrategy::Library => write!(f, "library"),
        }
    }
}

impl FromStr for AllReduceStrategy {
    type Err = ColmaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tree" | "custom" => Ok(AllReduceStrategy::Tree),
            "library" | "builtin" | "stock" => Ok(AllReduceStrategy::Library),
            other => Err(ColmaxError::invalid_parameter(
                "strategy",
                other,
                "expected one of: tree, library",
            )),
        }
    }
}

/// Fill value for the slots of a partial vector that a rank does not own.
///
/// `Zero` treats unowned slots as 0, so a column whose true maximum is
/// negative reduces to 0. `Minimum` uses `i32::MIN`, the neutral element of
/// max, and reduces every column to its true maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentinelPolicy {
    /// Unowned slots hold 0
    Zero,
    /// Unowned slots hold `i32::MIN`
    Minimum,
}

impl SentinelPolicy {
    /// The value written into unowned slots.
    pub fn fill_value(self) -> Value {
        match self {
            SentinelPolicy::Zero => 0,
            SentinelPolicy::Minimum => Value::MIN,
        }
    }
}

impl Default for SentinelPolicy {
    fn default() -> Self {
        SentinelPolicy::Zero
    }
}

impl fmt::Display for SentinelPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SentinelPolicy::Zero => write!(f, "zero"),
            SentinelPolicy::Minimum => write!(f, "minimum"),
        }
    }
}

impl FromStr for SentinelPolicy {
    type Err = ColmaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zero" | "0" => Ok(SentinelPolicy::Zero),
            "minimum" | "min" => Ok(SentinelPolicy::Minimum),
            other => Err(ColmaxError::invalid_parameter(
                "sentinel",
                other,
                "expected one of: zero, minimum",
            )),
        }
    }
}

/// Verbosity levels for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerbosityLevel {
    /// Fatal errors only
    Fatal = -1,
    /// Warnings and errors
    Warning = 0,
    /// Information, warnings, and errors
    Info = 1,
    /// Debug information
    Debug = 2,
    /// Per-message tree protocol tracing
    Trace = 3,
}

impl Default for VerbosityLevel {
    fn default() -> Self {
        VerbosityLevel::Info
    }
}

impl VerbosityLevel {
    /// Map onto the `log` crate's level filter.
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            VerbosityLevel::Fatal => log::LevelFilter::Error,
            VerbosityLevel::Warning => log::LevelFilter::Warn,
            VerbosityLevel::Info => log::LevelFilter::Info,
            VerbosityLevel::Debug => log::LevelFilter::Debug,
            VerbosityLevel::Trace => log::LevelFilter::Trace,
        }
    }

    /// Level for a count of `-v` flags on the command line.
    pub fn from_occurrences(count: u8) -> Self {
        match count {
            0 => VerbosityLevel::Warning,
            1 => VerbosityLevel::Info,
            2 => VerbosityLevel::Debug,
            _ => VerbosityLevel::Trace,
        }
    }
}

impl fmt::Display for VerbosityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerbosityLevel::Fatal => write!(f, "fatal"),
            VerbosityLevel::Warning => write!(f, "warning"),
            VerbosityLevel::Info => write!(f, "info"),
            VerbosityLevel::Debug => write!(f, "debug"),
            VerbosityLevel::Trace => write!(f, "trace"),
        }
    }
}

impl FromStr for VerbosityLevel {
    type Err = ColmaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fatal" | "silent" | "-1" => Ok(VerbosityLevel::Fatal),
            "warning" | "warn" | "0" => Ok(VerbosityLevel::Warning),
            "info" | "1" => Ok(VerbosityLevel::Info),
            "debug" | "2" => Ok(VerbosityLevel::Debug),
            "trace" | "3" => Ok(VerbosityLevel::Trace),
            other => Err(ColmaxError::invalid_parameter(
                "verbosity",
                other,
                "expected one of: fatal, warning, info, debug, trace",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_sizes() {
        assert_eq!(std::mem::size_of::<Value>(), 4);
        assert_eq!(std::mem::size_of::<Tag>(), 4);
    }

    #[test]
    fn test_defaults() {
        assert_eq!(AllReduceStrategy::default(), AllReduceStrategy::Tree);
        assert_eq!(SentinelPolicy::default(), SentinelPolicy::Zero);
        assert_eq!(VerbosityLevel::default(), VerbosityLevel::Info);
    }

    #[test]
    fn test_sentinel_fill_value() {
        assert_eq!(SentinelPolicy::Zero.fill_value(), 0);
        assert_eq!(SentinelPolicy::Minimum.fill_value(), i32::MIN);
    }

    #[test]
    fn test_parse_round_trip_display() {
        for s in [AllReduceStrategy::Tree, AllReduceStrategy::Library] {
            assert_eq!(s.to_string().parse::<AllReduceStrategy>().unwrap(), s);
        }
        for s in [SentinelPolicy::Zero, SentinelPolicy::Minimum] {
            assert_eq!(s.to_string().parse::<SentinelPolicy>().unwrap(), s);
        }
        assert_eq!("WARN".parse::<VerbosityLevel>().unwrap(), VerbosityLevel::Warning);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = "ring".parse::<AllReduceStrategy>().unwrap_err();
        assert_eq!(err.category(), "invalid_parameter");
        assert!("negative".parse::<SentinelPolicy>().is_err());
    }

    #[test]
    fn test_verbosity_mapping() {
        assert_eq!(VerbosityLevel::Fatal.to_level_filter(), log::LevelFilter::Error);
        assert_eq!(VerbosityLevel::from_occurrences(0), VerbosityLevel::Warning);
        assert_eq!(VerbosityLevel::from_occurrences(7), VerbosityLevel::Trace);
        assert!(VerbosityLevel::Debug > VerbosityLevel::Info);
    }

    #[test]
    fn test_serialization() {
        let serialized = serde_json::to_string(&AllReduceStrategy::Library).unwrap();
        assert_eq!(serialized, "\"library\"");
        let deserialized: SentinelPolicy = serde_json::from_str("\"minimum\"").unwrap();
        assert_eq!(deserialized, SentinelPolicy::Minimum);
    }
}
