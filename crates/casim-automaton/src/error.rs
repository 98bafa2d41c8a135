//! Error types for the automaton system.

use thiserror::Error;

/// Result type alias for automaton operations.
pub type AutomatonResult<T> = Result<T, AutomatonError>;

/// Errors that can occur while configuring a simulation.
///
/// Evolution itself never fails; every variant here is raised at
/// configuration time or by the public radix helpers.
#[derive(Debug, Error)]
pub enum AutomatonError {
    /// Alphabet size below two.
    #[error("invalid number of states k = {k} (must be >= 2)")]
    InvalidStates { k: usize },

    /// Digit expansion requested in a radix outside `2..=256`.
    #[error("invalid radix {k} (must be in 2..=256)")]
    InvalidRadix { k: u32 },

    /// Neighborhood radius below one.
    #[error("invalid radius r = {r} (must be >= 1)")]
    InvalidRadius { r: usize },

    /// Zero-width row.
    #[error("invalid width: {width} (must be >= 1)")]
    InvalidWidth { width: usize },

    /// Zero-height grid.
    #[error("invalid height: {height} (must be >= 1)")]
    InvalidHeight { height: usize },

    /// The rule table for (k, r) would not fit in memory.
    #[error("rule space too large for k = {k}, r = {r}: table needs more than {max} entries")]
    RuleSpaceTooLarge { k: usize, r: usize, max: usize },

    /// An explicit initial row does not match the configuration.
    #[error("invalid initial row: {message}")]
    InvalidInitialRow { message: String },

    /// A parameter name outside the configuration surface.
    #[error("unknown parameter: {name:?} (expected one of r, k, width, height, rule)")]
    UnknownParameter { name: String },

    /// A parameter value that could not be parsed.
    #[error("invalid value {value:?} for parameter {name}")]
    InvalidParameterValue { name: String, value: String },

    /// Configuration serialization/deserialization error.
    #[error("config serialization error: {0}")]
    ConfigSerialization(#[from] serde_json::Error),
}
