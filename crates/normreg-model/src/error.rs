//! Error types for the model layer

/// Errors raised when parsing or validating model values
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// Role name is neither `admin` nor `employee`
    #[error("unknown role: {0}")]
    UnknownRole(String),

    /// Block rank is not an integer in `1..=7`
    #[error("invalid block rank '{value}': expected an integer between 1 and 7")]
    InvalidBlockRank {
        /// Offending input
        value: String,
    },
}
