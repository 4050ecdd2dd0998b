//! Error type shared by the color engine.

/// Errors raised by parsing, conversion and matching operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    /// Input does not satisfy the range or syntax rules of its color space
    InvalidColorFormat(String),
    /// Nearest-match lookup against an empty candidate list
    EmptyCandidateSet,
    /// Requested color space is not one of the implemented conversions
    UnsupportedConversion(String),
}

impl std::fmt::Display for ColorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidColorFormat(s) => write!(f, "Invalid color format: {}", s),
            Self::EmptyCandidateSet => write!(f, "No candidate colors to match against"),
            Self::UnsupportedConversion(s) => write!(f, "Unsupported color conversion: {}", s),
        }
    }
}

impl std::error::Error for ColorError {}

/// Result alias for engine operations.
pub type Result<T> = std::result::Result<T, ColorError>;
