use std::error::Error;
use std::fmt::{Display, Formatter};

/// Common error type for Brain Odyssey data operations.
///
/// Raised when a record or payload cannot be constructed from the values
/// given (non-finite coordinates, out-of-range frequencies, unparsable ids).
///
/// # Examples
/// ```
/// use odyssey_structures::OdysseyDataError;
///
/// fn validate_radius(radius: f64) -> Result<(), OdysseyDataError> {
///     if radius <= 0.0 {
///         return Err(OdysseyDataError::BadParameters("Radius must be > 0".into()));
///     }
///     Ok(())
/// }
///
/// assert!(validate_radius(0.0).is_err());
/// assert!(validate_radius(3.0).is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum OdysseyDataError {
    /// Invalid parameters provided to a function
    BadParameters(String),
    /// A frequency outside of [0, 1]
    FrequencyOutOfRange(f64),
    /// A coordinate component that is NaN or infinite
    NonFiniteCoordinate(String),
    /// Internal error indicating a bug
    InternalError(String),
}

impl Display for OdysseyDataError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OdysseyDataError::BadParameters(msg) => write!(f, "Bad Parameters: {}", msg),
            OdysseyDataError::FrequencyOutOfRange(value) => {
                write!(f, "Frequency {} is outside of [0, 1]", value)
            }
            OdysseyDataError::NonFiniteCoordinate(msg) => {
                write!(f, "Non-finite coordinate: {}", msg)
            }
            OdysseyDataError::InternalError(msg) => write!(f, "Internal Error: {}", msg),
        }
    }
}
impl Error for OdysseyDataError {}
