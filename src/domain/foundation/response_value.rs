//! Graded response value object (0.0-1.0 scale).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// A user's graded response to a dilemma.
///
/// 0.0 is outright rejection, 1.0 full acceptance. Always finite and within
/// [0, 1]; deserialization goes through the same check.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct ResponseValue(f64);

impl ResponseValue {
    /// Full rejection.
    pub const MIN: Self = Self(0.0);

    /// Full acceptance.
    pub const MAX: Self = Self(1.0);

    /// Creates a ResponseValue, returning error if not a finite value in [0, 1].
    pub fn try_new(value: f64) -> Result<Self, ValidationError> {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            return Err(ValidationError::out_of_range("response", 0.0, 1.0, value));
        }
        Ok(Self(value))
    }

    /// Returns the value as f64.
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for ResponseValue {
    type Error = ValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<ResponseValue> for f64 {
    fn from(value: ResponseValue) -> Self {
        value.0
    }
}

impl fmt::Display for ResponseValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_bounds_and_interior() {
        assert_eq!(ResponseValue::try_new(0.0).unwrap(), ResponseValue::MIN);
        assert_eq!(ResponseValue::try_new(1.0).unwrap(), ResponseValue::MAX);
        assert_eq!(ResponseValue::try_new(0.42).unwrap().value(), 0.42);
    }

    #[test]
    fn rejects_out_of_range() {
        match ResponseValue::try_new(1.01) {
            Err(ValidationError::OutOfRange { field, actual, .. }) => {
                assert_eq!(field, "response");
                assert_eq!(actual, 1.01);
            }
            other => panic!("Expected OutOfRange error, got {:?}", other),
        }
        assert!(ResponseValue::try_new(-0.1).is_err());
    }

    #[test]
    fn rejects_non_finite() {
        assert!(ResponseValue::try_new(f64::NAN).is_err());
        assert!(ResponseValue::try_new(f64::INFINITY).is_err());
    }

    #[test]
    fn displays_two_decimals() {
        assert_eq!(ResponseValue::try_new(0.5).unwrap().to_string(), "0.50");
    }

    #[test]
    fn serializes_as_bare_number() {
        let json = serde_json::to_string(&ResponseValue::try_new(0.25).unwrap()).unwrap();
        assert_eq!(json, "0.25");
    }

    #[test]
    fn deserialization_rejects_out_of_range() {
        assert!(serde_json::from_str::<ResponseValue>("0.7").is_ok());
        assert!(serde_json::from_str::<ResponseValue>("3.0").is_err());
    }
}
