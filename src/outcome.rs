//! # outcome.rs
//!
//! The value shown after pressing `=`: a finite number or the `Error` marker.
//!
//! Numbers are rendered the way the calculator displays them and the way they are
//! stored in history text, so a rendered number can be typed back into the buffer
//! and lexed again.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Literal shown in place of a result when evaluation fails.
pub const ERROR_MARKER: &str = "Error";

/// Magnitudes from here on are rendered in exponent notation.
const EXPONENT_UPPER: f64 = 1e21;

/// Non-zero magnitudes below this are rendered in exponent notation.
const EXPONENT_LOWER: f64 = 1e-6;

/// Result of evaluating an expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    /// A finite result.
    Number(f64),

    /// Evaluation failed; displayed as [`ERROR_MARKER`].
    Error,
}

impl Outcome {
    /// Returns the number, if any.
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Number(val) => Some(*val),
            Self::Error => None,
        }
    }

    /// Check if this is the error marker.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error)
    }
}

impl From<Result<f64, crate::EvalError>> for Outcome {
    fn from(result: Result<f64, crate::EvalError>) -> Self {
        match result {
            Ok(val) => Self::Number(val),
            Err(_) => Self::Error,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(val) => f.write_str(&format_number(*val)),
            Self::Error => f.write_str(ERROR_MARKER),
        }
    }
}

/// Formats a number for display and for re-insertion into an expression.
///
/// - integral values have no fraction part (`14`, not `14.0`)
/// - negative zero prints as `0`
/// - other values use the shortest representation that reads back to the same `f64`
/// - magnitudes at or above `1e21`, or below `1e-6`, use exponent notation (`1e21`)
/// - NaN and infinities print as `NaN`, `Infinity`, `-Infinity`
pub fn format_number(val: f64) -> String {
    if val.is_nan() {
        return "NaN".to_string();
    }
    if val.is_infinite() {
        return if val.is_sign_positive() { "Infinity" } else { "-Infinity" }.to_string();
    }
    if val == 0.0 {
        return "0".to_string();
    }

    let magnitude = val.abs();
    if magnitude >= EXPONENT_UPPER || magnitude < EXPONENT_LOWER {
        format!("{:e}", val)
    } else {
        format!("{}", val)
    }
}

impl Serialize for Outcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Number(val) => serializer.serialize_f64(*val),
            Self::Error => serializer.serialize_str(ERROR_MARKER),
        }
    }
}

/// Stored form of an outcome: a JSON number or a string.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredOutcome {
    Number(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for Outcome {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // numbers saved as text read back as numbers; anything else is the marker
        let outcome = match StoredOutcome::deserialize(deserializer)? {
            StoredOutcome::Number(val) => Self::Number(val),
            StoredOutcome::Text(text) => match text.parse::<f64>() {
                Ok(val) if val.is_finite() => Self::Number(val),
                _ => Self::Error,
            },
        };
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_integral() {
        assert_eq!(format_number(14.0), "14");
        assert_eq!(format_number(-3.0), "-3");
        assert_eq!(format_number(120.0), "120");
        assert_eq!(format_number(-0.0), "0");
    }

    #[test]
    fn test_format_fraction() {
        assert_eq!(format_number(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(format_number(std::f64::consts::PI), "3.141592653589793");
        assert_eq!(format_number(std::f64::consts::E), "2.718281828459045");
    }

    #[test]
    fn test_format_exponent() {
        assert_eq!(format_number(1e21), "1e21");
        assert_eq!(format_number(1e-7), "1e-7");
        assert_eq!(format_number(2.5e-7), "2.5e-7");
        assert_eq!(format_number(123456789012345680000.0), "123456789012345680000");
    }

    #[test]
    fn test_format_specials() {
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(f64::INFINITY), "Infinity");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn test_display() {
        assert_eq!(Outcome::Number(4.0).to_string(), "4");
        assert_eq!(Outcome::Error.to_string(), "Error");
    }

    #[test]
    fn test_serde() {
        assert_eq!(serde_json::to_string(&Outcome::Number(4.0)).unwrap(), "4.0");
        assert_eq!(serde_json::to_string(&Outcome::Error).unwrap(), "\"Error\"");
        assert_eq!(serde_json::from_str::<Outcome>("4").unwrap(), Outcome::Number(4.0));
        assert_eq!(serde_json::from_str::<Outcome>("\"Error\"").unwrap(), Outcome::Error);
        assert_eq!(serde_json::from_str::<Outcome>("\"2.5\"").unwrap(), Outcome::Number(2.5));
    }
}
