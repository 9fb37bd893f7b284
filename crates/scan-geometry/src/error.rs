//! Error types for scan geometry transforms.

use std::fmt;

use thiserror::Error;

/// Result type alias using GeometryError.
pub type GeometryResult<T> = Result<T, GeometryError>;

/// What a failed visibility test was asked about.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewTarget {
    /// A geographic location (degrees).
    Geo { lon: f64, lat: f64 },
    /// A (possibly fractional) pixel position.
    Pixel { col: f64, row: f64 },
    /// A pair of scan angles (radians).
    Scan { x: f64, y: f64 },
}

impl fmt::Display for ViewTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewTarget::Geo { lon, lat } => write!(f, "lon={}, lat={}", lon, lat),
            ViewTarget::Pixel { col, row } => write!(f, "col={}, row={}", col, row),
            ViewTarget::Scan { x, y } => write!(f, "scan x={} rad, y={} rad", x, y),
        }
    }
}

/// Primary error type for scan geometry operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    // === Transform outcomes ===
    #[error("Outside of the satellite's view: {0}")]
    OutOfView(ViewTarget),

    #[error("Invalid input for '{name}': {value} is not finite")]
    InvalidInput { name: &'static str, value: f64 },

    // === Construction ===
    #[error("Invalid scan geometry: {0}")]
    InvalidGeometry(String),

    #[error("Configuration error: {0}")]
    Config(String),

    // === Batch ===
    #[error("Pixel grid of {columns} x {rows} is too large")]
    GridTooLarge { columns: usize, rows: usize },
}

impl GeometryError {
    /// True for the expected, recoverable "not on the visible disc" outcome.
    pub fn is_out_of_view(&self) -> bool {
        matches!(self, GeometryError::OutOfView(_))
    }

    /// True when the caller passed a NaN or infinite value.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, GeometryError::InvalidInput { .. })
    }
}

impl From<serde_yaml::Error> for GeometryError {
    fn from(err: serde_yaml::Error) -> Self {
        GeometryError::Config(format!("YAML error: {}", err))
    }
}

/// Reject NaN and infinite inputs before they reach any trigonometry.
#[inline]
pub(crate) fn ensure_finite(name: &'static str, value: f64) -> GeometryResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(GeometryError::InvalidInput { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_finite() {
        assert_eq!(ensure_finite("lon", 12.5), Ok(12.5));
        assert!(ensure_finite("lon", f64::NAN).unwrap_err().is_invalid_input());
        assert!(ensure_finite("lat", f64::INFINITY)
            .unwrap_err()
            .is_invalid_input());
    }

    #[test]
    fn test_error_messages() {
        let err = GeometryError::OutOfView(ViewTarget::Geo {
            lon: 179.0,
            lat: 0.0,
        });
        assert!(err.is_out_of_view());
        assert_eq!(
            err.to_string(),
            "Outside of the satellite's view: lon=179, lat=0"
        );

        let err = GeometryError::InvalidInput {
            name: "row",
            value: f64::NEG_INFINITY,
        };
        assert_eq!(err.to_string(), "Invalid input for 'row': -inf is not finite");
    }
}
