//! Configuration for a scan geometry.
//!
//! A configuration is the named constant set of one imager: orbit, Earth
//! ellipsoid and the navigation scaling parameters (COFF/LOFF, CFAC/LFAC).
//! Defaults are the Meteosat Second Generation VIS/IR operational values.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{GeometryError, GeometryResult};
use crate::geometry::ScanGeometry;

/// Configuration for a geostationary scan geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanGeometryConfig {
    /// Distance from Earth's centre to the satellite (km).
    pub satellite_altitude: f64,

    /// Earth equatorial radius (km).
    pub equatorial_radius: f64,

    /// Earth polar radius (km).
    pub polar_radius: f64,

    /// Longitude of the sub-satellite point (degrees).
    pub sub_satellite_lon: f64,

    /// Column of the disc centre (COFF).
    pub column_offset: f64,

    /// Row of the disc centre (LOFF).
    pub row_offset: f64,

    /// Column scaling coefficient (CFAC, 1/rad). The sign gives the scan
    /// direction.
    pub column_scale_factor: f64,

    /// Row scaling coefficient (LFAC, 1/rad). Negative for data scanned
    /// south to north, as in operations.
    pub row_scale_factor: f64,

    /// Sub-pixel scaling depth; the scale factors are given in units of
    /// `2^scaling_bits` per radian.
    pub scaling_bits: u32,
}

impl Default for ScanGeometryConfig {
    fn default() -> Self {
        Self {
            satellite_altitude: 42164.0,
            equatorial_radius: 6378.169,
            polar_radius: 6356.5838,
            sub_satellite_lon: 0.0,
            column_offset: 1856.0,
            row_offset: 1856.0,
            column_scale_factor: -781648343.0,
            row_scale_factor: -781648343.0,
            scaling_bits: 16,
        }
    }
}

impl ScanGeometryConfig {
    /// Load configuration from environment variables.
    ///
    /// Each variable overrides one default; values that fail to parse are
    /// logged and ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        env_override("SCAN_SATELLITE_ALTITUDE_KM", &mut config.satellite_altitude);
        env_override("SCAN_EQUATORIAL_RADIUS_KM", &mut config.equatorial_radius);
        env_override("SCAN_POLAR_RADIUS_KM", &mut config.polar_radius);
        env_override("SCAN_SUB_SATELLITE_LON", &mut config.sub_satellite_lon);
        env_override("SCAN_COLUMN_OFFSET", &mut config.column_offset);
        env_override("SCAN_ROW_OFFSET", &mut config.row_offset);
        env_override("SCAN_COLUMN_SCALE_FACTOR", &mut config.column_scale_factor);
        env_override("SCAN_ROW_SCALE_FACTOR", &mut config.row_scale_factor);
        env_override("SCAN_SCALING_BITS", &mut config.scaling_bits);

        config
    }

    /// Parse a YAML document. Fields that are absent keep their defaults.
    pub fn from_yaml_str(yaml: &str) -> GeometryResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Read and parse a YAML configuration file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> GeometryResult<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading scan geometry config");
        let text = std::fs::read_to_string(path)
            .map_err(|e| GeometryError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_yaml_str(&text)
    }

    /// Validate the configuration against the physical invariants.
    pub fn validate(&self) -> GeometryResult<()> {
        let fields = [
            ("satellite_altitude", self.satellite_altitude),
            ("equatorial_radius", self.equatorial_radius),
            ("polar_radius", self.polar_radius),
            ("sub_satellite_lon", self.sub_satellite_lon),
            ("column_offset", self.column_offset),
            ("row_offset", self.row_offset),
            ("column_scale_factor", self.column_scale_factor),
            ("row_scale_factor", self.row_scale_factor),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(GeometryError::InvalidGeometry(format!(
                    "{} must be finite, got {}",
                    name, value
                )));
            }
        }

        if self.polar_radius <= 0.0 {
            return Err(GeometryError::InvalidGeometry(
                "polar_radius must be > 0".to_string(),
            ));
        }

        if self.polar_radius >= self.equatorial_radius {
            return Err(GeometryError::InvalidGeometry(format!(
                "polar_radius ({}) must be < equatorial_radius ({})",
                self.polar_radius, self.equatorial_radius
            )));
        }

        if self.satellite_altitude <= self.equatorial_radius {
            return Err(GeometryError::InvalidGeometry(format!(
                "satellite_altitude ({}) must be > equatorial_radius ({})",
                self.satellite_altitude, self.equatorial_radius
            )));
        }

        if self.column_scale_factor == 0.0 || self.row_scale_factor == 0.0 {
            return Err(GeometryError::InvalidGeometry(
                "scale factors must be non-zero".to_string(),
            ));
        }

        if self.scaling_bits == 0 || self.scaling_bits > 32 {
            return Err(GeometryError::InvalidGeometry(
                "scaling_bits must be 1-32".to_string(),
            ));
        }

        Ok(())
    }

    /// Validate and build the geometry.
    pub fn build(self) -> GeometryResult<ScanGeometry> {
        ScanGeometry::new(self)
    }
}

fn env_override<T: std::str::FromStr>(key: &str, target: &mut T) {
    if let Ok(val) = std::env::var(key) {
        match val.trim().parse() {
            Ok(parsed) => {
                debug!(key, value = %val, "Scan geometry override from environment");
                *target = parsed;
            }
            Err(_) => warn!(key, value = %val, "Ignoring unparsable environment value"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(ScanGeometryConfig::default().validate().is_ok());
    }

    #[test]
    fn test_yaml_partial_override() {
        let config = ScanGeometryConfig::from_yaml_str(
            "sub_satellite_lon: 41.5\ncolumn_offset: 1856.5\n",
        )
        .unwrap();
        assert_eq!(config.sub_satellite_lon, 41.5);
        assert_eq!(config.column_offset, 1856.5);
        assert_eq!(config.row_offset, 1856.0);
        assert_eq!(config.scaling_bits, 16);
    }

    #[test]
    fn test_yaml_type_error() {
        let err = ScanGeometryConfig::from_yaml_str("polar_radius: [1, 2]").unwrap_err();
        assert!(matches!(err, GeometryError::Config(_)));
    }

    #[test]
    fn test_validate_rejects_bad_ellipsoid() {
        let config = ScanGeometryConfig {
            polar_radius: 6378.169,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(GeometryError::InvalidGeometry(_))
        ));

        let config = ScanGeometryConfig {
            satellite_altitude: 6000.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_degenerate_scaling() {
        let config = ScanGeometryConfig {
            row_scale_factor: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ScanGeometryConfig {
            scaling_bits: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ScanGeometryConfig {
            column_offset: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
