//! Geostationary imager scan geometry.
//!
//! Converts between geographic coordinates and the fixed pixel grid of a
//! geostationary imager. The satellite views Earth from a fixed position
//! above the equator; a pixel is addressed by its column and row, which are
//! linear in the east-west and north-south scan angles.
//!
//! Reference: LRIT/HRIT Global Specification (CGMS 03, Issue 2.6),
//! pp. 24-25 (projection) and p. 28 (scaling function).

use std::f64::consts::FRAC_PI_2;

use nalgebra::Vector3;

use crate::config::ScanGeometryConfig;
use crate::coords::{GeoCoordinate, PixelBox, PixelCoordinate, PixelPosition, ScanAngle};
use crate::error::{ensure_finite, GeometryError, GeometryResult, ViewTarget};
use crate::longitude::shift_lon;

/// Scan geometry of one imager configuration.
///
/// Immutable after construction. All transforms take `&self` and keep no
/// state between calls, so one instance can be shared across threads.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanGeometry {
    config: ScanGeometryConfig,
    /// Satellite distance from Earth centre (km)
    h: f64,
    /// Equatorial radius (km)
    req: f64,
    /// Polar radius (km)
    rpol: f64,
    /// Sub-satellite longitude (radians)
    lambda_0: f64,
    /// (rpol / req)^2, geodetic to geocentric latitude
    k1: f64,
    /// 1 - k1, first eccentricity squared
    e2: f64,
    /// (req / rpol)^2
    k3: f64,
    /// h^2 - req^2
    c4: f64,
    /// 2^scaling_bits
    scale: f64,
}

impl ScanGeometry {
    /// Create a geometry from a configuration, validating it first.
    pub fn new(config: ScanGeometryConfig) -> GeometryResult<Self> {
        config.validate()?;
        Ok(Self::derive(config))
    }

    /// Meteosat Second Generation VIS/IR channels, operational parameters.
    ///
    /// - Satellite at 42164 km from Earth centre over 0° longitude
    /// - Ellipsoid 6378.169 / 6356.5838 km
    /// - COFF = LOFF = 1856, CFAC = LFAC = -781648343 (south-to-north scan)
    pub fn msg_vis_ir() -> Self {
        Self::derive(ScanGeometryConfig::default())
    }

    /// Precompute the ellipsoid and scaling constants of a validated config.
    fn derive(config: ScanGeometryConfig) -> Self {
        let h = config.satellite_altitude;
        let req = config.equatorial_radius;
        let rpol = config.polar_radius;
        let k1 = (rpol / req).powi(2);

        Self {
            h,
            req,
            rpol,
            lambda_0: config.sub_satellite_lon.to_radians(),
            k1,
            e2: 1.0 - k1,
            k3: (req / rpol).powi(2),
            c4: h * h - req * req,
            scale: 2f64.powi(config.scaling_bits as i32),
            config,
        }
    }

    /// The configuration this geometry was built from.
    pub fn config(&self) -> &ScanGeometryConfig {
        &self.config
    }

    pub fn satellite_altitude(&self) -> f64 {
        self.h
    }

    pub fn equatorial_radius(&self) -> f64 {
        self.req
    }

    pub fn polar_radius(&self) -> f64 {
        self.rpol
    }

    /// Sub-satellite longitude in degrees.
    pub fn sub_satellite_lon(&self) -> f64 {
        self.config.sub_satellite_lon
    }

    pub fn column_offset(&self) -> f64 {
        self.config.column_offset
    }

    pub fn row_offset(&self) -> f64 {
        self.config.row_offset
    }

    pub fn column_scale_factor(&self) -> f64 {
        self.config.column_scale_factor
    }

    pub fn row_scale_factor(&self) -> f64 {
        self.config.row_scale_factor
    }

    /// Convert geographic coordinates (degrees) to scan angles (radians).
    ///
    /// Fails with `OutOfView` when the point is on the far side of the Earth
    /// as seen from the satellite.
    pub fn geo_to_scan(&self, lon_deg: f64, lat_deg: f64) -> GeometryResult<ScanAngle> {
        let lon_deg = ensure_finite("lon", lon_deg)?;
        let lat_deg = ensure_finite("lat", lat_deg)?;

        let lat_rad = lat_deg.to_radians();
        let dlon = lon_deg.to_radians() - self.lambda_0;

        // Geocentric latitude
        let phi_c = (self.k1 * lat_rad.tan()).atan();
        let (sin_c, cos_c) = phi_c.sin_cos();

        // Distance from Earth centre to the ellipsoid surface
        let rl = self.rpol / (1.0 - self.e2 * cos_c * cos_c).sqrt();

        let surface_x = rl * cos_c * dlon.cos();
        let r1 = self.h - surface_x;
        let r2 = -rl * cos_c * dlon.sin();
        let r3 = rl * sin_c;
        let rn = Vector3::new(r1, r2, r3).norm();

        // Point-to-satellite vector against the outward ellipsoid normal.
        // Negative means the surface faces away from the satellite.
        let to_satellite = Vector3::new(r1, r2, -r3);
        let normal = Vector3::new(surface_x, -r2, r3 * self.k3);
        if to_satellite.dot(&normal) < 0.0 {
            return Err(GeometryError::OutOfView(ViewTarget::Geo {
                lon: lon_deg,
                lat: lat_deg,
            }));
        }

        Ok(ScanAngle {
            x: (-r2 / r1).atan(),
            y: (-r3 / rn).asin(),
        })
    }

    /// Convert scan angles (radians) to a fractional pixel position.
    #[inline]
    pub fn scan_to_pixel(&self, scan: ScanAngle) -> PixelPosition {
        PixelPosition {
            col: self.config.column_offset + scan.x / self.scale * self.config.column_scale_factor,
            row: self.config.row_offset + scan.y / self.scale * self.config.row_scale_factor,
        }
    }

    /// Convert a (fractional) pixel position to scan angles (radians).
    #[inline]
    pub fn pixel_to_scan(&self, col: f64, row: f64) -> ScanAngle {
        ScanAngle {
            x: self.scale * (col - self.config.column_offset) / self.config.column_scale_factor,
            y: self.scale * (row - self.config.row_offset) / self.config.row_scale_factor,
        }
    }

    /// Convert scan angles (radians) to geographic coordinates (degrees).
    ///
    /// Fails with `OutOfView` when the line of sight misses the Earth.
    pub fn scan_to_geo(&self, scan: ScanAngle) -> GeometryResult<GeoCoordinate> {
        let x = ensure_finite("x", scan.x)?;
        let y = ensure_finite("y", scan.y)?;
        self.intersect(x, y)
            .ok_or(GeometryError::OutOfView(ViewTarget::Scan { x, y }))
    }

    /// Convert geographic coordinates (degrees) to the nearest pixel.
    pub fn geo_to_pixel(&self, lon_deg: f64, lat_deg: f64) -> GeometryResult<PixelCoordinate> {
        Ok(self.geo_to_pixel_position(lon_deg, lat_deg)?.round())
    }

    /// Convert geographic coordinates (degrees) to a fractional pixel position.
    pub fn geo_to_pixel_position(
        &self,
        lon_deg: f64,
        lat_deg: f64,
    ) -> GeometryResult<PixelPosition> {
        let scan = self.geo_to_scan(lon_deg, lat_deg)?;
        Ok(self.scan_to_pixel(scan))
    }

    /// Convert a (fractional) pixel position to geographic coordinates (degrees).
    ///
    /// Fails with `OutOfView` when the pixel lies in space, off the Earth disc.
    pub fn pixel_to_geo(&self, col: f64, row: f64) -> GeometryResult<GeoCoordinate> {
        let col = ensure_finite("col", col)?;
        let row = ensure_finite("row", row)?;

        // Finite pixels far off the grid can still overflow the scan angle
        let scan = self.pixel_to_scan(col, row);
        self.intersect(scan.x, scan.y)
            .ok_or(GeometryError::OutOfView(ViewTarget::Pixel { col, row }))
    }

    /// Convert the two corners of a geographic box to pixels.
    ///
    /// Fails if either corner is out of view.
    pub fn bounding_box_to_pixel_box(
        &self,
        top_left: GeoCoordinate,
        bottom_right: GeoCoordinate,
    ) -> GeometryResult<PixelBox> {
        let tl = self.geo_to_pixel(top_left.lon, top_left.lat)?;
        let br = self.geo_to_pixel(bottom_right.lon, bottom_right.lat)?;
        Ok(PixelBox::new(tl, br))
    }

    /// Check if a geographic point is visible from the satellite.
    pub fn is_visible(&self, lon_deg: f64, lat_deg: f64) -> bool {
        self.geo_to_scan(lon_deg, lat_deg).is_ok()
    }

    /// Check if a pixel position falls on the Earth disc.
    pub fn is_on_disc(&self, col: f64, row: f64) -> bool {
        self.pixel_to_geo(col, row).is_ok()
    }

    /// Intersect the line of sight at scan angles (x, y) with the ellipsoid.
    ///
    /// Returns None when the ray misses the Earth.
    fn intersect(&self, x: f64, y: f64) -> Option<GeoCoordinate> {
        // Only the forward hemisphere can see the Earth. Also rejects NaN and
        // aliased angles a full turn away from the disc.
        if !(x.abs() < FRAC_PI_2 && y.abs() < FRAC_PI_2) {
            return None;
        }

        let (sin_x, cos_x) = x.sin_cos();
        let (sin_y, cos_y) = y.sin_cos();

        let h_cos = self.h * cos_x * cos_y;
        let q = cos_y * cos_y + self.k3 * sin_y * sin_y;

        let sa = h_cos * h_cos - q * self.c4;
        if !(sa >= 0.0) {
            return None; // Line of sight points to space
        }

        // Distance from satellite to the near-side surface point
        let sn = (h_cos - sa.sqrt()) / q;

        let s1 = self.h - sn * cos_x * cos_y;
        let s2 = sn * sin_x * cos_y;
        let s3 = -sn * sin_y;
        // s1 > 0 whenever sa >= 0 on a validated geometry; the check keeps
        // the longitude off the s1 = 0 singularity regardless.
        if s1 == 0.0 {
            return None;
        }
        let sxy = s1.hypot(s2);

        let lon = s2.atan2(s1) + self.lambda_0;
        let lat = (self.k3 * s3 / sxy).atan();

        Some(GeoCoordinate {
            lon: shift_lon(lon.to_degrees(), 0.0),
            lat: lat.to_degrees(),
        })
    }
}

impl Default for ScanGeometry {
    fn default() -> Self {
        Self::msg_vis_ir()
    }
}
